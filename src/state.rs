/*
 * Responsibility
 * - shared context bound to the Router (AppState)
 *   - sign-in service, outcome counters, optional Prometheus handle
 * - cheap to Clone (Arc / handle clones inside)
 */
use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use crate::services::{auth::SigninService, metrics::SigninCounters};

#[derive(Clone)]
pub struct AppState {
    pub signin: Arc<SigninService>,
    pub counters: SigninCounters,
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(signin: Arc<SigninService>, counters: SigninCounters) -> Self {
        Self {
            signin,
            counters,
            prometheus: None,
        }
    }

    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}
