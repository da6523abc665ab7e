//! Sign-in outcome counters.
//!
//! The handler receives a `SigninCounters` through `AppState`; nothing in the
//! sign-in path reaches for a global. In production the handles come from the
//! installed Prometheus recorder, in tests they are backed by local atomics.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use metrics::atomics::AtomicU64;
use metrics::{Counter, Unit, counter, describe_counter};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const SIGNIN_TOTAL: &str = "signin_total";
pub const SIGNIN_SUCCESS: &str = "signin_success";
pub const SIGNIN_FAIL: &str = "signin_fail";
pub const SIGNIN_ERROR: &str = "signin_error";

/// Terminal bucket of a single sign-in request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigninOutcome {
    Success,
    /// 400 and 401 responses.
    Fail,
    /// 500 responses.
    Error,
}

#[derive(Clone)]
pub struct SigninCounters {
    total: Counter,
    success: Counter,
    fail: Counter,
    error: Counter,
}

impl fmt::Debug for SigninCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigninCounters").finish_non_exhaustive()
    }
}

impl SigninCounters {
    /// Handles registered with whatever recorder is installed globally.
    ///
    /// Call once at startup, after `install_prometheus_recorder`.
    pub fn registered() -> Self {
        describe_counter!(SIGNIN_TOTAL, Unit::Count, "Total number of signin requests");
        describe_counter!(SIGNIN_SUCCESS, Unit::Count, "Successful signin requests");
        describe_counter!(SIGNIN_FAIL, Unit::Count, "Failed signin requests");
        describe_counter!(SIGNIN_ERROR, Unit::Count, "Erroneous signin requests");

        Self {
            total: counter!(SIGNIN_TOTAL),
            success: counter!(SIGNIN_SUCCESS),
            fail: counter!(SIGNIN_FAIL),
            error: counter!(SIGNIN_ERROR),
        }
    }

    /// Counters that are not attached to any recorder, plus a probe to read them.
    pub fn detached() -> (Self, CounterProbe) {
        let probe = CounterProbe::default();
        let counters = Self {
            total: Counter::from_arc(probe.total.clone()),
            success: Counter::from_arc(probe.success.clone()),
            fail: Counter::from_arc(probe.fail.clone()),
            error: Counter::from_arc(probe.error.clone()),
        };
        (counters, probe)
    }

    pub fn record_request(&self) {
        self.total.increment(1);
    }

    pub fn record_outcome(&self, outcome: SigninOutcome) {
        match outcome {
            SigninOutcome::Success => self.success.increment(1),
            SigninOutcome::Fail => self.fail.increment(1),
            SigninOutcome::Error => self.error.increment(1),
        }
    }
}

/// Read side of detached counters.
#[derive(Clone, Debug, Default)]
pub struct CounterProbe {
    total: Arc<AtomicU64>,
    success: Arc<AtomicU64>,
    fail: Arc<AtomicU64>,
    error: Arc<AtomicU64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterSnapshot {
    pub total: u64,
    pub success: u64,
    pub fail: u64,
    pub error: u64,
}

impl CounterSnapshot {
    pub fn outcomes(&self) -> u64 {
        self.success + self.fail + self.error
    }
}

impl CounterProbe {
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            total: self.total.load(Ordering::Acquire),
            success: self.success.load(Ordering::Acquire),
            fail: self.fail.load(Ordering::Acquire),
            error: self.error.load(Ordering::Acquire),
        }
    }
}

/// Install the Prometheus recorder and return the handle used to render `/metrics`.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
