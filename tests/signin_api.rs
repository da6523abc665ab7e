use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use tower::ServiceExt;

use signin_service::app::build_router;
use signin_service::repos::{InMemoryUserStore, UserRecord};
use signin_service::services::auth::{
    CredentialValidator, Hs256Signer, IssuanceLogPolicy, SigninClaims, SigninService,
    StaticSecret, TokenIssuer,
};
use signin_service::services::metrics::{CounterProbe, SigninCounters};
use signin_service::state::AppState;

const ISSUER: &str = "knowsearch.ml";
const AUDIENCE: &str = "frontend.knowsearch.ml";
const SECRET: &str = "integration-secret";

const ADA: &str = "ada@example.com";
const ADA_HASH: &str = "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918";

fn test_app(secret: &str) -> (Router, CounterProbe) {
    let store = InMemoryUserStore::new([
        UserRecord::new(ADA, ADA_HASH),
        UserRecord::new("bob@example.com", "b0b"),
    ])
    .unwrap();

    let issuer = TokenIssuer::new(
        ISSUER.into(),
        AUDIENCE.into(),
        60,
        Arc::new(Hs256Signer),
        Arc::new(StaticSecret::new(secret)),
    );
    let signin = SigninService::new(
        CredentialValidator::new(Arc::new(store)),
        issuer,
        IssuanceLogPolicy::default(),
    );

    let (counters, probe) = SigninCounters::detached();
    let state = AppState::new(Arc::new(signin), counters);
    (build_router(state), probe)
}

fn signin_request(headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(Method::POST).uri("/api/v1/signin");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    builder.body(Body::empty()).unwrap()
}

async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn decode(token: &str, secret: &str) -> jsonwebtoken::errors::Result<SigninClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[ISSUER]);
    validation.set_audience(&[AUDIENCE]);
    jsonwebtoken::decode::<SigninClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
}

#[tokio::test]
async fn missing_email_is_a_bad_request() {
    let (app, probe) = test_app(SECRET);

    let response = send(&app, signin_request(&[("Passwordhash", ADA_HASH)])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Email Missing");

    let counts = probe.snapshot();
    assert_eq!(counts.total, 1);
    assert_eq!(counts.fail, 1);
    assert_eq!(counts.success, 0);
    assert_eq!(counts.error, 0);
}

#[tokio::test]
async fn missing_passwordhash_is_a_bad_request() {
    let (app, probe) = test_app(SECRET);

    let response = send(&app, signin_request(&[("Email", ADA)])).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Passwordhash Missing");
    assert_eq!(probe.snapshot().fail, 1);
}

#[tokio::test]
async fn unknown_user_is_unauthorized_regardless_of_proof() {
    let (app, probe) = test_app(SECRET);

    for proof in [ADA_HASH, "b0b", "anything"] {
        let response = send(
            &app,
            signin_request(&[("Email", "eve@example.com"), ("Passwordhash", proof)]),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_text(response).await, "User Does not Exist");
    }
    assert_eq!(probe.snapshot().fail, 3);
}

#[tokio::test]
async fn identifier_lookup_is_case_sensitive() {
    let (app, _probe) = test_app(SECRET);

    let response = send(
        &app,
        signin_request(&[("Email", "ADA@example.com"), ("Passwordhash", ADA_HASH)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "User Does not Exist");
}

#[tokio::test]
async fn wrong_proof_is_unauthorized() {
    let (app, probe) = test_app(SECRET);

    let response = send(
        &app,
        signin_request(&[("Email", ADA), ("Passwordhash", "b0b")]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(response).await, "Incorrect Password");

    let counts = probe.snapshot();
    assert_eq!((counts.total, counts.fail, counts.success), (1, 1, 0));
}

#[tokio::test]
async fn valid_credentials_return_a_signed_token() {
    let (app, probe) = test_app(SECRET);
    let before = chrono::Utc::now().timestamp();

    let response = send(
        &app,
        signin_request(&[("Email", ADA), ("Passwordhash", ADA_HASH)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let token = body_text(response).await;
    assert!(!token.is_empty());

    let claims = decode(&token, SECRET).unwrap();
    assert_eq!(claims.iss, ISSUER);
    assert_eq!(claims.aud, AUDIENCE);
    assert!(claims.exp > before);
    assert!(claims.exp <= chrono::Utc::now().timestamp() + 60);

    let counts = probe.snapshot();
    assert_eq!((counts.total, counts.success, counts.fail, counts.error), (1, 1, 0, 0));
}

#[tokio::test]
async fn header_names_are_matched_case_insensitively() {
    let (app, _probe) = test_app(SECRET);

    let response = send(
        &app,
        signin_request(&[("email", ADA), ("PASSWORDHASH", ADA_HASH)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn empty_secret_is_an_internal_error() {
    let (app, probe) = test_app("");

    let response = send(
        &app,
        signin_request(&[("Email", ADA), ("Passwordhash", ADA_HASH)]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, "Internal Server Error");

    let counts = probe.snapshot();
    assert_eq!((counts.total, counts.error, counts.success, counts.fail), (1, 1, 0, 0));
}

#[tokio::test]
async fn successive_sign_ins_yield_distinct_valid_tokens() {
    let (app, _probe) = test_app(SECRET);
    let request = || signin_request(&[("Email", ADA), ("Passwordhash", ADA_HASH)]);

    let first = body_text(send(&app, request()).await).await;
    let second = body_text(send(&app, request()).await).await;

    assert_ne!(first, second);
    assert!(decode(&first, SECRET).is_ok());
    assert!(decode(&second, SECRET).is_ok());
    assert!(decode(&first, "some-other-secret").is_err());
}

#[tokio::test]
async fn every_request_lands_in_exactly_one_bucket() {
    let (app, probe) = test_app(SECRET);

    let cases: Vec<Vec<(&str, &str)>> = vec![
        vec![],
        vec![("Email", ADA)],
        vec![("Email", ADA), ("Passwordhash", ADA_HASH)],
        vec![("Email", ADA), ("Passwordhash", "nope")],
        vec![("Email", "eve@example.com"), ("Passwordhash", "nope")],
        vec![("Email", "bob@example.com"), ("Passwordhash", "b0b")],
    ];

    let mut tasks = Vec::new();
    for _ in 0..10 {
        for case in &cases {
            let app = app.clone();
            let request = signin_request(case);
            tasks.push(tokio::spawn(async move {
                app.oneshot(request).await.unwrap().status()
            }));
        }
    }
    for task in tasks {
        task.await.unwrap();
    }

    let counts = probe.snapshot();
    assert_eq!(counts.total, 60);
    assert_eq!(counts.outcomes(), 60);
    assert_eq!(counts.success, 20);
    assert_eq!(counts.fail, 40);
    assert_eq!(counts.error, 0);
}

#[tokio::test]
async fn unknown_user_and_wrong_proof_look_alike() {
    let (app, _probe) = test_app(SECRET);

    let unknown = send(
        &app,
        signin_request(&[("Email", "eve@example.com"), ("Passwordhash", ADA_HASH)]),
    )
    .await;
    let wrong = send(
        &app,
        signin_request(&[("Email", ADA), ("Passwordhash", "nope")]),
    )
    .await;

    assert_eq!(unknown.status(), wrong.status());

    let header_names = |response: &Response| {
        let mut names: Vec<String> = response
            .headers()
            .keys()
            .map(|name| name.as_str().to_string())
            .collect();
        names.sort();
        names
    };
    assert_eq!(header_names(&unknown), header_names(&wrong));
    assert_eq!(
        unknown.headers().get(header::CONTENT_TYPE),
        wrong.headers().get(header::CONTENT_TYPE)
    );
    assert_eq!(
        unknown.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/plain; charset=utf-8"
    );
}

#[tokio::test]
async fn responses_carry_request_id_and_no_store() {
    let (app, _probe) = test_app(SECRET);

    let response = send(
        &app,
        signin_request(&[("Email", ADA), ("Passwordhash", ADA_HASH)]),
    )
    .await;

    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "no-store"
    );
}

#[tokio::test]
async fn signin_only_accepts_post() {
    let (app, probe) = test_app(SECRET);

    let response = send(
        &app,
        Request::builder()
            .method(Method::GET)
            .uri("/api/v1/signin")
            .header("Email", ADA)
            .header("Passwordhash", ADA_HASH)
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(probe.snapshot().total, 0);
}

#[tokio::test]
async fn health_reports_the_user_store() {
    let (app, _probe) = test_app(SECRET);

    let response = send(
        &app,
        Request::builder()
            .uri("/api/v1/health")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["user_store"], "memory");
}

#[tokio::test]
async fn metrics_endpoint_is_absent_without_a_recorder() {
    let (app, _probe) = test_app(SECRET);

    let response = send(
        &app,
        Request::builder().uri("/metrics").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
