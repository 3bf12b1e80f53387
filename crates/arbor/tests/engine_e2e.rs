//! End-to-end tests: full engine runs through resolution, the middleware
//! chain, and the response envelope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use arbor::prelude::*;
use http::{Method, StatusCode};
use serde_json::json;

/// Echoes the request back, the shape endpoint handlers usually produce.
struct Echo {
    method: &'static str,
}

impl Endpoint for Echo {
    fn call<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>> {
        let method = self.method;
        Box::pin(async move {
            let headers: serde_json::Map<String, serde_json::Value> = request
                .headers
                .iter()
                .map(|(name, value)| (name.clone(), json!(value)))
                .collect();
            Ok(Outcome::Value(json!({
                "path": request.path,
                "method": method,
                "body": request.body,
                "headers": headers,
            })))
        })
    }
}

/// Returns a fixed bare value.
struct Fixed(&'static str);

impl Endpoint for Fixed {
    fn call<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        _request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>> {
        let value = self.0;
        Box::pin(async move { Ok(Outcome::Value(json!(value))) })
    }
}

/// Fails immediately.
struct Fails;

impl Endpoint for Fails {
    fn call<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        _request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>> {
        Box::pin(async { Err(RouteError::handler(anyhow::anyhow!("huh"))) })
    }
}

/// Suspends once, then fails; errors raised after a resume propagate the
/// same way as synchronous ones.
struct FailsAfterSuspend;

impl Endpoint for FailsAfterSuspend {
    fn call<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        _request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>> {
        Box::pin(async {
            tokio::task::yield_now().await;
            Err(RouteError::handler(anyhow::anyhow!("huh")))
        })
    }
}

/// Records the resource context visible during its pre-phase.
struct ContextRecorder {
    seen: Arc<Mutex<Option<String>>>,
}

impl Middleware for ContextRecorder {
    fn name(&self) -> &'static str {
        "context_recorder"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            let observed = ctx.resource().get::<&str>().map(|s| (*s).to_string());
            *self.seen.lock().unwrap() = observed;
            next.run(ctx, request).await
        })
    }
}

/// Stamps a key into an object body during its post-phase, optionally only
/// when another key is already present.
struct Stamper {
    key: &'static str,
    requires: Option<&'static str>,
}

impl Middleware for Stamper {
    fn name(&self) -> &'static str {
        "stamper"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            let mut outcome = next.run(ctx, request).await?;
            if let serde_json::Value::Object(map) = outcome.body_mut() {
                let satisfied = self.requires.map_or(true, |key| map.contains_key(key));
                if satisfied {
                    map.insert(self.key.to_string(), json!(true));
                }
            }
            Ok(outcome)
        })
    }
}

/// Returns its own value without ever invoking the continuation.
struct ShortCircuit;

impl Middleware for ShortCircuit {
    fn name(&self) -> &'static str {
        "short_circuit"
    }

    fn process<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        _request: Request,
        _next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async { Ok(Outcome::Value(json!({"stuff": "what"}))) })
    }
}

/// Converts any chain error into an `{"error": message}` body.
struct CatchesErrors;

impl Middleware for CatchesErrors {
    fn name(&self) -> &'static str {
        "catches_errors"
    }

    fn process<'a>(
        &'a self,
        ctx: &'a mut RequestContext,
        request: Request,
        next: Next<'a>,
    ) -> BoxFuture<'a, ChainResult> {
        Box::pin(async move {
            match next.run(ctx, request).await {
                Ok(outcome) => Ok(outcome),
                Err(err) => Ok(Outcome::Value(json!({"error": err.to_string()}))),
            }
        })
    }
}

/// An endpoint that flips a flag when invoked.
struct Touches {
    touched: Arc<AtomicBool>,
}

impl Endpoint for Touches {
    fn call<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        _request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>> {
        self.touched.store(true, Ordering::SeqCst);
        Box::pin(async { Ok(Outcome::Value(json!("ran"))) })
    }
}

#[tokio::test]
async fn test_basic_request() {
    let engine = Arbor::new(Resource::new().get(Echo { method: "GET" }));

    let response = engine
        .request(
            Request::new(Method::GET, "/")
                .with_body("yeah")
                .with_header("one", "two"),
        )
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.headers.is_empty());
    assert_eq!(
        response.body,
        json!({
            "path": "/",
            "method": "GET",
            "body": "yeah",
            "headers": {"one": "two"},
        })
    );
}

#[tokio::test]
async fn test_string_variable_subresource() {
    let root = Resource::new()
        .get(Echo { method: "GET" })
        .child("#test", Resource::new().get(Fixed("number")))
        .child("$stuff", Resource::new().get(Fixed("text")));
    let engine = Arbor::new(root);

    let response = engine
        .request(Request::new(Method::GET, "/huh"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("text"));
}

#[tokio::test]
async fn test_numeric_variable_subresource() {
    let root = Resource::new()
        .get(Echo { method: "GET" })
        .child("#test", Resource::new().get(Fixed("number")))
        .child("$stuff", Resource::new().get(Fixed("text")));
    let engine = Arbor::new(root);

    let response = engine
        .request(Request::new(Method::GET, "/1234"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("number"));
}

#[tokio::test]
async fn test_missing_path_is_not_found() {
    let engine = Arbor::new(Resource::new().get(Fixed("root")));

    let err = engine
        .request(Request::new(Method::GET, "/huh"))
        .await
        .unwrap_err();
    match err {
        RouteError::NotFound { path } => assert_eq!(path, "/huh"),
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_endpoint_fault_bubbles_to_caller() {
    let engine = Arbor::new(Resource::new().get(Fails));

    let err = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "huh");
}

#[tokio::test]
async fn test_fault_after_suspension_bubbles_to_caller() {
    let engine = Arbor::new(Resource::new().get(FailsAfterSuspend));

    let err = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "huh");
}

#[tokio::test]
async fn test_missing_method_is_405() {
    let engine = Arbor::new(Resource::new().get(Fixed("root")));

    let err = engine
        .request(Request::new(Method::POST, "/"))
        .await
        .unwrap_err();
    match err {
        RouteError::MethodNotAllowed { allowed } => assert_eq!(allowed, vec![Method::GET]),
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_405_still_exposes_resource_context() {
    let seen = Arc::new(Mutex::new(None));

    let mut engine = Arbor::new(
        Resource::new()
            .get(Fixed("root"))
            .context("I am a context"),
    );
    engine.attach(ContextRecorder { seen: seen.clone() });

    let err = engine
        .request(Request::new(Method::POST, "/"))
        .await
        .unwrap_err();
    assert!(matches!(err, RouteError::MethodNotAllowed { .. }));
    assert_eq!(seen.lock().unwrap().as_deref(), Some("I am a context"));
}

#[tokio::test]
async fn test_passthrough_middleware_leaves_response_intact() {
    let mut engine = Arbor::new(Resource::new().get(Fixed("through")));
    engine.attach(Stamper {
        key: "unused",
        requires: Some("never-present"),
    });

    let response = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!("through"));
}

#[tokio::test]
async fn test_post_phase_runs_in_reverse_order() {
    // Registered first, so its post-phase runs last: it only stamps step2
    // when step1 is already there, proving the later layer ran before it.
    let mut engine = Arbor::new(Resource::new().get(Echo { method: "GET" }));
    engine.attach(Stamper {
        key: "step2",
        requires: Some("step1"),
    });
    engine.attach(Stamper {
        key: "step1",
        requires: None,
    });

    let response = engine
        .request(Request::new(Method::GET, "/").with_body("yeah"))
        .await
        .unwrap();

    assert_eq!(response.body["step1"], json!(true));
    assert_eq!(response.body["step2"], json!(true));
}

#[tokio::test]
async fn test_fault_passes_unchanged_through_passive_middleware() {
    let mut engine = Arbor::new(Resource::new().get(Fails));
    engine.attach(Stamper {
        key: "unused",
        requires: None,
    });

    let err = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "huh");
}

#[tokio::test]
async fn test_short_circuit_prevents_endpoint_and_resolver_effects() {
    let touched = Arc::new(AtomicBool::new(false));

    let mut engine = Arbor::new(Resource::new().get(Touches {
        touched: touched.clone(),
    }));
    engine.attach(ShortCircuit);

    let response = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"stuff": "what"}));
    assert!(!touched.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_middleware_intercepts_endpoint_fault() {
    let mut engine = Arbor::new(Resource::new().get(Fails));
    engine.attach(CatchesErrors);

    let response = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!({"error": "huh"}));
}

#[tokio::test]
async fn test_double_root_no_overlap_both_reachable() {
    let engine = Arbor::with_roots(vec![
        Resource::new().get(Fixed("yeah")),
        Resource::new().post(Fixed("oh my")),
    ]);

    let response = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("yeah"));

    let response = engine
        .request(Request::new(Method::POST, "/"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("oh my"));
}

#[tokio::test]
async fn test_double_resource_no_overlap_both_reachable() {
    let engine = Arbor::with_roots(vec![
        Resource::new().child("main", Resource::new().get(Fixed("yeah"))),
        Resource::new().child("secondary", Resource::new().post(Fixed("oh my"))),
    ]);

    let response = engine
        .request(Request::new(Method::GET, "/main"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("yeah"));

    let response = engine
        .request(Request::new(Method::POST, "/secondary"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("oh my"));
}

#[tokio::test]
async fn test_same_resource_different_methods_resolve_across_roots() {
    let engine = Arbor::with_roots(vec![
        Resource::new().child("main", Resource::new().get(Fixed("yeah"))),
        Resource::new().child("main", Resource::new().post(Fixed("oh my"))),
    ]);

    let response = engine
        .request(Request::new(Method::GET, "/main"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("yeah"));

    let response = engine
        .request(Request::new(Method::POST, "/main"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("oh my"));
}

#[tokio::test]
async fn test_method_overlap_first_root_wins() {
    let engine = Arbor::with_roots(vec![
        Resource::new().child("main", Resource::new().get(Fixed("yeah"))),
        Resource::new().child("main", Resource::new().get(Fixed("oh my"))),
    ]);

    let response = engine
        .request(Request::new(Method::GET, "/main"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("yeah"));
}

#[tokio::test]
async fn test_hit_then_miss_aggregates_405_and_retains_context() {
    let seen = Arc::new(Mutex::new(None));

    let mut engine = Arbor::with_roots(vec![
        Resource::new().child(
            "main",
            Resource::new()
                .post(Fixed("yeah"))
                .context("first resource context"),
        ),
        Resource::new().child(
            "main",
            Resource::new()
                .delete(Fixed("oh my"))
                .put(Fixed("oh my"))
                .context("second resource context"),
        ),
        Resource::new().child("test", Resource::new().get(Fixed("oh my"))),
    ]);
    engine.attach(ContextRecorder { seen: seen.clone() });

    let err = engine
        .request(Request::new(Method::GET, "/main"))
        .await
        .unwrap_err();
    match err {
        RouteError::MethodNotAllowed { allowed } => {
            assert_eq!(allowed, vec![Method::POST, Method::PUT, Method::DELETE]);
        }
        other => panic!("expected MethodNotAllowed, got {other:?}"),
    }
    assert_eq!(
        seen.lock().unwrap().as_deref(),
        Some("first resource context")
    );
}

/// Flat-router endpoint echoing a numeric capture.
struct EchoUserId;

impl Endpoint for EchoUserId {
    fn call<'a>(
        &'a self,
        _ctx: &'a mut RequestContext,
        request: Request,
    ) -> BoxFuture<'a, RouteResult<Outcome>> {
        Box::pin(async move { Ok(Outcome::Value(json!({"id": request.args.number("id")}))) })
    }
}

#[tokio::test]
async fn test_flat_router_binds_numeric_args() {
    let mut router = FlatRouter::new();
    router.add_route(Method::GET, "/users/#id", EchoUserId);

    let mut engine = Arbor::with_roots(Vec::new());
    engine.attach(router);

    let response = engine
        .request(Request::new(Method::GET, "/users/42"))
        .await
        .unwrap();
    assert_eq!(response.body, json!({"id": 42}));
}

#[tokio::test]
async fn test_flat_router_falls_through_to_tree() {
    let mut router = FlatRouter::new();
    router.add_route(Method::GET, "/special", Fixed("flat"));

    let mut engine = Arbor::new(Resource::new().get(Fixed("tree")));
    engine.attach(router);

    let response = engine
        .request(Request::new(Method::GET, "/special"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("flat"));

    let response = engine
        .request(Request::new(Method::GET, "/"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("tree"));
}

#[tokio::test]
async fn test_error_normalizer_renders_405() {
    let mut engine = Arbor::new(Resource::new().get(Fixed("root")));
    engine.attach(ErrorNormalizer);

    let response = engine
        .request(Request::new(Method::POST, "/"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.header("content-type"), Some("application/json"));
    assert_eq!(response.body["error"]["code"], "METHOD_NOT_ALLOWED");
    assert_eq!(response.body["error"]["details"]["allowed"], json!(["GET"]));
}

#[tokio::test]
async fn test_trailing_slash_redirect_end_to_end() {
    let mut engine =
        Arbor::new(Resource::new().child("users", Resource::new().get(Fixed("list"))));
    engine.attach(TrailingSlash);

    let response = engine
        .request(Request::new(Method::GET, "/users/"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::FOUND);
    assert_eq!(response.header("location"), Some("/users"));

    let response = engine
        .request(Request::new(Method::GET, "/users"))
        .await
        .unwrap();
    assert_eq!(response.body, json!("list"));
}

#[tokio::test]
async fn test_body_parser_decodes_before_endpoint() {
    struct ReadsBody;

    impl Endpoint for ReadsBody {
        fn call<'a>(
            &'a self,
            _ctx: &'a mut RequestContext,
            request: Request,
        ) -> BoxFuture<'a, RouteResult<Outcome>> {
            Box::pin(async move { Ok(Outcome::Value(json!({"name": request.body["name"]}))) })
        }
    }

    let mut engine = Arbor::new(Resource::new().post(ReadsBody));
    engine.attach(BodyParser);

    let response = engine
        .request(
            Request::new(Method::POST, "/")
                .with_header("content-type", "application/json")
                .with_body(r#"{"name":"alice"}"#),
        )
        .await
        .unwrap();
    assert_eq!(response.body, json!({"name": "alice"}));
}

#[tokio::test]
async fn test_cookies_roundtrip_end_to_end() {
    struct SetsCookie;

    impl Endpoint for SetsCookie {
        fn call<'a>(
            &'a self,
            ctx: &'a mut RequestContext,
            _request: Request,
        ) -> BoxFuture<'a, RouteResult<Outcome>> {
            Box::pin(async move {
                let old = ctx
                    .get_extension::<CookieJar>()
                    .and_then(|jar| jar.get("date"))
                    .map(ToString::to_string);

                if let Some(jar) = ctx.get_extension_mut::<CookieJar>() {
                    jar.set(SetCookie::new("date", "tomorrow").domain("127.0.0.1"));
                }
                Ok(Outcome::Value(json!({"previous": old})))
            })
        }
    }

    let mut engine = Arbor::new(Resource::new().get(SetsCookie));
    engine.attach(Cookies);

    let response = engine
        .request(Request::new(Method::GET, "/").with_header("Cookie", "date=yesterday"))
        .await
        .unwrap();

    assert_eq!(response.body, json!({"previous": "yesterday"}));
    assert_eq!(
        response.header("set-cookie"),
        Some("date=tomorrow; Domain=127.0.0.1")
    );
}
