use http::{Method, StatusCode};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use waymark::{Config, Router, RouteError};

fn setup_tracing_for_tests() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::TRACE)
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::TRACE.into()))
        .with_test_writer()
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn router_with(routes: &[(Method, &str)]) -> Router {
    let router = Router::new();
    for (method, pattern) in routes {
        router
            .handle(method.clone(), pattern, |_w, _req| Ok(()))
            .unwrap_or_else(|e| panic!("failed to add {pattern}: {e}"));
    }
    router
}

#[test]
fn static_routes() {
    setup_tracing_for_tests();
    let router = router_with(&[
        (Method::GET, "/home"),
        (Method::POST, "/submit"),
        (Method::GET, "/home/settings"),
    ]);

    assert_eq!(router.lookup(&Method::GET, "/home").status, StatusCode::OK);
    assert_eq!(
        router.lookup(&Method::POST, "/submit").status,
        StatusCode::OK
    );
    assert_eq!(
        router.lookup(&Method::GET, "/home/settings").status,
        StatusCode::OK
    );
    assert_eq!(
        router.lookup(&Method::GET, "/nonexistent").status,
        StatusCode::NOT_FOUND
    );

    let hit = router.lookup(&Method::GET, "/home");
    assert_eq!(hit.route_data.route, "/home");
    assert!(hit.route_data.params.is_empty());
}

#[test]
fn parameterized_routes() {
    setup_tracing_for_tests();
    let router = router_with(&[
        (Method::GET, "/greet/:name"),
        (Method::GET, "/products/:category/:product_id"),
    ]);

    let hit = router.lookup(&Method::GET, "/greet/fry");
    assert_eq!(hit.status, StatusCode::OK);
    assert_eq!(hit.route_data.route, "/greet/:name");
    assert_eq!(hit.route_data.params["name"], "fry");

    let hit = router.lookup(&Method::GET, "/products/electronics/tv-456");
    assert_eq!(hit.route_data.params["category"], "electronics");
    assert_eq!(hit.route_data.params["product_id"], "tv-456");

    // A param never spans a slash and never matches an empty run.
    assert_eq!(
        router.lookup(&Method::GET, "/greet/a/b").status,
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        router.lookup(&Method::GET, "/greet//").status,
        StatusCode::NOT_FOUND
    );
}

#[test]
fn multi_param_route_captures_in_declaration_order() {
    setup_tracing_for_tests();
    let router = router_with(&[(Method::GET, "/user/:user_id/address/:address_id")]);

    let hit = router.lookup(&Method::GET, "/user/1/address/2");
    assert_eq!(hit.status, StatusCode::OK);
    assert_eq!(hit.route_data.params["user_id"], "1");
    assert_eq!(hit.route_data.params["address_id"], "2");
    assert_eq!(hit.route_data.params.len(), 2);
}

#[test]
fn static_beats_param_beats_catchall() {
    setup_tracing_for_tests();
    let router = router_with(&[
        (Method::GET, "/user/:id"),
        (Method::GET, "/user/special"),
        (Method::GET, "/user/*rest"),
    ]);

    let hit = router.lookup(&Method::GET, "/user/special");
    assert_eq!(hit.route_data.route, "/user/special");
    assert!(hit.route_data.params.is_empty());

    let hit = router.lookup(&Method::GET, "/user/other");
    assert_eq!(hit.route_data.route, "/user/:id");

    let hit = router.lookup(&Method::GET, "/user/a/b/c");
    assert_eq!(hit.route_data.route, "/user/*rest");
    assert_eq!(hit.route_data.params["rest"], "a/b/c");
}

#[test]
fn unnamed_catchall_is_exposed_as_star() {
    setup_tracing_for_tests();
    let router = router_with(&[(Method::GET, "/static/*")]);

    let hit = router.lookup(&Method::GET, "/static/foo.txt");
    assert_eq!(hit.status, StatusCode::OK);
    assert_eq!(hit.route_data.route, "/static/*");
    assert_eq!(hit.route_data.params["*"], "foo.txt");

    let hit = router.lookup(&Method::GET, "/static/css/app.css");
    assert_eq!(hit.route_data.params["*"], "css/app.css");
}

#[test]
fn overlapping_registrations_may_rename_positions() {
    setup_tracing_for_tests();
    let router = router_with(&[
        (Method::GET, "/v/:id/posts"),
        (Method::GET, "/v/:vid/comments"),
    ]);

    assert_eq!(
        router
            .lookup(&Method::GET, "/v/7/posts")
            .route_data
            .params["id"],
        "7"
    );
    assert_eq!(
        router
            .lookup(&Method::GET, "/v/7/comments")
            .route_data
            .params["vid"],
        "7"
    );
}

#[test]
fn backtracking_prefers_deep_static_then_falls_back() {
    setup_tracing_for_tests();
    let router = router_with(&[
        (Method::GET, "/user/special/admin"),
        (Method::GET, "/user/:id"),
    ]);

    assert_eq!(
        router
            .lookup(&Method::GET, "/user/special/admin")
            .route_data
            .route,
        "/user/special/admin"
    );

    let hit = router.lookup(&Method::GET, "/user/special");
    assert_eq!(hit.route_data.route, "/user/:id");
    assert_eq!(hit.route_data.params["id"], "special");
}

#[test]
fn root_route() {
    setup_tracing_for_tests();
    let router = router_with(&[(Method::GET, "/")]);

    let hit = router.lookup(&Method::GET, "/");
    assert_eq!(hit.status, StatusCode::OK);
    assert_eq!(hit.route_data.route, "/");

    // The bare root never redirects.
    let miss = router.lookup(&Method::HEAD, "/");
    assert_eq!(miss.status, StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn not_found_vs_method_not_allowed() {
    setup_tracing_for_tests();
    let router = router_with(&[(Method::GET, "/things"), (Method::POST, "/things")]);

    assert_eq!(
        router.lookup(&Method::DELETE, "/things").status,
        StatusCode::METHOD_NOT_ALLOWED
    );
    assert_eq!(
        router.lookup(&Method::DELETE, "/nothing").status,
        StatusCode::NOT_FOUND
    );

    let miss = router.lookup(&Method::DELETE, "/things");
    assert_eq!(
        miss.allow,
        Some(vec![Method::GET, Method::POST, Method::OPTIONS])
    );
}

#[test]
fn trailing_slash_redirects_in_both_directions() {
    setup_tracing_for_tests();
    let router = router_with(&[(Method::GET, "/hello"), (Method::GET, "/dir/")]);

    let redirect = router.lookup(&Method::GET, "/hello/");
    assert_eq!(redirect.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(redirect.location.as_deref(), Some("/hello"));

    let redirect = router.lookup(&Method::GET, "/dir");
    assert_eq!(redirect.status, StatusCode::PERMANENT_REDIRECT);
    assert_eq!(redirect.location.as_deref(), Some("/dir/"));

    // Non-GET methods get a temporary redirect.
    let router = router_with(&[(Method::POST, "/submit")]);
    let redirect = router.lookup(&Method::POST, "/submit/");
    assert_eq!(redirect.status, StatusCode::TEMPORARY_REDIRECT);
}

#[test]
fn catchall_suppresses_trailing_slash_redirect() {
    setup_tracing_for_tests();
    let router = router_with(&[(Method::GET, "/files/*path")]);

    let hit = router.lookup(&Method::GET, "/files/docs/");
    assert_eq!(hit.status, StatusCode::OK);
    assert_eq!(hit.route_data.params["path"], "docs/");
}

#[test]
fn disabled_redirects_turn_mismatches_into_misses() {
    setup_tracing_for_tests();
    let router: Router = Router::with_config(Config::new().redirect_trailing_slash(false));
    router.get("/hello", |_w, _req| Ok(())).unwrap();

    assert_eq!(router.lookup(&Method::GET, "/hello").status, StatusCode::OK);
    assert_eq!(
        router.lookup(&Method::GET, "/hello/").status,
        StatusCode::NOT_FOUND
    );
}

#[test]
fn registration_errors() {
    setup_tracing_for_tests();
    let router: Router = Router::new();
    let ok = |_w: &mut dyn waymark::ResponseWriter,
              _req: &mut http::Request<Vec<u8>>|
     -> Result<(), waymark::BoxError> { Ok(()) };

    assert_eq!(
        router.handle(Method::GET, "", ok),
        Err(RouteError::EmptyPattern)
    );
    assert!(matches!(
        router.handle(Method::GET, "users", ok),
        Err(RouteError::MissingLeadingSlash { .. })
    ));
    assert!(matches!(
        router.handle(Method::GET, "/files/*path/more", ok),
        Err(RouteError::CatchAllNotLast { .. })
    ));

    router.handle(Method::GET, "/dup", ok).unwrap();
    assert!(matches!(
        router.handle(Method::GET, "/dup", ok),
        Err(RouteError::DuplicateMethod { .. })
    ));
    // Same path, different method is fine.
    router.handle(Method::POST, "/dup", ok).unwrap();
}

#[test]
fn dump_renders_registered_patterns() {
    setup_tracing_for_tests();
    let router = router_with(&[
        (Method::GET, "/"),
        (Method::GET, "/user/:id"),
        (Method::GET, "/static/*path"),
    ]);

    let rendered = router.dump();
    assert!(rendered.contains("/user/:id"));
    assert!(rendered.contains("/static/*path"));
    assert!(rendered.lines().count() >= 4);
}
