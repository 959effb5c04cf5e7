//! Helpers for HTTP tests against the in-memory store.

/// Builds the full app over a fresh in-memory store, optionally sharing
/// the per-user locks with the test.
macro_rules! test_app {
    ($config:expr) => {
        test_app!($config, crate::utils::user_lock::UserLocks::default())
    };
    ($config:expr, $locks:expr) => {{
        let config: crate::config::Config = $config;
        let locks: crate::utils::user_lock::UserLocks = $locks;
        let store: std::sync::Arc<dyn crate::store::Store> =
            std::sync::Arc::new(crate::store::MemoryStore::new());
        actix_web::test::init_service(
            actix_web::App::new()
                .wrap(actix_web::middleware::NormalizePath::trim())
                .app_data(actix_web::web::Data::from(store))
                .app_data(actix_web::web::Data::new(config.clone()))
                .app_data(actix_web::web::Data::new(locks))
                .configure(|cfg| crate::routes::configure(cfg, &config)),
        )
        .await
    }};
}

/// Sends a `TestRequest` and returns the status and JSON body.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = actix_web::test::read_body_json(resp).await;
        (status, body)
    }};
}
