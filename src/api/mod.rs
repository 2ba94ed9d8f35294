// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! HTTP surface.
//!
//! Layering, outermost first:
//!
//! 1. request id assignment and propagation (`x-request-id`)
//! 2. request tracing
//! 3. security response headers
//! 4. authorization filter ([`crate::auth::middleware::authorize`])
//! 5. per-route policy check ([`enforce_policy`]) on protected operations

use axum::{
    extract::Request,
    handler::Handler,
    http::{
        header::{HeaderName, LOCATION, X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS},
        HeaderValue, StatusCode,
    },
    middleware,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::{
    auth::{enforce_policy, middleware::authorize, Operation},
    state::AppState,
};

pub mod auth;
pub mod categories;
pub mod customers;
pub mod health;
pub mod locations;
pub mod orders;
pub mod products;
pub mod users;

/// 201 response with a `Location` header pointing at the new resource.
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

pub fn created<T>(location: String, body: T) -> Created<T> {
    (StatusCode::CREATED, [(LOCATION, location)], Json(body))
}

/// Wrap a handler in the policy check for `$operation`.
macro_rules! guarded {
    ($handler:expr, $operation:expr) => {
        $handler.layer(middleware::from_fn_with_state($operation, enforce_policy))
    };
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/login", post(auth::login))
        .route(
            "/auth/refresh_token",
            post(guarded!(auth::refresh_token, Operation::TokenRefresh)),
        )
        .route("/auth/forgot", post(auth::forgot_password))
        .route(
            "/users/me",
            get(guarded!(users::current_user, Operation::CurrentUser)),
        )
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route(
            "/categories",
            get(categories::list).post(guarded!(categories::insert, Operation::CategoryInsert)),
        )
        .route("/categories/page", get(categories::page))
        .route(
            "/categories/{id}",
            get(categories::find)
                .put(guarded!(categories::update, Operation::CategoryUpdate))
                .delete(guarded!(categories::delete, Operation::CategoryDelete)),
        )
        .route(
            "/products",
            get(products::search).post(guarded!(products::insert, Operation::ProductInsert)),
        )
        .route("/products/{id}", get(products::find))
        .route("/states", get(locations::list_states))
        .route("/states/{id}/cities", get(locations::list_cities))
        .route(
            "/customers",
            post(customers::insert).get(guarded!(customers::list, Operation::CustomerList)),
        )
        .route(
            "/customers/page",
            get(guarded!(customers::page, Operation::CustomerPage)),
        )
        .route(
            "/customers/email",
            get(guarded!(customers::find_by_email, Operation::CustomerFindByEmail)),
        )
        .route(
            "/customers/{id}",
            get(guarded!(customers::find, Operation::CustomerFind))
                .put(guarded!(customers::update, Operation::CustomerUpdate))
                .delete(guarded!(customers::delete, Operation::CustomerDelete)),
        )
        .route(
            "/orders",
            get(guarded!(orders::page, Operation::OrderPage))
                .post(guarded!(orders::insert, Operation::OrderInsert)),
        )
        .route(
            "/orders/{id}",
            get(guarded!(orders::find, Operation::OrderFind)),
        )
        .layer(middleware::from_fn_with_state(state.clone(), authorize))
        .with_state(state.clone());

    if !state.allow_frame_embedding {
        app = app.layer(SetResponseHeaderLayer::if_not_present(
            X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ));
    }

    app.layer(SetResponseHeaderLayer::overriding(
        X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    ))
    .layer(PropagateRequestIdLayer::x_request_id())
    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request| {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = request.uri().path(),
            request_id,
        )
    }))
    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::auth::{AccessRules, Role};
    use crate::testing::{bearer, body_json, seed_identity, test_state, RecordingMailer};
    use axum::{
        body::Body,
        http::{header::AUTHORIZATION, Method},
        response::Response,
    };
    use serde_json::json;
    use tower::ServiceExt;

    async fn send(app: &Router, request: Request) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    fn empty(method: Method, uri: &str, authorization: Option<&str>) -> Request {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn with_json(method: Method, uri: &str, authorization: Option<&str>, body: serde_json::Value) -> Request {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn login(app: &Router, username: &str, password: &str) -> Response {
        send(
            app,
            with_json(
                Method::POST,
                "/login",
                None,
                json!({ "username": username, "password": password }),
            ),
        )
        .await
    }

    /// State with an administrator, a customer and the demo catalog.
    async fn seeded() -> AppState {
        let state = test_state();
        {
            let mut store = state.store.write().await;
            store.seed_demo_catalog();
            store.seed_demo_locations();
        }
        seed_identity(&state, "admin@example.com", "admin-pw", &[Role::Admin, Role::Customer]).await;
        seed_identity(&state, "maria@example.com", "maria-pw", &[Role::Customer]).await;
        state
    }

    #[tokio::test]
    async fn login_returns_bearer_header_and_no_body() {
        let app = router(seeded().await);

        let response = login(&app, "admin@example.com", "admin-pw").await;
        assert_eq!(response.status(), StatusCode::OK);
        let header = response.headers().get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(header.starts_with("Bearer "));
        assert!(header.len() > "Bearer ".len());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_401_without_token() {
        let app = router(seeded().await);

        let response = login(&app, "admin@example.com", "wrong").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(AUTHORIZATION).is_none());
        assert_eq!(body_json(response).await["error_code"], "invalid_credentials");
    }

    #[tokio::test]
    async fn login_with_malformed_body_is_400() {
        let app = router(seeded().await);
        let request = Request::builder()
            .method(Method::POST)
            .uri("/login")
            .header("content-type", "application/json")
            .body(Body::from("{\"username\":"))
            .unwrap();
        assert_eq!(send(&app, request).await.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn issued_token_opens_protected_routes() {
        let app = router(seeded().await);

        let response = login(&app, "maria@example.com", "maria-pw").await;
        let token = response.headers().get(AUTHORIZATION).unwrap().to_str().unwrap().to_string();

        let response = send(&app, empty(Method::GET, "/users/me", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "maria@example.com");
        assert_eq!(body["roles"], json!(["CUSTOMER"]));
    }

    #[tokio::test]
    async fn public_reads_need_no_token() {
        let app = router(seeded().await);

        for uri in ["/categories", "/categories/1", "/categories/page", "/products", "/products/1", "/states", "/health", "/health/live"] {
            let response = send(&app, empty(Method::GET, uri, None)).await;
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn login_subject_keeps_submitted_case() {
        let state = seeded().await;
        let app = router(state.clone());

        let response = login(&app, "MARIA@example.com", "maria-pw").await;
        assert_eq!(response.status(), StatusCode::OK);
        let token = response.headers().get(AUTHORIZATION).unwrap().to_str().unwrap().to_string();
        let subject = state
            .tokens
            .validate(token.strip_prefix("Bearer ").unwrap())
            .unwrap();
        assert_eq!(subject, "MARIA@example.com");

        let response = send(&app, empty(Method::GET, "/users/me", Some(&token))).await;
        assert_eq!(body_json(response).await["username"], "maria@example.com");
    }

    #[tokio::test]
    async fn bad_path_and_query_input_gets_json_errors() {
        let state = seeded().await;
        let admin = bearer(&state, "admin@example.com");
        let app = router(state);

        for (uri, token) in [
            ("/categories/abc", None),
            ("/products/abc", None),
            ("/states/abc/cities", None),
            ("/categories/page?lines_per_page=x", None),
            ("/categories/page?lines_per_page=0", None),
            ("/categories/page?direction=UP", None),
            ("/products?categories=1&page=-1", None),
            ("/customers/email", Some(admin.as_str())),
            ("/orders/abc", Some(admin.as_str())),
        ] {
            let response = send(&app, empty(Method::GET, uri, token)).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(
                response.headers().get("content-type").unwrap(),
                "application/json",
                "{uri}"
            );
            assert_eq!(body_json(response).await["error_code"], "validation_failed", "{uri}");
        }
    }

    #[tokio::test]
    async fn unknown_sort_property_is_rejected_on_empty_table() {
        let app = router(test_state());

        let response = send(&app, empty(Method::GET, "/categories/page?order_by=color", None)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "validation_failed");
        assert_eq!(body["errors"][0]["field"], "order_by");
    }

    #[tokio::test]
    async fn states_and_cities_are_public() {
        let app = router(seeded().await);

        let response = send(&app, empty(Method::GET, "/states", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        let states = body_json(response).await;
        assert_eq!(states[1]["name"], "São Paulo");

        let response = send(&app, empty(Method::GET, "/states/2/cities", None)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await[0]["name"], "Campinas");

        let response = send(&app, empty(Method::GET, "/states/9/cities", None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn registration_address_must_name_known_city() {
        let app = router(seeded().await);
        let registration = |email: &str, city_id: u64| {
            json!({
                "name": "Ana Souza",
                "email": email,
                "document": "12345678900",
                "kind": "individual",
                "password": "ana-pw",
                "address": {
                    "street": "Avenida Matos",
                    "number": "105",
                    "zip_code": "38777012",
                    "city_id": city_id,
                },
            })
        };

        let response = send(
            &app,
            with_json(Method::POST, "/customers", None, registration("ana@example.com", 99)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["errors"][0]["field"], "address.city_id");

        let response = send(
            &app,
            with_json(Method::POST, "/customers", None, registration("ana@example.com", 3)),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(body_json(response).await["addresses"][0]["city_id"], 3);
    }

    #[tokio::test]
    async fn forgot_password_is_public_and_replaces_password() {
        let mailer = Arc::new(RecordingMailer::default());
        let app = router(seeded().await.with_mailer(mailer.clone()));

        let response = send(
            &app,
            with_json(Method::POST, "/auth/forgot", None, json!({ "email": "maria@example.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let sent = mailer.sent();
        let password = sent[0].body.rsplit(' ').next().unwrap().to_string();
        assert_eq!(login(&app, "maria@example.com", "maria-pw").await.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(login(&app, "maria@example.com", &password).await.status(), StatusCode::OK);

        let response = send(
            &app,
            with_json(Method::POST, "/auth/forgot", None, json!({ "email": "ghost@example.com" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn access_rules_decide_what_is_public() {
        let app = router(seeded().await.with_access_rules(AccessRules::new()));

        let response = send(&app, empty(Method::GET, "/categories", None)).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error_code"], "token_invalid");
    }

    #[tokio::test]
    async fn public_read_ignores_bad_token() {
        let app = router(seeded().await);
        let response = send(&app, empty(Method::GET, "/categories", Some("Bearer forged.token.value"))).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401() {
        let app = router(seeded().await);

        for (method, uri) in [
            (Method::GET, "/orders"),
            (Method::GET, "/users/me"),
            (Method::POST, "/auth/refresh_token"),
            (Method::DELETE, "/categories/1"),
            (Method::GET, "/customers"),
        ] {
            let response = send(&app, empty(method.clone(), uri, None)).await;
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
        }
    }

    #[tokio::test]
    async fn customer_cannot_delete_category() {
        let state = seeded().await;
        let token = bearer(&state, "maria@example.com");
        let app = router(state);

        let response = send(&app, empty(Method::DELETE, "/categories/1", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_json(response).await["error_code"], "forbidden");
    }

    #[tokio::test]
    async fn admin_deletes_unused_category() {
        let state = seeded().await;
        let unused = state
            .store
            .write()
            .await
            .insert_category(crate::models::CategoryRequest {
                name: "Seasonal".into(),
            });
        let token = bearer(&state, "admin@example.com");
        let app = router(state);

        let uri = format!("/categories/{}", unused.id);
        let response = send(&app, empty(Method::DELETE, &uri, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, empty(Method::GET, &uri, None)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn admin_cannot_delete_category_with_products() {
        let state = seeded().await;
        let token = bearer(&state, "admin@example.com");
        let app = router(state);

        let response = send(&app, empty(Method::DELETE, "/categories/1", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["error_code"], "data_integrity");
    }

    #[tokio::test]
    async fn admin_creates_category_with_location() {
        let state = seeded().await;
        let token = bearer(&state, "admin@example.com");
        let app = router(state);

        let response = send(
            &app,
            with_json(Method::POST, "/categories", Some(&token), json!({ "name": "Seasonal" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(response.headers().get(LOCATION).unwrap(), "/categories/8");
    }

    #[tokio::test]
    async fn invalid_category_name_lists_field_errors() {
        let state = seeded().await;
        let token = bearer(&state, "admin@example.com");
        let app = router(state);

        let response = send(
            &app,
            with_json(Method::POST, "/categories", Some(&token), json!({ "name": "abc" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error_code"], "validation_failed");
        assert_eq!(body["errors"][0]["field"], "name");
    }

    #[tokio::test]
    async fn registration_is_public_but_listing_is_admin_only() {
        let state = seeded().await;
        let customer_token = bearer(&state, "maria@example.com");
        let admin_token = bearer(&state, "admin@example.com");
        let app = router(state);

        let response = send(
            &app,
            with_json(
                Method::POST,
                "/customers",
                None,
                json!({
                    "name": "Ana Souza",
                    "email": "ana@example.com",
                    "document": "12345678900",
                    "kind": "individual",
                    "password": "ana-pw",
                }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert!(body.get("password_hash").is_none());

        let response = send(&app, empty(Method::GET, "/customers", Some(&customer_token))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = send(&app, empty(Method::GET, "/customers", Some(&admin_token))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);

        let response = login(&app, "ana@example.com", "ana-pw").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn customer_places_and_lists_own_orders() {
        let state = seeded().await;
        let token = bearer(&state, "maria@example.com");
        let app = router(state);

        let response = send(
            &app,
            with_json(
                Method::POST,
                "/orders",
                Some(&token),
                json!({ "items": [{ "product_id": 3, "quantity": 2 }] }),
            ),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers().get(LOCATION).unwrap().to_str().unwrap().to_string();

        let response = send(&app, empty(Method::GET, &location, Some(&token))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["total"], 160.0);

        let response = send(&app, empty(Method::GET, "/orders", Some(&token))).await;
        assert_eq!(body_json(response).await["total_elements"], 1);
    }

    #[tokio::test]
    async fn empty_order_is_rejected() {
        let state = seeded().await;
        let token = bearer(&state, "maria@example.com");
        let app = router(state);

        let response = send(
            &app,
            with_json(Method::POST, "/orders", Some(&token), json!({ "items": [] })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn refresh_returns_new_token() {
        let state = seeded().await;
        let token = bearer(&state, "maria@example.com");
        let app = router(state.clone());

        let response = send(&app, empty(Method::POST, "/auth/refresh_token", Some(&token))).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let refreshed = response.headers().get(AUTHORIZATION).unwrap().to_str().unwrap();
        let refreshed = refreshed.strip_prefix("Bearer ").unwrap();
        assert_eq!(state.tokens.validate(refreshed).unwrap(), "maria@example.com");
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let state = seeded().await;
        let issued_at = chrono::Utc::now() - chrono::Duration::hours(2);
        let token = state.tokens.issue_at("maria@example.com", issued_at).unwrap();
        let app = router(state);

        let response = send(&app, empty(Method::GET, "/users/me", Some(&format!("Bearer {token}")))).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["error_code"], "token_invalid");
    }

    #[tokio::test]
    async fn concurrent_requests_keep_their_own_identity() {
        let state = seeded().await;
        let admin = bearer(&state, "admin@example.com");
        let maria = bearer(&state, "maria@example.com");
        let app = router(state);

        let (first, second, anonymous) = tokio::join!(
            send(&app, empty(Method::GET, "/users/me", Some(&admin))),
            send(&app, empty(Method::GET, "/users/me", Some(&maria))),
            send(&app, empty(Method::GET, "/users/me", None)),
        );

        assert_eq!(body_json(first).await["username"], "admin@example.com");
        assert_eq!(body_json(second).await["username"], "maria@example.com");
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn responses_carry_security_headers() {
        let app = router(seeded().await);
        let response = send(&app, empty(Method::GET, "/health/live", None)).await;

        assert_eq!(response.headers().get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(response.headers().get(X_FRAME_OPTIONS).unwrap(), "DENY");
        assert!(response.headers().get("x-request-id").is_some());
    }

    #[tokio::test]
    async fn rejections_carry_security_headers() {
        let app = router(seeded().await);
        let response = send(&app, empty(Method::GET, "/orders", None)).await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
        assert_eq!(response.headers().get(X_FRAME_OPTIONS).unwrap(), "DENY");
    }

    #[tokio::test]
    async fn frame_embedding_can_be_allowed() {
        let app = router(seeded().await.with_frame_embedding(true));
        let response = send(&app, empty(Method::GET, "/health/live", None)).await;

        assert!(response.headers().get(X_FRAME_OPTIONS).is_none());
        assert_eq!(response.headers().get(X_CONTENT_TYPE_OPTIONS).unwrap(), "nosniff");
    }
}
