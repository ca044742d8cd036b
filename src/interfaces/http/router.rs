//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::UserService;
use crate::interfaces::http::common::{MessageResponse, PaginatedResponse};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::request_id::request_id_middleware;
use crate::interfaces::http::modules::{auth, health, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Opaque 40-character token from /login or /register. \
                             `Authorization: Token <key>` is accepted as well.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::logout,
        // Users
        users::me,
        users::list_users,
        users::create_user,
        users::get_user,
        users::replace_user,
        users::update_user,
        users::delete_user,
        users::update_profile,
    ),
    components(
        schemas(
            MessageResponse,
            PaginatedResponse<users::UserDto>,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            users::UserDto,
            users::ProfileDto,
            users::UpdateUserRequest,
            users::UpdateProfileRequest,
            health::HealthResponse,
            health::ComponentHealth,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Authentication", description = "Registration and token login/logout"),
        (name = "Users", description = "Identities and profiles, filtered by caller visibility"),
    ),
    info(
        title = "Account Service API",
        version = "0.1.0",
        description = "User registration, token authentication and profiles",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(user_service: Arc<UserService>, db: DatabaseConnection) -> Router {
    let middleware_state = AuthState {
        user_service: user_service.clone(),
    };

    let auth_state = auth::AuthHandlerState {
        user_service: user_service.clone(),
    };
    let user_state = users::UserHandlerState { user_service };
    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth_state.clone());

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/logout", post(auth::logout))
        .route_layer(middleware::from_fn_with_state(
            middleware_state.clone(),
            auth_middleware,
        ))
        .with_state(auth_state);

    // User routes (protected)
    let user_routes = Router::new()
        .route("/users/me", get(users::me))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::replace_user)
                .patch(users::update_user)
                .delete(users::delete_user),
        )
        .route("/users/{id}/update_profile", patch(users::update_profile))
        .route_layer(middleware::from_fn_with_state(
            middleware_state,
            auth_middleware,
        ))
        .with_state(user_state);

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health_state);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(auth_routes)
        .merge(auth_protected_routes)
        .merge(user_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::infrastructure::crypto::PasswordHasher;
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::testing::memory_db;
    use crate::interfaces::http::modules::request_id::REQUEST_ID_HEADER;

    struct TestApp {
        router: Router,
        service: Arc<UserService>,
    }

    async fn app() -> TestApp {
        let db = memory_db().await;
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let service = Arc::new(UserService::new(
            repos,
            PasswordHasher::new(crate::infrastructure::crypto::password::MIN_COST),
        ));
        TestApp {
            router: create_api_router(service.clone(), db),
            service,
        }
    }

    impl TestApp {
        async fn call(
            &self,
            method: Method,
            uri: &str,
            token: Option<&str>,
            body: Option<Value>,
        ) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
            }
            let request = match body {
                Some(body) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
                None => builder.body(Body::empty()).unwrap(),
            };

            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let json = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, json)
        }

        /// Register and return `(user_id, token)`.
        async fn register(&self, username: &str) -> (String, String) {
            let (status, body) = self
                .call(
                    Method::POST,
                    "/register",
                    None,
                    Some(json!({
                        "username": username,
                        "email": format!("{username}@x.com"),
                        "password": "pw123456",
                        "password_confirm": "pw123456",
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
            (
                body["user"]["id"].as_str().unwrap().to_string(),
                body["token"].as_str().unwrap().to_string(),
            )
        }

        async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
            self.call(
                Method::POST,
                "/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await
        }
    }

    #[tokio::test]
    async fn register_returns_token_and_user() {
        let app = app().await;
        let (status, body) = app
            .call(
                Method::POST,
                "/register",
                None,
                Some(json!({
                    "username": "alice",
                    "password": "pw123456",
                    "password_confirm": "pw123456",
                    "email": "a@x.com",
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(body["user"]["username"], "alice");
        assert_eq!(body["user"]["profile"]["is_active"], true);
        assert_eq!(body["user"]["profile"]["bio"], "");
        assert!(body["user"].get("password_hash").is_none());
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected_per_field() {
        let app = app().await;
        app.register("alice").await;

        let (status, body) = app
            .call(
                Method::POST,
                "/register",
                None,
                Some(json!({
                    "username": "alice",
                    "email": "other@x.com",
                    "password": "pw123456",
                    "password_confirm": "pw123456",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["username"].is_array());

        let (_, body) = app.login("alice", "pw123456").await;
        let (_, list) = app
            .call(Method::GET, "/users", body["token"].as_str(), None)
            .await;
        assert_eq!(list["total"], 1);
    }

    #[tokio::test]
    async fn registration_fields_are_validated_before_the_store() {
        let app = app().await;

        let (status, body) = app
            .call(
                Method::POST,
                "/register",
                None,
                Some(json!({
                    "username": "bad name",
                    "email": "nope",
                    "password": "pw123456",
                    "password_confirm": "pw654321",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["password"], json!(["Passwords do not match."]));
        assert!(body["username"].is_array());
        assert_eq!(body["email"], json!(["Enter a valid email address."]));

        let (status, body) = app
            .call(Method::POST, "/register", None, Some(json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["username"], json!(["This field may not be blank."]));
        assert!(body["password"].is_array());
        assert!(body["password_confirm"].is_array());

        let (status, body) = app.login("", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["non_field_errors"],
            json!(["Username and password are required."])
        );

        let (_, token) = app.register("alice").await;
        let (_, list) = app.call(Method::GET, "/users", Some(&token), None).await;
        assert_eq!(list["total"], 1);
    }

    #[tokio::test]
    async fn login_reuses_token_and_rejects_bad_password() {
        let app = app().await;
        let (_, registered) = app.register("alice").await;

        let (status, first) = app.login("alice", "pw123456").await;
        assert_eq!(status, StatusCode::OK);
        let (_, second) = app.login("alice", "pw123456").await;
        assert_eq!(first["token"], registered.as_str());
        assert_eq!(second["token"], first["token"]);

        let (status, body) = app.login("alice", "wrong-password").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("token").is_none());
        assert!(body["non_field_errors"].is_array());
    }

    #[tokio::test]
    async fn logout_invalidates_token() {
        let app = app().await;
        let (_, token) = app.register("alice").await;

        let (status, me) = app.call(Method::GET, "/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["username"], "alice");

        let (status, body) = app.call(Method::POST, "/logout", Some(&token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["message"].is_string());

        let (status, body) = app.call(Method::GET, "/users/me", Some(&token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["detail"], "Invalid token.");
    }

    #[tokio::test]
    async fn protected_routes_require_credentials() {
        let app = app().await;

        let (status, body) = app.call(Method::GET, "/users", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["detail"].is_string());

        let (status, _) = app.call(Method::POST, "/logout", Some("nope"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn token_scheme_is_accepted() {
        let app = app().await;
        let (_, token) = app.register("alice").await;

        let request = Request::builder()
            .uri("/users/me")
            .header(header::AUTHORIZATION, format!("Token {token}"))
            .header(REQUEST_ID_HEADER, "req-1")
            .body(Body::empty())
            .unwrap();
        let response = app.router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-1");
    }

    #[tokio::test]
    async fn visibility_and_ownership_over_http() {
        let app = app().await;
        app.service
            .ensure_superuser("admin", "admin@x.com", "admin-pass")
            .await
            .unwrap();
        let (_, admin) = app.login("admin", "admin-pass").await;
        let admin_token = admin["token"].as_str().unwrap();
        let (alice_id, alice_token) = app.register("alice").await;
        let (bob_id, bob_token) = app.register("bob").await;

        let (status, _) = app
            .call(Method::GET, &format!("/users/{alice_id}"), Some(&bob_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .call(Method::GET, &format!("/users/{alice_id}"), Some(admin_token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["username"], "alice");

        let (_, list) = app.call(Method::GET, "/users", Some(admin_token), None).await;
        assert_eq!(list["total"], 3);
        let (_, list) = app.call(Method::GET, "/users", Some(&bob_token), None).await;
        assert_eq!(list["total"], 1);
        assert_eq!(list["items"][0]["id"], bob_id.as_str());

        let profile_uri = format!("/users/{alice_id}/update_profile");
        let patch = json!({ "bio": "hello", "birth_date": "1990-05-17" });

        let (status, _) = app
            .call(Method::PATCH, &profile_uri, Some(&bob_token), Some(patch.clone()))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app
            .call(Method::PATCH, &profile_uri, Some(&alice_token), Some(patch))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bio"], "hello");
        assert_eq!(body["birth_date"], "1990-05-17");

        let (status, body) = app
            .call(
                Method::PATCH,
                &profile_uri,
                Some(admin_token),
                Some(json!({ "bio": "moderated" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["bio"], "moderated");
        assert_eq!(body["birth_date"], "1990-05-17");

        let (status, _) = app
            .call(
                Method::PATCH,
                &format!("/users/{alice_id}"),
                Some(admin_token),
                Some(json!({ "first_name": "Mallory" })),
            )
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, body) = app
            .call(
                Method::PATCH,
                &profile_uri,
                Some(&alice_token),
                Some(json!({ "phone": "1".repeat(21) })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["phone"].is_array());
    }

    #[tokio::test]
    async fn update_and_deactivate_own_account() {
        let app = app().await;
        let (alice_id, alice_token) = app.register("alice").await;
        let (bob_id, _) = app.register("bob").await;
        let uri = format!("/users/{alice_id}");

        let (status, body) = app
            .call(
                Method::PUT,
                &uri,
                Some(&alice_token),
                Some(json!({ "first_name": "Alice", "is_staff": true })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["first_name"], "Alice");
        assert_eq!(body["is_staff"], false);

        let (status, _) = app
            .call(Method::DELETE, &format!("/users/{bob_id}"), Some(&alice_token), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.call(Method::DELETE, &uri, Some(&alice_token), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(body, Value::Null);

        let (status, _) = app.call(Method::GET, "/users/me", Some(&alice_token), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (status, _) = app.login("alice", "pw123456").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn create_user_through_collection() {
        let app = app().await;
        let (_, token) = app.register("alice").await;

        let (status, body) = app
            .call(
                Method::POST,
                "/users",
                Some(&token),
                Some(json!({
                    "username": "carol",
                    "email": "c@x.com",
                    "password": "pw123456",
                    "password_confirm": "pw123456",
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["username"], "carol");
        assert!(body.get("token").is_none());

        let (status, _) = app.login("carol", "pw123456").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[test]
    fn openapi_documents_put_as_partial_update() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let item = &doc["paths"]["/users/{id}"];
        assert!(item["patch"].is_object());
        let put = &item["put"];
        assert!(put.is_object(), "PUT /users/{{id}} missing from OpenAPI");
        assert!(put["description"]
            .as_str()
            .is_some_and(|d| d.contains("keep their stored values")));
    }

    #[tokio::test]
    async fn health_reports_database() {
        let app = app().await;
        let (status, body) = app.call(Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["database"]["status"], "ok");
    }
}
