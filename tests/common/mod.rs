use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use depot_api::{
    auth::{AuthConfig, AuthService},
    config::AppConfig,
    db,
    services::users::CreateUser,
    AppServices, AppState,
};

/// Test harness: the full application router backed by an in-memory SQLite
/// database, plus a seeded operator account and its bearer token.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    token: String,
    #[allow(dead_code)]
    uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads = TempDir::new().expect("failed to create uploads tempdir");

        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "test_secret_key_for_testing_purposes_only_32chars".to_string(),
            0,
            "test".to_string(),
        );
        cfg.uploads_dir = uploads.path().to_string_lossy().into_owned();

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db_arc = Arc::new(pool);
        let auth_service = Arc::new(AuthService::new(
            AuthConfig::new(cfg.jwt_secret.clone(), Duration::from_secs(3600)),
            db_arc.clone(),
        ));

        let state = AppState {
            db: db_arc.clone(),
            config: cfg,
            services: AppServices::new(db_arc),
        };

        let operator = state
            .services
            .users
            .create(CreateUser {
                email: "operator@example.com".to_string(),
                password: "correct-horse-battery".to_string(),
                first_name: "Olive".to_string(),
                last_name: "Operator".to_string(),
            })
            .await
            .expect("failed to seed operator user");
        let token = auth_service
            .generate_token(&operator)
            .expect("failed to mint test token")
            .access_token;

        let router = depot_api::build_router(state.clone(), auth_service);

        Self {
            router,
            state,
            token,
            uploads,
        }
    }

    /// Sends an unauthenticated JSON request and returns status + parsed body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, body, false).await;
        Self::into_json(response).await
    }

    /// Sends a bearer-authenticated JSON request.
    pub async fn request_authenticated(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(method, uri, body, true).await;
        Self::into_json(response).await
    }

    /// Sends a bearer-authenticated request and returns the raw response.
    pub async fn request_raw(
        &self,
        method: Method,
        uri: &str,
    ) -> axum::http::Response<Body> {
        self.send(method, uri, None, true).await
    }

    /// Sends a bearer-authenticated multipart request with a prebuilt body.
    pub async fn request_multipart(
        &self,
        uri: &str,
        boundary: &str,
        body: Vec<u8>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
            .body(Body::from(body))
            .expect("failed to build multipart request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error");
        Self::into_json(response).await
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        authenticated: bool,
    ) -> axum::http::Response<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if authenticated {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", self.token));
        }

        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("failed to build request");

        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error")
    }

    async fn into_json(response: axum::http::Response<Body>) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    // --- seed helpers -----------------------------------------------------

    pub async fn seed_category(&self, name: &str) -> Uuid {
        let (status, body) = self
            .request(
                Method::POST,
                "/categories",
                Some(json!({"name": name, "description": "seeded"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seeding category: {body}");
        Self::id_of(&body)
    }

    pub async fn seed_client(&self) -> Uuid {
        let (status, body) = self
            .request_authenticated(
                Method::POST,
                "/clients",
                Some(json!({
                    "first_name": "Amira",
                    "last_name": "Ben Salah",
                    "email": "amira@example.com",
                    "phone_number": "21612345",
                    "address": "12 Rue des Oliviers, Tunis"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seeding client: {body}");
        Self::id_of(&body)
    }

    pub async fn seed_co_client(&self) -> Uuid {
        let (status, body) = self
            .request_authenticated(
                Method::POST,
                "/co-clients",
                Some(json!({
                    "first_name": "Karim",
                    "last_name": "Haddad",
                    "email": "karim@example.com",
                    "phone_number": "21698765",
                    "address": "3 Avenue Habib Bourguiba, Sousse",
                    "rib": "TN5904018104003691234567"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seeding co-client: {body}");
        Self::id_of(&body)
    }

    pub async fn seed_product(&self, category_id: Uuid, body: Value) -> Uuid {
        let mut payload = body;
        payload["category_id"] = json!(category_id);
        let (status, body) = self
            .request_authenticated(Method::POST, "/products", Some(payload))
            .await;
        assert_eq!(status, StatusCode::CREATED, "seeding product: {body}");
        Self::id_of(&body)
    }

    pub fn id_of(body: &Value) -> Uuid {
        body["id"]
            .as_str()
            .expect("response body has no id")
            .parse()
            .expect("id is not a uuid")
    }
}

/// Reads a money field regardless of whether it was serialized as a JSON
/// string or a number.
#[allow(dead_code)]
pub fn decimal_field(value: &Value) -> rust_decimal::Decimal {
    match value {
        Value::String(s) => s.parse().expect("field is not a decimal"),
        Value::Number(n) => n
            .to_string()
            .parse()
            .expect("numeric field is not a decimal"),
        other => panic!("expected decimal field, got {other:?}"),
    }
}
