#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use uuid::Uuid;

use showtime_booking::cache::CacheService;
use showtime_booking::config::{Config, SuperAdminSeed};
use showtime_booking::store::{MemoryStore, Store};
use showtime_booking::{app, AppState};

pub const SUPER_ADMIN_EMAIL: &str = "root@showtime.test";
pub const SUPER_ADMIN_PASSWORD: &str = "root-password";
pub const PASSWORD: &str = "correct-horse";

const BOUNDARY: &str = "showtime-test-boundary";

pub struct TestApp {
    pub state: Arc<AppState>,
    router: Router,
    _uploads: TempDir,
}

impl TestApp {
    /// Router over a fresh in-memory store with a seeded super admin.
    pub async fn spawn() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let mut config = Config::local("integration-test-secret-value");
        config.uploads.dir = uploads.path().to_string_lossy().into_owned();

        let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
        let state = AppState::assemble(config, store, CacheService::disabled());
        state
            .accounts
            .seed_super_admin(&SuperAdminSeed {
                name: "Root".into(),
                email: SUPER_ADMIN_EMAIL.into(),
                password: SUPER_ADMIN_PASSWORD.into(),
            })
            .await
            .unwrap();

        TestApp {
            router: app(state.clone()),
            state,
            _uploads: uploads,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(request).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn patch(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, Some(body)).await
    }

    pub async fn patch_empty(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::PATCH, uri, token, None).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }

    pub async fn register(&self, role: &str) -> (StatusCode, Value, String) {
        let email = unique_email();
        let name: String = Name().fake();
        let (status, body) = self
            .post(
                "/api/user/register",
                None,
                json!({ "name": name, "email": email, "password": PASSWORD, "role": role }),
            )
            .await;
        (status, body, email)
    }

    pub async fn login(&self, email: &str, password: &str) -> (StatusCode, Value) {
        self.post(
            "/api/user/login",
            None,
            json!({ "email": email, "password": password }),
        )
        .await
    }

    /// Registers an account of `role` and returns `(token, user_id)`.
    /// Admin accounts are approved by the super admin first.
    pub async fn account(&self, role: &str) -> (String, Uuid) {
        let (status, user, email) = self.register(role).await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", user);
        let id = id_of(&user);

        if role == "admin" {
            let root = self.super_admin_token().await;
            let (status, _) = self
                .patch(
                    &format!("/api/admin/users/{}", id),
                    Some(&root),
                    json!({ "action": "approve" }),
                )
                .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, body) = self.login(&email, PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        (body["token"].as_str().unwrap().to_string(), id)
    }

    pub async fn super_admin_token(&self) -> String {
        let (status, body) = self.login(SUPER_ADMIN_EMAIL, SUPER_ADMIN_PASSWORD).await;
        assert_eq!(status, StatusCode::OK);
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn submit_theatre(&self, owner_token: &str, screens: i32) -> Uuid {
        let (status, body) = self
            .post(
                "/api/theatre",
                Some(owner_token),
                json!({ "name": "Paradiso", "location": "Piazza", "totalScreens": screens }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "submit failed: {}", body);
        id_of(&body)
    }

    pub async fn approved_theatre(&self, owner_token: &str) -> Uuid {
        let theatre_id = self.submit_theatre(owner_token, 2).await;
        let root = self.super_admin_token().await;
        let (status, _) = self
            .patch(
                &format!("/api/admin/theatres/{}", theatre_id),
                Some(&root),
                json!({ "action": "approve" }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        theatre_id
    }

    pub async fn add_movie(&self, owner_token: &str, title: &str) -> (StatusCode, Value) {
        let fields = [
            ("title", title),
            ("genre", "drama,romance"),
            ("duration", "124"),
            ("description", "A projectionist and a boy"),
            ("language", "Italian"),
            ("releaseDate", "1988-11-17"),
            ("rating", "8.5"),
        ];
        let body = multipart_body(&fields, Some(("poster", "poster.png", &b"png-bytes"[..])));
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/owner/movies")
            .header(header::AUTHORIZATION, format!("Bearer {}", owner_token))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }

    pub async fn movie(&self, owner_token: &str) -> Uuid {
        let (status, body) = self.add_movie(owner_token, "Cinema Paradiso").await;
        assert_eq!(status, StatusCode::CREATED, "add movie failed: {}", body);
        id_of(&body)
    }

    pub async fn create_show(
        &self,
        owner_token: &str,
        theatre_id: Uuid,
        movie_id: Uuid,
        total_seats: i32,
    ) -> (StatusCode, Value) {
        self.post(
            "/api/owner/shows",
            Some(owner_token),
            json!({
                "theatreId": theatre_id,
                "movieId": movie_id,
                "screenNumber": 1,
                "showTime": "2030-01-01T19:30:00Z",
                "totalSeats": total_seats,
            }),
        )
        .await
    }

    /// An owner with an approved theatre, one movie and one show of
    /// `total_seats`. Returns `(owner_token, show_id, movie_id)`.
    pub async fn show_with_seats(&self, total_seats: i32) -> (String, Uuid, Uuid) {
        let (owner, _) = self.account("owner").await;
        let theatre_id = self.approved_theatre(&owner).await;
        let movie_id = self.movie(&owner).await;
        let (status, show) = self.create_show(&owner, theatre_id, movie_id, total_seats).await;
        assert_eq!(status, StatusCode::CREATED, "create show failed: {}", show);
        (owner, id_of(&show), movie_id)
    }

    pub async fn available_seats(&self, show_id: Uuid) -> i64 {
        let (status, show) = self.get(&format!("/api/shows/{}", show_id), None).await;
        assert_eq!(status, StatusCode::OK);
        show["availableSeats"].as_i64().unwrap()
    }

    pub async fn book(&self, token: &str, show_id: Uuid, seats: &[&str]) -> (StatusCode, Value) {
        self.post(
            "/api/bookings",
            Some(token),
            json!({ "showId": show_id, "seats": seats, "pricePerSeat": 10.0 }),
        )
        .await
    }
}

pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", Uuid::new_v4().simple(), email)
}

pub fn id_of(body: &Value) -> Uuid {
    body["id"]
        .as_str()
        .and_then(|id| Uuid::parse_str(id).ok())
        .unwrap_or_else(|| panic!("no id in {}", body))
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
    }
    if let Some((name, file_name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: image/png\r\n\r\n",
                BOUNDARY, name, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}
