//! API contract tests: the real router over a migrated in-memory database

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use metrics_exporter_prometheus::PrometheusBuilder;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::middleware::{MSG_NOT_LOGGED_IN, MSG_NO_PERMISSION};
use super::{create_api_router, ApiContext};
use crate::application::identity::service::{MSG_DEACTIVATED, MSG_USER_GONE};
use crate::application::{StationService, UserService};
use crate::domain::RepositoryProvider;
use crate::infrastructure::crypto::jwt::{sign_claims, JwtConfig, TokenClaims};
use crate::infrastructure::database::entities::user;
use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
use crate::infrastructure::database::test_connection;

const ADMIN_EMAIL: &str = "admin@evstation.test";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestApp {
    router: Router,
    jwt: JwtConfig,
    db: DatabaseConnection,
}

impl TestApp {
    async fn new() -> Self {
        let db = test_connection().await;
        let repos: Arc<dyn RepositoryProvider> =
            Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
        let jwt = JwtConfig {
            secret: "contract-test-secret".into(),
            expiration_hours: 1,
            issuer: "evstation-test".into(),
        };

        let users = Arc::new(UserService::new(repos.clone(), jwt.clone(), 4));
        users
            .ensure_admin("Admin", ADMIN_EMAIL, ADMIN_PASSWORD)
            .await
            .unwrap();

        let router = create_api_router(ApiContext {
            users,
            stations: Arc::new(StationService::new(repos)),
            db: db.clone(),
            prometheus: PrometheusBuilder::new().build_recorder().handle(),
        });

        Self { router, jwt, db }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = body.map_or_else(Body::empty, |b| Body::from(b.to_string()));

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

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

    async fn signup(&self, name: &str, email: &str, role: &str) -> (String, String) {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/user/signup",
                None,
                Some(json!({
                    "name": name,
                    "email": email,
                    "password": "password123",
                    "passwordConfirm": "password123",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    async fn admin_token(&self) -> String {
        let (status, body) = self
            .send(
                Method::POST,
                "/api/v1/user/signin",
                None,
                Some(json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        body["data"]["token"].as_str().unwrap().to_string()
    }

    async fn create_station(&self, token: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, "/api/v1/stations", Some(token), Some(body))
            .await
    }
}

fn station_body(name: &str) -> Value {
    json!({
        "name": name,
        "location": {"type": "Point", "coordinates": [77.5946, 12.9716]},
        "address": "MG Road, Bengaluru",
        "ports": [
            {"connectorType": "CCS", "vehicleType": "car", "powerKW": 60, "total": 2, "pricePerKWh": 18},
            {"connectorType": "AC_SLOW", "vehicleType": "bike", "powerKW": 3.3, "total": 4, "pricePerKWh": 8}
        ]
    })
}

fn claims(user_id: &str, jwt: &JwtConfig, iat: i64, exp: i64) -> TokenClaims {
    TokenClaims {
        sub: user_id.to_string(),
        email: "someone@evstation.test".into(),
        role: "user".into(),
        exp,
        iat,
        iss: jwt.issuer.clone(),
    }
}

// ── Accounts ────────────────────────────────────────────────────

#[tokio::test]
async fn signup_returns_token_and_public_user() {
    let app = TestApp::new().await;
    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signup",
            None,
            Some(json!({
                "name": "Asha Rao",
                "email": "Asha@Example.com",
                "password": "password123",
                "passwordConfirm": "password123",
                "company": "ignored for users"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "success");
    assert!(body["data"]["token"].as_str().is_some());
    let user = &body["data"]["user"];
    assert_eq!(user["email"], "asha@example.com");
    assert_eq!(user["role"], "user");
    assert!(user.get("company").is_none());
    assert!(user.get("password").is_none());
    assert!(user.get("passwordHash").is_none());
}

#[tokio::test]
async fn signup_rejects_missing_fields_and_mismatched_confirmation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signup",
            None,
            Some(json!({"email": "x@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signup",
            None,
            Some(json!({
                "name": "Asha Rao",
                "email": "asha@example.com",
                "password": "password123",
                "passwordConfirm": "password124"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Passwords are not the same!"));
}

#[tokio::test]
async fn duplicate_email_is_a_client_error() {
    let app = TestApp::new().await;
    app.signup("Asha Rao", "asha@example.com", "user").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signup",
            None,
            Some(json!({
                "name": "Someone Else",
                "email": "ASHA@example.com",
                "password": "password123",
                "passwordConfirm": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "'asha@example.com' already exists");
}

#[tokio::test]
async fn admin_self_registration_is_forbidden() {
    let app = TestApp::new().await;
    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/user/signup",
            None,
            Some(json!({
                "name": "Mallory",
                "email": "mallory@example.com",
                "password": "password123",
                "passwordConfirm": "password123",
                "role": "admin"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn signin_checks_fields_and_credentials() {
    let app = TestApp::new().await;
    app.signup("Asha Rao", "asha@example.com", "user").await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signin",
            None,
            Some(json!({"email": "asha@example.com"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please provide email and password");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signin",
            None,
            Some(json!({"email": "asha@example.com", "password": "wrong-password"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Incorrect email or password");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signin",
            None,
            Some(json!({"email": "asha@example.com", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["user"]["lastLogin"].is_string());
}

#[tokio::test]
async fn protected_routes_reject_missing_invalid_and_expired_tokens() {
    let app = TestApp::new().await;
    let (_, user_id) = app.signup("Asha Rao", "asha@example.com", "user").await;

    let (status, body) = app.send(Method::GET, "/api/v1/user/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], MSG_NOT_LOGGED_IN);

    let (status, body) = app
        .send(Method::GET, "/api/v1/user/me", Some("not.a.token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token, please login again!");

    let now = Utc::now().timestamp();
    let expired = sign_claims(&claims(&user_id, &app.jwt, now - 7200, now - 3600), &app.jwt).unwrap();
    let (status, body) = app
        .send(Method::GET, "/api/v1/user/me", Some(&expired), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired. Please relogin");
}

#[tokio::test]
async fn password_change_invalidates_older_tokens() {
    let app = TestApp::new().await;
    let (_, user_id) = app.signup("Asha Rao", "asha@example.com", "user").await;

    let now = Utc::now().timestamp();
    let old = sign_claims(&claims(&user_id, &app.jwt, now - 60, now + 3600), &app.jwt).unwrap();

    let (status, _) = app
        .send(
            Method::PATCH,
            "/api/v1/user/password",
            Some(&old),
            Some(json!({
                "currentPassword": "wrong-password",
                "newPassword": "new-password-1",
                "newPasswordConfirm": "new-password-1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/user/password",
            Some(&old),
            Some(json!({
                "currentPassword": "password123",
                "newPassword": "new-password-1",
                "newPasswordConfirm": "new-password-1"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let fresh = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = app.send(Method::GET, "/api/v1/user/me", Some(&old), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "User recently changed password! Please log in again."
    );

    let (status, _) = app
        .send(Method::GET, "/api/v1/user/me", Some(&fresh), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn tokens_of_deleted_users_are_rejected() {
    let app = TestApp::new().await;
    let (token, user_id) = app.signup("Asha Rao", "asha@example.com", "user").await;

    user::Entity::delete_by_id(user_id.as_str())
        .exec(&app.db)
        .await
        .unwrap();

    let (status, body) = app.send(Method::GET, "/api/v1/user/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], MSG_USER_GONE);
}

#[tokio::test]
async fn deactivated_accounts_are_locked_out() {
    let app = TestApp::new().await;
    let (token, user_id) = app.signup("Asha Rao", "asha@example.com", "user").await;

    user::ActiveModel {
        id: Set(user_id.clone()),
        is_active: Set(false),
        ..Default::default()
    }
    .update(&app.db)
    .await
    .unwrap();

    let (status, body) = app.send(Method::GET, "/api/v1/user/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], MSG_DEACTIVATED);

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signin",
            None,
            Some(json!({"email": "asha@example.com", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], MSG_DEACTIVATED);
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn names_and_emails_are_trimmed_before_validation() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signup",
            None,
            Some(json!({
                "name": "   ab   ",
                "email": "ab@example.com",
                "password": "password123",
                "passwordConfirm": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/user/signup",
            None,
            Some(json!({
                "name": "  Asha Rao  ",
                "email": " Asha@Example.com ",
                "password": "password123",
                "passwordConfirm": "password123"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["user"]["email"], "asha@example.com");
    assert_eq!(body["data"]["user"]["name"], "Asha Rao");
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/user/signin",
            None,
            Some(json!({"email": "  asha@example.com ", "password": "password123"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/user/me",
            Some(&token),
            Some(json!({"name": "  x  "})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/user/me",
            Some(&token),
            Some(json!({"name": "  Asha R  "})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["name"], "Asha R");
}

#[tokio::test]
async fn vehicle_profiles_report_estimated_range() {
    let app = TestApp::new().await;
    let (token, _) = app.signup("Asha Rao", "asha@example.com", "user").await;

    let (status, body) = app
        .send(
            Method::PATCH,
            "/api/v1/user/me",
            Some(&token),
            Some(json!({
                "vehicleProfiles": [{
                    "vehicleType": "car",
                    "batteryCapacity_kWh": 60,
                    "efficiency_kWh_per_km": 0.15,
                    "batteryPercent": 50,
                    "compatibleConnectors": ["CCS"]
                }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    let profile = &body["data"]["user"]["vehicleProfiles"][0];
    assert_eq!(profile["vehicleType"], "car");
    assert!((profile["estimatedRangeKm"].as_f64().unwrap() - 200.0).abs() < 1e-9);
}

#[tokio::test]
async fn favorites_require_an_existing_station() {
    let app = TestApp::new().await;
    let (operator, _) = app.signup("Volt Ops", "ops@example.com", "operator").await;
    let (driver, _) = app.signup("Asha Rao", "asha@example.com", "user").await;

    let (_, body) = app.create_station(&operator, station_body("Central")).await;
    let station_id = body["data"]["station"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/v1/user/me/favorites/{}", uuid::Uuid::new_v4()),
            Some(&driver),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/user/me/favorites/{}", station_id);
    let (status, body) = app.send(Method::POST, &uri, Some(&driver), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["favoriteStations"], json!([station_id]));

    let (status, body) = app.send(Method::DELETE, &uri, Some(&driver), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["favoriteStations"], json!([]));
}

// ── Stations ────────────────────────────────────────────────────

#[tokio::test]
async fn only_operators_and_admins_create_stations() {
    let app = TestApp::new().await;
    let (driver, _) = app.signup("Asha Rao", "asha@example.com", "user").await;

    let (status, body) = app.create_station(&driver, station_body("Central")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], MSG_NO_PERMISSION);

    let (status, _) = app
        .send(Method::POST, "/api/v1/stations", None, Some(station_body("Central")))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_station_starts_with_idle_ports() {
    let app = TestApp::new().await;
    let (operator, operator_id) = app.signup("Volt Ops", "ops@example.com", "operator").await;

    let (status, body) = app.create_station(&operator, station_body("Central")).await;
    assert_eq!(status, StatusCode::CREATED);

    let station = &body["data"]["station"];
    assert_eq!(station["operatorId"], operator_id.as_str());
    assert_eq!(station["operatingHours"], "24/7");
    assert_eq!(station["status"], "active");
    assert_eq!(station["location"]["coordinates"], json!([77.5946, 12.9716]));
    assert_eq!(
        station["portStatus"],
        json!([
            {"connectorType": "CCS", "occupied": 0, "total": 2, "available": 2},
            {"connectorType": "AC_SLOW", "occupied": 0, "total": 4, "available": 4}
        ])
    );

    let id = station["id"].as_str().unwrap();
    let (status, body) = app
        .send(Method::GET, &format!("/api/v1/stations/{}/status", id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stationStatus"]["stationId"], id);
    assert_eq!(
        body["data"]["stationStatus"]["portStatus"]
            .as_array()
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn station_input_is_validated() {
    let app = TestApp::new().await;
    let (operator, _) = app.signup("Volt Ops", "ops@example.com", "operator").await;

    let mut no_ports = station_body("Central");
    no_ports["ports"] = json!([]);
    let (status, body) = app.create_station(&operator, no_ports).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Station must have at least one port"));

    let mut bad_location = station_body("Central");
    bad_location["location"]["coordinates"] = json!([200.0, 12.0]);
    let (status, _) = app.create_station(&operator, bad_location).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut too_powerful = station_body("Central");
    too_powerful["ports"][0]["powerKW"] = json!(400);
    let (status, _) = app.create_station(&operator, too_powerful).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .send(Method::GET, "/api/v1/stations/not-an-id", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid id: not-an-id");
}

#[tokio::test]
async fn only_owner_or_admin_can_modify_a_station() {
    let app = TestApp::new().await;
    let (owner, owner_id) = app.signup("Volt Ops", "ops@example.com", "operator").await;
    let (rival, rival_id) = app.signup("Amp Co", "amp@example.com", "operator").await;
    let admin = app.admin_token().await;

    let (_, body) = app.create_station(&owner, station_body("Central")).await;
    let uri = format!("/api/v1/stations/{}", body["data"]["station"]["id"].as_str().unwrap());

    let (status, _) = app
        .send(Method::PATCH, &uri, Some(&rival), Some(json!({"name": "Hijacked"})))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.send(Method::DELETE, &uri, Some(&rival), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = app
        .send(
            Method::PATCH,
            &uri,
            Some(&admin),
            Some(json!({"name": "Central Hub", "operatorId": rival_id})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["station"]["name"], "Central Hub");
    assert_eq!(body["data"]["station"]["operatorId"], owner_id.as_str());

    let (status, body) = app.send(Method::DELETE, &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = app
        .send(Method::GET, &format!("{}/status", uri), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn occupancy_is_bounded_by_port_capacity() {
    let app = TestApp::new().await;
    let (owner, _) = app.signup("Volt Ops", "ops@example.com", "operator").await;

    let (_, body) = app.create_station(&owner, station_body("Central")).await;
    let id = body["data"]["station"]["id"].as_str().unwrap().to_string();
    let status_uri = format!("/api/v1/stations/{}/status", id);

    let (status, body) = app
        .send(
            Method::PATCH,
            &status_uri,
            Some(&owner),
            Some(json!({"connectorType": "CCS", "occupied": 3})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Occupied count for CCS cannot exceed 2");

    let (status, _) = app
        .send(
            Method::PATCH,
            &status_uri,
            Some(&owner),
            Some(json!({"connectorType": "CHAdeMO", "occupied": 1})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(
            Method::PATCH,
            &status_uri,
            Some(&owner),
            Some(json!({"connectorType": "CCS", "occupied": 2})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app
        .send(Method::GET, &format!("/api/v1/stations/{}", id), None, None)
        .await;
    assert_eq!(body["data"]["station"]["portStatus"][0]["available"], 0);

    // shrinking the CCS group clamps the stored count
    let (status, body) = app
        .send(
            Method::PATCH,
            &format!("/api/v1/stations/{}", id),
            Some(&owner),
            Some(json!({"ports": [
                {"connectorType": "CCS", "vehicleType": "car", "powerKW": 60, "total": 1, "pricePerKWh": 18}
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["station"]["portStatus"],
        json!([{"connectorType": "CCS", "occupied": 1, "total": 1, "available": 0}])
    );
}

#[tokio::test]
async fn adding_a_port_extends_the_status() {
    let app = TestApp::new().await;
    let (owner, _) = app.signup("Volt Ops", "ops@example.com", "operator").await;

    let (_, body) = app.create_station(&owner, station_body("Central")).await;
    let id = body["data"]["station"]["id"].as_str().unwrap().to_string();

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/v1/stations/{}/ports", id),
            Some(&owner),
            Some(json!({"connectorType": "CHAdeMO", "vehicleType": "car", "powerKW": 50, "total": 1, "pricePerKWh": 20})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["station"]["ports"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["station"]["portStatus"][2]["connectorType"], "CHAdeMO");
}

#[tokio::test]
async fn listing_filters_and_paginates() {
    let app = TestApp::new().await;
    let (owner, _) = app.signup("Volt Ops", "ops@example.com", "operator").await;
    let (rival, _) = app.signup("Amp Co", "amp@example.com", "operator").await;

    app.create_station(&owner, station_body("Central")).await;
    app.create_station(&owner, station_body("North")).await;

    let mut slow_only = station_body("Depot");
    slow_only["ports"] = json!([
        {"connectorType": "Type2", "vehicleType": "car", "powerKW": 22, "total": 2, "pricePerKWh": 12}
    ]);
    slow_only["status"] = json!("inactive");
    app.create_station(&rival, slow_only).await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/stations?limit=2", None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], 2);
    assert_eq!(body["data"]["pagination"]["total"], 3);
    assert_eq!(body["data"]["pagination"]["totalPages"], 2);

    let (_, body) = app
        .send(Method::GET, "/api/v1/stations?connectorType=Type2", None, None)
        .await;
    assert_eq!(body["results"], 1);
    assert_eq!(body["data"]["stations"][0]["name"], "Depot");

    let (_, body) = app
        .send(Method::GET, "/api/v1/stations?status=active", None, None)
        .await;
    assert_eq!(body["results"], 2);

    let (status, body) = app
        .send(Method::GET, "/api/v1/stations/my-stations", Some(&rival), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], 1);
}

#[tokio::test]
async fn huge_page_numbers_return_an_empty_page() {
    let app = TestApp::new().await;
    let (owner, _) = app.signup("Volt Ops", "ops@example.com", "operator").await;
    app.create_station(&owner, station_body("Central")).await;

    let (status, body) = app
        .send(
            Method::GET,
            "/api/v1/stations?page=18446744073709551615&limit=100",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["results"], 0);
    assert_eq!(body["data"]["pagination"]["total"], 1);

    let (status, body) = app
        .send(
            Method::GET,
            "/api/v1/stations/my-stations?page=18446744073709551615",
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["results"], 0);
}

#[tokio::test]
async fn malformed_query_strings_use_the_fail_envelope() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send(Method::GET, "/api/v1/stations?status=bogus", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert!(body["message"].as_str().unwrap().starts_with("Invalid query"));

    let (owner, _) = app.signup("Volt Ops", "ops@example.com", "operator").await;
    let (status, body) = app
        .send(
            Method::GET,
            "/api/v1/stations/my-stations?page=abc",
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
}

// ── Operational ─────────────────────────────────────────────────

#[tokio::test]
async fn unknown_routes_use_the_fail_envelope() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/api/v1/nothing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({"status": "fail", "message": "/api/v1/nothing is not defined"})
    );
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = TestApp::new().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "trace-me")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me");
}
