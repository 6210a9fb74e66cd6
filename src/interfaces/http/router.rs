//! API router with Swagger UI

use std::sync::Arc;

use axum::{
    http::{StatusCode, Uri},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{StationService, UserService};
use crate::domain::RepositoryProvider;
use crate::interfaces::http::common::{ApiResponse, PageInfo, PaginationParams};
use crate::interfaces::http::middleware::{
    auth_middleware, require_role, AuthState, STATION_MANAGERS,
};
use crate::interfaces::http::modules::{
    auth, health, metrics as prometheus, request_id, stations, users,
};

/// Everything the router needs from the running service
#[derive(Clone)]
pub struct ApiContext {
    pub users: Arc<UserService<dyn RepositoryProvider>>,
    pub stations: Arc<StationService<dyn RepositoryProvider>>,
    pub db: DatabaseConnection,
    pub prometheus: PrometheusHandle,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token returned by signup, signin or a password change"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signup,
        auth::signin,
        users::get_me,
        users::update_me,
        users::change_password,
        users::add_favorite,
        users::remove_favorite,
        stations::list_stations,
        stations::create_station,
        stations::my_stations,
        stations::get_station,
        stations::update_station,
        stations::delete_station,
        stations::add_port,
        stations::get_station_status,
        stations::update_station_status,
    ),
    components(
        schemas(
            PageInfo,
            PaginationParams,
            auth::SignupRequest,
            auth::SigninRequest,
            auth::AuthData,
            users::UserResponse,
            users::UserData,
            users::TokenData,
            users::UpdateMeRequest,
            users::VehicleProfileRequest,
            users::VehicleProfileResponse,
            users::ChangePasswordRequest,
            stations::CreateStationRequest,
            stations::UpdateStationRequest,
            stations::LocationRequest,
            stations::PortRequest,
            stations::UpdateOccupancyRequest,
            stations::StationResponse,
            stations::StationData,
            stations::StationListData,
            stations::StationStatusResponse,
            stations::StationStatusData,
            stations::PortAvailability,
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and database health"),
        (name = "Authentication", description = "Signup and signin"),
        (name = "Users", description = "Profile, password, vehicle profiles and favourite stations"),
        (name = "Stations", description = "Station directory, operator inventory and live occupancy"),
    ),
    info(
        title = "EV Station Directory API",
        version = "1.0.0",
        description = "REST API for finding EV charging stations and managing their availability",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::fail(format!("{} is not defined", uri.path()))),
    )
}

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        users: ctx.users.clone(),
    };
    let user_state = auth::AuthHandlerState {
        users: ctx.users.clone(),
    };
    let station_state = stations::StationHandlerState {
        stations: ctx.stations.clone(),
    };

    // ── /api/v1/user ───────────────────────────────────────────
    let account_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .with_state(user_state.clone());

    let profile_routes = Router::new()
        .route("/me", get(users::get_me).patch(users::update_me))
        .route("/password", patch(users::change_password))
        .route(
            "/me/favorites/{station_id}",
            post(users::add_favorite).delete(users::remove_favorite),
        )
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(user_state);

    // ── /api/v1/stations ───────────────────────────────────────
    let public_station_routes = Router::new()
        .route("/", get(stations::list_stations))
        .route("/{id}", get(stations::get_station))
        .route("/{id}/status", get(stations::get_station_status))
        .with_state(station_state.clone());

    // require_role reads the user inserted by auth_middleware, so it is
    // layered first (inner).
    let managed_station_routes = Router::new()
        .route("/", post(stations::create_station))
        .route("/my-stations", get(stations::my_stations))
        .route(
            "/{id}",
            patch(stations::update_station).delete(stations::delete_station),
        )
        .route("/{id}/ports", post(stations::add_port))
        .route("/{id}/status", patch(stations::update_station_status))
        .route_layer(middleware::from_fn_with_state(
            STATION_MANAGERS,
            require_role,
        ))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(station_state);

    // ── Operational ────────────────────────────────────────────
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState::new(ctx.db));

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus::prometheus_metrics))
        .with_state(prometheus::MetricsState {
            handle: ctx.prometheus,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/user", account_routes.merge(profile_routes))
        .nest(
            "/api/v1/stations",
            public_station_routes.merge(managed_station_routes),
        )
        .fallback(not_found)
        .layer(middleware::from_fn(prometheus::http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
}
