//! Station API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{
    CreateStationRequest, PortRequest, StationData, StationListData, StationListQuery,
    StationStatusData, UpdateOccupancyRequest, UpdateStationRequest,
};
use crate::application::StationService;
use crate::domain::station::StationFilter;
use crate::domain::{DomainError, RepositoryProvider};
use crate::interfaces::http::common::{ApiQuery, ApiResponse, PaginationParams, ValidatedJson};
use crate::interfaces::http::middleware::CurrentUser;
use crate::shared::PageRequest;

#[derive(Clone)]
pub struct StationHandlerState {
    pub stations: Arc<StationService<dyn RepositoryProvider>>,
}

fn list_response(data: StationListData) -> Json<ApiResponse<StationListData>> {
    let results = data.stations.len();
    Json(ApiResponse::success(data).with_results(results))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations",
    tag = "Stations",
    params(StationListQuery),
    responses(
        (status = 200, description = "Paginated station list", body = ApiResponse<StationListData>)
    )
)]
pub async fn list_stations(
    State(state): State<StationHandlerState>,
    ApiQuery(query): ApiQuery<StationListQuery>,
) -> Result<Json<ApiResponse<StationListData>>, DomainError> {
    let filter = StationFilter {
        operator_id: None,
        status: query.status,
        connector_type: query.connector_type,
    };
    let page = PageRequest::new(query.page, query.limit);

    let result = state.stations.list(filter, page).await?;
    Ok(list_response(result.into()))
}

#[utoipa::path(
    post,
    path = "/api/v1/stations",
    tag = "Stations",
    request_body = CreateStationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Station created", body = ApiResponse<StationData>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Operators and admins only")
    )
)]
pub async fn create_station(
    State(state): State<StationHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ValidatedJson(request): ValidatedJson<CreateStationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationData>>), DomainError> {
    let details = state
        .stations
        .create(&user, request.into_new_station()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StationData {
            station: details.into(),
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/my-stations",
    tag = "Stations",
    params(PaginationParams),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Stations owned by the caller", body = ApiResponse<StationListData>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Operators and admins only")
    )
)]
pub async fn my_stations(
    State(state): State<StationHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<ApiResponse<StationListData>>, DomainError> {
    let page = PageRequest::new(params.page, params.limit);
    let result = state.stations.list_mine(&user, page).await?;
    Ok(list_response(result.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = String, Path, description = "Station id")),
    responses(
        (status = 200, description = "Station with live occupancy", body = ApiResponse<StationData>),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn get_station(
    State(state): State<StationHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StationData>>, DomainError> {
    let details = state.stations.get(&id).await?;
    Ok(Json(ApiResponse::success(StationData {
        station: details.into(),
    })))
}

#[utoipa::path(
    patch,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = String, Path, description = "Station id")),
    request_body = UpdateStationRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Station updated", body = ApiResponse<StationData>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn update_station(
    State(state): State<StationHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStationRequest>,
) -> Result<Json<ApiResponse<StationData>>, DomainError> {
    let details = state
        .stations
        .update(&user, &id, request.into_changes()?)
        .await?;

    Ok(Json(ApiResponse::success(StationData {
        station: details.into(),
    })))
}

#[utoipa::path(
    delete,
    path = "/api/v1/stations/{id}",
    tag = "Stations",
    params(("id" = String, Path, description = "Station id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Station and its occupancy record deleted"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn delete_station(
    State(state): State<StationHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, DomainError> {
    state.stations.delete(&user, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/v1/stations/{id}/ports",
    tag = "Stations",
    params(("id" = String, Path, description = "Station id")),
    request_body = PortRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Port added", body = ApiResponse<StationData>),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn add_port(
    State(state): State<StationHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<PortRequest>,
) -> Result<(StatusCode, Json<ApiResponse<StationData>>), DomainError> {
    let details = state
        .stations
        .add_port(&user, &id, request.into_port()?)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(StationData {
            station: details.into(),
        })),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/stations/{id}/status",
    tag = "Stations",
    params(("id" = String, Path, description = "Station id")),
    responses(
        (status = 200, description = "Occupancy per connector type", body = ApiResponse<StationStatusData>),
        (status = 404, description = "Station not found")
    )
)]
pub async fn get_station_status(
    State(state): State<StationHandlerState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StationStatusData>>, DomainError> {
    let status = state.stations.get_status(&id).await?;
    Ok(Json(ApiResponse::success(StationStatusData {
        station_status: status.into(),
    })))
}

#[utoipa::path(
    patch,
    path = "/api/v1/stations/{id}/status",
    tag = "Stations",
    params(("id" = String, Path, description = "Station id")),
    request_body = UpdateOccupancyRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Occupancy updated", body = ApiResponse<StationStatusData>),
        (status = 400, description = "Unknown connector type or count out of range"),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Station not found")
    )
)]
pub async fn update_station_status(
    State(state): State<StationHandlerState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateOccupancyRequest>,
) -> Result<Json<ApiResponse<StationStatusData>>, DomainError> {
    let (connector, occupied) = request.into_parts()?;
    let status = state
        .stations
        .set_occupancy(&user, &id, connector, occupied)
        .await?;

    Ok(Json(ApiResponse::success(StationStatusData {
        station_status: status.into(),
    })))
}
