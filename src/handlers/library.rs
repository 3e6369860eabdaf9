// src/handlers/library.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermSubscriptionsRead, RequirePermission},
        tenancy::LibraryContext,
    },
    models::{
        library::{Library, Shift},
        rbac::{permission_catalog, PermissionInfo},
        seating::{Seat, SeatAllocation},
    },
    services::library_service::ShiftDef,
};

#[derive(Debug, serde::Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftPayload {
    #[validate(length(min = 1, message = "O nome do turno é obrigatório."))]
    #[schema(example = "Manhã")]
    pub name: String,

    #[schema(value_type = String, example = "06:00:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, example = "12:00:00")]
    pub end_time: NaiveTime,

    #[schema(example = "6.00")]
    pub total_hours: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLibraryPayload {
    #[validate(length(min = 2, message = "O nome deve ter no mínimo 2 caracteres."))]
    #[schema(example = "Sala de Estudos Central")]
    pub name: String,

    #[validate(range(min = 1, message = "A biblioteca precisa de ao menos 1 assento."))]
    #[schema(example = 40)]
    pub total_seats: i32,

    // Turnos do onboarding (tipicamente 4)
    #[validate(length(min = 1, message = "Informe ao menos um turno."), nested)]
    pub shifts: Vec<ShiftPayload>,
}

#[derive(Debug, serde::Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LibraryCreatedResponse {
    pub library: Library,
    pub shifts: Vec<Shift>,
}

// POST /api/libraries
#[utoipa::path(
    post,
    path = "/api/libraries",
    tag = "Libraries",
    request_body = CreateLibraryPayload,
    responses(
        (status = 201, description = "Biblioteca criada com assentos e turnos", body = LibraryCreatedResponse),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_library(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<CreateLibraryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let shift_defs: Vec<ShiftDef> = payload
        .shifts
        .iter()
        .map(|s| ShiftDef {
            name: s.name.clone(),
            start_time: s.start_time,
            end_time: s.end_time,
            total_hours: s.total_hours,
        })
        .collect();

    let (library, shifts) = app_state
        .library_service
        .onboard_library(user.id, &payload.name, payload.total_seats, &shift_defs)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(LibraryCreatedResponse { library, shifts }),
    ))
}

// GET /api/libraries
#[utoipa::path(
    get,
    path = "/api/libraries",
    tag = "Libraries",
    responses(
        (status = 200, description = "Bibliotecas do usuário", body = Vec<Library>)
    ),
    security(("api_jwt" = []))
)]
pub async fn list_my_libraries(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let libraries = app_state.library_service.list_my_libraries(user.id).await?;
    Ok((StatusCode::OK, Json(libraries)))
}

// GET /api/libraries/shifts
#[utoipa::path(
    get,
    path = "/api/libraries/shifts",
    tag = "Libraries",
    responses(
        (status = 200, description = "Turnos da biblioteca", body = Vec<Shift>)
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_shifts(
    State(app_state): State<AppState>,
    library: LibraryContext,
) -> Result<impl IntoResponse, AppError> {
    let shifts = app_state.library_service.list_shifts(library.0).await?;
    Ok((StatusCode::OK, Json(shifts)))
}

// GET /api/libraries/seats
#[utoipa::path(
    get,
    path = "/api/libraries/seats",
    tag = "Libraries",
    responses(
        (status = 200, description = "Assentos da biblioteca", body = Vec<Seat>)
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_seats(
    State(app_state): State<AppState>,
    library: LibraryContext,
) -> Result<impl IntoResponse, AppError> {
    let seats = app_state.library_service.list_seats(library.0).await?;
    Ok((StatusCode::OK, Json(seats)))
}

// GET /api/libraries/allocations (mapa de ocupação)
#[utoipa::path(
    get,
    path = "/api/libraries/allocations",
    tag = "Libraries",
    responses(
        (status = 200, description = "Alocações ativas da biblioteca", body = Vec<SeatAllocation>)
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_allocations(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsRead>,
) -> Result<impl IntoResponse, AppError> {
    let allocations = app_state.ledger_service.active_allocations(library.0).await?;
    Ok((StatusCode::OK, Json(allocations)))
}

// GET /api/permissions (catálogo estático de capacidades)
#[utoipa::path(
    get,
    path = "/api/permissions",
    tag = "RBAC",
    responses(
        (status = 200, description = "Catálogo de permissões", body = Vec<PermissionInfo>)
    )
)]
pub async fn list_permissions() -> Json<Vec<PermissionInfo>> {
    Json(permission_catalog())
}
