// src/handlers/subscriptions.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermSubscriptionsRead, PermSubscriptionsWrite, RequirePermission},
        tenancy::LibraryContext,
    },
    models::{
        seating::Seat,
        student::{Gender, Student},
        subscription::{Payment, PaymentMode, Subscription},
    },
    services::ledger_service::{NewStudent, PlanFields},
};

fn validate_non_negative(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser positivo.".into());
        return Err(err);
    }
    Ok(())
}

// =============================================================================
//  ÁREA 1: BUSCA DE VAGAS
// =============================================================================

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VacantSeatsParams {
    // Lista de UUIDs separados por vírgula
    #[schema(example = "id-do-turno-1,id-do-turno-2")]
    pub shift_ids: String,
}

// GET /api/subscriptions/vacant-seats?shiftIds=a,b
#[utoipa::path(
    get,
    path = "/api/subscriptions/vacant-seats",
    tag = "Subscriptions",
    params(
        ("shiftIds" = String, Query, description = "IDs dos turnos, separados por vírgula"),
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    responses(
        (status = 200, description = "Assentos livres em TODOS os turnos pedidos", body = Vec<Seat>),
        (status = 404, description = "Turno inexistente ou de outra biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_vacant_seats(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsRead>,
    Query(params): Query<VacantSeatsParams>,
) -> Result<impl IntoResponse, AppError> {
    let shift_ids: Vec<Uuid> = params
        .shift_ids
        .split(',')
        .map(|s| Uuid::parse_str(s.trim()))
        .collect::<Result<_, _>>()
        .map_err(|_| AppError::InvalidShiftIds)?;

    if shift_ids.is_empty() {
        return Err(AppError::InvalidShiftIds);
    }

    let seats = app_state
        .ledger_service
        .vacant_seats(library.0, &shift_ids)
        .await?;

    Ok((StatusCode::OK, Json(seats)))
}

// =============================================================================
//  ÁREA 2: MATRÍCULA
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRegistrationPayload {
    // Dados do aluno
    #[validate(length(min = 1, message = "O nome do aluno é obrigatório."))]
    #[schema(example = "João da Silva")]
    pub student_name: String,

    #[validate(length(min = 8, message = "O celular deve ter no mínimo 8 dígitos."))]
    #[schema(example = "11987654321")]
    pub mobile_no: String,

    pub gender: Gender,

    #[schema(value_type = String, format = Date, example = "2026-02-01")]
    pub admission_date: NaiveDate,

    // Assento e turnos
    pub seat_id: Uuid,

    #[validate(length(min = 1, message = "Escolha ao menos um turno."))]
    pub shift_ids: Vec<Uuid>,

    // Plano
    #[schema(value_type = String, format = Date, example = "2026-02-01")]
    pub plan_start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub plan_end_date: NaiveDate,

    #[validate(custom(function = validate_positive))]
    #[schema(example = "1000.00")]
    pub subscription_cost: Decimal,

    #[validate(custom(function = validate_non_negative))]
    #[schema(example = "400.00")]
    pub paid_amount: Decimal,

    #[validate(custom(function = validate_non_negative))]
    #[schema(example = "0.00")]
    pub discount: Decimal,

    pub payment_mode: PaymentMode,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub student: Student,
    pub subscription: Subscription,
}

// POST /api/subscriptions/register
#[utoipa::path(
    post,
    path = "/api/subscriptions/register",
    tag = "Subscriptions",
    request_body = CreateRegistrationPayload,
    responses(
        (status = 201, description = "Aluno matriculado", body = RegistrationResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Assento já ocupado em um dos turnos")
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_registration(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsWrite>,
    Json(payload): Json<CreateRegistrationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let (student, subscription) = app_state
        .ledger_service
        .create_registration(
            user.id,
            library.0,
            NewStudent {
                student_name: payload.student_name,
                mobile_no: payload.mobile_no,
                gender: payload.gender,
                admission_date: payload.admission_date,
            },
            payload.seat_id,
            &payload.shift_ids,
            PlanFields {
                plan_start_date: payload.plan_start_date,
                plan_end_date: payload.plan_end_date,
                subscription_cost: payload.subscription_cost,
                paid_amount: payload.paid_amount,
                discount: payload.discount,
                payment_mode: payload.payment_mode,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegistrationResponse { student, subscription }),
    ))
}

// =============================================================================
//  ÁREA 3: CICLO DE VIDA (renovar / cancelar / encerrar)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenewSubscriptionPayload {
    pub student_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub plan_start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-04-01")]
    pub plan_end_date: NaiveDate,

    #[validate(custom(function = validate_positive))]
    #[schema(example = "1000.00")]
    pub subscription_cost: Decimal,

    #[validate(custom(function = validate_non_negative))]
    #[schema(example = "1000.00")]
    pub paid_amount: Decimal,

    #[validate(custom(function = validate_non_negative))]
    #[schema(example = "0.00")]
    pub discount: Decimal,

    pub payment_mode: PaymentMode,
}

// POST /api/subscriptions/renew
#[utoipa::path(
    post,
    path = "/api/subscriptions/renew",
    tag = "Subscriptions",
    request_body = RenewSubscriptionPayload,
    responses(
        (status = 201, description = "Assinatura renovada (sucessora criada)", body = Subscription),
        (status = 422, description = "O aluno não possui assinatura ativa")
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn renew_subscription(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsWrite>,
    Json(payload): Json<RenewSubscriptionPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let subscription = app_state
        .ledger_service
        .renew_subscription(
            user.id,
            library.0,
            payload.student_id,
            PlanFields {
                plan_start_date: payload.plan_start_date,
                plan_end_date: payload.plan_end_date,
                subscription_cost: payload.subscription_cost,
                paid_amount: payload.paid_amount,
                discount: payload.discount,
                payment_mode: payload.payment_mode,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(subscription)))
}

// POST /api/subscriptions/{id}/cancel
#[utoipa::path(
    post,
    path = "/api/subscriptions/{id}/cancel",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Assinatura cancelada, assento liberado", body = Subscription),
        (status = 404, description = "Assinatura não encontrada"),
        (status = 422, description = "A assinatura não está ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da assinatura"),
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn cancel_subscription(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsWrite>,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let subscription = app_state
        .ledger_service
        .cancel_subscription(library.0, subscription_id)
        .await?;

    Ok((StatusCode::OK, Json(subscription)))
}

// POST /api/subscriptions/{id}/close
#[utoipa::path(
    post,
    path = "/api/subscriptions/{id}/close",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Assinatura encerrada, assento liberado", body = Subscription),
        (status = 404, description = "Assinatura não encontrada"),
        (status = 422, description = "A assinatura não está ativa")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da assinatura"),
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn close_subscription(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsWrite>,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let subscription = app_state
        .ledger_service
        .close_subscription(library.0, subscription_id)
        .await?;

    Ok((StatusCode::OK, Json(subscription)))
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetailResponse {
    pub subscription: Subscription,
    pub shift_ids: Vec<Uuid>,
    pub payments: Vec<Payment>,
}

// GET /api/subscriptions/{id}
#[utoipa::path(
    get,
    path = "/api/subscriptions/{id}",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Assinatura com turnos e pagamentos", body = SubscriptionDetailResponse),
        (status = 404, description = "Assinatura não encontrada")
    ),
    params(
        ("id" = Uuid, Path, description = "ID da assinatura"),
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_subscription(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsRead>,
    Path(subscription_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let (subscription, shift_ids, payments) = app_state
        .ledger_service
        .subscription_detail(library.0, subscription_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(SubscriptionDetailResponse {
            subscription,
            shift_ids,
            payments,
        }),
    ))
}

// GET /api/subscriptions
#[utoipa::path(
    get,
    path = "/api/subscriptions",
    tag = "Subscriptions",
    responses(
        (status = 200, description = "Assinaturas da biblioteca", body = Vec<Subscription>)
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_subscriptions(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermSubscriptionsRead>,
) -> Result<impl IntoResponse, AppError> {
    let subscriptions = app_state
        .subscription_repo
        .list_subscriptions(&app_state.db_pool, library.0)
        .await?;

    Ok((StatusCode::OK, Json(subscriptions)))
}
