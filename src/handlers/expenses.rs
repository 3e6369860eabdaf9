// src/handlers/expenses.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{PermExpensesRead, PermExpensesWrite, RequirePermission},
        tenancy::LibraryContext,
    },
    models::expense::Expense,
};

fn validate_positive(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser positivo.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpensePayload {
    #[validate(length(min = 1, message = "A finalidade é obrigatória."))]
    #[schema(example = "Aluguel")]
    pub purpose: String,

    #[schema(example = "Aluguel de fevereiro")]
    pub subject: Option<String>,

    #[validate(custom(function = validate_positive))]
    #[schema(example = "2500.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-02-05")]
    pub expense_date: NaiveDate,
}

// POST /api/expenses
#[utoipa::path(
    post,
    path = "/api/expenses",
    tag = "Expenses",
    request_body = CreateExpensePayload,
    responses(
        (status = 201, description = "Despesa registrada", body = Expense),
        (status = 400, description = "Dados inválidos")
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_expense(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    library: LibraryContext,
    _perm: RequirePermission<PermExpensesWrite>,
    Json(payload): Json<CreateExpensePayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let expense = app_state
        .expense_repo
        .create_expense(
            &app_state.db_pool,
            library.0,
            &payload.purpose,
            payload.subject.as_deref(),
            payload.amount,
            payload.expense_date,
            user.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

// GET /api/expenses
#[utoipa::path(
    get,
    path = "/api/expenses",
    tag = "Expenses",
    responses(
        (status = 200, description = "Despesas da biblioteca", body = Vec<Expense>)
    ),
    params(
        ("x-library-id" = Uuid, Header, description = "ID da biblioteca")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_expenses(
    State(app_state): State<AppState>,
    library: LibraryContext,
    _perm: RequirePermission<PermExpensesRead>,
) -> Result<impl IntoResponse, AppError> {
    let expenses = app_state
        .expense_repo
        .list_expenses(&app_state.db_pool, library.0)
        .await?;

    Ok((StatusCode::OK, Json(expenses)))
}
