// src/models/expense.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Despesa avulsa da biblioteca (aluguel, luz, material).
// Independente do livro-razão de assinaturas: nenhuma invariante cruzada.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,

    #[schema(ignore)]
    pub library_id: Uuid,

    #[schema(example = "Aluguel")]
    pub purpose: String,

    #[schema(example = "Aluguel de fevereiro")]
    pub subject: Option<String>,

    #[schema(example = "2500.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-02-05")]
    pub expense_date: NaiveDate,

    #[schema(ignore)]
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,
}
