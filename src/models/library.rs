// src/models/library.rs

use chrono::{DateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::rbac::Role;

// ---
// 1. Library (A "Biblioteca")
// ---
// O tenant: raiz do isolamento de dados. Toda entidade abaixo carrega
// um library_id e nunca pode ser vista ou alterada por outro tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Library {
    pub id: Uuid,

    #[schema(example = "Sala de Estudos Central")]
    pub name: String,

    #[schema(example = 40)]
    pub total_seats: i32,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---
// 2. UserLibrary (A "Ponte" Usuário-Biblioteca)
// ---
// Liga um usuário a uma biblioteca, com o papel dele naquele tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserLibrary {
    pub user_id: Uuid,
    pub library_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

// ---
// 3. Shift (O "Turno")
// ---
// Dados de referência imutáveis por tenant, criados no onboarding
// (tipicamente 4 por biblioteca: manhã, tarde, noite, madrugada).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Shift {
    pub id: Uuid,

    #[schema(ignore)]
    pub library_id: Uuid,

    #[schema(example = "Manhã")]
    pub name: String,

    #[schema(value_type = String, example = "06:00")]
    pub start_time: NaiveTime,

    #[schema(value_type = String, example = "12:00")]
    pub end_time: NaiveTime,

    #[schema(example = "6.00")]
    pub total_hours: Decimal,
}
