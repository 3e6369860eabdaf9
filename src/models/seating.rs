// src/models/seating.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::student::Gender;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "seat_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Vacant,
    Occupied,
    Blocked, // Fora de uso: nunca aparece na busca de vagas
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "allocation_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllocationStatus {
    Occupied,
    Blocked,
}

// --- Structs ---

// O assento é um recurso físico compartilhado entre turnos: o MESMO assento
// pode estar com alunos DIFERENTES em turnos diferentes ao mesmo tempo.
// O campo `status` é apenas informativo; quem manda são as alocações.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    pub id: Uuid,

    #[schema(ignore)]
    pub library_id: Uuid,

    #[schema(example = 5)]
    pub seat_number: i32,

    pub status: SeatStatus,
}

// A alocação: a ponte assento <-> aluno <-> turno.
// Invariante (garantida por índice único parcial no banco): para um par
// (seat_id, shift_id), no máximo UMA alocação com is_active=true e
// status=Occupied pode existir a qualquer momento.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SeatAllocation {
    pub id: Uuid,

    #[schema(ignore)]
    pub library_id: Uuid,

    pub seat_id: Uuid,
    pub shift_id: Uuid,
    pub student_id: Uuid,
    pub subscription_id: Uuid,

    pub status: AllocationStatus,
    pub gender: Gender,
    pub is_active: bool,

    pub created_at: DateTime<Utc>,
}
