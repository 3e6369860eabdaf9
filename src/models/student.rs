// src/models/student.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender_kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "student_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    Active,
    Inactive,
}

// --- Structs ---

// O aluno nunca é apagado fisicamente (soft delete via is_active).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: Uuid,

    #[schema(ignore)]
    pub library_id: Uuid,

    // Número sequencial por biblioteca: serial = MAX(serial_no) + 1.
    // Preserva unicidade após exclusões, mas pode deixar "buracos".
    #[schema(example = 12)]
    pub serial_no: i32,

    // Código legível derivado do serial, ex: "STD0012"
    #[schema(example = "STD0012")]
    pub student_code: String,

    #[schema(example = "João da Silva")]
    pub student_name: String,

    #[schema(example = "11987654321")]
    pub mobile_no: String,

    pub gender: Gender,
    pub status: StudentStatus,

    #[schema(value_type = String, format = Date, example = "2026-02-01")]
    pub admission_date: NaiveDate,

    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Formata o código legível do aluno a partir do serial por tenant.
pub fn format_student_code(serial: i32) -> String {
    format!("STD{:04}", serial)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codigo_do_aluno_tem_largura_fixa() {
        assert_eq!(format_student_code(1), "STD0001");
        assert_eq!(format_student_code(42), "STD0042");
        assert_eq!(format_student_code(12345), "STD12345");
    }
}
