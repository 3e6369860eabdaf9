// src/models/subscription.rs

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// --- Enums (Mapeando o Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "subscription_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    Active,    // Em vigor
    Expired,   // Venceu sem renovação
    Cancelled, // Interrompida antes do fim do plano
    Closed,    // Cumpriu o plano até o fim
    Renewed,   // Substituída por uma sucessora
}

impl SubscriptionStatus {
    // As transições são de mão única: Active -> {Renewed|Cancelled|Closed|Expired}.
    // De um estado terminal não se sai nunca mais.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SubscriptionStatus::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_mode", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMode {
    Cash,
    Upi,
    Card,
    BankTransfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
    Refunded,
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: Uuid,

    #[schema(ignore)]
    pub library_id: Uuid,

    pub student_id: Uuid,
    pub seat_id: Uuid,

    #[schema(value_type = String, format = Date, example = "2026-02-01")]
    pub plan_start_date: NaiveDate,
    #[schema(value_type = String, format = Date, example = "2026-03-01")]
    pub plan_end_date: NaiveDate,

    // Campos derivados dos turnos escolhidos (soma e janela horária)
    #[schema(example = "12.00")]
    pub total_hours: Decimal,
    #[schema(value_type = String, example = "06:00")]
    pub shift_start: NaiveTime,
    #[schema(value_type = String, example = "18:00")]
    pub shift_end: NaiveTime,

    // Valores. Invariante após TODA mutação:
    // pending_amount == max(0, subscription_cost - paid_amount - discount)
    #[schema(example = "1000.00")]
    pub subscription_cost: Decimal,
    #[schema(example = "400.00")]
    pub paid_amount: Decimal,
    #[schema(example = "0.00")]
    pub discount: Decimal,
    #[schema(example = "600.00")]
    pub pending_amount: Decimal,

    pub status: SubscriptionStatus,

    #[schema(ignore)]
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Pagamento: lançamento append-only no livro-razão.
// Cada inserção dispara a recomputação de paid/pending na assinatura-mãe.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,

    #[schema(ignore)]
    pub library_id: Uuid,

    pub student_id: Uuid,
    pub subscription_id: Uuid,

    #[schema(example = "400.00")]
    pub amount: Decimal,

    #[schema(value_type = String, format = Date, example = "2026-02-01")]
    pub payment_date: NaiveDate,

    pub payment_mode: PaymentMode,
    pub status: PaymentStatus,

    #[schema(ignore)]
    pub created_by: Uuid,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn somente_active_nao_e_terminal() {
        assert!(!SubscriptionStatus::Active.is_terminal());
        assert!(SubscriptionStatus::Expired.is_terminal());
        assert!(SubscriptionStatus::Cancelled.is_terminal());
        assert!(SubscriptionStatus::Closed.is_terminal());
        assert!(SubscriptionStatus::Renewed.is_terminal());
    }
}
