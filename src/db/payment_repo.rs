// src/db/payment_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::subscription::{Payment, PaymentMode},
};

// Livro-razão de pagamentos: só se insere, nunca se altera.
#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_payment<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        student_id: Uuid,
        subscription_id: Uuid,
        amount: Decimal,
        payment_date: NaiveDate,
        payment_mode: PaymentMode,
        created_by: Uuid,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (
                library_id, student_id, subscription_id,
                amount, payment_date, payment_mode, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, library_id, student_id, subscription_id,
                      amount, payment_date, payment_mode, status,
                      created_by, created_at
            "#,
        )
        .bind(library_id)
        .bind(student_id)
        .bind(subscription_id)
        .bind(amount)
        .bind(payment_date)
        .bind(payment_mode)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        Ok(payment)
    }

    pub async fn list_payments<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, library_id, student_id, subscription_id,
                   amount, payment_date, payment_mode, status,
                   created_by, created_at
            FROM payments
            WHERE library_id = $1
            ORDER BY payment_date DESC, created_at DESC
            "#,
        )
        .bind(library_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }

    pub async fn list_for_subscription<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, library_id, student_id, subscription_id,
                   amount, payment_date, payment_mode, status,
                   created_by, created_at
            FROM payments
            WHERE library_id = $1 AND subscription_id = $2
            ORDER BY payment_date ASC, created_at ASC
            "#,
        )
        .bind(library_id)
        .bind(subscription_id)
        .fetch_all(executor)
        .await?;

        Ok(payments)
    }
}
