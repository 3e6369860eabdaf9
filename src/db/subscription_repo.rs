// src/db/subscription_repo.rs

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::subscription::{Subscription, SubscriptionStatus},
};

const SUBSCRIPTION_COLUMNS: &str = r#"
    id, library_id, student_id, seat_id,
    plan_start_date, plan_end_date,
    total_hours, shift_start, shift_end,
    subscription_cost, paid_amount, discount, pending_amount,
    status, created_by, created_at, updated_at
"#;

#[derive(Clone)]
pub struct SubscriptionRepository {
    pool: PgPool,
}

impl SubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_subscription<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        student_id: Uuid,
        seat_id: Uuid,
        plan_start_date: NaiveDate,
        plan_end_date: NaiveDate,
        total_hours: Decimal,
        shift_start: NaiveTime,
        shift_end: NaiveTime,
        subscription_cost: Decimal,
        paid_amount: Decimal,
        discount: Decimal,
        pending_amount: Decimal,
        created_by: Uuid,
    ) -> Result<Subscription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            INSERT INTO subscriptions (
                library_id, student_id, seat_id,
                plan_start_date, plan_end_date,
                total_hours, shift_start, shift_end,
                subscription_cost, paid_amount, discount, pending_amount,
                created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        );

        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(library_id)
            .bind(student_id)
            .bind(seat_id)
            .bind(plan_start_date)
            .bind(plan_end_date)
            .bind(total_hours)
            .bind(shift_start)
            .bind(shift_end)
            .bind(subscription_cost)
            .bind(paid_amount)
            .bind(discount)
            .bind(pending_amount)
            .bind(created_by)
            .fetch_one(executor)
            .await
            .map_err(|e| {
                // O índice único parcial garante UMA assinatura ativa por aluno.
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        return AppError::ActiveSubscriptionExists;
                    }
                }
                e.into()
            })?;

        Ok(subscription)
    }

    /// Grava o conjunto de turnos da assinatura.
    pub async fn add_subscription_shifts<'e, E>(
        &self,
        executor: E,
        subscription_id: Uuid,
        shift_ids: &[Uuid],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            INSERT INTO subscription_shifts (subscription_id, shift_id)
            SELECT $1, unnest($2::uuid[])
            "#,
        )
        .bind(subscription_id)
        .bind(shift_ids)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    pub async fn shift_ids_for_subscription<'e, E>(
        &self,
        executor: E,
        subscription_id: Uuid,
    ) -> Result<Vec<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT shift_id FROM subscription_shifts WHERE subscription_id = $1",
        )
        .bind(subscription_id)
        .fetch_all(executor)
        .await?;

        Ok(rows.into_iter().map(|(id,)| id).collect())
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscriptions
            WHERE library_id = $1 AND id = $2
            "#
        );

        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(library_id)
            .bind(subscription_id)
            .fetch_optional(executor)
            .await?;

        Ok(subscription)
    }

    /// Busca com lock de linha (FOR UPDATE): toda mutação financeira ou de
    /// estado lê por aqui, dentro de transação, para não perder updates
    /// sob pagamentos concorrentes na mesma assinatura.
    pub async fn find_by_id_for_update<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        subscription_id: Uuid,
    ) -> Result<Option<Subscription>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscriptions
            WHERE library_id = $1 AND id = $2
            FOR UPDATE
            "#
        );

        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(library_id)
            .bind(subscription_id)
            .fetch_optional(executor)
            .await?;

        Ok(subscription)
    }

    pub async fn find_active_by_student_for_update<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Subscription>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscriptions
            WHERE library_id = $1 AND student_id = $2 AND status = 'ACTIVE'
            FOR UPDATE
            "#
        );

        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(library_id)
            .bind(student_id)
            .fetch_optional(executor)
            .await?;

        Ok(subscription)
    }

    pub async fn list_subscriptions<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<Vec<Subscription>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            SELECT {SUBSCRIPTION_COLUMNS}
            FROM subscriptions
            WHERE library_id = $1
            ORDER BY created_at DESC
            "#
        );

        let subscriptions = sqlx::query_as::<_, Subscription>(&sql)
            .bind(library_id)
            .fetch_all(executor)
            .await?;

        Ok(subscriptions)
    }

    /// Recomputa os campos financeiros da assinatura (paid/pending) de uma vez.
    pub async fn update_amounts<'e, E>(
        &self,
        executor: E,
        subscription_id: Uuid,
        paid_amount: Decimal,
        pending_amount: Decimal,
    ) -> Result<Subscription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE subscriptions
            SET paid_amount = $2, pending_amount = $3, updated_at = now()
            WHERE id = $1
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        );

        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(subscription_id)
            .bind(paid_amount)
            .bind(pending_amount)
            .fetch_one(executor)
            .await?;

        Ok(subscription)
    }

    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        subscription_id: Uuid,
        status: SubscriptionStatus,
    ) -> Result<Subscription, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"
            UPDATE subscriptions
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {SUBSCRIPTION_COLUMNS}
            "#
        );

        let subscription = sqlx::query_as::<_, Subscription>(&sql)
            .bind(subscription_id)
            .bind(status)
            .fetch_one(executor)
            .await?;

        Ok(subscription)
    }
}
