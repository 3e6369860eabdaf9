// src/db/expense_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::expense::Expense};

#[derive(Clone)]
pub struct ExpenseRepository {
    pool: PgPool,
}

impl ExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_expense<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        purpose: &str,
        subject: Option<&str>,
        amount: Decimal,
        expense_date: NaiveDate,
        created_by: Uuid,
    ) -> Result<Expense, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let expense = sqlx::query_as::<_, Expense>(
            r#"
            INSERT INTO expenses (
                library_id, purpose, subject, amount, expense_date, created_by
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, library_id, purpose, subject, amount,
                      expense_date, created_by, created_at
            "#,
        )
        .bind(library_id)
        .bind(purpose)
        .bind(subject)
        .bind(amount)
        .bind(expense_date)
        .bind(created_by)
        .fetch_one(executor)
        .await?;

        Ok(expense)
    }

    pub async fn list_expenses<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<Vec<Expense>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, library_id, purpose, subject, amount,
                   expense_date, created_by, created_at
            FROM expenses
            WHERE library_id = $1
            ORDER BY expense_date DESC, created_at DESC
            "#,
        )
        .bind(library_id)
        .fetch_all(executor)
        .await?;

        Ok(expenses)
    }
}
