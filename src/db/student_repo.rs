// src/db/student_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::student::{Gender, Student, StudentStatus},
};

#[derive(Clone)]
pub struct StudentRepository {
    pool: PgPool,
}

impl StudentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Próximo serial do tenant: MAX(serial_no) + 1.
    /// Usar MAX (e não COUNT) preserva a unicidade depois de exclusões,
    /// ao custo de buracos na sequência. A leitura roda dentro da mesma
    /// transação da inserção; a UNIQUE (library_id, serial_no) cobre a
    /// janela de corrida que sobra.
    pub async fn next_serial<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<i32, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (max_serial,): (Option<i32>,) = sqlx::query_as(
            "SELECT MAX(serial_no) FROM students WHERE library_id = $1",
        )
        .bind(library_id)
        .fetch_one(executor)
        .await?;

        Ok(max_serial.unwrap_or(0) + 1)
    }

    pub async fn create_student<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        serial_no: i32,
        student_code: &str,
        student_name: &str,
        mobile_no: &str,
        gender: Gender,
        admission_date: NaiveDate,
    ) -> Result<Student, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let student = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (
                library_id, serial_no, student_code, student_name,
                mobile_no, gender, admission_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, library_id, serial_no, student_code, student_name,
                      mobile_no, gender, status, admission_date, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(library_id)
        .bind(serial_no)
        .bind(student_code)
        .bind(student_name)
        .bind(mobile_no)
        .bind(gender)
        .bind(admission_date)
        .fetch_one(executor)
        .await?;

        Ok(student)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<Student>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let student = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, library_id, serial_no, student_code, student_name,
                   mobile_no, gender, status, admission_date, is_active,
                   created_at, updated_at
            FROM students
            WHERE library_id = $1 AND id = $2 AND is_active = TRUE
            "#,
        )
        .bind(library_id)
        .bind(student_id)
        .fetch_optional(executor)
        .await?;

        Ok(student)
    }

    pub async fn list_students<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
    ) -> Result<Vec<Student>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, library_id, serial_no, student_code, student_name,
                   mobile_no, gender, status, admission_date, is_active,
                   created_at, updated_at
            FROM students
            WHERE library_id = $1 AND is_active = TRUE
            ORDER BY serial_no ASC
            "#,
        )
        .bind(library_id)
        .fetch_all(executor)
        .await?;

        Ok(students)
    }

    /// Troca administrativa de status (active|inactive). Nunca apaga a linha.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        library_id: Uuid,
        student_id: Uuid,
        status: StudentStatus,
    ) -> Result<Option<Student>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let student = sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET status = $3, updated_at = now()
            WHERE library_id = $1 AND id = $2 AND is_active = TRUE
            RETURNING id, library_id, serial_no, student_code, student_name,
                      mobile_no, gender, status, admission_date, is_active,
                      created_at, updated_at
            "#,
        )
        .bind(library_id)
        .bind(student_id)
        .bind(status)
        .fetch_optional(executor)
        .await?;

        Ok(student)
    }
}
