// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, time::Duration};

use crate::{
    db::{
        ExpenseRepository, LibraryRepository, PaymentRepository, SeatingRepository,
        StudentRepository, SubscriptionRepository, UserRepository,
    },
    services::{auth::AuthService, ledger_service::LedgerService, library_service::LibraryService},
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,

    // Serviços
    pub auth_service: AuthService,
    pub library_service: LibraryService,
    pub ledger_service: LedgerService,

    // Repositórios acessados diretamente por handlers e middleware
    pub library_repo: LibraryRepository,
    pub student_repo: StudentRepository,
    pub subscription_repo: SubscriptionRepository,
    pub payment_repo: PaymentRepository,
    pub expense_repo: ExpenseRepository,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar,
    // a aplicação não deve iniciar.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let library_repo = LibraryRepository::new(db_pool.clone());
        let student_repo = StudentRepository::new(db_pool.clone());
        let seating_repo = SeatingRepository::new(db_pool.clone());
        let subscription_repo = SubscriptionRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let expense_repo = ExpenseRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret.clone(), db_pool.clone());
        let library_service = LibraryService::new(db_pool.clone(), library_repo.clone());
        let ledger_service = LedgerService::new(
            db_pool.clone(),
            library_repo.clone(),
            student_repo.clone(),
            seating_repo,
            subscription_repo.clone(),
            payment_repo.clone(),
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            library_service,
            ledger_service,
            library_repo,
            student_repo,
            subscription_repo,
            payment_repo,
            expense_repo,
        })
    }
}
