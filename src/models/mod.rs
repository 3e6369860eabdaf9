pub mod auth;
pub mod expense;
pub mod library;
pub mod rbac;
pub mod seating;
pub mod student;
pub mod subscription;
