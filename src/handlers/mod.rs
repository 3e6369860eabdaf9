pub mod auth;
pub mod expenses;
pub mod library;
pub mod payments;
pub mod students;
pub mod subscriptions;
