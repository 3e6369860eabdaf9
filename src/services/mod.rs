pub mod auth;
pub mod ledger_service;
pub mod library_service;
