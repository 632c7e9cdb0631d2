//! Generus (member) management for the back-office.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::GenerusService;
