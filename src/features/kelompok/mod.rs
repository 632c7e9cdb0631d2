//! Kelompok (sub-group) management for the back-office.
//!
//! Every kelompok belongs to exactly one desa; generus belong to a kelompok.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::KelompokService;
