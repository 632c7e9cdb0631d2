//! Events and their check-in window.
//!
//! Status is never stored; it is resolved from `start_date`/`end_date`
//! against the current time on every read.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::EventService;
