//! Geofenced public check-in and presence administration.

pub mod dtos;
pub mod eligibility;
pub mod geolocation;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use repository::PgPresenceRepository;
pub use services::PresenceService;
