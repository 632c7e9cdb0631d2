pub mod audit_logs;
pub mod auth;
pub mod desa;
pub mod events;
pub mod generus;
pub mod kelompok;
pub mod presences;
