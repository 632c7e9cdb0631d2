//! Audit trail of back-office mutations and public check-ins.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Auth | Description |
//! |--------|----------|------|-------------|
//! | GET | `/api/admin/audit-logs` | Super admin | List audit entries |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{AuditLogService, AuditRecorder};
