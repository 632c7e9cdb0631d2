mod audit_log_service;

pub use audit_log_service::{AuditLogService, AuditRecorder};
