pub mod audit_log_handler;

pub use audit_log_handler::{__path_list_audit_logs, list_audit_logs};
