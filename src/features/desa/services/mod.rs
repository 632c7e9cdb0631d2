mod desa_service;

pub use desa_service::DesaService;
