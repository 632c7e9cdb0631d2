mod kelompok_service;

pub use kelompok_service::KelompokService;
