mod generus_service;

pub use generus_service::GenerusService;
