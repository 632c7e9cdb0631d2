mod desa_dto;

pub use desa_dto::*;
