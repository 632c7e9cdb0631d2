mod kelompok_dto;

pub use kelompok_dto::*;
