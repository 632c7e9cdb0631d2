mod generus_dto;

pub use generus_dto::*;
