mod presence_dto;

pub use presence_dto::*;
