pub mod forum_dto;

pub use forum_dto::*;
