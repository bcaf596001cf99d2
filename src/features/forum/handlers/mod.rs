pub mod forum_handler;

pub use forum_handler::*;
