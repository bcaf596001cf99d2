pub mod import_job_handler;

pub use import_job_handler::*;
