pub mod import_job_service;

pub use import_job_service::ImportJobService;
