pub mod import_job_dto;

pub use import_job_dto::ImportJobResponseDto;
