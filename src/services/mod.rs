pub mod interview_service;
pub mod interview_validator;
