pub mod attachment_dto;
pub mod interview_dto;
