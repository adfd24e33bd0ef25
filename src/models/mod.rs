pub mod attachment;
pub mod company;
pub mod interview;
pub mod user;
pub mod vacancy;
