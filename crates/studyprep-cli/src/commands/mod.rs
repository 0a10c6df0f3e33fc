pub mod analyze;
pub mod build_bank;
pub mod compare;
pub mod init;
pub mod progress;
pub mod status;
pub mod submit;
pub mod validate;
