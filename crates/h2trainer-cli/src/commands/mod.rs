pub mod init;
pub mod quiz;
pub mod review;
pub mod simulate;
pub mod tips;
pub mod validate;
