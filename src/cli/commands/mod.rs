//! CLI command modules

pub mod init;
pub mod process;
pub mod transformers;
pub mod validate;
