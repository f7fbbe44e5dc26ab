//! CLI subcommand implementations.

pub mod init;
pub mod report;
pub mod summary;
pub mod violations;
