pub mod analyze;
pub mod completions;
pub mod init;
pub mod process;
pub mod serve;
