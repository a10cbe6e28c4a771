//! CLI commands for harvest

pub mod dispatch;
pub mod fetch;
pub mod refs;
pub mod status;
