//! CLI command handlers

mod admin;
mod check;
mod serve;

pub use admin::cmd_create_admin;
pub use check::cmd_check;
pub use serve::cmd_serve;
