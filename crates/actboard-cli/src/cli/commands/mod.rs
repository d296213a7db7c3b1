//! Command implementations.

pub mod activities;
pub mod groups;
pub mod helpers;
pub mod init;
pub mod watch;

pub use activities::run_activities;
pub use groups::{run_group_create, run_group_join, run_group_show, run_post};
pub use init::run_init;
pub use watch::run_watch;
