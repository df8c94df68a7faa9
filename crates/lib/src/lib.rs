//! LifeOS core library: conversation and context state, presentation helpers, and
//! installable-app glue shared by the CLI and desktop applications.

pub mod assistant;
pub mod config;
pub mod context;
pub mod conversation;
pub mod init;
pub mod install;
pub mod message;
pub mod platform;
pub mod present;
pub mod view;
