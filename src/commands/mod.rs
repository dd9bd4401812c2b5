mod config_cmd;
mod group;
pub mod resource;
mod user;

pub use config_cmd::ConfigCommand;
pub use group::GroupCommand;
pub use user::UserCommand;
