pub mod config;
pub mod init;
pub mod nav;
pub mod resolve;
pub mod stage;
pub mod theme;
pub mod ui;
pub mod user;
