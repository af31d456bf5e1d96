pub mod approve;
pub mod config;
pub mod db;
pub mod delete;
pub mod export;
pub mod init;
pub mod log;
pub mod months;
pub mod process;
pub mod settings;
pub mod show;
