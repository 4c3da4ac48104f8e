pub mod auth;
pub mod cli;
pub mod db;
pub mod paths;
pub mod profile;
pub mod serde_utils;
