pub mod api_connection;
pub mod cli;
pub mod config;
pub mod generator;
pub mod ingredients;
pub mod prompts;
pub mod recipe;
pub mod saved;
pub mod server;
pub mod service;
