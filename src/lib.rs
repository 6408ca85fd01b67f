pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod errors;
pub mod graph;
pub mod models;
pub mod pipeline;
pub mod reporting;
pub mod utils;
