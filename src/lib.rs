pub mod admin;
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod global;
pub mod live;
pub mod meeting;
pub mod provider;
