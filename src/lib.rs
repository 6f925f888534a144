pub mod app;
pub mod auth;
pub mod banner;
pub mod commands;
pub mod config;
pub mod consts;
pub mod display;
pub mod domain;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod spinner;
pub mod store;
pub mod trainer;
