pub mod cli;
pub mod config;
pub mod controller;
pub mod render;
pub mod service;
pub mod store;
pub mod task;
pub mod view;
