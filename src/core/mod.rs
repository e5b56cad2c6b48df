//! Core translation pipeline

pub mod client;
pub mod config;
pub mod errors;
pub mod input;
pub mod localize;
pub mod models;
pub mod session;
pub mod sign;
pub mod speech;
