//! # Syndicate API Library
//!
//! This library provides the core functionality for the Syndicate content
//! syndication service, including the sync engine, handlers, models, and
//! server configuration.

pub mod auth;
pub mod config;
pub mod cursor;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod server;
pub mod sync;
pub mod telemetry;
pub use migration;
