//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Environment configuration (database, HTTP server)
//! - The shared persistence client

pub mod config;
pub mod database;
