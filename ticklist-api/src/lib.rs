//! # Ticklist API Server Library
//!
//! This library provides the core functionality for the Ticklist API
//! server: a multi-user todo-list backend with token authentication.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `images`: External image host client
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod images;
pub mod routes;
