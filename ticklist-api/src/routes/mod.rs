/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: Registration, login, profile, token refresh, lookup
/// - `todos`: Owner-scoped todo CRUD

pub mod health;
pub mod todos;
pub mod users;
