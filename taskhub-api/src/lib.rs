//! # Taskhub API Server Library
//!
//! Core functionality for the Taskhub API server: a multi-user
//! task-tracking backend with JWT access/refresh sessions, per-user
//! resource ownership, and avatar storage.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling, HTTP response mapping, response envelope
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
