//! # TrainDesk API Server Library
//!
//! HTTP layer of TrainDesk. Business operations live in `traindesk_shared`;
//! this crate wires them to axum.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Request deadline
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
