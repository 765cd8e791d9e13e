//! # TrainDesk Shared Library
//!
//! This crate contains the domain models, authentication primitives and
//! business operations used by the TrainDesk API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and their queries
//! - `auth`: Password hashing, JWT, verification codes, request auth context
//! - `db`: Connection pool and migrations
//! - `mail`: Verification email delivery
//! - `services`: Account, client and workout operations
//! - `error`: Service error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod mail;
pub mod models;
pub mod services;

/// Current version of the TrainDesk shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
