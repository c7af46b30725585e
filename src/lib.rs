//! Ops Portal Backend Library
//!
//! Core components for the operations portal backend: credential
//! verification, JWT issuance and validation, role-based access control,
//! and the HTTP API surface.

pub mod api;
pub mod auth;
pub mod metrics;
pub mod services;
