//! Core business logic for Gascon.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Callers fetch records and hand them in; every function here is synchronous
//! and free of shared state.
//!
//! # Modules
//!
//! - `consumption` - Daily volume formulas and contract-deviation checks
//! - `contract` - Supply contracts and active-contract resolution
//! - `period` - Date windows and organization-local calendar days
//! - `aggregation` - Per-day, per-unit and report aggregation

pub mod aggregation;
pub mod consumption;
pub mod contract;
pub mod period;
