// crates/fieldset-config/src/lib.rs
// ============================================================================
// Module: Fieldset Config Library
// Description: Canonical config model and validation.
// Purpose: Single source of truth for fieldset.toml semantics.
// Dependencies: fieldset-core, serde, toml
// ============================================================================

//! ## Overview
//! `fieldset-config` defines the configuration model for the Fieldset tools:
//! the default resolution policy and hard limits on nesting depth and input
//! size. Validation is strict and fails closed.
//!
//! Security posture: config inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
