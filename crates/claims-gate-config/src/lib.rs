// crates/claims-gate-config/src/lib.rs
// ============================================================================
// Module: Claims Gate Config Library
// Description: Policy catalog model, loading, and validation.
// Purpose: Single source of truth for claims-gate.toml semantics.
// Dependencies: claims-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! `claims-gate-config` turns a TOML policy catalog into runtime
//! [`claims_gate_core::Policy`] values with strict, fail-closed validation.
//! Deployments that construct policies in code do not need this crate.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
