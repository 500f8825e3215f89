// crates/claims-gate-core/src/decision.rs
// ============================================================================
// Module: Authorization Decisions
// Description: Decision outcomes, grant paths, and the authorization error taxonomy.
// Purpose: Give every evaluation a single immutable, categorized outcome.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! Evaluation produces exactly one [`Decision`] per request. Allow decisions
//! record the [`Grant`] path that admitted the caller; deny decisions map to a
//! [`Denial`] carrying a response category and a fixed, caller-safe reason.
//!
//! ## Invariants
//! - Denial reasons are constant strings and never echo claims or policy data.
//! - `Misconfigured` is an operator fault; the other denials are caller faults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reason returned when the owner claim is missing.
pub const MISSING_OWNER_REASON: &str = "invalid token provided";
/// Reason returned when claims are present but insufficient.
pub const UNAUTHORIZED_REASON: &str = "unauthorized";
/// Reason returned when the policy itself is invalid.
pub const MISCONFIGURED_REASON: &str = "internal server error";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Authorization failures resolved by the gate.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Display strings are for operator logs only, never response bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthzError {
    /// Claims carry no owner identity.
    #[error("owner claim missing from authorizer context")]
    MissingOwner,
    /// Policy is invalid for evaluation.
    #[error("policy misconfigured: {0}")]
    Misconfigured(&'static str),
    /// Claims are present but insufficient.
    #[error("caller lacks the required scope or role")]
    Unauthorized,
}

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Path through the decision table that admitted a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grant {
    /// Policy requires no scope.
    ScopeNotRequired,
    /// Caller is acting on their own resource.
    OwnerMatch,
    /// Granted scope set contains the required scope.
    Scope,
    /// Caller role ranks at or above the required role.
    Role,
}

impl Grant {
    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ScopeNotRequired => "scope_not_required",
            Self::OwnerMatch => "owner_match",
            Self::Scope => "scope",
            Self::Role => "role",
        }
    }
}

/// Outcome of evaluating a policy against a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "decision", content = "grant", rename_all = "snake_case")]
pub enum Decision {
    /// Invoke the wrapped handler.
    Allow(Grant),
    /// Owner claim missing.
    DenyMissingOwner,
    /// Claims insufficient.
    DenyUnauthorized,
    /// Policy invalid.
    DenyMisconfigured,
}

impl Decision {
    /// Returns true for allow decisions.
    #[must_use]
    pub const fn is_allow(self) -> bool {
        matches!(self, Self::Allow(_))
    }

    /// Returns the denial for deny decisions.
    #[must_use]
    pub const fn denial(self) -> Option<Denial> {
        match self {
            Self::Allow(_) => None,
            Self::DenyMissingOwner => Some(Denial {
                category: DenialCategory::Unauthorized,
                reason: MISSING_OWNER_REASON,
            }),
            Self::DenyUnauthorized => Some(Denial {
                category: DenialCategory::Unauthorized,
                reason: UNAUTHORIZED_REASON,
            }),
            Self::DenyMisconfigured => Some(Denial {
                category: DenialCategory::InternalError,
                reason: MISCONFIGURED_REASON,
            }),
        }
    }

    /// Returns a stable label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow(_) => "allow",
            Self::DenyMissingOwner => "deny_missing_owner",
            Self::DenyUnauthorized => "deny_unauthorized",
            Self::DenyMisconfigured => "deny_misconfigured",
        }
    }
}

impl From<AuthzError> for Decision {
    fn from(error: AuthzError) -> Self {
        match error {
            AuthzError::MissingOwner => Self::DenyMissingOwner,
            AuthzError::Misconfigured(_) => Self::DenyMisconfigured,
            AuthzError::Unauthorized => Self::DenyUnauthorized,
        }
    }
}

impl From<Result<Grant, AuthzError>> for Decision {
    fn from(result: Result<Grant, AuthzError>) -> Self {
        result.map_or_else(Self::from, Self::Allow)
    }
}

// ============================================================================
// SECTION: Denial
// ============================================================================

/// Response category selected for a denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialCategory {
    /// Caller is not authorized (401).
    Unauthorized,
    /// Operator-side fault (500).
    InternalError,
}

/// Structured rejection handed to the response builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Denial {
    /// Response category.
    pub category: DenialCategory,
    /// Fixed human-readable reason.
    pub reason: &'static str,
}

// ============================================================================
// SECTION: Tests
// ============================================================================
