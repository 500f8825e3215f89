// crates/claims-gate-config/src/config.rs
// ============================================================================
// Module: Claims Gate Configuration
// Description: Policy catalog loading and validation for Claims Gate.
// Purpose: Provide strict, fail-closed policy parsing with hard limits.
// Dependencies: claims-gate-core, serde, toml
// ============================================================================

//! ## Overview
//! A policy catalog is loaded from a TOML file with strict size and path
//! limits. Shared claim-key defaults live under `[defaults]`; each named
//! policy lives under `[policies.<name>]` and may override the scope claim
//! location. Missing or invalid configuration fails closed.
//!
//! ```toml
//! [defaults]
//! scope_claim = "scp"
//! scope_delimiter = " "
//!
//! [policies.update_user]
//! required_scope = "users"
//! required_role = "administrator"
//! user_edit_allowed = true
//! owner = { source = "path_parameter", name = "user_id" }
//! ```

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use claims_gate_core::ClaimKeys;
use claims_gate_core::OwnerRule;
use claims_gate_core::Policy;
use claims_gate_core::Role;
use claims_gate_core::ScopeClaim;
use claims_gate_core::claims::DEFAULT_SCOPE_DELIMITER;
use claims_gate_core::claims::OWNER_CLAIM;
use claims_gate_core::claims::PRINCIPAL_CLAIM;
use claims_gate_core::claims::ROLE_CLAIM;
use claims_gate_core::claims::SCOPE_CLAIM;
use claims_gate_core::claims::SUBJECT_CLAIM;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "claims-gate.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "CLAIMS_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum number of policies in a catalog.
pub(crate) const MAX_POLICIES: usize = 1024;
/// Maximum length of a policy name.
pub(crate) const MAX_POLICY_NAME_LENGTH: usize = 128;
/// Maximum length of a claim key, scope, or parameter name.
pub(crate) const MAX_TOKEN_LENGTH: usize = 256;
/// Maximum number of caller identity claim keys.
pub(crate) const MAX_CALLER_CLAIMS: usize = 8;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// Claims Gate policy catalog configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimsGateConfig {
    /// Claim key defaults shared by every policy.
    #[serde(default)]
    pub defaults: ClaimDefaults,
    /// Named policies.
    #[serde(default)]
    pub policies: BTreeMap<String, PolicyConfig>,
}

impl ClaimsGateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        validate_path(&resolved)?;
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.defaults.validate()?;
        if self.policies.len() > MAX_POLICIES {
            return Err(ConfigError::Invalid("too many policies".to_string()));
        }
        for (name, policy) in &self.policies {
            validate_policy_name(name)?;
            policy
                .validate(&self.defaults)
                .map_err(|err| ConfigError::Invalid(format!("policies.{name}: {err}")))?;
        }
        Ok(())
    }

    /// Builds the runtime policy for a named entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the policy is unknown or invalid.
    pub fn policy(&self, name: &str) -> Result<Policy, ConfigError> {
        let entry = self
            .policies
            .get(name)
            .ok_or_else(|| ConfigError::Invalid(format!("unknown policy: {name}")))?;
        entry
            .to_policy(&self.defaults)
            .map_err(|err| ConfigError::Invalid(format!("policies.{name}: {err}")))
    }

    /// Builds every runtime policy, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when any policy is invalid.
    pub fn build_policies(&self) -> Result<BTreeMap<String, Policy>, ConfigError> {
        self.policies.keys().map(|name| Ok((name.clone(), self.policy(name)?))).collect()
    }
}

/// Claim key defaults applied to every policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClaimDefaults {
    /// Owner identity claim key.
    #[serde(default = "default_owner_claim")]
    pub owner_claim: String,
    /// Caller identity claim keys in priority order.
    #[serde(default = "default_caller_claims")]
    pub caller_claims: Vec<String>,
    /// Role label claim key.
    #[serde(default = "default_role_claim")]
    pub role_claim: String,
    /// Scope set claim key.
    #[serde(default = "default_scope_claim")]
    pub scope_claim: String,
    /// Delimiter between scopes.
    #[serde(default = "default_scope_delimiter")]
    pub scope_delimiter: char,
    /// Treat an empty required scope as a misconfiguration.
    #[serde(default = "default_require_explicit_scope")]
    pub require_explicit_scope: bool,
}

impl Default for ClaimDefaults {
    fn default() -> Self {
        Self {
            owner_claim: default_owner_claim(),
            caller_claims: default_caller_claims(),
            role_claim: default_role_claim(),
            scope_claim: default_scope_claim(),
            scope_delimiter: default_scope_delimiter(),
            require_explicit_scope: default_require_explicit_scope(),
        }
    }
}

impl ClaimDefaults {
    /// Validates claim key defaults.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_token("defaults.owner_claim", &self.owner_claim)?;
        validate_token("defaults.role_claim", &self.role_claim)?;
        validate_token("defaults.scope_claim", &self.scope_claim)?;
        if self.caller_claims.is_empty() {
            return Err(ConfigError::Invalid(
                "defaults.caller_claims must be non-empty".to_string(),
            ));
        }
        if self.caller_claims.len() > MAX_CALLER_CLAIMS {
            return Err(ConfigError::Invalid(
                "defaults.caller_claims has too many entries".to_string(),
            ));
        }
        for (idx, key) in self.caller_claims.iter().enumerate() {
            validate_token(&format!("defaults.caller_claims[{idx}]"), key)?;
        }
        validate_delimiter("defaults.scope_delimiter", self.scope_delimiter)
    }

    /// Returns the trimmed claim keys with optional scope overrides applied.
    fn claim_keys(&self, scope_claim: Option<&str>, scope_delimiter: Option<char>) -> ClaimKeys {
        ClaimKeys {
            owner: self.owner_claim.trim().to_string(),
            caller: self.caller_claims.iter().map(|key| key.trim().to_string()).collect(),
            role: self.role_claim.trim().to_string(),
            scope: ScopeClaim::new(
                scope_claim.unwrap_or(&self.scope_claim).trim(),
                scope_delimiter.unwrap_or(self.scope_delimiter),
            ),
        }
    }
}

/// Named policy configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PolicyConfig {
    /// Scope the caller must hold.
    #[serde(default)]
    pub required_scope: String,
    /// Per-policy override of `defaults.require_explicit_scope`.
    #[serde(default)]
    pub require_explicit_scope: Option<bool>,
    /// Role label that admits callers failing the scope check.
    #[serde(default)]
    pub required_role: Option<String>,
    /// Owner identity source for the self-edit bypass.
    #[serde(default)]
    pub owner: Option<OwnerSourceConfig>,
    /// Allow callers to act on their own resource.
    #[serde(default)]
    pub user_edit_allowed: bool,
    /// Per-policy scope claim key override.
    #[serde(default)]
    pub scope_claim: Option<String>,
    /// Per-policy scope delimiter override.
    #[serde(default)]
    pub scope_delimiter: Option<char>,
}

impl PolicyConfig {
    /// Validates the policy against the shared defaults.
    fn validate(&self, defaults: &ClaimDefaults) -> Result<(), String> {
        self.to_policy(defaults).map(|_| ())
    }

    /// Converts the entry into a runtime policy.
    fn to_policy(&self, defaults: &ClaimDefaults) -> Result<Policy, String> {
        let explicit = self.require_explicit_scope.unwrap_or(defaults.require_explicit_scope);
        let delimiter = self.scope_delimiter.unwrap_or(defaults.scope_delimiter);
        let scope = self.required_scope.trim();
        if scope.is_empty() && explicit {
            return Err(
                "required_scope must be set when require_explicit_scope is true".to_string()
            );
        }
        if scope.len() > MAX_TOKEN_LENGTH {
            return Err("required_scope exceeds max length".to_string());
        }
        if scope.contains(delimiter) || scope.contains(char::is_whitespace) {
            return Err("required_scope must be a single scope".to_string());
        }
        if let Some(key) = &self.scope_claim {
            validate_token("scope_claim", key).map_err(|err| err.to_string())?;
        }
        if let Some(delimiter) = self.scope_delimiter {
            validate_delimiter("scope_delimiter", delimiter).map_err(|err| err.to_string())?;
        }
        let required_role = self
            .required_role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()
            .map_err(|err| format!("required_role: {err}"))?;
        let owner_rule = self.owner.as_ref().map(OwnerSourceConfig::validate).transpose()?;
        if self.user_edit_allowed && owner_rule.is_none() {
            return Err("user_edit_allowed requires an owner source".to_string());
        }

        Ok(Policy {
            required_scope: scope.to_string(),
            require_explicit_scope: explicit,
            required_role,
            owner_rule,
            user_edit_allowed: self.user_edit_allowed,
            claim_keys: defaults.claim_keys(self.scope_claim.as_deref(), self.scope_delimiter),
        })
    }
}

/// Owner identity source selection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum OwnerSourceConfig {
    /// Path template parameter.
    PathParameter {
        /// Parameter name.
        name: String,
    },
    /// Query string parameter.
    QueryParameter {
        /// Parameter name.
        name: String,
    },
    /// Authorizer claim.
    Claim {
        /// Claim key.
        name: String,
    },
}

impl OwnerSourceConfig {
    /// Validates the source and converts it into an owner rule.
    fn validate(&self) -> Result<OwnerRule, String> {
        let (field, name) = match self {
            Self::PathParameter {
                name,
            }
            | Self::QueryParameter {
                name,
            }
            | Self::Claim {
                name,
            } => ("owner.name", name),
        };
        validate_token(field, name).map_err(|err| err.to_string())?;
        let name = name.trim().to_string();
        Ok(match self {
            Self::PathParameter {
                ..
            } => OwnerRule::PathParameter(name),
            Self::QueryParameter {
                ..
            } => OwnerRule::QueryParameter(name),
            Self::Claim {
                ..
            } => OwnerRule::Claim(name),
        })
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves the config path from the caller or environment defaults.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a policy name.
fn validate_policy_name(name: &str) -> Result<(), ConfigError> {
    if name.trim().is_empty() {
        return Err(ConfigError::Invalid("policy name must be non-empty".to_string()));
    }
    if name.len() > MAX_POLICY_NAME_LENGTH {
        return Err(ConfigError::Invalid("policy name exceeds max length".to_string()));
    }
    Ok(())
}

/// Validates a claim key or parameter name.
fn validate_token(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOKEN_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

/// Validates a scope delimiter.
fn validate_delimiter(field: &str, delimiter: char) -> Result<(), ConfigError> {
    if delimiter.is_alphanumeric() || (delimiter.is_control() && delimiter != '\t') {
        return Err(ConfigError::Invalid(format!(
            "{field} must be a punctuation or whitespace character"
        )));
    }
    Ok(())
}

/// Default owner claim key.
fn default_owner_claim() -> String {
    OWNER_CLAIM.to_string()
}

/// Default caller identity claim keys.
fn default_caller_claims() -> Vec<String> {
    vec![PRINCIPAL_CLAIM.to_string(), SUBJECT_CLAIM.to_string()]
}

/// Default role claim key.
fn default_role_claim() -> String {
    ROLE_CLAIM.to_string()
}

/// Default scope claim key.
fn default_scope_claim() -> String {
    SCOPE_CLAIM.to_string()
}

/// Default scope delimiter.
const fn default_scope_delimiter() -> char {
    DEFAULT_SCOPE_DELIMITER
}

/// Default to treating an empty required scope as a misconfiguration.
const fn default_require_explicit_scope() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
