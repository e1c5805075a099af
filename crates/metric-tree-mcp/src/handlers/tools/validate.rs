//! Validation trait for tool request DTOs.
//!
//! Used by `Handlers::parse_request` so every handler parses and validates
//! its arguments the same way.

/// DTOs whose `validate()` checks ranges and required fields after serde
/// has filled in defaults.
pub(crate) trait Validate {
    fn validate(&self) -> Result<(), String>;
}
