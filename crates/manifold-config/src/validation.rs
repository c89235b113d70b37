//! Schema validation for build configuration.
//!
//! Validation is schema-only: no filesystem checks, so it works for
//! staged/in-memory projects as well as on-disk ones.

use std::collections::HashSet;

use crate::config::BuildConfig;
use crate::error::{ConfigError, Result};

/// Validate a configuration against the schema rules.
pub fn validate_schema(config: &BuildConfig) -> Result<()> {
    if config.targets.is_empty() {
        return Err(ConfigError::NoTargets);
    }

    let mut seen = HashSet::new();
    for target in &config.targets {
        if !seen.insert(target.id.as_str()) {
            return Err(ConfigError::DuplicateTarget(target.id.clone()));
        }
    }

    for external in &config.external {
        if external.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "external specifiers cannot be empty".to_string(),
                hint: Some("Remove empty strings from the 'external' array".to_string()),
            });
        }
    }

    for extension in config
        .extensions
        .before
        .iter()
        .chain(config.extensions.after.iter())
    {
        if extension.name.trim().is_empty() {
            return Err(ConfigError::SchemaValidation {
                message: "extension stage names cannot be empty".to_string(),
                hint: Some("Give every extension stage a non-empty name".to_string()),
            });
        }
    }

    for target in &config.targets {
        target.validate()?;
    }

    Ok(())
}
