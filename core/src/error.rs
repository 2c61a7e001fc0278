//! Error types shared across the arena simulation core.

use std::fmt;

use thiserror::Error;

/// A map configuration failed one or more acceptance checks.
///
/// Carries every violation found, not just the first, so a host can report
/// a complete list to whoever authored the map.
#[derive(Debug, Error)]
pub struct ConfigError(pub Vec<String>);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "map configuration failed validation:")?;
        for (index, reason) in self.0.iter().enumerate() {
            writeln!(f, "  {}. {reason}", index + 1)?;
        }
        Ok(())
    }
}
