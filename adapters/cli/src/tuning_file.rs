//! Versioned TOML files overriding the default physics tuning.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use superfco_core::Tuning;
use thiserror::Error;

const SUPPORTED_TUNING_VERSION: u32 = 1;

/// Reasons a tuning document is rejected.
#[derive(Debug, Error)]
pub(crate) enum TuningError {
    /// The document is not valid TOML or has mistyped fields.
    #[error("failed to parse tuning toml")]
    Parse(#[from] toml::de::Error),
    /// The document declares a format version this build does not read.
    #[error("unsupported tuning version {found}; expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    /// A value parses but cannot drive the simulation.
    #[error("tuning field `{field}` {reason}")]
    InvalidValue {
        field: &'static str,
        reason: &'static str,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TuningDocument {
    version: u32,
    #[serde(default)]
    tuning: Tuning,
}

/// Reads and validates the tuning file at `path`.
pub(crate) fn load_tuning(path: &Path) -> Result<Tuning> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read tuning file {}", path.display()))?;
    parse_tuning(&contents)
        .with_context(|| format!("invalid tuning file {}", path.display()))
}

/// Parses a tuning document; omitted fields keep their defaults.
pub(crate) fn parse_tuning(contents: &str) -> Result<Tuning, TuningError> {
    let document: TuningDocument = toml::from_str(contents)?;
    if document.version != SUPPORTED_TUNING_VERSION {
        return Err(TuningError::UnsupportedVersion {
            found: document.version,
            expected: SUPPORTED_TUNING_VERSION,
        });
    }
    validate(&document.tuning)?;
    Ok(document.tuning)
}

fn validate(tuning: &Tuning) -> Result<(), TuningError> {
    let checks = [
        ("hmaxspeed", tuning.hmaxspeed >= 0.0, "must not be negative"),
        ("vmaxspeed", tuning.vmaxspeed >= 0.0, "must not be negative"),
        (
            "v_acceleration",
            tuning.v_acceleration > 0.0,
            "must be positive",
        ),
        ("v_jump", tuning.v_jump < 0.0, "must be negative (upward)"),
        (
            "water_drag",
            (0.0..=1.0).contains(&tuning.water_drag),
            "must lie within 0..=1",
        ),
        (
            "lateral_jump_divisor",
            tuning.lateral_jump_divisor > 0.0,
            "must be positive",
        ),
        (
            "cannonball_speed",
            tuning.cannonball_speed.is_finite(),
            "must be finite",
        ),
    ];

    match checks.into_iter().find(|(_, valid, _)| !valid) {
        Some((field, _, reason)) => Err(TuningError::InvalidValue { field, reason }),
        None => Ok(()),
    }
}
