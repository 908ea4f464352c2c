//! Environment kinds and their risk/reward modifiers.
//!
//! Each set runs under one environment. The pressure calculators use the
//! fixed bonus multipliers below to project future earning potential; the
//! tournament additionally applies a configurable modifier table (fixed or
//! ranged random draws) to crash probabilities and success bonuses.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// The six environment kinds a set can run under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvironmentKind {
    Safe,
    Normal,
    Mild,
    Moderate,
    Volatile,
    Deadly,
}

impl EnvironmentKind {
    pub const ALL: [EnvironmentKind; 6] = [
        EnvironmentKind::Safe,
        EnvironmentKind::Normal,
        EnvironmentKind::Mild,
        EnvironmentKind::Moderate,
        EnvironmentKind::Volatile,
        EnvironmentKind::Deadly,
    ];

    /// Fixed bonus multiplier used by the pressure calculators when
    /// projecting maximum achievable scores across future sets.
    pub fn bonus_multiplier(&self) -> f64 {
        match self {
            EnvironmentKind::Safe => 0.75,
            EnvironmentKind::Normal => 0.90,
            EnvironmentKind::Mild => 1.10,
            EnvironmentKind::Moderate => 1.30,
            EnvironmentKind::Volatile => 1.20,
            EnvironmentKind::Deadly => 1.80,
        }
    }

    /// Survival-threat level used by the HP-purchase decision (0.1 safe to
    /// 1.0 deadly). Volatile reads as low threat here: its danger comes from
    /// variance, not a raised crash floor.
    pub fn threat_level(&self) -> f64 {
        match self {
            EnvironmentKind::Safe | EnvironmentKind::Volatile => 0.1,
            EnvironmentKind::Normal => 0.2,
            EnvironmentKind::Mild => 0.3,
            EnvironmentKind::Moderate => 0.6,
            EnvironmentKind::Deadly => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EnvironmentKind::Safe => "safe",
            EnvironmentKind::Normal => "normal",
            EnvironmentKind::Mild => "mild",
            EnvironmentKind::Moderate => "moderate",
            EnvironmentKind::Volatile => "volatile",
            EnvironmentKind::Deadly => "deadly",
        }
    }
}

impl fmt::Display for EnvironmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EnvironmentKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "safe" => Ok(EnvironmentKind::Safe),
            "normal" => Ok(EnvironmentKind::Normal),
            "mild" => Ok(EnvironmentKind::Mild),
            "moderate" => Ok(EnvironmentKind::Moderate),
            "volatile" => Ok(EnvironmentKind::Volatile),
            "deadly" => Ok(EnvironmentKind::Deadly),
            other => Err(crate::Error::ParseEnvironment {
                input: other.to_string(),
                expected: "safe, normal, mild, moderate, volatile, deadly".to_string(),
            }),
        }
    }
}

/// A gameplay multiplier that is either fixed or drawn uniformly from a range
/// at environment-shift time (volatile environments use ranges).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultiplierSpec {
    Fixed(f64),
    Range([f64; 2]),
}

impl MultiplierSpec {
    /// Resolve the multiplier, drawing from the range when applicable.
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            MultiplierSpec::Fixed(value) => value,
            MultiplierSpec::Range([low, high]) => rng.random_range(low..=high),
        }
    }
}

/// Risk/bonus modifier pair applied to the base crash/bonus tables while an
/// environment is active.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentModifier {
    pub risk_multiplier: MultiplierSpec,
    pub bonus_multiplier: MultiplierSpec,
}

impl EnvironmentModifier {
    /// Default modifier table mirroring the tournament rules: volatile draws
    /// its multipliers fresh every shift.
    pub fn default_for(kind: EnvironmentKind) -> Self {
        let (risk, bonus) = match kind {
            EnvironmentKind::Safe => (MultiplierSpec::Fixed(0.5), MultiplierSpec::Fixed(0.75)),
            EnvironmentKind::Normal => (MultiplierSpec::Fixed(1.0), MultiplierSpec::Fixed(0.90)),
            EnvironmentKind::Mild => (MultiplierSpec::Fixed(1.2), MultiplierSpec::Fixed(1.10)),
            EnvironmentKind::Moderate => (MultiplierSpec::Fixed(1.5), MultiplierSpec::Fixed(1.30)),
            EnvironmentKind::Volatile => (
                MultiplierSpec::Range([0.6, 1.8]),
                MultiplierSpec::Range([0.8, 1.6]),
            ),
            EnvironmentKind::Deadly => (MultiplierSpec::Fixed(2.0), MultiplierSpec::Fixed(1.80)),
        };
        EnvironmentModifier {
            risk_multiplier: risk,
            bonus_multiplier: bonus,
        }
    }
}
