//! core/scaling.rs — Runtime vs constraint count, in log-log space.
//!
//! Each (hash family, proving phase) pair becomes one line of
//! `(log2 constraints, log10 runtime)` points sorted by constraint count.

use serde::{Deserialize, Serialize};

use crate::core::error::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Setup,
    Prove,
    Verify,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Setup, Phase::Prove, Phase::Verify];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Prove => "prove",
            Phase::Verify => "verify",
        }
    }
}

/// One benchmark row: circuit size and the runtime of each phase (seconds).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalingRecord {
    pub name: String,
    pub constraints: f64,
    pub setup: f64,
    pub prove: f64,
    pub verify: f64,
}

impl ScalingRecord {
    #[inline]
    pub fn runtime(&self, phase: Phase) -> f64 {
        match phase {
            Phase::Setup => self.setup,
            Phase::Prove => self.prove,
            Phase::Verify => self.verify,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScalingLine {
    pub name: String,
    pub phase: Phase,
    pub points: Vec<(f64, f64)>,
}

fn positive_log(value: f64, log: fn(f64) -> f64) -> Result<f64, DomainError> {
    if !value.is_finite() {
        return Err(DomainError::NotFinite);
    }
    if value <= 0.0 {
        return Err(DomainError::NonPositive(value));
    }
    Ok(log(value))
}

/// Lines ordered by first appearance of each family, then by phase.
pub fn scaling_lines(records: &[ScalingRecord]) -> Result<Vec<ScalingLine>, DomainError> {
    let mut names: Vec<&str> = Vec::new();
    for r in records {
        if !names.contains(&r.name.as_str()) {
            names.push(&r.name);
        }
    }

    let mut lines = Vec::with_capacity(names.len() * Phase::ALL.len());
    for name in names {
        for phase in Phase::ALL {
            let mut points = Vec::new();
            for r in records.iter().filter(|r| r.name == name) {
                let x = positive_log(r.constraints, f64::log2)?;
                let y = positive_log(r.runtime(phase), f64::log10)?;
                points.push((x, y));
            }
            points.sort_by(|a, b| a.0.total_cmp(&b.0));
            lines.push(ScalingLine {
                name: name.to_string(),
                phase,
                points,
            });
        }
    }
    Ok(lines)
}
