//! Risk tiering and recommendations.
//!
//! One `TierPolicy` is shared by the batch report and the interactive scorer,
//! so a given score always lands in the same tier:
//!
//! - `score > low_floor` → LOW
//! - `medium_floor < score <= low_floor` → MEDIUM
//! - `score <= medium_floor` → HIGH

use serde::Serialize;

use crate::error::AppError;

/// Score bands for the three risk tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierPolicy {
    /// Scores strictly above this are LOW risk.
    pub low_floor: f64,
    /// Scores strictly above this (and not LOW) are MEDIUM risk.
    pub medium_floor: f64,
}

impl Default for TierPolicy {
    fn default() -> Self {
        Self {
            low_floor: 70.0,
            medium_floor: 50.0,
        }
    }
}

impl TierPolicy {
    pub fn validate(&self) -> Result<(), AppError> {
        if !(self.low_floor.is_finite() && self.medium_floor.is_finite()) {
            return Err(AppError::usage("Tier boundaries must be finite."));
        }
        if self.low_floor <= self.medium_floor {
            return Err(AppError::usage(format!(
                "Invalid tier boundaries: low floor {} must exceed medium floor {}.",
                self.low_floor, self.medium_floor
            )));
        }
        Ok(())
    }

    /// Band a score. Total: every input (NaN included) maps to one tier.
    pub fn tier(&self, score: f64) -> RiskTier {
        if score > self.low_floor {
            RiskTier::Low
        } else if score > self.medium_floor {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Low, RiskTier::Medium, RiskTier::High];

    /// Label used in the batch report ("Low Risk").
    pub fn display_name(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    /// Label used in the assessment printout ("LOW RISK").
    pub fn headline(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW RISK",
            RiskTier::Medium => "MEDIUM RISK",
            RiskTier::High => "HIGH RISK",
        }
    }

    pub fn recommendation(self) -> Recommendation {
        match self {
            RiskTier::Low => Recommendation::Approve,
            RiskTier::Medium => Recommendation::Review,
            RiskTier::High => Recommendation::Decline,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Approve,
    Review,
    Decline,
}

impl Recommendation {
    pub fn display_name(self) -> &'static str {
        match self {
            Recommendation::Approve => "APPROVE - Excellent creditworthiness",
            Recommendation::Review => "REVIEW - Consider with conditions",
            Recommendation::Decline => "DECLINE - High default probability",
        }
    }
}
