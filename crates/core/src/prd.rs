//! PRD domain vocabulary: feature priorities and reference content types.
//!
//! Both are stored as lowercase text columns guarded by CHECK constraints in
//! the migrations; the lists here must match those constraints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Priority assigned to a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl FeaturePriority {
    pub const ALL: [FeaturePriority; 4] = [
        FeaturePriority::Low,
        FeaturePriority::Medium,
        FeaturePriority::High,
        FeaturePriority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeaturePriority::Low => "low",
            FeaturePriority::Medium => "medium",
            FeaturePriority::High => "high",
            FeaturePriority::Critical => "critical",
        }
    }
}

impl fmt::Display for FeaturePriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeaturePriority {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid priority '{s}'. Expected one of: low, medium, high, critical"
                ))
            })
    }
}

/// What kind of material a project reference holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceContentType {
    MeetingNotes,
    RequirementDoc,
    SampleApp,
    SimilarApp,
    Other,
}

impl ReferenceContentType {
    pub const ALL: [ReferenceContentType; 5] = [
        ReferenceContentType::MeetingNotes,
        ReferenceContentType::RequirementDoc,
        ReferenceContentType::SampleApp,
        ReferenceContentType::SimilarApp,
        ReferenceContentType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReferenceContentType::MeetingNotes => "meeting_notes",
            ReferenceContentType::RequirementDoc => "requirement_doc",
            ReferenceContentType::SampleApp => "sample_app",
            ReferenceContentType::SimilarApp => "similar_app",
            ReferenceContentType::Other => "other",
        }
    }
}

impl fmt::Display for ReferenceContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReferenceContentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| {
                let allowed: Vec<&str> = Self::ALL.iter().map(|c| c.as_str()).collect();
                CoreError::Validation(format!(
                    "Invalid content_type '{s}'. Expected one of: {}",
                    allowed.join(", ")
                ))
            })
    }
}

/// Validate a feature's estimate. Estimates are hours and may be fractional
/// but never negative or non-finite.
pub fn validate_estimate_hours(hours: f64) -> Result<(), CoreError> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(CoreError::Validation(format!(
            "estimate_hours must be a non-negative number, got {hours}"
        )));
    }
    Ok(())
}

/// Return `Some(trimmed)` only when the value carries non-whitespace text.
///
/// Partial updates skip blank fields instead of overwriting stored values
/// with empty strings.
pub fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
