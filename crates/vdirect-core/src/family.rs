// ── Device families ──
//
// Closed set of appliance families vDirect manages. Each family decides
// its REST path segment and how template execution reports a change.

use std::str::FromStr;

use serde::Serialize;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::error::CoreError;

/// A category of managed appliance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, EnumIter, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    #[default]
    Alteon,
    DefensePro,
    AppWall,
}

/// How template execution determines whether the device changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDetection {
    /// Compare configuration diff snapshots taken before and after.
    Diff,
    /// No diff support: any non-check-mode execution counts as a change.
    Assumed,
    /// Template execution is not available for this family.
    Unsupported,
}

impl DeviceFamily {
    /// Parse a user-supplied device type.
    pub fn parse(value: &str) -> Result<Self, CoreError> {
        Self::from_str(value).map_err(|_| CoreError::Configuration {
            message: format!(
                "unknown device type '{value}' (expected one of: {})",
                Self::iter().map(|f| f.to_string()).collect::<Vec<_>>().join(", ")
            ),
        })
    }

    /// Path segment of the family's device endpoints.
    pub fn api_segment(self) -> &'static str {
        match self {
            Self::Alteon => "adc",
            Self::DefensePro => "defensePro",
            Self::AppWall => "appWall",
        }
    }

    pub fn change_detection(self) -> ChangeDetection {
        match self {
            Self::Alteon => ChangeDetection::Diff,
            Self::DefensePro => ChangeDetection::Assumed,
            Self::AppWall => ChangeDetection::Unsupported,
        }
    }

    pub fn supports_diff(self) -> bool {
        self.change_detection() == ChangeDetection::Diff
    }
}
