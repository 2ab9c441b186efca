// ── Service version gate ──
//
// vDirect reports versions like "4.10.0 build 77" or "4.11-SNAPSHOT". Only
// the dotted numeric prefix matters; it is compared component-wise as
// integers so that 3.4 < 3.40.

use std::fmt;

use crate::error::CoreError;

/// Oldest vDirect release the integration layer talks to.
pub const MIN_SUPPORTED_VERSION: &str = "3.40";

/// A parsed vDirect version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceVersion {
    raw: String,
    components: Vec<u32>,
}

impl ServiceVersion {
    /// Parse a raw version string, discarding any qualifier after the first
    /// `-` or space.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let token = numeric_token(raw);
        let components = token
            .split('.')
            .map(str::parse::<u32>)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CoreError::Service {
                message: format!("error getting vDirect version from '{raw}': {e}"),
                status: None,
                body: None,
            })?;

        Ok(Self {
            raw: raw.to_owned(),
            components,
        })
    }

    /// The version string as reported by the server.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Numeric components, e.g. `[3, 41]`.
    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// `true` when this version is at least `minimum`.
    pub fn meets(&self, minimum: &ServiceVersion) -> bool {
        self.components >= minimum.components
    }
}

impl fmt::Display for ServiceVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.components.iter().map(u32::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

/// The dotted numeric prefix of a raw version string.
pub fn numeric_token(raw: &str) -> &str {
    let raw = raw.trim();
    raw.find(['-', ' ']).map_or(raw, |idx| &raw[..idx])
}
