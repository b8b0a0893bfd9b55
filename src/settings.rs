//! Engine configuration.

use std::{path::Path, str::FromStr};

use anyhow::Context;

use crate::foundation::{
    core::Rgba8Premul,
    error::{StillwallError, StillwallResult},
};

/// How the vertical paging offset is derived from offset-changed input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum YOffsetMode {
    /// The supplied y offset drives vertical panning.
    #[default]
    Independent,
    /// The x offset is reused for y; the supplied y offset is ignored.
    MirrorX,
}

impl FromStr for YOffsetMode {
    type Err = StillwallError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "independent" => Ok(Self::Independent),
            "mirror-x" => Ok(Self::MirrorX),
            other => Err(StillwallError::validation(format!(
                "unknown y offset mode '{other}' (expected 'independent' or 'mirror-x')"
            ))),
        }
    }
}

/// Settings for a [`crate::RenderEngine`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    /// Straight-alpha RGBA8 color the frame is cleared to before the image is drawn.
    pub clear_rgba: [u8; 4],
    /// Vertical offset policy.
    pub y_offset_mode: YOffsetMode,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            clear_rgba: [0, 0, 0, 255],
            y_offset_mode: YOffsetMode::default(),
        }
    }
}

impl EngineSettings {
    /// Parse and validate JSON settings. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> StillwallResult<Self> {
        let settings: Self =
            serde_json::from_str(s).map_err(|e| StillwallError::serde(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings JSON from `path`.
    pub fn from_path(path: &Path) -> StillwallResult<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read settings '{}'", path.display()))?;
        Self::from_json_str(&s)
    }

    /// Apply `STILLWALL_Y_OFFSET_MODE` and `STILLWALL_CLEAR_RGBA` from the process environment.
    pub fn with_env_overrides(self) -> StillwallResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> StillwallResult<Self> {
        if let Some(v) = lookup("STILLWALL_Y_OFFSET_MODE") {
            self.y_offset_mode = v.parse()?;
        }
        if let Some(v) = lookup("STILLWALL_CLEAR_RGBA") {
            self.clear_rgba = parse_rgba(&v)?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Reject settings the renderer cannot honor.
    pub fn validate(&self) -> StillwallResult<()> {
        if self.clear_rgba[3] != 255 {
            return Err(StillwallError::validation("clear_rgba must be opaque"));
        }
        Ok(())
    }

    /// Clear color in premultiplied form.
    pub fn clear_color(&self) -> Rgba8Premul {
        let [r, g, b, a] = self.clear_rgba;
        Rgba8Premul::from_straight_rgba(r, g, b, a)
    }
}

fn parse_rgba(s: &str) -> StillwallResult<[u8; 4]> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| StillwallError::validation(format!("invalid rgba '{s}': {e}")))?;
    <[u8; 4]>::try_from(parts).map_err(|_| {
        StillwallError::validation(format!("invalid rgba '{s}': expected four components"))
    })
}

#[cfg(test)]
#[path = "../tests/unit/settings.rs"]
mod tests;
