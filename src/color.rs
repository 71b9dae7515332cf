//! Palette quantization and the category rules that pick a palette per cell.

use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Background of cells that only exist to align week columns.
pub const TRANSPARENT: &str = "transparent";

pub const DEFAULT_IDLE: &str = "#0f141d";
pub const DEFAULT_TYPING: [&str; 4] = ["#1b2b45", "#1f4f7a", "#2f7ec2", "#46b2ff"];
pub const DEFAULT_ACTIVE: [&str; 4] = ["#12351f", "#1f5b2f", "#2f8740", "#3eb75a"];
pub const DEFAULT_CONTRIBUTION: [&str; 4] = ["#0e4429", "#006d32", "#26a641", "#39d353"];
pub const DEFAULT_CONTRIBUTION_EMPTY: &str = "#0f141d";

/// An ordered, non-empty list of colours, dimmest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette(Vec<String>);

/// Accepts `#rgb`, `#rrggbb` or a plain keyword such as `transparent`.
pub fn check_color(value: &str) -> Result<(), GridError> {
    let valid = match value.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.bytes().all(|b| b.is_ascii_hexdigit()),
        None => !value.is_empty() && value.bytes().all(|b| b.is_ascii_alphabetic()),
    };
    if valid {
        Ok(())
    } else {
        Err(GridError::InvalidColor(value.to_string()))
    }
}

impl Palette {
    pub fn new(colors: Vec<String>) -> Result<Self, GridError> {
        if colors.is_empty() {
            return Err(GridError::EmptyPalette);
        }
        for color in &colors {
            check_color(color)?;
        }
        Ok(Self(colors))
    }

    pub fn from_static(colors: &[&str]) -> Result<Self, GridError> {
        Self::new(colors.iter().map(|c| c.to_string()).collect())
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }

    pub fn first(&self) -> &str {
        &self.0[0]
    }

    pub fn last(&self) -> &str {
        &self.0[self.0.len() - 1]
    }

    /// Linear quantization of `value` against `max`.
    ///
    /// `max == 0` always yields the first colour and `value >= max` the
    /// last. In between the index is `floor(value / max * (len - 1))`.
    pub fn scale(&self, value: u64, max: u64) -> &str {
        if max == 0 {
            return self.first();
        }
        if value >= max {
            return self.last();
        }
        let ratio = value as f64 / max as f64;
        let top = self.0.len() - 1;
        let idx = ((ratio * top as f64).floor() as usize).min(top);
        &self.0[idx]
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = GridError;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.0
    }
}

/// Palettes for the three-category editor activity view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPalettes {
    pub typing: Palette,
    pub active: Palette,
    /// Idle has no intensity gradient.
    pub idle: String,
}

impl Default for ActivityPalettes {
    fn default() -> Self {
        Self {
            typing: Palette(DEFAULT_TYPING.iter().map(|c| c.to_string()).collect()),
            active: Palette(DEFAULT_ACTIVE.iter().map(|c| c.to_string()).collect()),
            idle: DEFAULT_IDLE.to_string(),
        }
    }
}

/// Palette for the single-category contribution view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionPalettes {
    pub levels: Palette,
    /// Used for zero-count days, distinct from `levels.first()`.
    pub empty: String,
}

impl Default for ContributionPalettes {
    fn default() -> Self {
        Self {
            levels: Palette(DEFAULT_CONTRIBUTION.iter().map(|c| c.to_string()).collect()),
            empty: DEFAULT_CONTRIBUTION_EMPTY.to_string(),
        }
    }
}

/// Picks typing, then active, then idle. Never blends categories.
#[derive(Debug, Clone, Copy)]
pub struct ActivityColorPolicy<'a> {
    palettes: &'a ActivityPalettes,
    max_typing: u64,
    max_active: u64,
}

impl<'a> ActivityColorPolicy<'a> {
    /// `max_typing`/`max_active` must be the maxima of the dataset being
    /// rendered, recomputed for every build.
    pub fn new(palettes: &'a ActivityPalettes, max_typing: u64, max_active: u64) -> Self {
        Self {
            palettes,
            max_typing,
            max_active,
        }
    }

    pub fn resolve(&self, typing: u64, active: u64) -> &'a str {
        if typing > 0 {
            self.palettes.typing.scale(typing, self.max_typing)
        } else if active > 0 {
            self.palettes.active.scale(active, self.max_active)
        } else {
            &self.palettes.idle
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ContributionColorPolicy<'a> {
    palettes: &'a ContributionPalettes,
    max_count: u64,
}

impl<'a> ContributionColorPolicy<'a> {
    pub fn new(palettes: &'a ContributionPalettes, max_count: u64) -> Self {
        Self {
            palettes,
            max_count,
        }
    }

    pub fn resolve(&self, count: u64) -> &'a str {
        if count == 0 {
            &self.palettes.empty
        } else {
            self.palettes.levels.scale(count, self.max_count)
        }
    }
}
