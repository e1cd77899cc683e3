use crate::error::{OnboardError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Appearance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appearance {
    Light,
    Dark,
    #[default]
    System,
}

impl Appearance {
    pub fn as_str(self) -> &'static str {
        match self {
            Appearance::Light => "light",
            Appearance::Dark => "dark",
            Appearance::System => "system",
        }
    }
}

impl fmt::Display for Appearance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Appearance {
    type Err = OnboardError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Appearance::Light),
            "dark" => Ok(Appearance::Dark),
            "system" => Ok(Appearance::System),
            _ => Err(OnboardError::InvalidAppearance(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_primary")]
    pub primary: String,
    #[serde(default = "default_secondary")]
    pub secondary: String,
    #[serde(default = "default_accent")]
    pub accent: String,
    #[serde(default = "default_background")]
    pub background: String,
    #[serde(default = "default_foreground")]
    pub foreground: String,
}

fn default_primary() -> String {
    "#1d4ed8".to_string()
}

fn default_secondary() -> String {
    "#64748b".to_string()
}

fn default_accent() -> String {
    "#f59e0b".to_string()
}

fn default_background() -> String {
    "#ffffff".to_string()
}

fn default_foreground() -> String {
    "#0f172a".to_string()
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary: default_primary(),
            secondary: default_secondary(),
            accent: default_accent(),
            background: default_background(),
            foreground: default_foreground(),
        }
    }
}

static HEX_RE: OnceLock<Regex> = OnceLock::new();

fn hex_re() -> &'static Regex {
    HEX_RE.get_or_init(|| {
        Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color regex is valid")
    })
}

impl Theme {
    fn named_colors(&self) -> [(&'static str, &str); 5] {
        [
            ("primary", &self.primary),
            ("secondary", &self.secondary),
            ("accent", &self.accent),
            ("background", &self.background),
            ("foreground", &self.foreground),
        ]
    }

    /// First invalid color wins; colors must be `#rgb` or `#rrggbb`.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.named_colors() {
            if !hex_re().is_match(value) {
                return Err(OnboardError::InvalidColor {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Replace a single color by name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let slot = match name {
            "primary" => &mut self.primary,
            "secondary" => &mut self.secondary,
            "accent" => &mut self.accent,
            "background" => &mut self.background,
            "foreground" => &mut self.foreground,
            _ => {
                return Err(OnboardError::InvalidColor {
                    name: name.to_string(),
                    value,
                })
            }
        };
        if !hex_re().is_match(&value) {
            return Err(OnboardError::InvalidColor {
                name: name.to_string(),
                value,
            });
        }
        *slot = value.to_ascii_lowercase();
        Ok(())
    }

    /// Apply every color present in `patch`. Nothing changes if any of them
    /// is invalid.
    pub fn apply(&mut self, patch: ThemePatch) -> Result<()> {
        let mut next = self.clone();
        for (name, value) in patch.into_named() {
            if let Some(value) = value {
                next.set(name, value)?;
            }
        }
        *self = next;
        Ok(())
    }

    /// CSS custom properties in a stable order, e.g. `--color-primary`.
    pub fn css_variables(&self) -> Vec<(String, String)> {
        self.named_colors()
            .iter()
            .map(|(name, value)| (format!("--color-{name}"), value.to_string()))
            .collect()
    }
}

/// Partial theme update. Colors left out keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemePatch {
    #[serde(default)]
    pub primary: Option<String>,
    #[serde(default)]
    pub secondary: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub foreground: Option<String>,
}

impl ThemePatch {
    fn into_named(self) -> [(&'static str, Option<String>); 5] {
        [
            ("primary", self.primary),
            ("secondary", self.secondary),
            ("accent", self.accent),
            ("background", self.background),
            ("foreground", self.foreground),
        ]
    }
}

// ---------------------------------------------------------------------------
// UiSettings
// ---------------------------------------------------------------------------

/// Presentation settings handed to the rendering layer at startup.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UiSettings {
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub appearance: Appearance,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
