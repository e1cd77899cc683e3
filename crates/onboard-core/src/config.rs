use crate::error::{OnboardError, Result};
use crate::paths;
use crate::theme::UiSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support_email: Option<String>,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    pub app: AppConfig,
    #[serde(default)]
    pub ui: UiSettings,
}

fn default_version() -> u32 {
    1
}

impl Config {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            version: 1,
            app: AppConfig {
                name: app_name.into(),
                support_email: None,
            },
            ui: UiSettings::default(),
        }
    }

    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(OnboardError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.app.name.trim().is_empty() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "app.name is empty".to_string(),
            });
        }

        match &self.app.support_email {
            None => warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "app.support_email is not set; homebuyers will see no contact address"
                    .to_string(),
            }),
            Some(email) => {
                if paths::validate_email(email).is_err() {
                    warnings.push(ConfigWarning {
                        level: WarnLevel::Error,
                        message: format!("app.support_email '{email}' is not a valid address"),
                    });
                }
            }
        }

        if let Err(e) = self.ui.theme.validate() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!("ui.theme: {e}"),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Appearance;
    use tempfile::TempDir;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::new("acme-homes");
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.app.name, "acme-homes");
        assert_eq!(parsed.version, 1);
        assert_eq!(parsed.ui, UiSettings::default());
    }

    #[test]
    fn minimal_yaml_uses_defaults() {
        let cfg: Config = serde_yaml::from_str("app:\n  name: demo\n").unwrap();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.ui.appearance, Appearance::System);
    }

    #[test]
    fn load_without_init_fails() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(OnboardError::NotInitialized)
        ));
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::new("demo");
        cfg.ui.appearance = Appearance::Dark;
        cfg.save(dir.path()).unwrap();
        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.ui.appearance, Appearance::Dark);
    }

    #[test]
    fn validate_flags_missing_support_email() {
        let warnings = Config::new("demo").validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }

    #[test]
    fn validate_flags_bad_theme_as_error() {
        let mut cfg = Config::new("demo");
        cfg.app.support_email = Some("help@example.com".to_string());
        cfg.ui.theme.primary = "blue".to_string();
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].level, WarnLevel::Error);
        assert!(warnings[0].message.contains("primary"));
    }
}
