use anyhow::Context;
use folio_components::SavedDefaults;
use folio_editor::{ExportMode, SyncTiming, DEFAULT_DEBOUNCE_MS, DEFAULT_TYPING_RELEASE_MS};
use folio_theme::ThemeId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const DEFAULT_CONFIG_NAME: &str = "folio.config.json";

/// Folio configuration file format
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Theme id used when none is given on the command line
    #[serde(default = "default_theme")]
    pub theme: String,

    #[serde(default)]
    pub export_mode: ExportMode,

    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    #[serde(default = "default_typing_release_ms")]
    pub typing_release_ms: u64,

    /// JSON file holding the last-applied values per component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_defaults_path: Option<String>,
}

fn default_theme() -> String {
    "clean".to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_typing_release_ms() -> u64 {
    DEFAULT_TYPING_RELEASE_MS
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("reading {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("parsing {}", config_path.display()))?;
            debug!(path = %config_path.display(), "loaded config");
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    pub fn theme_id(&self) -> ThemeId {
        ThemeId::parse(&self.theme)
    }

    pub fn timing(&self) -> SyncTiming {
        SyncTiming::from_millis(self.debounce_ms, self.typing_release_ms)
    }

    pub fn saved_defaults_file(&self, cwd: &Path) -> Option<PathBuf> {
        self.saved_defaults_path.as_ref().map(|p| cwd.join(p))
    }

    /// Saved defaults from the configured file. Missing file means none.
    pub fn saved_defaults(&self, cwd: &Path) -> anyhow::Result<SavedDefaults> {
        let Some(path) = self.saved_defaults_file(cwd) else {
            return Ok(SavedDefaults::new());
        };
        if !path.exists() {
            return Ok(SavedDefaults::new());
        }
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?;
        Ok(SavedDefaults::from_json(&text)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            export_mode: ExportMode::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            typing_release_ms: DEFAULT_TYPING_RELEASE_MS,
            saved_defaults_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "theme": "warm",
            "exportMode": "ultra",
            "debounceMs": 100,
            "savedDefaultsPath": ".folio/defaults.json"
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.theme_id(), ThemeId::parse("warm"));
        assert_eq!(config.export_mode, ExportMode::Ultra);
        assert_eq!(config.timing(), SyncTiming::from_millis(100, DEFAULT_TYPING_RELEASE_MS));
        assert_eq!(
            config.saved_defaults_file(Path::new("/work")),
            Some(PathBuf::from("/work/.folio/defaults.json"))
        );
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.theme, "clean");
        assert_eq!(config.export_mode, ExportMode::Inline);
        assert_eq!(config.timing(), SyncTiming::default());
        assert_eq!(serde_json::from_str::<Config>("{}").unwrap(), config);
    }

    #[test]
    fn test_load_reads_saved_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "savedDefaultsPath": "defaults.json" }"#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("defaults.json"),
            r#"{ "titlebarH2": { "text": "Saved", "_v": "1" } }"#,
        )
        .unwrap();

        let config = Config::load(dir.path()).unwrap();
        let saved = config.saved_defaults(dir.path()).unwrap();
        assert_eq!(
            saved.get("titlebarH2").and_then(|v| v.get("text")).map(String::as_str),
            Some("Saved")
        );
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(dir.path()).unwrap(), Config::default());
    }
}
