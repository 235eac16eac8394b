//! Configuration loading
//!
//! Files are read as TOML, JSON or YAML depending on their extension and
//! layered over typed defaults. Only the keys present in a file override the
//! base value, so partial files are fine.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::UtilError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
    Yaml,
}

impl ConfigFormat {
    /// Detect the format from a file extension
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            "yml" | "yaml" => Ok(Self::Yaml),
            _ => Err(UtilError::Config(format!(
                "Unsupported config format: '{extension}' ({})",
                path.display()
            ))),
        }
    }
}

/// Read a configuration file into an untyped JSON value
fn read_config_value(path: &Path) -> crate::Result<serde_json::Value> {
    let format = ConfigFormat::from_path(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        ConfigFormat::Toml => {
            let toml_value: toml::Value = toml::from_str(&content)
                .map_err(|e| UtilError::Config(format!("TOML parse error: {e}")))?;
            serde_json::to_value(toml_value)
                .map_err(|e| UtilError::Config(format!("TOML conversion error: {e}")))
        }
        ConfigFormat::Json => serde_json::from_str(&content)
            .map_err(|e| UtilError::Config(format!("JSON parse error: {e}"))),
        ConfigFormat::Yaml => serde_yaml::from_str(&content)
            .map_err(|e| UtilError::Config(format!("YAML parse error: {e}"))),
    }
}

/// Merge two JSON values (second overrides first, objects merge key by key)
fn merge_json_values(base: &mut serde_json::Value, override_value: serde_json::Value) {
    match (base, override_value) {
        (serde_json::Value::Object(base_obj), serde_json::Value::Object(override_obj)) => {
            for (key, value) in override_obj {
                match base_obj.get_mut(&key) {
                    Some(existing) => merge_json_values(existing, value),
                    None => {
                        base_obj.insert(key, value);
                    }
                }
            }
        }
        (base_value, override_value) => {
            *base_value = override_value;
        }
    }
}

fn merge_value_into<T>(base: &mut T, override_value: serde_json::Value) -> crate::Result<()>
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let mut base_value = serde_json::to_value(&*base)
        .map_err(|e| UtilError::Serialization(format!("Base serialization error: {e}")))?;

    merge_json_values(&mut base_value, override_value);

    *base = serde_json::from_value(base_value)
        .map_err(|e| UtilError::Config(format!("Invalid configuration: {e}")))?;

    Ok(())
}

/// Configuration builder layering files over defaults
#[derive(Debug)]
pub struct ConfigBuilder<T> {
    config: T,
}

impl<T> ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    /// Create new config builder with defaults
    pub fn new() -> Self {
        Self {
            config: T::default(),
        }
    }

    /// Layer the keys present in a file over the current values
    pub fn load_file(mut self, path: &Path) -> crate::Result<Self> {
        let file_value = read_config_value(path)?;
        merge_value_into(&mut self.config, file_value)?;
        Ok(self)
    }

    /// Like [`Self::load_file`], but a missing file is skipped
    pub fn load_optional_file(self, path: &Path) -> crate::Result<Self> {
        if path.exists() {
            self.load_file(path)
        } else {
            Ok(self)
        }
    }

    /// Finish building
    pub fn build(self) -> T {
        self.config
    }
}

impl<T> Default for ConfigBuilder<T>
where
    T: Default + Serialize + for<'de> Deserialize<'de>,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct TestConfig {
        endpoint: String,
        timeout_secs: Option<u64>,
        window: Window,
    }

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(default)]
    struct Window {
        debounce_ms: u64,
        enabled: bool,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                endpoint: "http://localhost:5000/analyze".to_string(),
                timeout_secs: Some(10),
                window: Window::default(),
            }
        }
    }

    impl Default for Window {
        fn default() -> Self {
            Self {
                debounce_ms: 400,
                enabled: true,
            }
        }
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")).unwrap(), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")).unwrap(), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")).unwrap(), ConfigFormat::Yaml);
        assert!(ConfigFormat::from_path(Path::new("a.ini")).is_err());
    }

    #[test]
    fn test_builder_loads_toml() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("locksmith.toml");

        std::fs::write(
            &config_path,
            r#"
endpoint = "http://analysis.internal:8080/analyze"

[window]
debounce_ms = 250
"#,
        )?;

        let config: TestConfig = ConfigBuilder::new().load_file(&config_path)?.build();

        assert_eq!(config.endpoint, "http://analysis.internal:8080/analyze");
        assert_eq!(config.window.debounce_ms, 250);
        assert!(config.window.enabled);

        Ok(())
    }

    #[test]
    fn test_builder_only_overrides_present_keys() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("partial.yaml");

        std::fs::write(&config_path, "window:\n  enabled: false\n")?;

        let config: TestConfig = ConfigBuilder::new().load_file(&config_path)?.build();

        assert_eq!(config.endpoint, TestConfig::default().endpoint);
        assert_eq!(config.window.debounce_ms, 400);
        assert!(!config.window.enabled);

        Ok(())
    }

    #[test]
    fn test_builder_skips_missing_optional_file() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let missing = temp_dir.path().join("absent.json");

        let config: TestConfig = ConfigBuilder::new().load_optional_file(&missing)?.build();
        assert_eq!(config, TestConfig::default());

        Ok(())
    }

    #[test]
    fn test_invalid_json_is_reported() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let config_path = temp_dir.path().join("broken.json");
        std::fs::write(&config_path, "{ not json")?;

        let result = ConfigBuilder::<TestConfig>::new().load_file(&config_path);
        assert!(matches!(result, Err(UtilError::Config(_))));

        Ok(())
    }

    #[test]
    fn test_later_file_wins_and_null_clears() -> crate::Result<()> {
        let temp_dir = tempdir()?;
        let first = temp_dir.path().join("base.toml");
        let second = temp_dir.path().join("local.json");
        std::fs::write(&first, "endpoint = \"http://first/analyze\"\n\n[window]\ndebounce_ms = 250\n")?;
        std::fs::write(
            &second,
            r#"{ "endpoint": "http://other/analyze", "timeout_secs": null, "window": { "enabled": false } }"#,
        )?;

        let config: TestConfig = ConfigBuilder::new()
            .load_file(&first)?
            .load_file(&second)?
            .build();

        assert_eq!(config.endpoint, "http://other/analyze");
        assert_eq!(config.timeout_secs, None);
        assert_eq!(config.window.debounce_ms, 250);
        assert!(!config.window.enabled);

        Ok(())
    }
}
