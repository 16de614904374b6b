//! @ai:module:intent Configuration structs for check-run publishing
//! @ai:module:layer infrastructure
//! @ai:module:public_api CheckrunConfig, ApiConfig, ReportConfig
//! @ai:module:stateless true

use serde::{Deserialize, Serialize};
use std::path::Path;

/// @ai:intent Main configuration loaded from `checkrun.toml`
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckrunConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// @ai:intent Remote API configuration
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_api_version")]
    pub api_version: String,
}

/// @ai:intent Naming of the published check run
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_tool_name")]
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            api_version: default_api_version(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            tool_name: default_tool_name(),
            title: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_user_agent() -> String {
    "checkrun".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_api_version() -> String {
    "2022-11-28".to_string()
}

fn default_tool_name() -> String {
    "checkrun".to_string()
}

impl ReportConfig {
    /// @ai:intent Title for a given tool, falling back to `{tool} results`
    /// @ai:effects pure
    pub fn title_for(&self, tool_name: &str) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| format!("{} results", tool_name))
    }
}

impl CheckrunConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Load from a file when it exists, otherwise use defaults
    /// @ai:effects fs:read
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: CheckrunConfig = toml::from_str(
            r#"
            [report]
            tool_name = "Markdown lint"
            "#,
        )
        .unwrap();

        assert_eq!(config.report.tool_name, "Markdown lint");
        assert_eq!(config.api.base_url, "https://api.github.com");
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_title_fallback() {
        let report = ReportConfig::default();
        assert_eq!(report.title_for("Lint"), "Lint results");

        let report = ReportConfig {
            title: Some("Docs checks".to_string()),
            ..Default::default()
        };
        assert_eq!(report.title_for("Lint"), "Docs checks");
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("checkrun.toml");

        let mut config = CheckrunConfig::default();
        config.api.user_agent = "docs-ci".to_string();
        config.save(&path).unwrap();

        let loaded = CheckrunConfig::load(&path).unwrap();
        assert_eq!(loaded.api.user_agent, "docs-ci");
    }

    #[test]
    fn test_load_or_default_without_file() {
        let dir = TempDir::new().unwrap();
        let config = CheckrunConfig::load_or_default(&dir.path().join("missing.toml")).unwrap();
        assert_eq!(config.report.tool_name, "checkrun");
    }
}
