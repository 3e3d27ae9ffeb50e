use anyhow::Context;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub api_base: String,
    /// Name of the environment variable holding the Gemini credential.
    pub api_key_env: String,
    /// Transport timeout. None leaves reqwest's default (no timeout).
    pub timeout_secs: Option<u64>,
    pub artifacts_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".into(),
            api_base: "https://generativelanguage.googleapis.com".into(),
            api_key_env: "GEMINI_API_KEY".into(),
            timeout_secs: None,
            artifacts_dir: ".lesson-plan".into(),
        }
    }
}

impl Config {
    /// Defaults, overridden by whatever fields the TOML file sets.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_path_gives_defaults() {
        let cfg = Config::load(None).unwrap();
        assert_eq!(cfg.model, "gemini-2.5-flash");
        assert_eq!(cfg.api_key_env, "GEMINI_API_KEY");
        assert!(cfg.timeout_secs.is_none());
    }

    #[test]
    fn partial_file_overrides_only_given_fields() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "model = \"gemini-2.5-pro\"\ntimeout_secs = 90").unwrap();
        let cfg = Config::load(Some(f.path())).unwrap();
        assert_eq!(cfg.model, "gemini-2.5-pro");
        assert_eq!(cfg.timeout_secs, Some(90));
        assert_eq!(cfg.api_base, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "model = [").unwrap();
        assert!(Config::load(Some(f.path())).is_err());
    }

    #[test]
    fn stale_schema_version_key_is_ignored() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "schema_version = \"2025-10-01\"\nartifacts_dir = \"out\"").unwrap();
        let cfg = Config::load(Some(f.path())).unwrap();
        assert_eq!(cfg.artifacts_dir, "out");
        assert_eq!(cfg.model, "gemini-2.5-flash");
    }
}
