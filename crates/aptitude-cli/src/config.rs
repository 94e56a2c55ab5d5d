//! Configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level aptitude configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AptitudeConfig {
    /// Directory holding the session, answers and result records.
    #[serde(default = "default_state_dir")]
    pub state_dir: PathBuf,
    /// Where exported documents are written.
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
    /// Name used when intake is submitted blank.
    #[serde(default = "default_display_name")]
    pub default_display_name: String,
    /// Custom question bank; the built-in bank is used when unset.
    #[serde(default)]
    pub question_bank: Option<PathBuf>,
    /// Command that receives share text on stdin.
    #[serde(default)]
    pub share_command: Option<String>,
    /// Link appended to text copied by the clipboard fallback.
    #[serde(default)]
    pub share_url: Option<String>,
}

fn default_state_dir() -> PathBuf {
    PathBuf::from(".aptitude")
}
fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_display_name() -> String {
    aptitude_core::lifecycle::DEFAULT_DISPLAY_NAME.to_string()
}

impl Default for AptitudeConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
            export_dir: default_export_dir(),
            default_display_name: default_display_name(),
            question_bank: None,
            share_command: None,
            share_url: None,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + end];
        result.push_str(&rest[..start]);
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

fn resolve_path(p: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&p.to_string_lossy()))
}

impl AptitudeConfig {
    fn resolve_env(mut self) -> Self {
        self.state_dir = resolve_path(&self.state_dir);
        self.export_dir = resolve_path(&self.export_dir);
        self.default_display_name = resolve_env_vars(&self.default_display_name);
        self.question_bank = self.question_bank.as_deref().map(resolve_path);
        self.share_command = self.share_command.as_deref().map(resolve_env_vars);
        self.share_url = self.share_url.as_deref().map(resolve_env_vars);
        self
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. `aptitude.toml` in the current directory
/// 2. `~/.config/aptitude/config.toml`
///
/// `APTITUDE_STATE_DIR` overrides the state directory from the file.
pub fn load_config_from(path: Option<&Path>) -> Result<AptitudeConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("aptitude.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<AptitudeConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "config loaded");
            config
        }
        None => AptitudeConfig::default(),
    };

    if let Ok(dir) = std::env::var("APTITUDE_STATE_DIR") {
        if !dir.trim().is_empty() {
            config.state_dir = PathBuf::from(dir);
        }
    }

    Ok(config.resolve_env())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("aptitude"))
}

/// Starter config written by `aptitude init`.
pub const SAMPLE_CONFIG: &str = r#"# aptitude configuration

# Where the session, answers and result records live.
state_dir = ".aptitude"

# Where `aptitude export` writes report documents.
export_dir = "."

# Name used when no name is given at intake.
default_display_name = "Baby"

# Use a custom question bank instead of the built-in one.
# question_bank = "question-bank.toml"

# Command that receives the share text on stdin, e.g. "wl-copy" or "pbcopy".
# share_command = "wl-copy"

# Link appended to copied share text.
# share_url = "https://example.org/aptitude"
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_APTITUDE_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_APTITUDE_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_APTITUDE_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no vars"), "no vars");
        assert_eq!(resolve_env_vars("open ${_APTITUDE_TEST_VAR"), "open ${_APTITUDE_TEST_VAR");
        std::env::remove_var("_APTITUDE_TEST_VAR");
    }

    #[test]
    fn resolved_values_are_not_expanded_again() {
        std::env::set_var("_APTITUDE_SELF_REF", "${_APTITUDE_SELF_REF}");
        assert_eq!(
            resolve_env_vars("a/${_APTITUDE_SELF_REF}/b"),
            "a/${_APTITUDE_SELF_REF}/b"
        );
        std::env::remove_var("_APTITUDE_SELF_REF");
    }

    #[test]
    fn default_config() {
        let config = AptitudeConfig::default();
        assert_eq!(config.state_dir, PathBuf::from(".aptitude"));
        assert_eq!(config.default_display_name, "Baby");
        assert!(config.question_bank.is_none());
    }

    #[test]
    fn sample_config_parses_to_defaults() {
        let config: AptitudeConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, AptitudeConfig::default());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/aptitude.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "default_display_name = \"Kiddo\"\nshare_command = \"cat\"\n",
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.default_display_name, "Kiddo");
        assert_eq!(config.share_command.as_deref(), Some("cat"));
    }
}
