use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails at startup if a numeric variable cannot be parsed.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Where the fitted TF-IDF model is loaded from and saved to. Unset keeps it in memory only.
    pub model_path: Option<PathBuf>,
    pub max_features: usize,
    pub upload_limit_bytes: usize,
    /// Parent directory for per-session scratch dirs. Defaults to the system temp dir.
    pub scratch_dir: Option<PathBuf>,
    pub extra_skills: Vec<String>,
}

pub const DEFAULT_MAX_FEATURES: usize = 8000;
const DEFAULT_UPLOAD_LIMIT_BYTES: usize = 25 * 1024 * 1024;

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            model_path: optional_env("MODEL_PATH").map(PathBuf::from),
            max_features: parse_env("MAX_FEATURES", DEFAULT_MAX_FEATURES)?,
            upload_limit_bytes: parse_env("UPLOAD_LIMIT_BYTES", DEFAULT_UPLOAD_LIMIT_BYTES)?,
            scratch_dir: optional_env("SCRATCH_DIR").map(PathBuf::from),
            extra_skills: optional_env("EXTRA_SKILLS")
                .map(|raw| parse_skill_list(&raw))
                .unwrap_or_default(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            model_path: None,
            max_features: DEFAULT_MAX_FEATURES,
            upload_limit_bytes: DEFAULT_UPLOAD_LIMIT_BYTES,
            scratch_dir: None,
            extra_skills: Vec::new(),
        }
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env(key: &str, default: usize) -> Result<usize> {
    match optional_env(key) {
        Some(raw) => raw
            .trim()
            .parse::<usize>()
            .with_context(|| format!("{key} must be a non-negative integer, got '{raw}'")),
        None => Ok(default),
    }
}

fn parse_skill_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skill_list_is_trimmed_and_lowercased() {
        assert_eq!(
            parse_skill_list(" Rust, Go ,,TypeScript "),
            vec!["rust", "go", "typescript"]
        );
    }

    #[test]
    fn test_default_caps_vocabulary_at_8000() {
        assert_eq!(Config::default().max_features, 8000);
        assert!(Config::default().model_path.is_none());
    }
}
