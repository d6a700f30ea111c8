//! Runtime settings loaded from environment variables and `.env`

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::models::DEFAULT_TITLE;

/// Dotenv file read by `Settings::load`, relative to the working directory
pub const ENV_FILE: &str = ".env";

pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const DEFAULT_OLLAMA_MODEL: &str = "exaone3.5:2.4b";
pub const DEFAULT_OLLAMA_ENDPOINT: &str = "http://localhost:11434";

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub pipeline: PipelineSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Provider name (anthropic, ollama)
    pub provider: String,
    /// API key for cloud providers
    pub api_key: String,
    /// Model name; empty means provider default
    pub model: String,
    /// Endpoint override; empty means provider default
    pub endpoint: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Per-request timeout
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineSettings {
    /// Record skipped malformed JSON lines in `errors`
    pub strict_parsing: bool,
    /// Directory with `<stage>.txt` prompt overrides
    pub prompts_dir: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OutputSettings {
    pub output_dir: PathBuf,
    pub default_title: String,
    /// Fall back to the bundled sample transcript when input is missing
    pub use_sample_on_error: bool,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: "anthropic".to_string(),
            api_key: String::new(),
            model: String::new(),
            endpoint: String::new(),
            temperature: 0.2,
            max_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./output"),
            default_title: DEFAULT_TITLE.to_string(),
            use_sample_on_error: true,
        }
    }
}

impl Settings {
    /// Load settings from the process environment and `./.env`
    pub fn load() -> Result<Self> {
        Self::from_env_file(Path::new(ENV_FILE))
    }

    /// Load settings from the process environment only
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings from the process environment, falling back to the
    /// variables in a dotenv file
    ///
    /// A missing file is not an error. The process environment wins over the
    /// file, and the process environment itself is never modified.
    pub fn from_env_file(path: &Path) -> Result<Self> {
        Self::from_lookup_and_file(|key: &str| std::env::var(key).ok(), path)
    }

    fn from_lookup_and_file<F>(lookup: F, path: &Path) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = read_env_file(path)?;
        Self::from_lookup(move |key: &str| lookup(key).or_else(|| file_vars.get(key).cloned()))
    }

    /// Load settings through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut settings = Self::default();

        if let Some(provider) = get("MINUTES_LLM_PROVIDER") {
            settings.llm.provider = provider.to_lowercase();
        }
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            settings.llm.api_key = key;
        }
        if let Some(model) = get("MINUTES_LLM_MODEL") {
            settings.llm.model = model;
        }
        if let Some(endpoint) = get("MINUTES_LLM_ENDPOINT") {
            settings.llm.endpoint = endpoint;
        }
        if let Some(value) = get("MINUTES_LLM_TEMPERATURE") {
            settings.llm.temperature = parse_value("MINUTES_LLM_TEMPERATURE", &value)?;
        }
        if let Some(value) = get("MINUTES_LLM_MAX_TOKENS") {
            settings.llm.max_tokens = parse_value("MINUTES_LLM_MAX_TOKENS", &value)?;
        }
        if let Some(value) = get("MINUTES_LLM_TIMEOUT_SECS") {
            settings.llm.timeout_secs = parse_value("MINUTES_LLM_TIMEOUT_SECS", &value)?;
        }

        if let Some(value) = get("MINUTES_STRICT_PARSING") {
            settings.pipeline.strict_parsing = parse_flag("MINUTES_STRICT_PARSING", &value)?;
        }
        if let Some(dir) = get("MINUTES_PROMPTS_DIR") {
            settings.pipeline.prompts_dir = Some(PathBuf::from(dir));
        }

        if let Some(dir) = get("MINUTES_OUTPUT_DIR") {
            settings.output.output_dir = PathBuf::from(dir);
        }
        if let Some(title) = get("MINUTES_DEFAULT_TITLE") {
            settings.output.default_title = title;
        }
        if let Some(value) = get("MINUTES_USE_SAMPLE_ON_ERROR") {
            settings.output.use_sample_on_error =
                parse_flag("MINUTES_USE_SAMPLE_ON_ERROR", &value)?;
        }

        Ok(settings)
    }

    /// Create the output directory if it does not exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.output.output_dir).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                self.output.output_dir.display()
            )
        })
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    match dotenvy::from_path_iter(path) {
        Ok(entries) => entries
            .map(|entry| entry.with_context(|| format!("Invalid entry in {}", path.display())))
            .collect(),
        Err(e) if e.not_found() => Ok(HashMap::new()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .parse()
        .with_context(|| format!("Invalid value for {}: '{}'", key, value))
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => anyhow::bail!("Invalid value for {}: '{}' (expected true/false)", key, value),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.llm.provider, "anthropic");
        assert_eq!(settings.llm.temperature, 0.2);
        assert_eq!(settings.llm.max_tokens, 2048);
        assert!(!settings.pipeline.strict_parsing);
        assert!(settings.output.use_sample_on_error);
        assert_eq!(settings.output.default_title, "Meeting Minutes");
    }

    #[test]
    fn test_overrides_from_environment() {
        let settings = Settings::from_lookup(lookup(&[
            ("MINUTES_LLM_PROVIDER", "Ollama"),
            ("MINUTES_LLM_TEMPERATURE", "0.7"),
            ("MINUTES_STRICT_PARSING", "yes"),
            ("MINUTES_USE_SAMPLE_ON_ERROR", "off"),
            ("MINUTES_PROMPTS_DIR", "/tmp/prompts"),
        ]))
        .unwrap();

        assert_eq!(settings.llm.provider, "ollama");
        assert_eq!(settings.llm.temperature, 0.7);
        assert!(settings.pipeline.strict_parsing);
        assert!(!settings.output.use_sample_on_error);
        assert_eq!(
            settings.pipeline.prompts_dir,
            Some(PathBuf::from("/tmp/prompts"))
        );
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let settings =
            Settings::from_lookup(lookup(&[("ANTHROPIC_API_KEY", "   ")])).unwrap();
        assert!(settings.llm.api_key.is_empty());
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = Settings::from_lookup(lookup(&[("MINUTES_LLM_MAX_TOKENS", "lots")]))
            .unwrap_err()
            .to_string();
        assert!(err.contains("MINUTES_LLM_MAX_TOKENS"));
    }

    #[test]
    fn test_env_file_fills_unset_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# local overrides\nMINUTES_DEFAULT_TITLE=\"Weekly Sync\"\nMINUTES_LLM_MAX_TOKENS=1024\nMINUTES_LLM_PROVIDER=ollama\n",
        )
        .unwrap();

        let settings =
            Settings::from_lookup_and_file(lookup(&[("MINUTES_LLM_PROVIDER", "anthropic")]), &path)
                .unwrap();

        assert_eq!(settings.output.default_title, "Weekly Sync");
        assert_eq!(settings.llm.max_tokens, 1024);
        // Real environment wins over the file
        assert_eq!(settings.llm.provider, "anthropic");
    }

    #[test]
    fn test_missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let settings =
            Settings::from_lookup_and_file(lookup(&[]), &dir.path().join(".env")).unwrap();
        assert_eq!(settings.output.default_title, "Meeting Minutes");
    }

    #[test]
    fn test_invalid_value_in_env_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "MINUTES_LLM_TEMPERATURE=warm\n").unwrap();

        assert!(Settings::from_lookup_and_file(lookup(&[]), &path).is_err());
    }

    #[test]
    fn test_invalid_flag_is_an_error() {
        assert!(Settings::from_lookup(lookup(&[("MINUTES_STRICT_PARSING", "maybe")])).is_err());
    }
}
