//! Configuration management

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// Character limit used when the configured one is missing or unusable
pub const DEFAULT_CHAR_LIMIT: usize = 200;

/// Youdao text translation endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://openapi.youdao.com/api";

/// Youdao dictionary voice endpoint used when a speak URL fails
pub const DEFAULT_VOICE_ENDPOINT: &str = "http://dict.youdao.com/dictvoice";

/// Prefix of the environment variables that override the config file
const ENV_PREFIX: &str = "YOUDAO";

/// Config file looked up in the working directory when no path is given
const DEFAULT_CONFIG_NAME: &str = "youdao-translator";

/// Configuration for translator, resolved once per invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    pub app_key: String,
    pub app_secret: String,
    pub from_language: String,
    pub to_language: String,
    pub is_search_clipboard: bool,
    /// Kept raw so that garbage input falls back instead of failing the load
    pub max_char_limit: String,
    pub is_using_modern_web: bool,
    pub api_endpoint: String,
    pub voice_endpoint: String,
    pub timeout_ms: u64,
    /// Whitespace separated command printing the active selection
    pub selection_command: Option<String>,
    /// Whitespace separated command that plays an audio file given as last argument
    pub audio_player: Option<String>,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            app_secret: String::new(),
            from_language: "auto".to_string(),
            to_language: "auto".to_string(),
            is_search_clipboard: false,
            max_char_limit: DEFAULT_CHAR_LIMIT.to_string(),
            is_using_modern_web: false,
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            voice_endpoint: DEFAULT_VOICE_ENDPOINT.to_string(),
            timeout_ms: 30000,
            selection_command: None,
            audio_player: None,
        }
    }
}

impl TranslatorConfig {
    /// Load configuration: defaults, then a config file, then `YOUDAO_*` env vars
    ///
    /// An explicit `path` must exist; otherwise `youdao-translator.{toml,json}`
    /// in the working directory is used when present.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let config: Self = Config::builder()
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        debug!(
            "Loaded config: from={} to={} clipboard={} limit={}",
            config.from_language,
            config.to_language,
            config.is_search_clipboard,
            config.char_limit()
        );

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.app_key.is_empty() {
            return Err(anyhow::anyhow!("app_key is required (set YOUDAO_APP_KEY)"));
        }

        if self.app_secret.is_empty() {
            return Err(anyhow::anyhow!("app_secret is required (set YOUDAO_APP_SECRET)"));
        }

        if self.api_endpoint.is_empty() {
            return Err(anyhow::anyhow!("API endpoint is required"));
        }

        if self.timeout_ms == 0 {
            return Err(anyhow::anyhow!("timeout_ms must be greater than 0"));
        }

        Ok(())
    }

    /// Effective truncation limit; non-positive or non-numeric values become 200
    pub fn char_limit(&self) -> usize {
        parse_char_limit(&self.max_char_limit)
    }

    /// Command used to read the active selection, if any
    pub fn selection_argv(&self) -> Vec<String> {
        match &self.selection_command {
            Some(command) => split_command(command),
            None if cfg!(target_os = "linux") => split_command("xclip -o -selection primary"),
            None => Vec::new(),
        }
    }

    /// Command used to play downloaded audio
    pub fn player_argv(&self) -> Vec<String> {
        match &self.audio_player {
            Some(command) => split_command(command),
            None if cfg!(target_os = "macos") => split_command("afplay"),
            None => split_command("mpg123 -q"),
        }
    }
}

/// Parse a user supplied character limit
pub fn parse_char_limit(raw: &str) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(limit) if limit > 0 => limit as usize,
        _ => {
            if !raw.trim().is_empty() {
                warn!("Invalid max_char_limit {:?}, using {}", raw, DEFAULT_CHAR_LIMIT);
            }
            DEFAULT_CHAR_LIMIT
        }
    }
}

fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn valid_config() -> TranslatorConfig {
        TranslatorConfig {
            app_key: "key".to_string(),
            app_secret: "secret".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_config_validation_missing_key() {
        let config = TranslatorConfig {
            app_key: "".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_missing_secret() {
        let config = TranslatorConfig {
            app_secret: "".to_string(),
            ..valid_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_char_limit_fallback() {
        assert_eq!(parse_char_limit("500"), 500);
        assert_eq!(parse_char_limit(" 42 "), 42);
        assert_eq!(parse_char_limit("0"), DEFAULT_CHAR_LIMIT);
        assert_eq!(parse_char_limit("-5"), DEFAULT_CHAR_LIMIT);
        assert_eq!(parse_char_limit("lots"), DEFAULT_CHAR_LIMIT);
        assert_eq!(parse_char_limit(""), DEFAULT_CHAR_LIMIT);
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
app_key = "abc"
app_secret = "def"
to_language = "zh-CHS"
is_search_clipboard = true
max_char_limit = 50
"#
        )
        .unwrap();

        let config = TranslatorConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.app_key, "abc");
        assert_eq!(config.to_language, "zh-CHS");
        assert_eq!(config.from_language, "auto");
        assert!(config.is_search_clipboard);
        assert_eq!(config.char_limit(), 50);
        assert_eq!(config.api_endpoint, DEFAULT_API_ENDPOINT);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(TranslatorConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_custom_commands_are_split() {
        let config = TranslatorConfig {
            selection_command: Some("wl-paste --primary".to_string()),
            audio_player: Some("ffplay -nodisp -autoexit".to_string()),
            ..Default::default()
        };
        assert_eq!(config.selection_argv(), vec!["wl-paste", "--primary"]);
        assert_eq!(config.player_argv(), vec!["ffplay", "-nodisp", "-autoexit"]);
    }
}
