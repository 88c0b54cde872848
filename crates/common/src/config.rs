//! Relay configuration, read once at startup
//!
//! Values come from a TOML file (path in [`CONFIG_ENV`], [`DEFAULT_CONFIG_PATH`]
//! otherwise), bot token may be overridden with [`TOKEN_ENV`].
use std::{fs, time::Duration};

use serde::Deserialize;

use crate::types::ResponderChat;

pub const CONFIG_ENV: &str = "RELAY_CONFIG";
pub const TOKEN_ENV: &str = "RELAY_BOT_TOKEN";
pub const DEFAULT_CONFIG_PATH: &str = "relay.toml";

const DEFAULT_SOURCE_LABEL: &str = "Source";
const DEFAULT_TARGET_LANG: &str = "ar";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("required config value `{0}` is empty")]
    Missing(&'static str),
    #[error("responder `{0}` is a bot, bots never see messages of other bots")]
    BotResponder(String),
    #[error("request timeout {request}s must be less than translation timeout {translation}s")]
    RequestTimeout { request: u64, translation: u64 },
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot_token: String,
    /// Usernames of channels allowed to be relayed
    #[serde(default)]
    pub sources: Vec<String>,
    /// Where relayed posts go: `@username` or numeric chat id
    #[serde(default)]
    pub destination: String,
    /// Chat shared with the translating peer: numeric chat id (a user who
    /// started the bot, a group) or `@username` of a public channel or
    /// supergroup
    #[serde(default)]
    pub responder: String,
    /// Informational only, the responder decides the language
    #[serde(default = "default_target_lang")]
    pub target_lang: String,
    /// Prefix of the attribution line
    #[serde(default = "default_source_label")]
    pub source_label: String,
    #[serde(default)]
    pub source_script: SourceScript,
    #[serde(default)]
    pub reply_matching: ReplyMatching,
    #[serde(default)]
    pub text_only_albums: TextOnlyAlbums,
    /// Chat for mirroring error logs
    pub log_chat_id: Option<i64>,
    #[serde(default)]
    pub timeouts: Timeouts,
}

impl Config {
    /// Load from file and env, then validate
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        log::debug!("reading config from {path}");

        let mut config = Self::from_file(&path)?;
        if let Ok(token) = std::env::var(TOKEN_ENV) {
            if !token.is_empty() {
                config.bot_token = token;
            }
        }
        config.validate()?;
        Ok(config)
    }
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&raw)
    }
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(raw)?;
        config.sources = config.sources.iter().map(|s| normalize_username(s)).collect();
        config.responder = normalize_username(&config.responder);
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_token.is_empty() {
            return Err(ConfigError::Missing("bot_token"));
        }
        if self.destination.is_empty() {
            return Err(ConfigError::Missing("destination"));
        }
        if self.responder.is_empty() {
            return Err(ConfigError::Missing("responder"));
        }
        if self.sources.iter().all(|s| s.is_empty()) {
            return Err(ConfigError::Missing("sources"));
        }
        if ResponderChat::parse(&self.responder).is_bot() {
            return Err(ConfigError::BotResponder(self.responder.clone()));
        }
        let Timeouts {
            request_secs,
            translation_secs,
            ..
        } = self.timeouts;
        if request_secs >= translation_secs {
            return Err(ConfigError::RequestTimeout {
                request: request_secs,
                translation: translation_secs,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub translation_secs: u64,
    pub album_debounce_ms: u64,
    /// Timeout for a single request to telegram
    pub request_secs: u64,
}

impl Timeouts {
    pub fn translation(&self) -> Duration {
        Duration::from_secs(self.translation_secs)
    }
    pub fn album_debounce(&self) -> Duration {
        Duration::from_millis(self.album_debounce_ms)
    }
    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            translation_secs: 15,
            album_debounce_ms: 2000,
            request_secs: 10,
        }
    }
}

/// Script of texts which need translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceScript {
    #[default]
    Hebrew,
    Arabic,
    Cyrillic,
}

/// How responder replies are paired with pending requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyMatching {
    /// Reply settles the oldest pending request
    #[default]
    Fifo,
    /// Reply settles the request whose token is on its first line, the
    /// oldest one if no token matches
    PreferToken,
}

/// What to do with an album without any media
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextOnlyAlbums {
    #[default]
    Drop,
    Publish,
}

/// `@Name` -> `name`
pub fn normalize_username(s: &str) -> String {
    s.trim().trim_start_matches('@').to_lowercase()
}

fn default_source_label() -> String {
    DEFAULT_SOURCE_LABEL.to_string()
}

fn default_target_lang() -> String {
    DEFAULT_TARGET_LANG.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_defaults() -> Result<(), ConfigError> {
        let config = Config::parse(
            r#"
            bot_token = "123:abc"
            sources = ["@NewsChannel", "other"]
            destination = "@dest"
            responder = "@Translations"
            "#,
        )?;
        config.validate()?;

        assert_eq!(config.sources, ["newschannel", "other"]);
        assert_eq!(config.responder, "translations");
        assert_eq!(config.source_label, DEFAULT_SOURCE_LABEL);
        assert_eq!(config.source_script, SourceScript::Hebrew);
        assert_eq!(config.reply_matching, ReplyMatching::Fifo);
        assert_eq!(config.text_only_albums, TextOnlyAlbums::Drop);
        assert_eq!(config.timeouts.translation(), Duration::from_secs(15));
        assert_eq!(config.timeouts.album_debounce(), Duration::from_secs(2));
        assert!(config.log_chat_id.is_none());
        Ok(())
    }

    #[test]
    fn test_parse_overrides() -> Result<(), ConfigError> {
        let config = Config::parse(
            r#"
            bot_token = "t"
            sources = ["a"]
            destination = "-1001"
            responder = "r"
            reply_matching = "prefer_token"
            text_only_albums = "publish"
            source_script = "cyrillic"
            log_chat_id = 42

            [timeouts]
            translation_secs = 5
            album_debounce_ms = 500
            "#,
        )?;

        assert_eq!(config.reply_matching, ReplyMatching::PreferToken);
        assert_eq!(config.text_only_albums, TextOnlyAlbums::Publish);
        assert_eq!(config.source_script, SourceScript::Cyrillic);
        assert_eq!(config.log_chat_id, Some(42));
        assert_eq!(config.timeouts.translation(), Duration::from_secs(5));
        assert_eq!(config.timeouts.album_debounce(), Duration::from_millis(500));
        // not overridden
        assert_eq!(config.timeouts.request(), Duration::from_secs(10));
        Ok(())
    }

    #[test]
    fn test_validate_missing() -> Result<(), ConfigError> {
        let table = [
            (r#"sources = ["a"]
                destination = "d"
                responder = "r""#, "bot_token"),
            (r#"bot_token = "t"
                sources = ["a"]
                responder = "r""#, "destination"),
            (r#"bot_token = "t"
                sources = ["a"]
                destination = "d""#, "responder"),
            (r#"bot_token = "t"
                destination = "d"
                responder = "r""#, "sources"),
        ];
        for (i, (raw, field)) in table.iter().enumerate() {
            match Config::parse(raw)?.validate() {
                Err(ConfigError::Missing(f)) => assert_eq!(&f, field, "test table[{i}]"),
                res => panic!("test table[{i}]: expected missing {field}, got {res:?}"),
            }
        }
        Ok(())
    }

    #[test]
    fn test_validate_responder() -> Result<(), ConfigError> {
        let base = r#"
            bot_token = "t"
            sources = ["a"]
            destination = "d"
        "#;
        for responder in ["-1001234", "42", "@translations"] {
            let config = Config::parse(&format!("{base}responder = \"{responder}\""))?;
            config.validate()?;
        }

        let config = Config::parse(&format!("{base}responder = \"@TranslatorBot\""))?;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BotResponder(r)) if r == "translatorbot"
        ));
        Ok(())
    }

    #[test]
    fn test_validate_request_timeout() -> Result<(), ConfigError> {
        let config = Config::parse(
            r#"
            bot_token = "t"
            sources = ["a"]
            destination = "d"
            responder = "-1001"

            [timeouts]
            translation_secs = 15
            request_secs = 20
            "#,
        )?;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RequestTimeout {
                request: 20,
                translation: 15
            })
        ));
        Ok(())
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            Config::parse("sources = "),
            Err(ConfigError::Parse(_))
        ));
    }
}
