//! Configuration system for the `wut` tool.
//!
//! Values come from `~/.config/wut/config` (INI) first and environment
//! variables second. A missing or malformed file is never an error: the
//! resolver simply falls back to the environment, and every failure to find
//! a usable provider collapses into "no active provider".

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::ini::Ini;
use crate::providers::{
    ProviderCredentials, ProviderKind, DEFAULT_ANTHROPIC_MODEL, DEFAULT_OPENAI_MODEL,
};

/// Default bound on a provider request, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Snapshot of the process environment
///
/// Empty variables are treated as unset.
#[derive(Debug, Clone, Default)]
pub struct EnvSnapshot {
    vars: HashMap<String, String>,
}

impl EnvSnapshot {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        std::env::vars().collect()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Outcome of reading the config file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Parsed(Ini),
    Absent,
    /// Unreadable or malformed; resolution behaves as if it were absent
    Malformed { reason: String },
}

impl ConfigSource {
    fn ini(&self) -> Option<&Ini> {
        match self {
            ConfigSource::Parsed(ini) => Some(ini),
            ConfigSource::Absent | ConfigSource::Malformed { .. } => None,
        }
    }
}

/// How the active provider was (or was not) chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderSelection {
    /// Named by `[general] provider` with credentials present
    Explicit(ProviderKind),
    /// First provider with credentials, in priority order
    AutoDetected(ProviderKind),
    /// Named explicitly but its required field is empty
    ExplicitMissingCredentials {
        kind: ProviderKind,
        field: &'static str,
    },
    None,
}

impl ProviderSelection {
    pub fn active(&self) -> Option<ProviderKind> {
        match self {
            ProviderSelection::Explicit(kind) | ProviderSelection::AutoDetected(kind) => {
                Some(*kind)
            }
            ProviderSelection::ExplicitMissingCredentials { .. } | ProviderSelection::None => None,
        }
    }
}

/// Runtime settings from the `[general]` section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralSettings {
    /// Provider request timeout in seconds
    pub timeout_secs: u64,
    /// Extra scrollback lines to capture above the visible pane
    pub history_lines: usize,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            history_lines: 0,
        }
    }
}

/// Everything resolved for one invocation
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub providers: BTreeMap<ProviderKind, ProviderCredentials>,
    pub selection: ProviderSelection,
    pub general: GeneralSettings,
}

impl ResolvedConfig {
    /// Credentials of the active provider, if one was selected
    pub fn active_credentials(&self) -> Option<&ProviderCredentials> {
        self.selection
            .active()
            .and_then(|kind| self.providers.get(&kind))
    }
}

/// Layered configuration: config file first, environment second
#[derive(Debug, Clone)]
pub struct WutConfig {
    source: ConfigSource,
    env: EnvSnapshot,
}

impl WutConfig {
    /// Load the per-user config file together with the process environment
    pub fn load() -> Self {
        let env = EnvSnapshot::from_process();
        match Self::config_path() {
            Some(path) => Self::load_from_path(&path, env),
            None => Self::new(ConfigSource::Absent, env),
        }
    }

    /// Load config from a specific path
    pub fn load_from_path(path: &Path, env: EnvSnapshot) -> Self {
        Self::new(read_source(path), env)
    }

    pub fn new(source: ConfigSource, env: EnvSnapshot) -> Self {
        if let ConfigSource::Malformed { reason } = &source {
            tracing::warn!(%reason, "ignoring malformed config file");
        }
        Self { source, env }
    }

    /// Get the config file path (~/.config/wut/config)
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("wut").join("config"))
    }

    pub fn source(&self) -> &ConfigSource {
        &self.source
    }

    pub fn env(&self) -> &EnvSnapshot {
        &self.env
    }

    /// Non-empty file value, then `{SECTION}_{KEY}`, then `fallback`
    pub fn get(&self, section: &str, key: &str, fallback: Option<&str>) -> Option<String> {
        let from_file = self
            .source
            .ini()
            .and_then(|ini| ini.get(section, key))
            .filter(|v| !v.is_empty());
        if let Some(value) = from_file {
            return Some(value.to_string());
        }

        let env_var = format!("{}_{}", section.to_uppercase(), key.to_uppercase());
        self.env
            .get(&env_var)
            .or(fallback)
            .map(str::to_string)
    }

    /// `get()` with no default, then the provider-native variables in order
    fn get_or_env(&self, section: &str, key: &str, native: &[&str]) -> Option<String> {
        self.get(section, key, None).or_else(|| {
            native
                .iter()
                .find_map(|name| self.env.get(name))
                .map(str::to_string)
        })
    }

    /// Credentials for every supported provider
    pub fn provider_config(&self) -> BTreeMap<ProviderKind, ProviderCredentials> {
        ProviderKind::ALL
            .iter()
            .map(|kind| (*kind, self.credentials_for(*kind)))
            .collect()
    }

    fn credentials_for(&self, kind: ProviderKind) -> ProviderCredentials {
        match kind {
            ProviderKind::OpenAI => ProviderCredentials::OpenAI {
                api_key: self.get_or_env("openai", "api_key", &["OPENAI_API_KEY"]),
                model: self
                    .get_or_env("openai", "model", &["OPENAI_MODEL"])
                    .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                base_url: self.get_or_env("openai", "base_url", &["OPENAI_BASE_URL"]),
            },
            ProviderKind::Anthropic => ProviderCredentials::Anthropic {
                api_key: self.get_or_env("anthropic", "api_key", &["ANTHROPIC_API_KEY"]),
                model: self
                    .get("anthropic", "model", Some(DEFAULT_ANTHROPIC_MODEL))
                    .unwrap_or_else(|| DEFAULT_ANTHROPIC_MODEL.to_string()),
                base_url: self.get("anthropic", "base_url", None),
            },
            ProviderKind::Ollama => ProviderCredentials::Ollama {
                model: self.get_or_env("ollama", "model", &["OLLAMA_MODEL"]),
                base_url: self.get_or_env("ollama", "base_url", &["OLLAMA_HOST"]),
            },
        }
    }

    /// Raw `[general] provider` from the file; the environment is not consulted
    pub fn explicit_provider(&self) -> Option<&str> {
        self.source.ini().and_then(|ini| ini.get("general", "provider"))
    }

    /// Decide which provider this invocation uses
    pub fn selection(&self) -> ProviderSelection {
        let providers = self.provider_config();

        if let Some(name) = self.explicit_provider() {
            match name.parse::<ProviderKind>() {
                Ok(kind) => {
                    let creds = &providers[&kind];
                    return match creds.missing_field() {
                        None => ProviderSelection::Explicit(kind),
                        Some(field) => {
                            tracing::debug!(provider = %kind, field, "explicit provider lacks credentials");
                            ProviderSelection::ExplicitMissingCredentials { kind, field }
                        }
                    };
                }
                Err(_) => {
                    tracing::debug!(provider = name, "ignoring unsupported provider setting");
                }
            }
        }

        // Priority: OpenAI > Anthropic > Ollama
        ProviderKind::ALL
            .iter()
            .find(|kind| providers[*kind].is_complete())
            .map(|kind| ProviderSelection::AutoDetected(*kind))
            .unwrap_or(ProviderSelection::None)
    }

    pub fn active_provider(&self) -> Option<ProviderKind> {
        self.selection().active()
    }

    pub fn has_valid_config(&self) -> bool {
        self.active_provider().is_some()
    }

    /// `[general]` runtime settings
    pub fn general(&self) -> GeneralSettings {
        let defaults = GeneralSettings::default();
        GeneralSettings {
            timeout_secs: self
                .parse_number("general", "timeout")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.timeout_secs),
            history_lines: self
                .parse_number("general", "history_lines")
                .unwrap_or(defaults.history_lines),
        }
    }

    fn parse_number<T: std::str::FromStr>(&self, section: &str, key: &str) -> Option<T> {
        let raw = self.get(section, key, None)?;
        match raw.trim().parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(section, key, value = %raw, "not a number, using default");
                None
            }
        }
    }

    /// Resolve everything once for the pipeline
    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            providers: self.provider_config(),
            selection: self.selection(),
            general: self.general(),
        }
    }
}

fn read_source(path: &Path) -> ConfigSource {
    if !path.exists() {
        return ConfigSource::Absent;
    }

    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            return ConfigSource::Malformed {
                reason: format!("{}: {}", path.display(), err),
            }
        }
    };

    match Ini::parse(&contents) {
        Ok(ini) => ConfigSource::Parsed(ini),
        Err(err) => ConfigSource::Malformed {
            reason: format!("{}: {}", path.display(), err),
        },
    }
}

/// Generate the default config file as an INI string
pub fn generate_default_config() -> String {
    r#"# wut configuration
# Place this file at ~/.config/wut/config

[general]
# Force a provider: openai, anthropic or ollama.
# Leave unset to use the first one with credentials (openai > anthropic > ollama).
# provider = anthropic

# Seconds to wait for the provider before giving up (default: 120)
# timeout = 120

# Extra scrollback lines to capture above the visible pane (default: 0)
# history_lines = 0

[openai]
api_key =
model = gpt-4o
# base_url = https://api.openai.com/v1

[anthropic]
api_key =
model = claude-3-5-sonnet-20241022

[ollama]
# model = llama3
# base_url = http://localhost:11434

# Every key can also come from the environment as SECTION_KEY, e.g.
# OPENAI_API_KEY, ANTHROPIC_API_KEY, OLLAMA_MODEL or GENERAL_TIMEOUT.
# Empty values in this file fall through to the environment.
"#
    .to_string()
}
