use crate::mask::{DEFAULT_SPECIAL_CHARACTERS, Grammar, Mask, MaskError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("mask token name {0:?} must be exactly one character")]
    TokenName(String),
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
    #[error(transparent)]
    Mask(#[from] MaskError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub mask: String,
    pub placeholder: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub special_characters: Option<Vec<char>>,
}

impl Preset {
    fn new(mask: &str, placeholder: &str) -> Self {
        Self {
            mask: mask.to_string(),
            placeholder: placeholder.to_string(),
            special_characters: None,
        }
    }

    fn with_special(mut self, special: &[char]) -> Self {
        self.special_characters = Some(special.to_vec());
        self
    }
}

/// Mask settings shared by every field the host creates.
///
/// Loaded files are layered over the built-in defaults: a file's
/// `special_characters` replaces the default set, while `tokens` and
/// `presets` are merged by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub special_characters: Vec<char>,
    pub tokens: IndexMap<String, String>,
    pub presets: IndexMap<String, Preset>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    special_characters: Option<Vec<char>>,
    tokens: IndexMap<String, String>,
    presets: IndexMap<String, Preset>,
}

impl Default for Config {
    fn default() -> Self {
        let mut tokens = IndexMap::new();
        tokens.insert("h".to_string(), "[0-9a-fA-F]".to_string());

        let mut presets = IndexMap::new();
        presets.insert("date".to_string(), Preset::new("99/99/9999", "dd/mm/yyyy"));
        presets.insert(
            "time".to_string(),
            Preset::new("99:99", "hh:mm").with_special(&[':']),
        );
        presets.insert(
            "phone".to_string(),
            Preset::new("(999) 999-9999", "(___) ___-____"),
        );
        presets.insert("zip".to_string(), Preset::new("99999", "_____"));
        presets.insert("plate".to_string(), Preset::new("aaa-9999", "___-____"));
        presets.insert(
            "mac".to_string(),
            Preset::new("hh:hh:hh:hh:hh:hh", "__:__:__:__:__:__").with_special(&[':']),
        );

        Self {
            special_characters: DEFAULT_SPECIAL_CHARACTERS.to_vec(),
            tokens,
            presets,
        }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(text.as_str())?;
        log::debug!(
            "loaded config {} with {} presets",
            path.display(),
            config.presets.len()
        );
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = serde_yaml::from_str(text)?;
        let mut config = Self::default();
        if let Some(special) = file.special_characters {
            config.special_characters = special;
        }
        config.tokens.extend(file.tokens);
        config.presets.extend(file.presets);
        Ok(config)
    }

    pub fn grammar(&self) -> Result<Grammar, ConfigError> {
        let mut grammar = Grammar::new();
        for (name, pattern) in &self.tokens {
            let mut chars = name.chars();
            let (Some(token), None) = (chars.next(), chars.next()) else {
                return Err(ConfigError::TokenName(name.clone()));
            };
            grammar.add_token(token, pattern.as_str())?;
        }
        Ok(grammar)
    }

    pub fn preset(&self, name: &str) -> Result<&Preset, ConfigError> {
        self.presets
            .get(name)
            .ok_or_else(|| ConfigError::UnknownPreset(name.to_string()))
    }

    pub fn preset_names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    pub fn build_preset(&self, name: &str) -> Result<Mask, ConfigError> {
        let preset = self.preset(name)?;
        self.build_mask(
            preset.mask.as_str(),
            preset.placeholder.as_str(),
            preset.special_characters.as_deref(),
        )
    }

    /// Builds a mask with this config's tokens. `special` overrides the
    /// configured special-character set when given.
    pub fn build_mask(
        &self,
        mask: &str,
        placeholder: &str,
        special: Option<&[char]>,
    ) -> Result<Mask, ConfigError> {
        let special = special
            .map(<[char]>::to_vec)
            .unwrap_or_else(|| self.special_characters.clone());
        let mask = Mask::with_options(mask, placeholder, special, self.grammar()?)?;
        Ok(mask)
    }
}
