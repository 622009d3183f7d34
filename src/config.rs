use crate::domain::BumpRule;
use crate::error::{BumperError, Result};
use crate::scheme::preset::{self, CUSTOM};
use crate::scheme::{CompiledScheme, SchemeGrammar};
use crate::source::VersionFileRef;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "bumper.toml";

/// Represents the complete configuration for bumper.
///
/// Contains the version scheme, where the version lives, which other files mirror it, and the
/// rules deciding how it changes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// A preset name, or `custom` to use `scheme_definition`
    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme_definition: Option<String>,

    #[serde(default = "default_version_file")]
    pub version_file: VersionFileRef,

    /// Extra files whose version literal is rewritten along with the version file
    #[serde(default)]
    pub files: Vec<VersionFileRef>,

    #[serde(default)]
    pub rules: Vec<BumpRule>,
}

fn default_scheme() -> String {
    "semantic".to_string()
}

fn default_version_file() -> VersionFileRef {
    VersionFileRef::new("VERSION")
}

impl Default for Config {
    fn default() -> Self {
        Config {
            scheme: default_scheme(),
            scheme_definition: None,
            version_file: default_version_file(),
            files: Vec::new(),
            rules: Vec::new(),
        }
    }
}

impl Config {
    /// Resolve the scheme definition string, following presets.
    ///
    /// # Errors
    /// [`BumperError::Config`] for an unknown preset, or `custom` without a definition.
    pub fn scheme_definition(&self) -> Result<&str> {
        if self.scheme == CUSTOM {
            return self.scheme_definition.as_deref().ok_or_else(|| {
                BumperError::config("scheme 'custom' requires a scheme_definition")
            });
        }

        preset::preset_definition(&self.scheme).ok_or_else(|| {
            let known: Vec<&str> = preset::preset_names().collect();
            BumperError::config(format!(
                "Unknown scheme '{}', expected one of: {}, {}",
                self.scheme,
                known.join(", "),
                CUSTOM
            ))
        })
    }

    /// Check that the scheme compiles and every rule names fields the scheme has
    pub fn validate(&self) -> Result<()> {
        let compiled = CompiledScheme::compile(self.scheme_definition()?)?;
        self.validate_rules(compiled.grammar())
    }

    /// Check that every rule names fields `grammar` has
    pub fn validate_rules(&self, grammar: &SchemeGrammar) -> Result<()> {
        for rule in &self.rules {
            if let Some(field) = rule.field_names().find(|field| grammar.field(field).is_none()) {
                return Err(BumperError::unknown_field(field, grammar.raw()));
            }
        }
        Ok(())
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Locates the configuration file to use, if any.
///
/// Looks in the following order:
/// 1. Custom path provided as parameter
/// 2. `bumper.toml` in current directory
/// 3. `bumper/bumper.toml` in user config directory
pub fn find_config_file(config_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = config_path {
        return Some(PathBuf::from(path));
    }

    let local = Path::new(".").join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("bumper").join(CONFIG_FILE_NAME))
        .filter(|path| path.exists())
}

/// Loads configuration from file or returns defaults.
///
/// See [`find_config_file`] for the search order. When no file is found the default
/// configuration is used.
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let Some(path) = find_config_file(config_path) else {
        debug!("no configuration file found, using defaults");
        return Ok(Config::default());
    };

    load_config_from(&path)
}

/// Loads configuration from the file at `path`
pub fn load_config_from(path: &Path) -> Result<Config> {
    debug!(path = %path.display(), "loading configuration");
    let content = fs::read_to_string(path).map_err(|source| BumperError::UnreadableSource {
        path: path.display().to_string(),
        source,
    })?;
    Config::from_toml(&content)
}
