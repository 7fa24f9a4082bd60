//! Lexis configuration file handling

use anyhow::{Context, Result};
use lexis::{catalog, Format, OptionsPatch, Translator, VocabulariesCollection};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "lexis.toml";

/// Top-level Lexis configuration (lexis.toml)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexisConfig {
    /// Active language, or "bypass"
    #[serde(default = "default_language")]
    pub language: String,
    /// Vocabularies collection file (YAML or JSON), relative to the config file
    #[serde(default)]
    pub collection: Option<PathBuf>,
    #[serde(default)]
    pub options: OptionsPatch,
    /// Directory relative paths resolve against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

fn default_language() -> String {
    lexis::BYPASS.to_string()
}

impl LexisConfig {
    /// Load configuration from a file, or from a directory containing lexis.toml
    pub fn load(path: &Path) -> Result<Self> {
        let config_path = if path.is_file() {
            path.to_path_buf()
        } else {
            path.join(CONFIG_FILE)
        };

        if !config_path.exists() {
            anyhow::bail!("No {} found at {}", CONFIG_FILE, path.display());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read {}", config_path.display()))?;

        let mut config = Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse {}", config_path.display()))?;
        config.base_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Ok(config)
    }

    /// Load `path` if given, else ./lexis.toml if present, else defaults
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None if Path::new(CONFIG_FILE).exists() => Self::load(Path::new(".")),
            None => {
                tracing::debug!("no {} found, using defaults", CONFIG_FILE);
                Ok(Self {
                    language: default_language(),
                    ..Self::default()
                })
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn collection_path(&self) -> Option<PathBuf> {
        self.collection.as_ref().map(|p| self.base_dir.join(p))
    }

    /// Read and parse the configured collection file, if any
    pub fn load_collection(&self) -> Result<Option<VocabulariesCollection>> {
        let Some(path) = self.collection_path() else {
            return Ok(None);
        };

        let format = Format::from_path(&path).with_context(|| {
            format!(
                "Unknown vocabulary format for {} (expected .yaml, .yml or .json)",
                path.display()
            )
        })?;
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let collection = catalog::parse_collection(&content, format)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::debug!(
            path = %path.display(),
            vocabularies = collection.len(),
            "loaded vocabularies collection"
        );
        Ok(Some(collection))
    }

    /// Build an initialized translator from this configuration
    pub fn build(&self, language: Option<&str>) -> Result<Translator> {
        let collection = self.load_collection()?;
        let mut translator = Translator::new();
        translator
            .initialize(
                language.unwrap_or(self.language.as_str()),
                collection,
                Some(self.options.clone()),
            )
            .context("Failed to initialize translator")?;
        Ok(translator)
    }
}
