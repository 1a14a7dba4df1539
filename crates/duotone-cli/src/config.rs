//! duotone configuration file handling

use anyhow::{Context, Result};
use duotone_css::TransformOptions;
use duotone_css::options::ThemeOptions;
use duotone_css::parser::ParseOptions;
use duotone_css::rules::{OutputStyle, PrintOptions};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Top-level configuration (duotone.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DuotoneConfig {
    pub theme: ThemeOptions,
    pub build: BuildConfig,
}

/// Build configuration
#[derive(Debug, Deserialize, Serialize)]
pub struct BuildConfig {
    /// Stylesheets or directories to build when none are given on the command line
    #[serde(default)]
    pub inputs: Vec<PathBuf>,
    /// Output directory
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    /// Flatten nested rules before expanding
    #[serde(default = "default_true")]
    pub flatten_nesting: bool,
    /// Skip invalid rules instead of failing the file
    #[serde(default)]
    pub recover: bool,
    /// Output style: "pretty" or "compact"
    #[serde(default)]
    pub style: OutputStyle,
    /// Indent width for pretty output
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_true() -> bool {
    true
}

fn default_indent() -> usize {
    2
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            out_dir: None,
            flatten_nesting: true,
            recover: false,
            style: OutputStyle::default(),
            indent: default_indent(),
        }
    }
}

impl DuotoneConfig {
    /// Name of the configuration file looked up in the working directory
    pub const FILE_NAME: &'static str = "duotone.toml";

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: DuotoneConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Load the explicit config file, or `duotone.toml` in `dir` if present,
    /// or fall back to defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(Self::FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("Using config {}", candidate.display());
            return Self::load(&candidate);
        }

        Ok(Self::default())
    }

    /// Options for the transform library
    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            theme: self.theme.clone(),
            flatten_nesting: self.build.flatten_nesting,
            parse: ParseOptions {
                recover: self.build.recover,
            },
            print: PrintOptions {
                style: self.build.style,
                indent: self.build.indent,
            },
        }
    }
}
