use crate::accuracy::AnalysisOptions;
use crate::constants::{diff, matching, report};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_sentence_match_cutoff")]
    pub sentence_match_cutoff: f64,
    #[serde(default = "default_diff_context_lines")]
    pub diff_context_lines: usize,
}

fn default_sentence_match_cutoff() -> f64 {
    matching::SENTENCE_MATCH_CUTOFF
}

fn default_diff_context_lines() -> usize {
    diff::CONTEXT_LINES
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            sentence_match_cutoff: default_sentence_match_cutoff(),
            diff_context_lines: default_diff_context_lines(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReportConfig {
    #[serde(default = "default_word_limit")]
    pub word_limit: usize,
    #[serde(default = "default_original_label")]
    pub original_label: String,
    #[serde(default = "default_modified_label")]
    pub modified_label: String,
}

fn default_word_limit() -> usize {
    report::WORD_LIST_LIMIT
}

fn default_original_label() -> String {
    diff::ORIGINAL_LABEL.to_string()
}

fn default_modified_label() -> String {
    diff::MODIFIED_LABEL.to_string()
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            word_limit: default_word_limit(),
            original_label: default_original_label(),
            modified_label: default_modified_label(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home.join(".transcript-accuracy"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("settings.yaml"))
    }

    /// Load the default settings file, writing one with defaults if missing
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Config::default();
            config.save()?;
            info!("Created default config at: {}", config_path.display());
            Ok(config)
        }
    }

    /// Load and validate an explicit settings file; it is never created
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&contents)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate settings from YAML text
    pub fn from_yaml(contents: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(contents)
            .context("Failed to parse config file")?;

        // Validate configuration after loading
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let cutoff = self.analysis.sentence_match_cutoff;
        if !(cutoff > 0.0 && cutoff <= 1.0) {
            bail!("sentence_match_cutoff must be in (0.0, 1.0], got {}", cutoff);
        }
        if self.analysis.diff_context_lines > diff::MAX_CONTEXT_LINES {
            bail!("diff_context_lines must be <= {}", diff::MAX_CONTEXT_LINES);
        }

        if self.report.word_limit == 0 {
            bail!("word_limit must be greater than 0");
        }
        if self.report.original_label.is_empty() {
            bail!("original_label cannot be empty");
        }
        if self.report.modified_label.is_empty() {
            bail!("modified_label cannot be empty");
        }

        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir()?;
        fs::create_dir_all(&config_dir)
            .context("Failed to create config directory")?;

        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)
            .context("Failed to serialize config")?;

        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;

        Ok(())
    }

    /// Options for one analysis run
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            sentence_match_cutoff: self.analysis.sentence_match_cutoff,
            diff_context_lines: self.analysis.diff_context_lines,
            original_label: self.report.original_label.clone(),
            modified_label: self.report.modified_label.clone(),
        }
    }
}
