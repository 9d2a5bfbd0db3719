#[cfg(feature = "cli")]
pub mod cli;
pub mod prompt;
pub mod toml_config;

use crate::adapters::http::ClientOptions;
use crate::core::filter::CategoryFilter;
use crate::core::harvest::HarvestSettings;
use crate::core::title::{DelimiterPair, TitleExtractor};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::FileConfig;

pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_PACE: Duration = Duration::from_secs(1);

/// 合併設定檔與命令列後的最終設定
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub client: ClientOptions,
    pub settings: HarvestSettings,
    pub pace: Duration,
    pub output_dir: String,
    pub archive_path: Option<String>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            client: ClientOptions::default(),
            settings: HarvestSettings::default(),
            pace: DEFAULT_PACE,
            output_dir: DEFAULT_OUTPUT_DIR.to_string(),
            archive_path: None,
        }
    }
}

impl RunConfig {
    pub fn from_file_config(file: &FileConfig) -> Result<Self> {
        let mut config = Self::default();

        if let Some(base_url) = &file.service.base_url {
            config.client.base_url = base_url.clone();
        }
        if let Some(user_agent) = &file.service.user_agent {
            config.client.user_agent = user_agent.clone();
        }
        if let Some(secs) = file.service.timeout_seconds {
            config.client.timeout = Duration::from_secs(secs);
        }

        let harvest = &file.harvest;
        if let Some(page_size) = harvest.page_size {
            config.settings.page_size = page_size;
        }
        if let Some(max_pages) = harvest.max_pages {
            config.settings.max_pages = max_pages;
        }
        if let Some(ms) = harvest.pace_ms {
            config.pace = Duration::from_millis(ms);
        }
        if let Some(categories) = &harvest.categories {
            config.settings.filter = CategoryFilter::parse(categories)?;
        }
        if let Some(sort_field) = harvest.sort_field {
            config.settings.sort_field = sort_field;
        }
        config.archive_path = harvest.archive_path.clone();

        if let Some(delimiters) = &file.title.delimiters {
            config.settings.titles = TitleExtractor::new(
                delimiters
                    .iter()
                    .map(|[left, right]| DelimiterPair::new(left, right))
                    .collect(),
            );
        }

        if let Some(directory) = &file.output.directory {
            config.output_dir = directory.clone();
        }

        Ok(config)
    }
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("service.base_url", &self.client.base_url)?;
        validation::validate_non_empty_string("service.user_agent", &self.client.user_agent)?;
        validation::validate_range("harvest.page_size", self.settings.page_size, 1, 100)?;
        validation::validate_positive_number("harvest.max_pages", self.settings.max_pages, 1)?;
        validation::validate_path("output.directory", &self.output_dir)?;
        if let Some(path) = &self.archive_path {
            validation::validate_path("harvest.archive_path", path)?;
        }
        for (i, pair) in self.settings.titles.pairs().iter().enumerate() {
            validation::validate_non_empty_string(&format!("title.delimiters[{}]", i), &pair.left)?;
            validation::validate_non_empty_string(&format!("title.delimiters[{}]", i), &pair.right)?;
        }
        Ok(())
    }
}
