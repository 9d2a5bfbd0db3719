use super::toml_config::FileConfig;
use super::RunConfig;
use crate::core::filter::CategoryFilter;
use crate::utils::error::Result;
use clap::Parser;
use std::time::Duration;

#[derive(Debug, Clone, Parser)]
#[command(name = "up-harvest")]
#[command(about = "Harvest every published video of a Bilibili uploader into a text file")]
pub struct CliConfig {
    /// UP主的UID，省略時互動輸入
    #[arg(long)]
    pub uid: Option<u64>,

    /// TOML 設定檔
    #[arg(short, long)]
    pub config: Option<String>,

    /// 輸出目錄
    #[arg(short, long)]
    pub output_dir: Option<String>,

    /// 分區過濾：`*`、`music` 或逗號分隔的 tid
    #[arg(long)]
    pub categories: Option<String>,

    #[arg(long)]
    pub page_size: Option<u32>,

    #[arg(long)]
    pub max_pages: Option<usize>,

    /// 每頁之間的等待毫秒數
    #[arg(long)]
    pub pace_ms: Option<u64>,

    /// 將每頁原始資料附加到 JSONL 檔
    #[arg(long)]
    pub archive: Option<String>,

    #[arg(long)]
    pub base_url: Option<String>,

    #[arg(long)]
    pub timeout_secs: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// 先讀設定檔，再以命令列參數覆蓋
    pub fn resolve(&self) -> Result<RunConfig> {
        let file = match &self.config {
            Some(path) => FileConfig::from_file(path)?,
            None => FileConfig::default(),
        };
        let mut config = RunConfig::from_file_config(&file)?;

        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(categories) = &self.categories {
            config.settings.filter = CategoryFilter::parse(categories)?;
        }
        if let Some(page_size) = self.page_size {
            config.settings.page_size = page_size;
        }
        if let Some(max_pages) = self.max_pages {
            config.settings.max_pages = max_pages;
        }
        if let Some(ms) = self.pace_ms {
            config.pace = Duration::from_millis(ms);
        }
        if let Some(archive) = &self.archive {
            config.archive_path = Some(archive.clone());
        }
        if let Some(base_url) = &self.base_url {
            config.client.base_url = base_url.clone();
        }
        if let Some(secs) = self.timeout_secs {
            config.client.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[harvest]\npage_size = 20\ncategories = \"music\"\n[output]\ndirectory = \"from-file\"\n")
            .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = CliConfig::parse_from([
            "up-harvest",
            "--uid",
            "42",
            "--config",
            path.as_str(),
            "--categories",
            "*",
            "--pace-ms",
            "0",
        ]);
        let config = cli.resolve().unwrap();

        assert_eq!(cli.uid, Some(42));
        assert_eq!(config.settings.page_size, 20);
        assert!(config.settings.filter.is_unfiltered());
        assert_eq!(config.output_dir, "from-file");
        assert_eq!(config.pace, Duration::ZERO);
    }

    #[test]
    fn test_defaults_without_flags() {
        let cli = CliConfig::parse_from(["up-harvest"]);
        let config = cli.resolve().unwrap();

        assert_eq!(cli.uid, None);
        assert_eq!(config.settings.page_size, 30);
        assert_eq!(config.output_dir, ".");
        assert!(config.archive_path.is_none());
    }
}
