use crate::domain::model::ListingPage;
use crate::domain::ports::RawPageSink;
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

#[derive(Serialize)]
struct ArchivedPage<'a> {
    page: usize,
    fetched_at: DateTime<Utc>,
    data: &'a ListingPage,
}

/// 每頁一行 JSON，附加到檔案尾端
#[derive(Debug, Clone)]
pub struct JsonlPageSink {
    path: PathBuf,
}

impl JsonlPageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RawPageSink for JsonlPageSink {
    async fn record(&self, page_number: usize, page: &ListingPage) -> Result<()> {
        let mut line = serde_json::to_string(&ArchivedPage {
            page: page_number,
            fetched_at: Utc::now(),
            data: page,
        })?;
        line.push('\n');

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}
