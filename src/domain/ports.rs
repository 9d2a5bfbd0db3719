use crate::domain::model::{ListingPage, PageRequest, ProfileLookup};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 遠端分頁列表服務
#[async_trait]
pub trait ContentListingService: Send + Sync {
    async fn resolve_profile(&self, owner_id: u64) -> Result<ProfileLookup>;
    async fn fetch_page(&self, request: &PageRequest) -> Result<ListingPage>;
}

/// 兩次抓取之間的等待策略
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

/// 原始頁面封存
#[async_trait]
pub trait RawPageSink: Send + Sync {
    async fn record(&self, page_number: usize, page: &ListingPage) -> Result<()>;
}

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
