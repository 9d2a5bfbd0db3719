use crate::core::filter::CategoryFilter;
use crate::core::title::TitleExtractor;
use crate::domain::model::{
    Direction, HarvestRecord, HarvestResult, ListingItem, OwnerProfile, PageRequest,
    PaginationCursor, SortField, Termination,
};
use crate::domain::ports::{ContentListingService, Pacer, RawPageSink};

pub const DEFAULT_PAGE_SIZE: u32 = 30;
pub const DEFAULT_MAX_PAGES: usize = 100_000;

/// 分頁抓取參數
#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub page_size: u32,
    pub max_pages: usize,
    pub direction: Direction,
    pub sort_field: SortField,
    /// 0 表示不在伺服器端限制分區
    pub category_partition: u32,
    pub include_current: bool,
    pub filter: CategoryFilter,
    pub titles: TitleExtractor,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            direction: Direction::Descending,
            sort_field: SortField::PubDate,
            category_partition: 0,
            include_current: false,
            filter: CategoryFilter::allow_all(),
            titles: TitleExtractor::default(),
        }
    }
}

impl HarvestSettings {
    fn request(&self, owner_id: u64, cursor: &PaginationCursor) -> PageRequest {
        PageRequest {
            owner_id,
            cursor: cursor.last_item_internal_id,
            page_size: self.page_size,
            direction: self.direction,
            sort_field: self.sort_field,
            category_partition: self.category_partition,
            include_current: self.include_current,
        }
    }
}

/// 依游標逐頁抓取 UP 主的所有投稿
pub struct Harvester<'a, S: ?Sized, P: ?Sized> {
    service: &'a S,
    pacer: &'a P,
    settings: &'a HarvestSettings,
    sink: Option<&'a dyn RawPageSink>,
}

impl<'a, S, P> Harvester<'a, S, P>
where
    S: ContentListingService + ?Sized,
    P: Pacer + ?Sized,
{
    pub fn new(service: &'a S, pacer: &'a P, settings: &'a HarvestSettings) -> Self {
        Self {
            service,
            pacer,
            settings,
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: &'a dyn RawPageSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 抓取失敗只會提前結束，回傳已累積的部分結果
    pub async fn run(&self, owner: &OwnerProfile) -> HarvestResult {
        let mut cursor = PaginationCursor::default();
        let mut records = Vec::new();
        let mut page_count = 0;
        let mut fetches = 0;
        let mut termination = Termination::GuardReached;

        while page_count < self.settings.max_pages {
            let request = self.settings.request(owner.id, &cursor);
            tracing::debug!(
                "Fetching page {} (cursor: {:?})",
                page_count + 1,
                request.cursor
            );

            fetches += 1;
            let page = match self.service.fetch_page(&request).await {
                Ok(page) => page,
                Err(e) => {
                    tracing::warn!("⚠️ Failed to fetch page {}: {}", page_count + 1, e);
                    termination = Termination::FetchFailed(e.to_string());
                    break;
                }
            };

            if let Some(sink) = self.sink {
                if let Err(e) = sink.record(page_count + 1, &page).await {
                    tracing::warn!("Failed to archive page {}: {}", page_count + 1, e);
                }
            }

            let items = match page.items.as_deref() {
                Some(items) if !items.is_empty() => items,
                _ => {
                    tracing::debug!("Page {} has no items, stopping", page_count + 1);
                    termination = Termination::EmptyPage;
                    break;
                }
            };

            let before = records.len();
            self.collect(items, &owner.display_name, &mut records);
            tracing::info!(
                "📄 Page {}: {} items, {} kept (total {})",
                page_count + 1,
                items.len(),
                records.len() - before,
                records.len()
            );

            if !page.has_more {
                termination = Termination::Exhausted;
                break;
            }

            cursor.advance(items);
            page_count += 1;
            self.pacer.pause().await;
        }

        if termination == Termination::GuardReached {
            tracing::warn!(
                "Stopped after reaching the page limit of {}",
                self.settings.max_pages
            );
        }

        HarvestResult {
            records,
            fetches,
            termination,
        }
    }

    fn collect(&self, items: &[ListingItem], owner_name: &str, records: &mut Vec<HarvestRecord>) {
        for item in items {
            if !self.settings.filter.keep(item.category_tag) {
                continue;
            }
            if let Some(external_id) = &item.external_id {
                records.push(HarvestRecord {
                    external_id: external_id.clone(),
                    title: self.settings.titles.extract(&item.title, owner_name),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ListingPage, ProfileLookup};
    use crate::utils::error::{HarvestError, Result};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 依序回傳預先準備的頁面，並記錄每次請求
    struct ScriptedService {
        pages: Mutex<VecDeque<Result<ListingPage>>>,
        requests: Mutex<Vec<PageRequest>>,
    }

    impl ScriptedService {
        fn new(pages: Vec<Result<ListingPage>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<PageRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ContentListingService for ScriptedService {
        async fn resolve_profile(&self, _owner_id: u64) -> Result<ProfileLookup> {
            Ok(ProfileLookup::default())
        }

        async fn fetch_page(&self, request: &PageRequest) -> Result<ListingPage> {
            self.requests.lock().unwrap().push(request.clone());
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(ListingPage::absent()))
        }
    }

    /// 永遠回報 has_more 的服務
    struct EndlessService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ContentListingService for EndlessService {
        async fn resolve_profile(&self, _owner_id: u64) -> Result<ProfileLookup> {
            Ok(ProfileLookup::default())
        }

        async fn fetch_page(&self, _request: &PageRequest) -> Result<ListingPage> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
            Ok(ListingPage::new(
                vec![ListingItem::new(n, 28, "loop", Some("BVloop"))],
                true,
            ))
        }
    }

    #[derive(Default)]
    struct CountingPacer {
        pauses: AtomicUsize,
    }

    #[async_trait]
    impl Pacer for CountingPacer {
        async fn pause(&self) {
            self.pauses.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[derive(Default)]
    struct MemorySink {
        pages: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl RawPageSink for MemorySink {
        async fn record(&self, page_number: usize, _page: &ListingPage) -> Result<()> {
            self.pages.lock().unwrap().push(page_number);
            Ok(())
        }
    }

    fn owner() -> OwnerProfile {
        OwnerProfile {
            id: 42,
            display_name: "小明".to_string(),
        }
    }

    fn item(id: i64, tag: i64) -> ListingItem {
        ListingItem::new(id, tag, &format!("《歌{}》", id), Some(&format!("BV{}", id)))
    }

    fn page_of(ids: std::ops::RangeInclusive<i64>, has_more: bool) -> ListingPage {
        ListingPage::new(ids.map(|id| item(id, 28)).collect(), has_more)
    }

    #[tokio::test]
    async fn test_two_page_harvest() {
        // 第一頁 30 筆，最後一筆 id = 500
        let service = ScriptedService::new(vec![
            Ok(page_of(471..=500, true)),
            Ok(page_of(1..=5, false)),
        ]);
        let pacer = CountingPacer::default();
        let settings = HarvestSettings::default();

        let result = Harvester::new(&service, &pacer, &settings)
            .run(&owner())
            .await;

        assert_eq!(result.len(), 35);
        assert_eq!(result.fetches, 2);
        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.records[0].external_id, "BV471");
        assert_eq!(result.records[0].title, "歌471");
        assert_eq!(result.records[29].external_id, "BV500");
        assert_eq!(result.records[30].external_id, "BV1");
        assert_eq!(result.records[34].external_id, "BV5");
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), 1);

        let requests = service.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].cursor, None);
        assert_eq!(requests[1].cursor, Some(500));
        for request in &requests {
            assert_eq!(request.owner_id, 42);
            assert_eq!(request.page_size, 30);
            assert_eq!(request.direction, Direction::Descending);
            assert_eq!(request.sort_field, SortField::PubDate);
            assert_eq!(request.category_partition, 0);
            assert!(!request.include_current);
        }
    }

    #[tokio::test]
    async fn test_cursor_ignores_alternate_id() {
        let mut last = item(500, 28);
        last.alternate_id = Some(123_456);
        let service = ScriptedService::new(vec![
            Ok(ListingPage::new(vec![item(510, 28), last], true)),
            Ok(ListingPage::new(vec![], false)),
        ]);
        let settings = HarvestSettings::default();

        Harvester::new(&service, &CountingPacer::default(), &settings)
            .run(&owner())
            .await;

        assert_eq!(service.requests()[1].cursor, Some(500));
    }

    #[tokio::test]
    async fn test_fetch_failure_returns_partial_result() {
        let service = ScriptedService::new(vec![
            Ok(page_of(11..=13, true)),
            Err(HarvestError::UpstreamError {
                code: -412,
                message: "request was banned".to_string(),
            }),
        ]);
        let settings = HarvestSettings::default();

        let result = Harvester::new(&service, &CountingPacer::default(), &settings)
            .run(&owner())
            .await;

        assert!(result.is_partial());
        assert_eq!(result.fetches, 2);
        let ids: Vec<&str> = result.records.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["BV11", "BV12", "BV13"]);
    }

    #[tokio::test]
    async fn test_empty_or_absent_items_stop_immediately() {
        for stop_page in [ListingPage::new(vec![], true), ListingPage::absent()] {
            let service = ScriptedService::new(vec![
                Ok(page_of(1..=2, true)),
                Ok(stop_page),
                Ok(page_of(3..=4, false)),
            ]);
            let pacer = CountingPacer::default();
            let settings = HarvestSettings::default();

            let result = Harvester::new(&service, &pacer, &settings)
                .run(&owner())
                .await;

            assert_eq!(result.termination, Termination::EmptyPage);
            assert_eq!(result.len(), 2);
            assert_eq!(result.fetches, 2);
            assert_eq!(pacer.pauses.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn test_filter_and_missing_external_id() {
        let mut no_bv = item(3, 28);
        no_bv.external_id = None;
        let service = ScriptedService::new(vec![Ok(ListingPage::new(
            vec![item(1, 28), item(2, 17), no_bv, item(4, 31)],
            false,
        ))]);
        let settings = HarvestSettings {
            filter: CategoryFilter::music(),
            ..HarvestSettings::default()
        };

        let result = Harvester::new(&service, &CountingPacer::default(), &settings)
            .run(&owner())
            .await;

        let ids: Vec<&str> = result.records.iter().map(|r| r.external_id.as_str()).collect();
        assert_eq!(ids, vec!["BV1", "BV4"]);
    }

    #[tokio::test]
    async fn test_owner_name_in_brackets_keeps_raw_title() {
        let service = ScriptedService::new(vec![Ok(ListingPage::new(
            vec![ListingItem::new(1, 28, "【小明】直播回放", Some("BV1"))],
            false,
        ))]);
        let settings = HarvestSettings::default();

        let result = Harvester::new(&service, &CountingPacer::default(), &settings)
            .run(&owner())
            .await;

        assert_eq!(result.records[0].title, "【小明】直播回放");
    }

    #[tokio::test]
    async fn test_guard_stops_endless_service() {
        let service = EndlessService {
            calls: AtomicUsize::new(0),
        };
        let pacer = CountingPacer::default();
        let settings = HarvestSettings::default();

        let result = Harvester::new(&service, &pacer, &settings)
            .run(&owner())
            .await;

        assert_eq!(result.termination, Termination::GuardReached);
        assert_eq!(result.fetches, DEFAULT_MAX_PAGES);
        assert_eq!(result.len(), DEFAULT_MAX_PAGES);
        assert_eq!(pacer.pauses.load(Ordering::SeqCst), DEFAULT_MAX_PAGES);
    }

    #[tokio::test]
    async fn test_custom_guard_and_page_size() {
        let service = EndlessService {
            calls: AtomicUsize::new(0),
        };
        let settings = HarvestSettings {
            max_pages: 3,
            page_size: 50,
            ..HarvestSettings::default()
        };

        let result = Harvester::new(&service, &CountingPacer::default(), &settings)
            .run(&owner())
            .await;

        assert_eq!(result.fetches, 3);
        assert_eq!(service.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_sink_receives_every_fetched_page() {
        let service = ScriptedService::new(vec![
            Ok(page_of(1..=2, true)),
            Ok(page_of(3..=4, true)),
            Ok(ListingPage::absent()),
        ]);
        let sink = MemorySink::default();
        let settings = HarvestSettings::default();

        let result = Harvester::new(&service, &CountingPacer::default(), &settings)
            .with_sink(&sink)
            .run(&owner())
            .await;

        assert_eq!(result.len(), 4);
        assert_eq!(*sink.pages.lock().unwrap(), vec![1, 2, 3]);
    }
}
