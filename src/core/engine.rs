use crate::core::harvest::{HarvestSettings, Harvester};
use crate::core::output::OutputWriter;
use crate::core::profile::resolve_owner;
use crate::domain::model::{OwnerProfile, Termination};
use crate::domain::ports::{ContentListingService, Pacer, RawPageSink, Storage};
use crate::utils::error::Result;

/// 一次完整執行的摘要
#[derive(Debug, Clone)]
pub struct HarvestSummary {
    pub owner: OwnerProfile,
    pub output_file: String,
    pub records: usize,
    pub fetches: usize,
    pub termination: Termination,
}

/// 查名稱 -> 分頁抓取 -> 寫檔
pub struct HarvestEngine<S, P, W>
where
    S: ContentListingService,
    P: Pacer,
    W: Storage,
{
    service: S,
    pacer: P,
    settings: HarvestSettings,
    writer: OutputWriter<W>,
    sink: Option<Box<dyn RawPageSink>>,
}

impl<S, P, W> HarvestEngine<S, P, W>
where
    S: ContentListingService,
    P: Pacer,
    W: Storage,
{
    pub fn new(service: S, pacer: P, settings: HarvestSettings, storage: W) -> Self {
        Self {
            service,
            pacer,
            settings,
            writer: OutputWriter::new(storage),
            sink: None,
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn RawPageSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// 只有寫檔失敗會回傳錯誤
    pub async fn run(&self, owner_id: u64) -> Result<HarvestSummary> {
        tracing::info!("Starting harvest for owner {}", owner_id);

        let owner = resolve_owner(&self.service, owner_id).await;

        let mut harvester = Harvester::new(&self.service, &self.pacer, &self.settings);
        if let Some(sink) = self.sink.as_deref() {
            harvester = harvester.with_sink(sink);
        }
        let result = harvester.run(&owner).await;

        match &result.termination {
            Termination::FetchFailed(reason) => tracing::warn!(
                "Harvest ended early after {} requests ({}), saving {} partial records",
                result.fetches,
                reason,
                result.len()
            ),
            other => tracing::info!(
                "Harvest finished after {} requests ({:?}), {} records",
                result.fetches,
                other,
                result.len()
            ),
        }

        let output_file = self.writer.write(&owner, &result.records).await?;
        tracing::info!("💾 Saved {} records to {}", result.len(), output_file);

        Ok(HarvestSummary {
            owner,
            output_file,
            records: result.records.len(),
            fetches: result.fetches,
            termination: result.termination,
        })
    }
}
