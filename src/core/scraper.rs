use crate::core::endpoint::build_compilation_url;
use crate::core::escalation::ResultsPipeline;
use crate::core::writer::{column_order, to_csv_bytes};
use crate::core::{EventSpec, ParsePolicy, RowBatch, Storage, Transport};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub written: Vec<String>,
    pub failed: Vec<String>,
}

impl BatchSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 抓取單一賽事並輸出 CSV：組 URL → 傳輸 → 解析管線 → 欄位聯集 → 儲存
pub struct EventScraper<S: Storage> {
    base_url: String,
    transport: Arc<dyn Transport>,
    pipeline: ResultsPipeline,
    storage: S,
}

impl<S: Storage> EventScraper<S> {
    pub fn new(
        base_url: impl Into<String>,
        transport: Arc<dyn Transport>,
        pipeline: ResultsPipeline,
        storage: S,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            pipeline,
            storage,
        }
    }

    pub fn event_url(&self, event: &EventSpec) -> Result<String> {
        build_compilation_url(&self.base_url, event)
    }

    pub async fn fetch_event(&self, event: &EventSpec, policy: &ParsePolicy) -> Result<RowBatch> {
        let url = self.event_url(event)?;
        let policy = ParsePolicy {
            render_js: event.render_js.unwrap_or(policy.render_js),
            ..*policy
        };

        tracing::info!("📡 Fetching {}", url);
        let raw = self.transport.fetch(&url, policy.timeout_secs).await?;
        self.pipeline.parse_rows(&url, raw, &policy).await
    }

    pub async fn scrape_to_csv(&self, event: &EventSpec, policy: &ParsePolicy) -> Result<String> {
        let rows = self.fetch_event(event, policy).await?;

        if rows.is_empty() {
            tracing::warn!(
                "No rows returned for {}/{}/{}/{}/{}",
                event.state,
                event.season,
                event.phase,
                event.gender,
                event.event_slug
            );
        } else if column_order(&rows).is_empty() {
            // 沒有任何欄位的列無法以表格呈現，輸出為空檔案
            tracing::warn!(
                "⚠️ {} rows for {} carried no fields; writing an empty file",
                rows.len(),
                event.event_slug
            );
        }

        let data = to_csv_bytes(&rows)?;
        self.storage.write_file(&event.out, &data).await?;

        tracing::info!("📁 Wrote {} rows to {}", rows.len(), event.out);
        Ok(event.out.clone())
    }

    /// 依序處理所有事件；單一事件失敗只記錄，不中斷其餘事件
    pub async fn run_batch(&self, events: &[EventSpec], policy: &ParsePolicy) -> BatchSummary {
        let mut summary = BatchSummary::default();

        for (index, event) in events.iter().enumerate() {
            tracing::debug!(
                "Event {}/{}: {}",
                index + 1,
                events.len(),
                event.event_slug
            );

            let outcome = match event.validate() {
                Ok(()) => self.scrape_to_csv(event, policy).await,
                Err(e) => Err(e),
            };

            match outcome {
                Ok(path) => summary.written.push(path),
                Err(e) => {
                    tracing::error!(
                        "❌ Failed to fetch {}: {} (category: {:?})",
                        event.event_slug,
                        e,
                        e.category()
                    );
                    summary.failed.push(event.event_slug.clone());
                }
            }
        }

        tracing::info!(
            "✅ Batch finished: {} written, {} failed",
            summary.written.len(),
            summary.failed.len()
        );
        summary
    }
}
