//! 回應解析管線與渲染升級控制。
//!
//! 流程：解碼 → 格式判定 → {XML | JSON | CSV} → 結果列。
//! 原始內容解析失敗時，若政策允許，呼叫頁面渲染器一次並以其輸出（一律視為 `text/html`）重新解析。
//! 渲染最多一次，不重試；所有手段用盡後依 [`FailureMode`] 決定回傳錯誤或空批次。

use crate::core::csv_rows::parse_csv_rows;
use crate::core::decode::decode_body;
use crate::core::json_rows::parse_json_rows;
use crate::core::sniff::{sniff_format, PayloadFormat};
use crate::core::xml_rows::parse_xml_rows;
use crate::domain::model::{FailureMode, ParsePolicy, RawResponse, RowBatch};
use crate::domain::ports::PageRenderer;
use crate::utils::error::{Result, ScrapeError};
use std::sync::Arc;
use std::time::Duration;

const RENDERED_CONTENT_TYPE: &str = "text/html";

/// 靜態解析：純函式，不做任何 I/O
pub fn parse_payload(raw: &RawResponse) -> Result<RowBatch> {
    let text = decode_body(&raw.body, &raw.content_type);
    let format = sniff_format(&text, &raw.content_type);
    tracing::debug!(
        "Sniffed {:?} payload (content-type: '{}', {} bytes)",
        format,
        raw.content_type,
        raw.body.len()
    );

    match format {
        PayloadFormat::Xml => parse_xml_rows(&text),
        PayloadFormat::Json => parse_json_rows(&text),
        PayloadFormat::Csv => parse_csv_rows(&text),
    }
}

/// 不持有跨呼叫的可變狀態，可在多個事件間共用
#[derive(Clone, Default)]
pub struct ResultsPipeline {
    renderer: Option<Arc<dyn PageRenderer>>,
}

impl ResultsPipeline {
    pub fn new() -> Self {
        Self { renderer: None }
    }

    pub fn with_renderer(renderer: Arc<dyn PageRenderer>) -> Self {
        Self {
            renderer: Some(renderer),
        }
    }

    pub fn has_renderer(&self) -> bool {
        self.renderer.is_some()
    }

    pub async fn parse_rows(
        &self,
        url: &str,
        raw: RawResponse,
        policy: &ParsePolicy,
    ) -> Result<RowBatch> {
        let failure = match parse_payload(&raw) {
            Ok(rows) => return Ok(rows),
            Err(e) if e.is_parse_failure() => e,
            Err(e) => return Err(e),
        };
        drop(raw);

        if !policy.render_js {
            return resolve_failure(url, failure, policy.failure_mode);
        }

        tracing::info!(
            "🔁 Retrying {} with page rendering after parse failure: {}",
            url,
            failure
        );

        let outcome = match self.render_once(url, policy.timeout_ms()).await {
            Ok(body) => parse_payload(&RawResponse::new(RENDERED_CONTENT_TYPE, body)),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(rows) => Ok(rows),
            Err(e) => resolve_failure(url, e, policy.failure_mode),
        }
    }

    async fn render_once(&self, url: &str, timeout_ms: u64) -> Result<Vec<u8>> {
        let renderer = self
            .renderer
            .as_ref()
            .ok_or_else(|| ScrapeError::RendererUnavailable {
                message: "no page renderer configured (rebuild with `--features browser`)"
                    .to_string(),
            })?;

        tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            renderer.render(url, timeout_ms),
        )
        .await
        .map_err(|_| ScrapeError::RendererError {
            message: format!("rendering {} timed out after {}ms", url, timeout_ms),
        })?
    }
}

fn resolve_failure(url: &str, error: ScrapeError, mode: FailureMode) -> Result<RowBatch> {
    match mode {
        FailureMode::Strict => Err(error),
        FailureMode::Lenient => {
            tracing::warn!("⚠️ Skipping {} due to parse failure: {}", url, error);
            Ok(RowBatch::new())
        }
    }
}
