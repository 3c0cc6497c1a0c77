//! Headless Chromium page renderer (feature `browser`).
//!
//! Launches a fresh browser per render, waits for navigation to settle and
//! returns the serialized DOM after client-side scripts have run.

use crate::domain::ports::PageRenderer;
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use chromiumoxide::{Browser, BrowserConfig};
use futures::StreamExt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    chrome_executable: Option<PathBuf>,
}

impl ChromiumRenderer {
    /// Common Chrome executable paths to check.
    const CHROME_PATHS: &'static [&'static str] = &[
        "/usr/bin/google-chrome",
        "/usr/bin/google-chrome-stable",
        "/usr/bin/chromium",
        "/usr/bin/chromium-browser",
        "/snap/bin/chromium",
        "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
        "/Applications/Chromium.app/Contents/MacOS/Chromium",
        "/opt/google/chrome/google-chrome",
    ];

    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_executable(path: impl Into<PathBuf>) -> Self {
        Self {
            chrome_executable: Some(path.into()),
        }
    }

    fn find_chrome(&self) -> Option<PathBuf> {
        if let Some(path) = &self.chrome_executable {
            return path.exists().then(|| path.clone());
        }

        Self::CHROME_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }
}

fn render_error(e: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::RendererError {
        message: e.to_string(),
    }
}

#[async_trait]
impl PageRenderer for ChromiumRenderer {
    async fn render(&self, url: &str, timeout_ms: u64) -> Result<Vec<u8>> {
        let chrome = self
            .find_chrome()
            .ok_or_else(|| ScrapeError::RendererUnavailable {
                message: "Chrome/Chromium not found; install it or pass its path".to_string(),
            })?;
        info!("Rendering {} with {}", url, chrome.display());

        let timeout = Duration::from_millis(timeout_ms);
        let config = BrowserConfig::builder()
            .chrome_executable(chrome)
            .request_timeout(timeout)
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .build()
            .map_err(render_error)?;

        let (mut browser, mut handler) = Browser::launch(config).await.map_err(render_error)?;
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let rendered = tokio::time::timeout(timeout, async {
            let page = browser.new_page(url).await?;
            page.wait_for_navigation().await?;
            page.content().await
        })
        .await;

        if let Err(e) = browser.close().await {
            debug!("Browser close failed: {}", e);
        }
        handler_task.abort();

        match rendered {
            Ok(Ok(html)) => Ok(html.into_bytes()),
            Ok(Err(e)) => Err(render_error(e)),
            Err(_) => Err(render_error(format!(
                "rendering {} timed out after {}ms",
                url, timeout_ms
            ))),
        }
    }
}
