// Adapters layer: concrete implementations for external systems (http, storage, browser).

#[cfg(feature = "browser")]
pub mod browser;
pub mod http;
pub mod storage;

use crate::domain::ports::PageRenderer;
use std::sync::Arc;

/// 編譯時有 `browser` 功能才提供渲染器；否則升級時會回報 `RendererUnavailable`
pub fn default_renderer() -> Option<Arc<dyn PageRenderer>> {
    #[cfg(feature = "browser")]
    {
        Some(Arc::new(browser::ChromiumRenderer::new()))
    }
    #[cfg(not(feature = "browser"))]
    {
        None
    }
}
