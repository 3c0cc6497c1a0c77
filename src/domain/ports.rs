use crate::domain::model::RawResponse;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// 單次 HTTP GET；失敗時回傳 `Network` 或 `HttpStatus`
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str, timeout_secs: f64) -> Result<RawResponse>;
}

/// 執行頁面腳本後回傳序列化的文件內容
#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, url: &str, timeout_ms: u64) -> Result<Vec<u8>>;
}
