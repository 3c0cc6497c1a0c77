/// 回應內容的格式判定結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Xml,
    Json,
    Csv,
}

/// 判定為 XML 的內容標記，含被 HTML 實體跳脫後塞在 script 裡的版本
const XML_MARKERS: [&str; 4] = ["<xml", "<results", "&lt;xml", "&lt;results"];

/// 依序判定，先符合者優先：XML → JSON → CSV。
/// Content-Type 有宣告時以其為準，但內容偵測一定會執行。
pub fn sniff_format(text: &str, content_type: &str) -> PayloadFormat {
    let content_type = content_type.to_ascii_lowercase();
    let lowered = text.to_lowercase();

    if content_type.contains("xml") || XML_MARKERS.iter().any(|m| lowered.contains(m)) {
        return PayloadFormat::Xml;
    }

    let trimmed = text.trim_start();
    if content_type.contains("json") || trimmed.starts_with('{') || trimmed.starts_with('[') {
        return PayloadFormat::Json;
    }

    PayloadFormat::Csv
}
