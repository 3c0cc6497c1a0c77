use encoding_rs::{Encoding, UTF_8};

/// 從 Content-Type 取出 `charset=` 的值（去除引號）
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    let lower = content_type.to_ascii_lowercase();
    let start = lower.find("charset=")? + "charset=".len();
    let rest = &content_type[start..];
    let end = rest
        .find(|c: char| c == ';' || c.is_whitespace())
        .unwrap_or(rest.len());
    let label = rest[..end].trim_matches(|c| c == '"' || c == '\'');
    if label.is_empty() {
        None
    } else {
        Some(label)
    }
}

/// 將原始位元組轉為文字。永不失敗：未知編碼退回 UTF-8，無效位元組以替代字元取代。
pub fn decode_body(body: &[u8], content_type: &str) -> String {
    let encoding = match charset_from_content_type(content_type) {
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            tracing::debug!("Unknown charset '{}', falling back to UTF-8", label);
            UTF_8
        }),
        None => UTF_8,
    };

    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!(
            "Invalid {} byte sequences replaced while decoding response",
            used.name()
        );
    }
    text.into_owned()
}
