//! 從可能包在 HTML（甚至被 HTML 實體跳脫後塞在 script 裡）的文字中取出 `<results>` 區塊，
//! 並把每個 `<result>` 元素的屬性轉成結果列。

use crate::domain::model::{ResultRow, RowBatch, CANONICAL_FIELDS};
use crate::utils::error::{Result, ScrapeError};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static RESULTS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<results\b[^>]*>.*?</results\s*>").expect("results block pattern")
});

static ESCAPED_MARKUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&lt;\s*/?\s*(xml|results?)\b").expect("escaped markup pattern")
});

/// 以完整的 HTML5 實體表單次反跳脫；不認得的實體原樣保留
pub fn html_unescape(text: &str) -> Cow<'_, str> {
    html_escape::decode_html_entities(text)
}

/// 取出要交給 XML 解析器的候選字串：必要時先反跳脫，再找第一個 `<results>` 區塊，
/// 找不到就用整段修剪後的文字。
pub fn extract_candidate_xml(text: &str) -> Cow<'_, str> {
    let text: Cow<'_, str> = if ESCAPED_MARKUP.is_match(text) {
        tracing::debug!("Response contains escaped markup, unescaping before extraction");
        Cow::Owned(html_unescape(text).into_owned())
    } else {
        Cow::Borrowed(text)
    };

    let block = RESULTS_BLOCK.find(&text).map(|m| (m.start(), m.end()));
    match (text, block) {
        (Cow::Borrowed(s), Some((start, end))) => Cow::Borrowed(&s[start..end]),
        (Cow::Borrowed(s), None) => Cow::Borrowed(s.trim()),
        (Cow::Owned(s), Some((start, end))) => Cow::Owned(s[start..end].to_string()),
        (Cow::Owned(s), None) => Cow::Owned(s.trim().to_string()),
    }
}

/// 以 `<result>` 屬性建立一列：標準欄位缺少時補空字串，其他屬性照原樣附加在後
fn row_from_attributes<'a>(attributes: impl Iterator<Item = (&'a str, &'a str)> + Clone) -> ResultRow {
    let mut row = ResultRow::new();
    for field in CANONICAL_FIELDS {
        let value = attributes
            .clone()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
            .unwrap_or("");
        row.insert(field, value);
    }
    for (name, value) in attributes {
        if !CANONICAL_FIELDS.contains(&name) {
            row.insert(name, value);
        }
    }
    row
}

pub fn parse_xml_rows(text: &str) -> Result<RowBatch> {
    let candidate = extract_candidate_xml(text);

    let document = roxmltree::Document::parse(&candidate)
        .map_err(|e| ScrapeError::malformed(format!("Response contained invalid XML: {}", e)))?;

    let rows: RowBatch = document
        .descendants()
        .filter(|node| node.is_element() && node.tag_name().name().eq_ignore_ascii_case("result"))
        .map(|node| row_from_attributes(node.attributes().map(|attr| (attr.name(), attr.value()))))
        .collect();

    if rows.is_empty() {
        return Err(ScrapeError::empty("XML payload did not include any results"));
    }

    tracing::debug!("Extracted {} result elements from XML", rows.len());
    Ok(rows)
}
