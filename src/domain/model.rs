use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// XML 來源每列保證存在的欄位
pub const CANONICAL_FIELDS: [&str; 7] = ["rk", "nm", "gr", "sc", "ti", "mt", "auto"];

/// 一次抓取的原始回應，只在單次解析期間存在
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub content_type: String,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            content_type: content_type.into(),
            body: body.into(),
        }
    }
}

/// 單列結果：欄位名稱到字串值，保留插入順序（供欄位聯集排序使用）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    fields: Vec<(String, String)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 同名欄位覆寫舊值，但維持原本位置
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for ResultRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = ResultRow::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

/// 以 JSON 物件的形式序列化，欄位順序不變
impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

pub type RowBatch = Vec<ResultRow>;

/// 解析失敗且所有手段用盡時的處理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// 回傳錯誤（單一事件手動抓取）
    Strict,
    /// 記錄警告並回傳空批次（無人值守批次）
    #[default]
    Lenient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParsePolicy {
    pub render_js: bool,
    pub failure_mode: FailureMode,
    pub timeout_secs: f64,
}

impl Default for ParsePolicy {
    fn default() -> Self {
        Self {
            render_js: false,
            failure_mode: FailureMode::Lenient,
            timeout_secs: 10.0,
        }
    }
}

impl ParsePolicy {
    pub fn timeout_ms(&self) -> u64 {
        (self.timeout_secs * 1000.0) as u64
    }
}

/// 一個賽事項目的識別資料（用於組成 URL 與輸出路徑）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSpec {
    pub season: String,
    pub phase: String,
    pub gender: String,
    pub division: String,
    pub event_slug: String,
    pub state: String,
    pub out: String,
    #[serde(default)]
    pub meet_slug: Option<String>,
    #[serde(default)]
    pub extension: Option<String>,
    #[serde(default)]
    pub render_js: Option<bool>,
}
