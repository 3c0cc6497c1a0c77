use crate::domain::model::EventSpec;
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{validate_non_empty_string, validate_path, Validate};
use serde_json::{Map, Value};
use std::path::Path;

/// 每個事件必須具備的欄位
pub const REQUIRED_FIELDS: [&str; 7] = [
    "season",
    "phase",
    "gender",
    "division",
    "event_slug",
    "state",
    "out",
];

const SEASON_PLACEHOLDER: &str = "{season}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    /// `.yaml/.yml` → YAML，`.toml` → TOML，其他一律視為 JSON
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml") | Some("yml") => Self::Yaml,
            Some("toml") => Self::Toml,
            _ => Self::Json,
        }
    }
}

/// 因欄位缺漏或型別錯誤而略過的事件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEvent {
    pub index: usize,
    pub reason: String,
    pub entry: String,
}

#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    pub events: Vec<EventSpec>,
    pub rejected: Vec<RejectedEvent>,
}

impl BatchConfig {
    /// 從設定檔載入事件清單
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScrapeError::ConfigError {
                message: format!("Config file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse(&content, ConfigFormat::from_path(path))
    }

    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let processed = substitute_env_vars(content);

        let loaded: Value = match format {
            ConfigFormat::Yaml => {
                serde_yaml::from_str(&processed).map_err(|e| ScrapeError::ConfigError {
                    message: format!("YAML parsing error: {}", e),
                })?
            }
            ConfigFormat::Toml => {
                toml::from_str(&processed).map_err(|e| ScrapeError::ConfigError {
                    message: format!("TOML parsing error: {}", e),
                })?
            }
            ConfigFormat::Json => {
                serde_json::from_str(&processed).map_err(|e| ScrapeError::ConfigError {
                    message: format!("JSON parsing error: {}", e),
                })?
            }
        };

        let entries = expand_seasons(event_entries(loaded)?)?;

        let mut config = BatchConfig::default();
        for (index, entry) in entries.into_iter().enumerate() {
            match event_from_entry(&entry) {
                Ok(event) => config.events.push(event),
                Err(reason) => config.rejected.push(RejectedEvent {
                    index,
                    reason,
                    entry: Value::Object(entry).to_string(),
                }),
            }
        }

        Ok(config)
    }
}

/// 替換環境變數 (例如 ${MEET_BASE})
fn substitute_env_vars(content: &str) -> String {
    use regex::Regex;
    use std::sync::LazyLock;

    static ENV_VAR: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern"));

    ENV_VAR
        .replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
}

/// 接受頂層清單，或含 `events` 清單的物件
fn event_entries(loaded: Value) -> Result<Vec<Map<String, Value>>> {
    let events = match loaded {
        Value::Object(mut obj) if obj.contains_key("events") => obj.remove("events"),
        other => Some(other),
    };

    let Some(Value::Array(items)) = events else {
        return Err(ScrapeError::ConfigError {
            message: "Config must be a list of events or contain an 'events' list.".to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            Value::Object(obj) => Ok(obj),
            other => Err(ScrapeError::ConfigError {
                message: format!("Config entry {} is not a mapping: {}", idx, other),
            }),
        })
        .collect()
}

/// 有 `seasons` 的項目展開成每季一個事件，`out` 必須含 `{season}`
fn expand_seasons(entries: Vec<Map<String, Value>>) -> Result<Vec<Map<String, Value>>> {
    let mut expanded = Vec::new();

    for (idx, mut entry) in entries.into_iter().enumerate() {
        let Some(seasons) = entry.remove("seasons") else {
            expanded.push(entry);
            continue;
        };

        let Value::Array(seasons) = seasons else {
            return Err(ScrapeError::ConfigError {
                message: format!("Entry {} `seasons` must be a list of season strings.", idx),
            });
        };

        let out_template = match entry.get("out") {
            Some(Value::String(out)) if out.contains(SEASON_PLACEHOLDER) => out.clone(),
            _ => {
                return Err(ScrapeError::ConfigError {
                    message: "Entries that specify `seasons` must include an `out` path containing a {season} placeholder.".to_string(),
                })
            }
        };

        for season in seasons {
            let season = match season {
                Value::String(season) => season,
                other => {
                    return Err(ScrapeError::ConfigError {
                        message: format!("Entry {} season values must be strings: {}", idx, other),
                    })
                }
            };

            let mut season_entry = entry.clone();
            season_entry.insert(
                "out".to_string(),
                Value::String(out_template.replace(SEASON_PLACEHOLDER, &season)),
            );
            season_entry.insert("season".to_string(), Value::String(season));
            expanded.push(season_entry);
        }
    }

    Ok(expanded)
}

fn event_from_entry(entry: &Map<String, Value>) -> std::result::Result<EventSpec, String> {
    let mut missing: Vec<&str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| matches!(entry.get(*field), None | Some(Value::Null)))
        .collect();
    if !missing.is_empty() {
        missing.sort_unstable();
        return Err(format!("missing fields {}", missing.join(", ")));
    }

    // YAML/TOML 裡的數字（例如 season: 2024）視為字串
    let mut entry = entry.clone();
    for field in REQUIRED_FIELDS {
        if let Some(value @ (Value::Number(_) | Value::Bool(_))) = entry.get(field) {
            let text = value.to_string();
            entry.insert(field.to_string(), Value::String(text));
        }
    }

    serde_json::from_value(Value::Object(entry)).map_err(|e| e.to_string())
}

impl Validate for EventSpec {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("season", &self.season)?;
        validate_non_empty_string("phase", &self.phase)?;
        validate_non_empty_string("gender", &self.gender)?;
        validate_non_empty_string("division", &self.division)?;
        validate_non_empty_string("event_slug", &self.event_slug)?;
        validate_path("out", &self.out)?;
        if self.meet_slug.is_none() {
            validate_non_empty_string("state", &self.state)?;
        }
        Ok(())
    }
}
