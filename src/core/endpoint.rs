use crate::domain::model::EventSpec;
use crate::utils::error::{Result, ScrapeError};
use url::Url;

const DEFAULT_FOLDER: &str = "compilation";
const DEFAULT_EXTENSION: &str = "xml";

/// 組出賽事結果的 URL：
/// - 有 `meet_slug`：`{base}/{meet_slug}/{phase}/{gender}-{division}-{event_slug}.{ext}`
/// - 否則：`{base}/{state}/{season}/compilation/{phase}/{gender}-{division}-{event_slug}.{ext}`
pub fn build_compilation_url(base_url: &str, event: &EventSpec) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| ScrapeError::InvalidConfigValueError {
        field: "base_url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    let extension = event
        .extension
        .as_deref()
        .map(|ext| ext.trim_start_matches('.'))
        .filter(|ext| !ext.is_empty())
        .unwrap_or(DEFAULT_EXTENSION);

    let filename = format!(
        "{}-{}-{}.{}",
        event.gender, event.division, event.event_slug, extension
    )
    .replace(' ', "-");

    let prefix: Vec<&str> = match event.meet_slug.as_deref().filter(|s| !s.is_empty()) {
        Some(meet_slug) => vec![meet_slug, event.phase.as_str()],
        None => vec![
            event.state.as_str(),
            event.season.as_str(),
            DEFAULT_FOLDER,
            event.phase.as_str(),
        ],
    };

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| ScrapeError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            })?;
        segments.pop_if_empty();
        for part in prefix {
            segments.push(part.trim_matches('/'));
        }
        segments.push(&filename);
    }

    Ok(url.to_string())
}
