use crate::domain::model::{Direction, ListingPage, PageRequest, ProfileLookup};
use crate::domain::ports::ContentListingService;
use crate::utils::error::{HarvestError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, REFERER};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.bilibili.com";
pub const DEFAULT_REFERER: &str = "https://www.bilibili.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

const PROFILE_PATH: &str = "/x/web-interface/card";
const MEDIA_LIST_PATH: &str = "/x/v2/medialist/resource/list";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(15),
        }
    }
}

/// `{ code, message, data }` 回應外殼
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    code: i64,
    #[serde(default)]
    message: String,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct CardData {
    card: Option<Card>,
}

#[derive(Debug, Deserialize)]
struct Card {
    name: Option<String>,
}

/// 匿名存取 Bilibili 公開 API
#[derive(Debug, Clone)]
pub struct BiliListingClient {
    client: Client,
    base_url: Url,
}

impl BiliListingClient {
    pub fn new(options: &ClientOptions) -> Result<Self> {
        let base_url = Url::parse(&options.base_url).map_err(|e| {
            HarvestError::InvalidConfigValueError {
                field: "base_url".to_string(),
                value: options.base_url.clone(),
                reason: e.to_string(),
            }
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(REFERER, HeaderValue::from_static(DEFAULT_REFERER));

        let client = Client::builder()
            .user_agent(options.user_agent.clone())
            .default_headers(headers)
            .timeout(options.timeout)
            .build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| HarvestError::config(format!("Invalid endpoint {}: {}", path, e)))
    }

    async fn get_envelope<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>> {
        tracing::debug!("GET {}", url);
        let response = self.client.get(url).send().await?.error_for_status()?;
        let envelope: Envelope<T> = response.json().await?;

        if envelope.code != 0 {
            return Err(HarvestError::UpstreamError {
                code: envelope.code,
                message: envelope.message,
            });
        }
        Ok(envelope.data)
    }
}

/// 組出 medialist 查詢參數，游標不存在時不送 `oid`
pub fn media_list_query(request: &PageRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("mobi_app", "web".to_string()),
        ("type", "1".to_string()),
        ("biz_id", request.owner_id.to_string()),
    ];
    if let Some(cursor) = request.cursor {
        query.push(("oid", cursor.to_string()));
    }
    query.extend([
        ("otype", "2".to_string()),
        ("ps", request.page_size.to_string()),
        // direction=false 表示往較舊的方向翻頁
        ("direction", "false".to_string()),
        (
            "desc",
            (request.direction == Direction::Descending).to_string(),
        ),
        ("sort_field", request.sort_field.code().to_string()),
        ("tid", request.category_partition.to_string()),
        ("with_current", request.include_current.to_string()),
    ]);
    query
}

#[async_trait]
impl ContentListingService for BiliListingClient {
    async fn resolve_profile(&self, owner_id: u64) -> Result<ProfileLookup> {
        let mut url = self.endpoint(PROFILE_PATH)?;
        url.query_pairs_mut()
            .append_pair("mid", &owner_id.to_string());

        let data: Option<CardData> = self.get_envelope(url).await?;
        let name = data.and_then(|d| d.card).and_then(|c| c.name);
        Ok(ProfileLookup { name })
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ListingPage> {
        let mut url = self.endpoint(MEDIA_LIST_PATH)?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in media_list_query(request) {
                pairs.append_pair(key, &value);
            }
        }

        let data: Option<serde_json::Value> = self.get_envelope(url).await?;
        match data {
            Some(value) if value.is_object() => {
                let page: ListingPage = serde_json::from_value(value)?;
                tracing::debug!(
                    "Page keys: {:?}, has_more: {}",
                    page.extra.keys().collect::<Vec<_>>(),
                    page.has_more
                );
                Ok(page)
            }
            // data 為 null 視同沒有資料
            Some(serde_json::Value::Null) | None => Ok(ListingPage::absent()),
            Some(other) => Err(HarvestError::malformed(format!(
                "expected object in data, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SortField;

    fn request(cursor: Option<i64>) -> PageRequest {
        PageRequest {
            owner_id: 42,
            cursor,
            page_size: 30,
            direction: Direction::Descending,
            sort_field: SortField::PubDate,
            category_partition: 0,
            include_current: false,
        }
    }

    fn value_of<'a>(query: &'a [(&'static str, String)], key: &str) -> Option<&'a str> {
        query
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_first_page_query_has_no_oid() {
        let query = media_list_query(&request(None));
        assert_eq!(value_of(&query, "oid"), None);
        assert_eq!(value_of(&query, "biz_id"), Some("42"));
        assert_eq!(value_of(&query, "ps"), Some("30"));
        assert_eq!(value_of(&query, "desc"), Some("true"));
        assert_eq!(value_of(&query, "sort_field"), Some("1"));
        assert_eq!(value_of(&query, "tid"), Some("0"));
        assert_eq!(value_of(&query, "with_current"), Some("false"));
    }

    #[test]
    fn test_cursor_sent_as_oid() {
        let query = media_list_query(&request(Some(500)));
        assert_eq!(value_of(&query, "oid"), Some("500"));
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let options = ClientOptions {
            base_url: "not a url".to_string(),
            ..ClientOptions::default()
        };
        assert!(BiliListingClient::new(&options).is_err());
    }
}
