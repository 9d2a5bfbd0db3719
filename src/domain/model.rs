use serde::{Deserialize, Deserializer, Serialize};

/// 內容擁有者 (UP主)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerProfile {
    pub id: u64,
    pub display_name: String,
}

impl OwnerProfile {
    /// 查詢失敗時使用的替代名稱
    pub fn fallback(id: u64) -> Self {
        Self {
            id,
            display_name: format!("up_{}", id),
        }
    }
}

/// 個人資料查詢結果，`name` 可能缺少
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileLookup {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    PubDate,
    Play,
    Collect,
}

impl SortField {
    pub fn code(self) -> u8 {
        match self {
            SortField::PubDate => 1,
            SortField::Play => 2,
            SortField::Collect => 3,
        }
    }
}

/// 一次分頁請求的全部參數
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub owner_id: u64,
    pub cursor: Option<i64>,
    pub page_size: u32,
    pub direction: Direction,
    pub sort_field: SortField,
    pub category_partition: u32,
    pub include_current: bool,
}

/// 列表中的單一投稿
///
/// `internal_id` 對應上游的 `id` 欄位，是分頁游標唯一可用的來源。
/// `alternate_id` (`aid`) 只為完整保留資料而存在，不可用來推進游標。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingItem {
    #[serde(rename = "id")]
    pub internal_id: i64,
    #[serde(rename = "tid", default, deserialize_with = "null_as_default")]
    pub category_tag: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(rename = "bv_id", default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(rename = "aid", default, skip_serializing_if = "Option::is_none")]
    pub alternate_id: Option<i64>,
    /// 其餘欄位原樣保留，封存時輸出
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// 上游偶爾以 null 代替缺欄位，視同預設值，單筆壞資料不可拖垮整頁
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl ListingItem {
    pub fn new(internal_id: i64, category_tag: i64, title: &str, external_id: Option<&str>) -> Self {
        Self {
            internal_id,
            category_tag,
            title: title.to_string(),
            external_id: external_id.map(str::to_string),
            alternate_id: None,
            extra: serde_json::Map::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingPage {
    #[serde(rename = "media_list", default)]
    pub items: Option<Vec<ListingItem>>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ListingPage {
    pub fn new(items: Vec<ListingItem>, has_more: bool) -> Self {
        Self {
            items: Some(items),
            has_more,
            extra: serde_json::Map::new(),
        }
    }

    /// 沒有 `media_list` 的頁面
    pub fn absent() -> Self {
        Self::default()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationCursor {
    pub last_item_internal_id: Option<i64>,
}

impl PaginationCursor {
    /// 以本頁最後一筆的 `internal_id` 作為下一頁游標
    pub fn advance(&mut self, items: &[ListingItem]) {
        if let Some(last) = items.last() {
            self.last_item_internal_id = Some(last.internal_id);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestRecord {
    pub external_id: String,
    pub title: String,
}

/// 分頁迴圈結束的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    /// 上游回報 `has_more = false`
    Exhausted,
    /// 頁面沒有項目或缺少 `media_list`
    EmptyPage,
    /// 抓取失敗，保留已累積的結果
    FetchFailed(String),
    /// 達到頁數上限
    GuardReached,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarvestResult {
    pub records: Vec<HarvestRecord>,
    pub fetches: usize,
    pub termination: Termination,
}

impl HarvestResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_partial(&self) -> bool {
        matches!(self.termination, Termination::FetchFailed(_))
    }
}
