use crate::utils::error::{HarvestError, Result};
use std::collections::BTreeSet;

/// 音樂相關分區 (翻唱、原創音樂、VOCALOID)
pub const MUSIC_CATEGORIES: [i64; 3] = [27, 28, 31];

/// 分區過濾；keep-set 為空代表不過濾
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryFilter {
    keep: BTreeSet<i64>,
}

impl CategoryFilter {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn only<I: IntoIterator<Item = i64>>(tags: I) -> Self {
        Self {
            keep: tags.into_iter().collect(),
        }
    }

    pub fn music() -> Self {
        Self::only(MUSIC_CATEGORIES)
    }

    /// 解析 `*`、`music` 或逗號分隔的分區列表
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        if input.is_empty() || input == "*" {
            return Ok(Self::allow_all());
        }
        if input.eq_ignore_ascii_case("music") {
            return Ok(Self::music());
        }

        let mut keep = BTreeSet::new();
        for part in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let tag = part
                .parse::<i64>()
                .map_err(|_| HarvestError::InvalidConfigValueError {
                    field: "categories".to_string(),
                    value: part.to_string(),
                    reason: "Category tag must be an integer".to_string(),
                })?;
            keep.insert(tag);
        }
        Ok(Self { keep })
    }

    pub fn is_unfiltered(&self) -> bool {
        self.keep.is_empty()
    }

    pub fn keep(&self, tag: i64) -> bool {
        self.keep.is_empty() || self.keep.contains(&tag)
    }
}

impl std::fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.keep.is_empty() {
            return write!(f, "*");
        }
        let tags: Vec<String> = self.keep.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", tags.join(","))
    }
}
