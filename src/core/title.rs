use serde::{Deserialize, Serialize};

/// 預設括號優先順序
pub const DEFAULT_DELIMITERS: [(&str, &str); 5] = [
    ("《", "》"),
    ("【", "】"),
    ("〖", "〗"),
    ("『", "』"),
    ("「", "」"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DelimiterPair {
    pub left: String,
    pub right: String,
}

impl DelimiterPair {
    pub fn new(left: &str, right: &str) -> Self {
        Self {
            left: left.to_string(),
            right: right.to_string(),
        }
    }

    /// 左右括號各取第一次出現的位置，左在右之前才算成立
    fn enclosed<'a>(&self, raw: &'a str) -> Option<&'a str> {
        if self.left.is_empty() || self.right.is_empty() {
            return None;
        }
        let left = raw.find(self.left.as_str())?;
        let right = raw.find(self.right.as_str())?;
        if left < right {
            // 左右括號重疊時視為空內容，仍算此組成立
            Some(raw.get(left + self.left.len()..right).unwrap_or(""))
        } else {
            None
        }
    }
}

/// 從投稿標題中取出括號內的歌名
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleExtractor {
    pairs: Vec<DelimiterPair>,
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self::new(
            DEFAULT_DELIMITERS
                .iter()
                .map(|(l, r)| DelimiterPair::new(l, r))
                .collect(),
        )
    }
}

impl TitleExtractor {
    pub fn new(pairs: Vec<DelimiterPair>) -> Self {
        Self { pairs }
    }

    pub fn pairs(&self) -> &[DelimiterPair] {
        &self.pairs
    }

    /// 第一組成立的括號勝出；內容為空或等於 UP 主名稱時回傳原標題
    pub fn extract(&self, raw: &str, owner_name: &str) -> String {
        let candidate = self.pairs.iter().find_map(|pair| pair.enclosed(raw));

        match candidate {
            Some(inner) if !inner.is_empty() && inner != owner_name => inner.to_string(),
            _ => raw.to_string(),
        }
    }
}
