//! 歌單檔解析與時間軸標註
//!
//! 歌單檔格式：
//! - `#` 開頭為註解，空行略過
//! - `BV, 歌名, 歌名2, 英文名/中文名/簡寫`
//! - 歌名含分隔符時整行改用雙分隔：`BV,, 歌名,, 英文名\中文名,,`

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::sync::OnceLock;

/// 歌名 (小寫) 對應到一或多個 BV 號，依檔案順序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SongIndex {
    entries: HashMap<String, Vec<String>>,
}

impl SongIndex {
    pub fn insert(&mut self, name: &str, id: &str) {
        self.entries
            .entry(name.to_lowercase())
            .or_default()
            .push(id.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries.get(&name.to_lowercase()).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 格式有問題的行，不會中斷解析
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SonglistWarning {
    pub line: usize,
    pub content: String,
}

pub fn parse_songlist(content: &str) -> (SongIndex, Vec<SonglistWarning>) {
    let mut index = SongIndex::default();
    let mut warnings = Vec::new();

    for (n, line) in content.lines().enumerate() {
        let line_no = n + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let double_mode = trimmed.contains(",,");
        let (song_delim, alias_delim) = if double_mode { (",,", '\\') } else { (",", '/') };

        let parts: Vec<&str> = trimmed
            .split(song_delim)
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();

        // BV 後面接全形逗號也會落到這裡
        if parts.len() < 2 {
            warnings.push(SonglistWarning {
                line: line_no,
                content: trimmed.to_string(),
            });
            continue;
        }

        let id = parts[0];
        for section in &parts[1..] {
            for name in section.split(alias_delim).map(str::trim) {
                if name.is_empty() {
                    warnings.push(SonglistWarning {
                        line: line_no,
                        content: trimmed.to_string(),
                    });
                    continue;
                }
                index.insert(name, id);
            }
        }
    }

    (index, warnings)
}

fn timeline_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(.*)(\d{2}:\d{2}:\d{2})[ \t]+(.+)$").expect("static pattern")
    })
}

fn bv_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"BV\w+").expect("static pattern"))
}

/// 把 `HH:MM:SS 歌名` 的歌名換成對應的 BV 號，找不到的行保持原樣
pub fn annotate_timeline(text: &str, index: &SongIndex) -> String {
    timeline_line()
        .replace_all(text, |caps: &Captures| {
            let song = bv_token().replace_all(&caps[3], "");
            match index.get(song.trim()) {
                Some(ids) => format!("{}{} {}", &caps[1], &caps[2], ids.join(" ")),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
