use regex::Regex;
use std::sync::OnceLock;

fn illegal_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("static pattern"))
}

/// 移除檔名中的非法字元，其餘字元原樣保留
pub fn sanitize_filename(name: &str) -> String {
    illegal_chars().replace_all(name, "").into_owned()
}
