use crate::core::sanitize::sanitize_filename;
use crate::domain::model::{HarvestRecord, OwnerProfile};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// 每行 `<externalId>, <title>`
pub fn render_records(records: &[HarvestRecord]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.external_id);
        out.push_str(", ");
        out.push_str(&record.title);
        out.push('\n');
    }
    out
}

/// 依 UP 主名稱決定輸出檔名
pub fn output_filename(owner: &OwnerProfile) -> String {
    let safe_name = sanitize_filename(&owner.display_name);
    if safe_name.trim().is_empty() {
        // 名稱全是非法字元時改用 UID
        return format!("{}.txt", OwnerProfile::fallback(owner.id).display_name);
    }
    format!("{}.txt", safe_name)
}

pub struct OutputWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> OutputWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 覆寫輸出檔，回傳檔名
    pub async fn write(&self, owner: &OwnerProfile, records: &[HarvestRecord]) -> Result<String> {
        let filename = output_filename(owner);
        let content = render_records(records);

        tracing::debug!("Writing {} bytes to {}", content.len(), filename);
        self.storage.write_file(&filename, content.as_bytes()).await?;

        Ok(filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    fn record(id: &str, title: &str) -> HarvestRecord {
        HarvestRecord {
            external_id: id.to_string(),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_render_records() {
        let rendered = render_records(&[record("BV1", "晴天"), record("BV2", "a, b")]);
        assert_eq!(rendered, "BV1, 晴天\nBV2, a, b\n");
        assert_eq!(render_records(&[]), "");
    }

    #[test]
    fn test_output_filename_sanitizes_owner_name() {
        let owner = OwnerProfile {
            id: 1,
            display_name: "A/B:C*D".to_string(),
        };
        assert_eq!(output_filename(&owner), "ABCD.txt");

        let unnamed = OwnerProfile {
            id: 9,
            display_name: "///".to_string(),
        };
        assert_eq!(output_filename(&unnamed), "up_9.txt");
    }

    #[tokio::test]
    async fn test_write_replaces_previous_content() {
        let storage = MockStorage::default();
        let writer = OutputWriter::new(storage.clone());
        let owner = OwnerProfile::fallback(5);

        writer.write(&owner, &[record("BV1", "old"), record("BV2", "old")]).await.unwrap();
        let name = writer.write(&owner, &[record("BV3", "new")]).await.unwrap();

        assert_eq!(name, "up_5.txt");
        let data = storage.get_file("up_5.txt").await.unwrap();
        assert_eq!(String::from_utf8(data).unwrap(), "BV3, new\n");
    }
}
