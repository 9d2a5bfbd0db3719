use crate::domain::model::OwnerProfile;
use crate::domain::ports::ContentListingService;

/// 查詢 UP 主名稱；任何失敗都改用 `up_<id>`，不會中斷抓取
pub async fn resolve_owner<S>(service: &S, owner_id: u64) -> OwnerProfile
where
    S: ContentListingService + ?Sized,
{
    match service.resolve_profile(owner_id).await {
        Ok(lookup) => match lookup.name.filter(|name| !name.is_empty()) {
            Some(display_name) => {
                tracing::info!("👤 Resolved owner {} as '{}'", owner_id, display_name);
                OwnerProfile {
                    id: owner_id,
                    display_name,
                }
            }
            None => {
                tracing::warn!("Profile for {} has no name field, using fallback", owner_id);
                OwnerProfile::fallback(owner_id)
            }
        },
        Err(e) => {
            tracing::warn!("⚠️ Failed to resolve owner {}: {}", owner_id, e);
            OwnerProfile::fallback(owner_id)
        }
    }
}
