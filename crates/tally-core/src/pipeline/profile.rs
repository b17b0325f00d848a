use crate::cache::{CacheManager, Namespace};
use crate::error::{TallyError, TallyResult};
use crate::models::{AvatarUploadResponse, ProfileUpdate, UserProfile};
use crate::transport::{ApiClient, FilePart};
use tracing::info;

/// Validate and submit a profile change
pub async fn update_profile(
    api: &ApiClient,
    cache: &CacheManager,
    update: &ProfileUpdate,
) -> TallyResult<UserProfile> {
    update.validate()?;
    let profile: UserProfile = api.patch_json("/users/profile", update).await?;
    cache.invalidate(Namespace::Profile);
    info!(user = %profile.id, "profile updated");
    Ok(profile)
}

/// Upload a new avatar image
pub async fn upload_avatar(
    api: &ApiClient,
    cache: &CacheManager,
    image: FilePart,
) -> TallyResult<AvatarUploadResponse> {
    if image.is_empty() {
        return Err(TallyError::validation_field("Choose an image", "file"));
    }
    if !image.mime.starts_with("image/") {
        return Err(TallyError::validation_field(
            format!("'{}' is not an image", image.file_name),
            "file",
        ));
    }

    let response: AvatarUploadResponse =
        api.post_multipart("/users/profile/avatar", image).await?;
    cache.invalidate(Namespace::Profile);
    info!(avatar_url = %response.avatar_url, "avatar updated");
    Ok(response)
}
