//! Project Service - create/read/update/delete orchestration.
//!
//! Owns field validation, the media merge policy on update, and the
//! media-file cleanup on delete.

use crate::db::models::{NewProject, Project, ProjectUpdate};
use crate::error::{ApiError, FieldError};
use crate::media::{MediaStore, StoredMedia};
use crate::services::upload::{discard_stored, ProjectForm};
use crate::state::AppState;
use crate::store::ProjectStore as _;

/// The category tags a project may carry.
pub const VALID_CATEGORIES: &[&str] = &["video", "design", "social-media"];

fn is_valid_category(category: &str) -> bool {
    VALID_CATEGORIES.contains(&category)
}

fn category_error() -> FieldError {
    FieldError::new(
        "category",
        format!("Category must be one of: {}", VALID_CATEGORIES.join(", ")),
    )
}

/// Creates a project from a validated form plus the files stored for this
/// request. On a validation or storage failure the stored files are
/// discarded again so no orphans are left behind.
pub async fn create(
    state: &AppState,
    form: ProjectForm,
    uploaded: Vec<StoredMedia>,
) -> Result<Project, ApiError> {
    let mut errors = Vec::new();

    let title = form.title.unwrap_or_default();
    if title.trim().is_empty() {
        errors.push(FieldError::new("title", "Title is required"));
    }
    let description = form.description.unwrap_or_default();
    if description.trim().is_empty() {
        errors.push(FieldError::new("description", "Description is required"));
    }
    let category = form.category.unwrap_or_default();
    if !is_valid_category(&category) {
        errors.push(category_error());
    }
    let thumbnail_url = form.thumbnail_url.unwrap_or_default();
    if thumbnail_url.trim().is_empty() {
        errors.push(FieldError::new("thumbnailUrl", "Thumbnail URL is required"));
    }

    if !errors.is_empty() {
        discard_stored(state.media.as_ref(), &uploaded).await;
        return Err(ApiError::Validation(errors));
    }

    let new = NewProject {
        title,
        description,
        category,
        thumbnail_url,
        media_urls: uploaded.iter().map(|m| m.url.clone()).collect(),
        tags: form.tags.unwrap_or_default(),
        featured: form.featured.unwrap_or(false),
    };

    match state.projects.insert(new).await {
        Ok(project) => Ok(project),
        Err(e) => {
            discard_stored(state.media.as_ref(), &uploaded).await;
            Err(e.into())
        }
    }
}

pub async fn get(state: &AppState, id: i32) -> Result<Project, ApiError> {
    state
        .projects
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Project"))
}

pub async fn list(state: &AppState, category: Option<String>) -> Result<Vec<Project>, ApiError> {
    Ok(state.projects.list(category.as_deref()).await?)
}

/// Updates a project. Fields absent from the form keep their prior values.
///
/// Media policy: with `keepExistingMedia` the new files are appended to the
/// existing sequence; otherwise new files replace it, and a metadata-only
/// edit (no new files) leaves the existing media untouched.
pub async fn update(
    state: &AppState,
    id: i32,
    form: ProjectForm,
    new_media: Vec<StoredMedia>,
) -> Result<Project, ApiError> {
    let existing = match state.projects.get(id).await {
        Ok(Some(project)) => project,
        Ok(None) => {
            discard_stored(state.media.as_ref(), &new_media).await;
            return Err(ApiError::NotFound("Project"));
        }
        Err(e) => {
            discard_stored(state.media.as_ref(), &new_media).await;
            return Err(e.into());
        }
    };

    let mut errors = Vec::new();
    if let Some(title) = &form.title {
        if title.trim().is_empty() {
            errors.push(FieldError::new("title", "Title must not be empty"));
        }
    }
    if let Some(description) = &form.description {
        if description.trim().is_empty() {
            errors.push(FieldError::new("description", "Description must not be empty"));
        }
    }
    if let Some(category) = &form.category {
        if !is_valid_category(category) {
            errors.push(category_error());
        }
    }
    if let Some(thumbnail_url) = &form.thumbnail_url {
        if thumbnail_url.trim().is_empty() {
            errors.push(FieldError::new("thumbnailUrl", "Thumbnail URL must not be empty"));
        }
    }
    if !errors.is_empty() {
        discard_stored(state.media.as_ref(), &new_media).await;
        return Err(ApiError::Validation(errors));
    }

    let new_urls: Vec<String> = new_media.iter().map(|m| m.url.clone()).collect();
    let media_urls = if form.keep_existing_media {
        let mut merged = existing.media_urls.clone();
        merged.extend(new_urls);
        merged
    } else if !new_urls.is_empty() {
        new_urls
    } else {
        // No new media and no append request: keep the existing sequence
        // rather than silently wiping it on a metadata-only edit.
        existing.media_urls.clone()
    };

    let update = ProjectUpdate {
        title: form.title.unwrap_or(existing.title),
        description: form.description.unwrap_or(existing.description),
        category: form.category.unwrap_or(existing.category),
        thumbnail_url: form.thumbnail_url.unwrap_or(existing.thumbnail_url),
        media_urls,
        tags: form.tags.unwrap_or(existing.tags),
        featured: form.featured.unwrap_or(existing.featured),
    };

    match state.projects.update(id, update).await {
        Ok(Some(project)) => Ok(project),
        // The record vanished between the read and the write.
        Ok(None) => Err(ApiError::NotFound("Project")),
        Err(e) => Err(e.into()),
    }
}

/// Deletes a project and its media files.
///
/// A failed per-file deletion is logged and skipped so the record removal
/// always proceeds; orphaned files are an accepted gap.
pub async fn delete(state: &AppState, id: i32) -> Result<(), ApiError> {
    let project = state
        .projects
        .get(id)
        .await?
        .ok_or(ApiError::NotFound("Project"))?;

    for url in &project.media_urls {
        if let Err(e) = state.media.delete(url).await {
            tracing::warn!(url = %url, error = %e, "failed to delete media file");
        }
    }

    if !state.projects.delete(id).await? {
        return Err(ApiError::NotFound("Project"));
    }

    tracing::info!(id, "project deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_state() -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::in_memory(dir.path().join("uploads"));
        (state, dir)
    }

    fn valid_form() -> ProjectForm {
        ProjectForm {
            title: Some("Demo".to_string()),
            description: Some("A demo project".to_string()),
            category: Some("video".to_string()),
            thumbnail_url: Some("http://x/y.jpg".to_string()),
            ..Default::default()
        }
    }

    async fn store_file(state: &AppState, name: &str) -> StoredMedia {
        state.media.put(name, b"bytes").await.unwrap()
    }

    fn media_only_form(keep: bool) -> ProjectForm {
        ProjectForm {
            keep_existing_media: keep,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_validates_all_fields_at_once() {
        let (state, _dir) = test_state();
        let err = create(&state, ProjectForm::default(), vec![])
            .await
            .unwrap_err();
        match err {
            ApiError::Validation(errors) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
                assert!(fields.contains(&"title"));
                assert!(fields.contains(&"description"));
                assert!(fields.contains(&"category"));
                assert!(fields.contains(&"thumbnailUrl"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_category() {
        let (state, _dir) = test_state();
        let mut form = valid_form();
        form.category = Some("podcast".to_string());
        let err = create(&state, form, vec![]).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_sets_media_urls_and_defaults() {
        let (state, _dir) = test_state();
        let file = store_file(&state, "clip.mp4").await;
        let project = create(&state, valid_form(), vec![file.clone()])
            .await
            .unwrap();
        assert_eq!(project.media_urls, vec![file.url]);
        assert!(!project.featured);
        assert!(project.tags.is_empty());
    }

    #[tokio::test]
    async fn test_create_failure_discards_stored_files() {
        let (state, _dir) = test_state();
        let file = store_file(&state, "clip.mp4").await;
        let on_disk = state.upload_dir.join(&file.filename);
        assert!(on_disk.exists());

        create(&state, ProjectForm::default(), vec![file])
            .await
            .unwrap_err();
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_update_keep_existing_appends_in_order() {
        let (state, _dir) = test_state();
        let old = store_file(&state, "old.mp4").await;
        let project = create(&state, valid_form(), vec![old.clone()]).await.unwrap();

        let new = store_file(&state, "new.png").await;
        let updated = update(&state, project.id, media_only_form(true), vec![new.clone()])
            .await
            .unwrap();
        assert_eq!(updated.media_urls, vec![old.url, new.url]);
    }

    #[tokio::test]
    async fn test_update_replaces_media_when_not_keeping() {
        let (state, _dir) = test_state();
        let old = store_file(&state, "old.mp4").await;
        let project = create(&state, valid_form(), vec![old]).await.unwrap();

        let new = store_file(&state, "new.png").await;
        let updated = update(&state, project.id, media_only_form(false), vec![new.clone()])
            .await
            .unwrap();
        assert_eq!(updated.media_urls, vec![new.url]);
    }

    #[tokio::test]
    async fn test_metadata_only_update_keeps_media() {
        let (state, _dir) = test_state();
        let old = store_file(&state, "old.mp4").await;
        let project = create(&state, valid_form(), vec![old.clone()]).await.unwrap();

        let form = ProjectForm {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        let updated = update(&state, project.id, form, vec![]).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.media_urls, vec![old.url]);
        // Untouched fields keep their prior values.
        assert_eq!(updated.description, "A demo project");
        assert_eq!(updated.category, "video");
    }

    #[tokio::test]
    async fn test_update_missing_id_is_not_found_and_discards_files() {
        let (state, _dir) = test_state();
        let file = store_file(&state, "new.png").await;
        let on_disk = state.upload_dir.join(&file.filename);

        let err = update(&state, 42, media_only_form(false), vec![file])
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
        assert!(!on_disk.exists());
    }

    #[tokio::test]
    async fn test_delete_removes_record_and_files() {
        let (state, _dir) = test_state();
        let a = store_file(&state, "a.mp4").await;
        let b = store_file(&state, "b.png").await;
        let paths = [
            state.upload_dir.join(&a.filename),
            state.upload_dir.join(&b.filename),
        ];
        let project = create(&state, valid_form(), vec![a, b]).await.unwrap();

        delete(&state, project.id).await.unwrap();

        assert!(matches!(
            get(&state, project.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
        for path in &paths {
            assert!(!path.exists());
        }
    }

    #[tokio::test]
    async fn test_delete_proceeds_past_missing_files() {
        let (state, _dir) = test_state();
        let file = store_file(&state, "a.mp4").await;
        let project = create(&state, valid_form(), vec![file.clone()]).await.unwrap();

        // File disappears out from under the record.
        state.media.delete(&file.url).await.unwrap();

        delete(&state, project.id).await.unwrap();
        assert!(matches!(
            get(&state, project.id).await.unwrap_err(),
            ApiError::NotFound(_)
        ));
    }
}
