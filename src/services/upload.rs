//! Upload Pipeline - turns a multipart request into form fields plus stored files.
//!
//! File parts are filtered against the media whitelist before anything is
//! written; a rejected part fails the whole request, and files already
//! stored for that request are removed again best-effort.

use axum::extract::Multipart;

use crate::error::{ApiError, FieldError};
use crate::media::{
    is_allowed_media, MediaStore, StoredMedia, MAX_FILE_SIZE, MAX_MEDIA_FILES,
};

/// Text fields of a project create/update request.
///
/// Every field is optional: create validates presence, update treats an
/// absent field as "leave unchanged".
#[derive(Debug, Default, Clone)]
pub struct ProjectForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub thumbnail_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub keep_existing_media: bool,
}

/// Walks the multipart stream, collecting text fields and storing accepted
/// `media` file parts. On any error the files stored so far are discarded.
pub async fn read_project_request(
    multipart: &mut Multipart,
    media: &dyn MediaStore,
) -> Result<(ProjectForm, Vec<StoredMedia>), ApiError> {
    let mut stored = Vec::new();
    match collect(multipart, media, &mut stored).await {
        Ok(form) => Ok((form, stored)),
        Err(e) => {
            discard_stored(media, &stored).await;
            Err(e)
        }
    }
}

/// Best-effort removal of files stored earlier in a failed request.
/// Individual failures are logged and swallowed.
pub async fn discard_stored(media: &dyn MediaStore, stored: &[StoredMedia]) {
    for item in stored {
        if let Err(e) = media.delete(&item.url).await {
            tracing::warn!(url = %item.url, error = %e, "failed to discard stored media file");
        }
    }
}

async fn collect(
    multipart: &mut Multipart,
    media: &dyn MediaStore,
    stored: &mut Vec<StoredMedia>,
) -> Result<ProjectForm, ApiError> {
    let mut form = ProjectForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "multipart read error");
                return Err(ApiError::BadRequest("Invalid multipart data".to_string()));
            }
        };

        let name = field.name().unwrap_or_default().to_string();

        if name == "media" {
            if stored.len() >= MAX_MEDIA_FILES {
                return Err(ApiError::BadRequest(format!(
                    "At most {} media files are allowed per request",
                    MAX_MEDIA_FILES
                )));
            }

            let original_name = field.file_name().unwrap_or("unknown").to_string();
            let content_type = field.content_type().unwrap_or_default().to_string();

            if !is_allowed_media(&original_name, &content_type) {
                return Err(ApiError::UnsupportedMediaType(original_name));
            }

            let bytes = field.bytes().await.map_err(|e| {
                tracing::warn!(error = %e, "failed to read upload bytes");
                ApiError::BadRequest("Failed to read file data".to_string())
            })?;

            if bytes.len() > MAX_FILE_SIZE {
                return Err(ApiError::BadRequest(
                    "File too large. Maximum size is 50MB.".to_string(),
                ));
            }

            stored.push(media.put(&original_name, &bytes).await?);
            continue;
        }

        let text = field.text().await.map_err(|e| {
            tracing::warn!(field = %name, error = %e, "failed to read form field");
            ApiError::BadRequest("Invalid multipart data".to_string())
        })?;

        match name.as_str() {
            "title" => form.title = Some(text),
            "description" => form.description = Some(text),
            "category" => form.category = Some(text),
            "thumbnailUrl" => form.thumbnail_url = Some(text),
            "tags" => {
                let tags: Vec<String> = serde_json::from_str(&text).map_err(|_| {
                    ApiError::Validation(vec![FieldError::new(
                        "tags",
                        "Tags must be a JSON array of strings",
                    )])
                })?;
                form.tags = Some(tags);
            }
            "featured" => form.featured = Some(text == "true"),
            "keepExistingMedia" => form.keep_existing_media = text == "true",
            // Unknown fields are ignored, matching the tolerant wire format.
            _ => {}
        }
    }

    Ok(form)
}
