// SPDX-FileCopyrightText: 2026 Cinelist Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Media references for uploaded photos and image documents.
//!
//! Files are not downloaded here. The backend fetches them through the
//! resolved file URL when an image is attached to a film.

use cinelist_core::error::CinelistError;
use cinelist_core::types::MediaRef;
use teloxide::prelude::*;
use teloxide::types::{Document, FileMeta, PhotoSize};
use tracing::{debug, warn};

/// Resolves the download URL of a file via the Bot API's `getFile`.
pub async fn file_url(bot: &Bot, file_meta: &FileMeta) -> Result<String, CinelistError> {
    let file = bot
        .get_file(file_meta.id.clone())
        .await
        .map_err(|e| CinelistError::Channel {
            message: format!("failed to get file info: {e}"),
            source: Some(Box::new(e)),
        })?;

    let url = bot
        .api_url()
        .join(&format!("file/bot{}/{}", bot.token(), file.path))
        .map_err(|e| CinelistError::Channel {
            message: format!("invalid file url: {e}"),
            source: Some(Box::new(e)),
        })?;
    debug!(file_id = %file_meta.id, "resolved Telegram file url");
    Ok(url.to_string())
}

/// Reference to `file_meta`. A URL that cannot be resolved is left out;
/// the backend may still fetch the file by id.
async fn media_ref(bot: &Bot, file_meta: &FileMeta) -> MediaRef {
    let url = match file_url(bot, file_meta).await {
        Ok(url) => Some(url),
        Err(e) => {
            warn!(error = %e, "could not resolve file url");
            None
        }
    };
    MediaRef {
        file_id: file_meta.id.to_string(),
        url,
    }
}

/// Reference to the largest variant of a photo (last in the array).
pub async fn photo_ref(bot: &Bot, photos: &[PhotoSize]) -> Result<MediaRef, CinelistError> {
    let largest = photos.last().ok_or_else(|| CinelistError::Channel {
        message: "photo array is empty".into(),
        source: None,
    })?;
    Ok(media_ref(bot, &largest.file).await)
}

/// Reference to a document sent as a file. Only images qualify.
pub async fn document_ref(bot: &Bot, doc: &Document) -> Result<Option<MediaRef>, CinelistError> {
    if !is_image(doc) {
        debug!(file_name = ?doc.file_name, "ignoring non-image document");
        return Ok(None);
    }
    Ok(Some(media_ref(bot, &doc.file).await))
}

fn is_image(doc: &Document) -> bool {
    doc.mime_type
        .as_ref()
        .is_some_and(|m| m.type_() == "image")
}
