use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Attachment {
    pub id: i64,
    pub owner_id: i64,
    /// Storage key of the original upload, relative to the media location.
    pub data: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentVariant {
    Thumb,
    SmallThumb,
    Medium,
    MediumLarge,
    Large,
}

impl AttachmentVariant {
    pub fn name(self) -> &'static str {
        match self {
            AttachmentVariant::Thumb => "thumb",
            AttachmentVariant::SmallThumb => "small_thumb",
            AttachmentVariant::Medium => "medium",
            AttachmentVariant::MediumLarge => "medium_large",
            AttachmentVariant::Large => "large",
        }
    }
}

impl Attachment {
    /// Key of a resized rendition, stored next to the original as
    /// `<stem>.<variant>.<ext>`.
    pub fn variant_key(&self, variant: AttachmentVariant) -> String {
        let (dir, file) = match self.data.rsplit_once('/') {
            Some((dir, file)) => (Some(dir), file),
            None => (None, self.data.as_str()),
        };
        let renamed = match file.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => {
                format!("{}.{}.{}", stem, variant.name(), ext)
            }
            _ => format!("{}.{}", file, variant.name()),
        };
        match dir {
            Some(dir) => format!("{}/{}", dir, renamed),
            None => renamed,
        }
    }
}
