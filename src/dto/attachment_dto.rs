use serde::{Deserialize, Serialize};

use crate::models::attachment::{Attachment, AttachmentVariant};
use crate::storage::MediaStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachmentResponse {
    pub id: i64,
    pub url: String,
    pub thumb_url: String,
    pub small_thumb_url: String,
    pub medium_url: String,
    pub medium_large_url: String,
    pub large_url: String,
}

impl AttachmentResponse {
    pub fn new(attachment: &Attachment, storage: &dyn MediaStorage) -> Self {
        let variant_url = |variant: AttachmentVariant| storage.url(&attachment.variant_key(variant));
        Self {
            id: attachment.id,
            url: storage.url(&attachment.data),
            thumb_url: variant_url(AttachmentVariant::Thumb),
            small_thumb_url: variant_url(AttachmentVariant::SmallThumb),
            medium_url: variant_url(AttachmentVariant::Medium),
            medium_large_url: variant_url(AttachmentVariant::MediumLarge),
            large_url: variant_url(AttachmentVariant::Large),
        }
    }
}
