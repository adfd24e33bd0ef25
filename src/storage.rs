use crate::config::Config;

/// Renders public URLs for objects kept in media storage. Uploads never
/// overwrite an existing key, so a key always maps to the same object.
pub trait MediaStorage: Send + Sync + 'static {
    fn url(&self, key: &str) -> String;
}

/// Objects served from a public bucket or CDN under `<base_url>/<location>/<key>`.
#[derive(Debug, Clone)]
pub struct PublicMediaStorage {
    base_url: String,
    location: String,
}

impl PublicMediaStorage {
    pub fn new(base_url: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            location: location.into().trim_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.media_base_url.clone(), config.media_location.clone())
    }
}

impl MediaStorage for PublicMediaStorage {
    fn url(&self, key: &str) -> String {
        let key = key.trim_start_matches('/');
        if self.location.is_empty() {
            format!("{}/{}", self.base_url, key)
        } else {
            format!("{}/{}/{}", self.base_url, self.location, key)
        }
    }
}
