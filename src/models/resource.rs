use std::collections::HashMap;
use serde::Deserialize;

/// One entry of the media host's search response.
#[derive(Deserialize, Debug, Clone)]
pub struct Resource {
    pub public_id: String,
    pub secure_url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub context: Option<ResourceContext>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ResourceContext {
    #[serde(default)]
    pub custom: HashMap<String, String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SearchResponse {
    #[serde(default)]
    pub total_count: u64,
    pub resources: Option<Vec<Resource>>,
}

impl Resource {
    /// Looks up a non-blank value in the resource's custom context metadata.
    pub fn custom(&self, key: &str) -> Option<&str> {
        self.context
            .as_ref()
            .and_then(|context| context.custom.get(key))
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}
