use serde::Deserialize;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A stored passage returned by similarity search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Passage {
    pub id: Uuid,
    pub text: String,
    pub metadata: serde_json::Value,
    /// Distance to the query under the table's distance strategy (lower is closer)
    pub distance: f64,
}

/// A passage waiting to be embedded and stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPassage {
    pub text: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl NewPassage {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: serde_json::Value::Object(serde_json::Map::new()),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}
