use serde_json::{Map, Value};

/// One unit handed to [`Emitter::write`](super::Emitter::write).
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// Written verbatim, no framing.
    Raw(String),
    /// Merged onto the `{start, nested}` template and serialized as JSON.
    Record(Map<String, Value>),
}

impl Chunk {
    /// A record carrying only `now`.
    pub fn now(now_ms: u64) -> Self {
        let mut fields = Map::new();
        fields.insert("now".to_string(), Value::from(now_ms));
        Chunk::Record(fields)
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Chunk::Raw(text.to_string())
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Chunk::Raw(text)
    }
}

impl From<Map<String, Value>> for Chunk {
    fn from(fields: Map<String, Value>) -> Self {
        Chunk::Record(fields)
    }
}
