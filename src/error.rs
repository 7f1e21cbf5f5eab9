//! Error types for Mushaf Search

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MushafError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Page table error: {0}")]
    PageTable(String),
}

impl serde::Serialize for MushafError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_message() {
        let err = MushafError::PageTable("missing pages.json".to_string());
        assert_eq!(
            serde_json::to_string(&err).unwrap(),
            "\"Page table error: missing pages.json\""
        );
    }
}
