use serde::{Deserialize, Serialize};

/// One `(country, score)` observation. On the wire it is a two-element
/// array: `["Pakistan", 231]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord(String, i64);

impl ScoreRecord {
    pub fn new(country: impl Into<String>, score: i64) -> Self {
        Self(country.into(), score)
    }

    pub fn country(&self) -> &str {
        &self.0
    }

    pub fn score(&self) -> i64 {
        self.1
    }
}
