use std::collections::HashMap;
use std::fmt;

use crate::model::ScoreRecord;

/// Bar length in display units per point of average.
pub const BAR_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Average {
    Value(f64),
    NoData,
}

impl Average {
    pub fn value(self) -> Option<f64> {
        match self {
            Average::Value(v) => Some(v),
            Average::NoData => None,
        }
    }

    pub fn bar_units(self) -> f64 {
        self.value().map_or(0.0, |v| v * BAR_MULTIPLIER)
    }
}

impl fmt::Display for Average {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Average::Value(v) => write!(f, "{:.2}", v),
            Average::NoData => f.write_str("-"),
        }
    }
}

/// Country name to the scores recorded for it, in source order.
/// Keys are exact and case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreTable {
    scores: HashMap<String, Vec<i64>>,
}

impl ScoreTable {
    pub fn from_records(records: &[ScoreRecord]) -> Self {
        let mut scores: HashMap<String, Vec<i64>> = HashMap::new();
        for rec in records {
            scores
                .entry(rec.country().to_string())
                .or_default()
                .push(rec.score());
        }
        Self { scores }
    }

    pub fn contains(&self, country: &str) -> bool {
        self.scores.contains_key(country)
    }

    pub fn scores(&self, country: &str) -> Option<&[i64]> {
        self.scores.get(country).map(Vec::as_slice)
    }

    pub fn countries(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.scores.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn average_for(&self, country: &str) -> Average {
        match self.scores(country) {
            Some(list) if !list.is_empty() => {
                let sum: i128 = list.iter().map(|&s| i128::from(s)).sum();
                Average::Value(sum as f64 / list.len() as f64)
            }
            _ => Average::NoData,
        }
    }
}
