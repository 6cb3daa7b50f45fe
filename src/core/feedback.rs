// feedback log - append-only json lines of (question, response, rating)

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Positive,
    Negative,
}

impl Rating {
    pub fn as_str(self) -> &'static str {
        match self {
            Rating::Positive => "positive",
            Rating::Negative => "negative",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "up" | "+" | "👍" | "thumbs up" | "thumbs up 👍" => Ok(Rating::Positive),
            "negative" | "down" | "-" | "👎" | "thumbs down" | "thumbs down 👎" => {
                Ok(Rating::Negative)
            }
            _ => Err(Error::InvalidRating(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub question: String,
    pub response: String,
    pub rating: Rating,
}

pub struct FeedbackLog {
    path: PathBuf,
}

impl FeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    // one write_all per line, the handle closes on every path
    pub fn append(&self, record: &FeedbackRecord) -> Result<(), Error> {
        let mut line = serde_json::to_string(record)?;
        line.push('\n');

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent).map_err(Error::FeedbackLog)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(Error::FeedbackLog)?;

        file.write_all(line.as_bytes()).map_err(Error::FeedbackLog)?;
        file.flush().map_err(Error::FeedbackLog)?;

        debug!(path = %self.path.display(), rating = %record.rating, "appended feedback");
        Ok(())
    }

    // a log that was never written reads as empty
    pub fn read_all(&self) -> Result<Vec<FeedbackRecord>, Error> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::FeedbackLog(e)),
        };

        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(Error::from))
            .collect()
    }
}
