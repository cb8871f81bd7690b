use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Performer genres carried on catalogue listings
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Pop,
    Rock,
    HipHop,
    RhythmAndBlues,
    Classical,
    Metal,
}

/// A scheduled concert with one or more performance dates
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concert {
    pub id: Uuid,
    pub title: String,
    pub image_name: String,
    pub blurb: String,
    /// Valid performance date-times. Unordered, unique; a booking or
    /// subscription must reference one of these.
    pub dates: HashSet<DateTime<Utc>>,
    pub performer_ids: Vec<Uuid>,
}

impl Concert {
    pub fn new(title: impl Into<String>, image_name: impl Into<String>, blurb: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            image_name: image_name.into(),
            blurb: blurb.into(),
            dates: HashSet::new(),
            performer_ids: Vec::new(),
        }
    }

    pub fn with_dates(mut self, dates: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        self.dates.extend(dates);
        self
    }

    pub fn with_performers(mut self, performer_ids: impl IntoIterator<Item = Uuid>) -> Self {
        self.performer_ids.extend(performer_ids);
        self
    }

    /// Whether `date` is one of this concert's scheduled performances
    pub fn has_date(&self, date: &DateTime<Utc>) -> bool {
        self.dates.contains(date)
    }

    pub fn summary(&self) -> ConcertSummary {
        ConcertSummary {
            id: self.id,
            title: self.title.clone(),
            image_name: self.image_name.clone(),
        }
    }
}

/// Trimmed concert listing for index pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcertSummary {
    pub id: Uuid,
    pub title: String,
    pub image_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Performer {
    pub id: Uuid,
    pub name: String,
    pub image_name: String,
    pub genre: Genre,
    pub blurb: String,
}

impl Performer {
    pub fn new(
        name: impl Into<String>,
        image_name: impl Into<String>,
        genre: Genre,
        blurb: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            image_name: image_name.into(),
            genre,
            blurb: blurb.into(),
        }
    }
}
