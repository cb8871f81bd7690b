use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use encore_domain::{Concert, ConcertCatalog, Performer, StoreError};

/// In-memory concert/performer directory. The catalogue is read-only after
/// startup, so lookups clone straight out of plain maps.
pub struct ConcertDirectory {
    concerts: HashMap<Uuid, Concert>,
    performers: HashMap<Uuid, Performer>,
}

impl ConcertDirectory {
    pub fn new() -> Self {
        Self {
            concerts: HashMap::new(),
            performers: HashMap::new(),
        }
    }

    pub fn add_concert(&mut self, concert: Concert) {
        self.concerts.insert(concert.id, concert);
    }

    pub fn add_performer(&mut self, performer: Performer) {
        self.performers.insert(performer.id, performer);
    }

    pub fn concert_count(&self) -> usize {
        self.concerts.len()
    }
}

impl Default for ConcertDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConcertCatalog for ConcertDirectory {
    async fn concert(&self, id: Uuid) -> Result<Option<Concert>, StoreError> {
        Ok(self.concerts.get(&id).cloned())
    }

    async fn concerts(&self) -> Result<Vec<Concert>, StoreError> {
        let mut all: Vec<Concert> = self.concerts.values().cloned().collect();
        all.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(all)
    }

    async fn performer(&self, id: Uuid) -> Result<Option<Performer>, StoreError> {
        Ok(self.performers.get(&id).cloned())
    }

    async fn performers(&self) -> Result<Vec<Performer>, StoreError> {
        let mut all: Vec<Performer> = self.performers.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn is_valid_date(&self, concert_id: Uuid, date: DateTime<Utc>) -> Result<bool, StoreError> {
        Ok(self
            .concerts
            .get(&concert_id)
            .map(|c| c.has_date(&date))
            .unwrap_or(false))
    }
}
