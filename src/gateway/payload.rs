use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Event;

/// Body of `POST /events`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventRequest {
    pub event_id: Uuid,
    pub talent_id: String,
    pub raw_metric: f64,
    pub skill: String,
    pub ts: DateTime<Utc>,
}

impl From<EventRequest> for Event {
    fn from(req: EventRequest) -> Self {
        Event::new(req.event_id, req.talent_id, req.raw_metric, req.skill, req.ts)
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct LimitQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize, Debug, Default)]
pub struct SeedQuery {
    pub count: Option<i64>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SeedResponse {
    pub seeded: usize,
}
