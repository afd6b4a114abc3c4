//! Identifier sources for new strategies and connections.

use crate::config::IdScheme;

/// Produces identifiers that never repeat within a session.
pub trait IdGenerator: Send {
    fn next_id(&mut self) -> String;
}

/// Millisecond timestamps, bumped by one when the clock has not advanced.
#[derive(Debug, Default)]
pub struct ClockIds {
    last: i64,
}

impl ClockIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for ClockIds {
    fn next_id(&mut self) -> String {
        let now = chrono::Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        self.last.to_string()
    }
}

/// Random v4 UUIDs.
#[derive(Debug, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix1`, `prefix2`, ... ids.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Start counting at `start` instead of 1.
    pub fn starting_at(prefix: impl Into<String>, start: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: start,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

/// Build the generator selected by configuration.
pub fn generator_for(scheme: IdScheme) -> Box<dyn IdGenerator> {
    match scheme {
        IdScheme::Clock => Box::new(ClockIds::new()),
        IdScheme::Uuid => Box::new(UuidIds),
    }
}
