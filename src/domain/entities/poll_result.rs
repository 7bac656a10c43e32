use serde::{Deserialize, Serialize};

/// Polling share of one party on one poll date (`yyyy/MM/dd`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResult {
    poll_date: String,
    party: String,
    result: f64,
}

impl PollResult {
    pub fn new(poll_date: String, party: String, result: f64) -> Self {
        Self {
            poll_date,
            party,
            result,
        }
    }

    pub fn poll_date(&self) -> &str {
        &self.poll_date
    }

    pub fn party(&self) -> &str {
        &self.party
    }

    pub fn result(&self) -> f64 {
        self.result
    }
}
