use diesel::prelude::*;

use crate::domain::entities::PollResult;
use crate::infrastructure::database::schema::poll_results;

#[derive(Debug, Insertable)]
#[diesel(table_name = poll_results)]
pub struct NewPollResultModel {
    pub poll_date: String,
    pub party: String,
    pub result: f64,
}

impl From<&PollResult> for NewPollResultModel {
    fn from(poll: &PollResult) -> Self {
        Self {
            poll_date: poll.poll_date().to_string(),
            party: poll.party().to_string(),
            result: poll.result(),
        }
    }
}
