use serde::{Serialize, Deserialize};
use mongodb::bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Poll {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub owner_id: ObjectId,
    pub question: String,
    pub options: Vec<PollOption>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PollOption {
    pub text: String,
    pub votes: i64,
}

impl Poll {
    /// Builds a fresh poll with every option at zero votes.
    pub fn new(owner_id: ObjectId, question: String, options: Vec<String>) -> Self {
        Self {
            id: ObjectId::new(),
            owner_id,
            question,
            options: options
                .into_iter()
                .map(|text| PollOption { text, votes: 0 })
                .collect(),
            created_at: Utc::now(),
        }
    }

    pub fn total_votes(&self) -> i64 {
        self.options.iter().map(|option| option.votes).sum()
    }

    /// Resolves a caller-supplied index to a valid position in `options`.
    pub fn option_position(&self, option_index: i64) -> Option<usize> {
        usize::try_from(option_index)
            .ok()
            .filter(|&index| index < self.options.len())
    }
}
