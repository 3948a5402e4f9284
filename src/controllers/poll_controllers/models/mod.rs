use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::poll_models::Poll;

#[derive(Deserialize, Debug)]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<OptionInput>,
}

/// Options may be sent as bare strings or as `{ "text": ... }` objects.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum OptionInput {
    Text(String),
    Object { text: String },
}

impl OptionInput {
    pub fn into_text(self) -> String {
        match self {
            OptionInput::Text(text) | OptionInput::Object { text } => text,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PollOptionResponse {
    pub text: String,
    pub votes: i64,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct PollResponse {
    pub id: String,
    pub question: String,
    pub owner_id: String,
    pub options: Vec<PollOptionResponse>,
    pub total_votes: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Poll> for PollResponse {
    fn from(poll: Poll) -> Self {
        let total_votes = poll.total_votes();
        Self {
            id: poll.id.to_hex(),
            question: poll.question,
            owner_id: poll.owner_id.to_hex(),
            options: poll
                .options
                .into_iter()
                .map(|option| PollOptionResponse {
                    text: option.text,
                    votes: option.votes,
                })
                .collect(),
            total_votes,
            created_at: poll.created_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CastVoteRequest {
    #[serde(alias = "optionIndex", default)]
    pub option_index: Value,
}

impl CastVoteRequest {
    /// Accepts JSON integers, integral floats and numeric strings.
    pub fn option_index(&self) -> Option<i64> {
        match &self.option_index {
            Value::Number(number) => number.as_i64().or_else(|| {
                number
                    .as_f64()
                    .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Deserialize, Serialize, Debug)]
pub struct VoteStatusResponse {
    pub has_voted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub option_index: Option<u32>,
}
