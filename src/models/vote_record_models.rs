use serde::{Deserialize, Serialize};
use mongodb::bson::{oid::ObjectId, serde_helpers::chrono_datetime_as_bson_datetime};
use chrono::{DateTime, Utc};

/// One counted vote. Unique per `(poll_id, user_id)`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VoteRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub poll_id: ObjectId,

    pub user_id: ObjectId,

    pub option_index: u32,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl VoteRecord {
    pub fn new(poll_id: ObjectId, user_id: ObjectId, option_index: u32) -> Self {
        Self {
            id: ObjectId::new(),
            poll_id,
            user_id,
            option_index,
            created_at: Utc::now(),
        }
    }
}
