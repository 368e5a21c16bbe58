//! Session domain: record/log model and the repository trait.

pub mod model;
pub mod repository;

pub use model::{
    MAX_EMOJIS, MIN_EMOJIS, SessionLog, SessionRecord, TIMESTAMP_FORMAT, now_timestamp,
};
pub use repository::SessionLogRepository;
