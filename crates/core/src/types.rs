/// Item primary keys are opaque strings generated client-side (UUID v4).
pub type ItemId = String;

/// All timestamps are epoch milliseconds (UTC).
pub type EpochMillis = i64;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> EpochMillis {
    chrono::Utc::now().timestamp_millis()
}

/// Generate a fresh item id.
pub fn new_item_id() -> ItemId {
    uuid::Uuid::new_v4().to_string()
}
