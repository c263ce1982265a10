/// All database primary keys are UUIDs (`gen_random_uuid()` defaults).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
