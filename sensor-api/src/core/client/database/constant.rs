/// Field holding the ordering key of sensor records.
pub const TIMESTAMP_FIELD: &str = "timestamp";

/// Field whose presence marks a document as a count-record rather than raw data.
pub const COUNT_FIELD: &str = "count";

/// Server assigned identifier.
pub const ID_FIELD: &str = "_id";

/// Audit fields stamped on every document inserted through this service.
pub const CREATED_AT_FIELD: &str = "createdAt";
pub const UPDATED_AT_FIELD: &str = "updatedAt";

/// Database used for server level commands such as `ping`.
pub const ADMIN_DATABASE: &str = "admin";
