//! Application constants
//!
//! Centralized location for domain-level constants shared by exporters,
//! transmitters and channel clients.

// Channel defaults
pub const DEFAULT_PROVIDER_ID: &str = "EDX";
pub const SAP_COURSE_PAGE_SIZE: usize = 1000;
pub const DEGREED_COURSE_PAGE_SIZE: usize = 1000;

// Request timeouts (seconds) applied to each channel session
pub const SAP_SESSION_TIMEOUT_SECS: u64 = 5;
pub const DEGREED_SESSION_TIMEOUT_SECS: u64 = 60;

// OAuth scope values
pub const SAP_RESOURCE_TYPE: &str = "learning_public_api";
pub const SAP_LEARNER_USER_TYPE: &str = "user";
pub const DEGREED_CONTENT_SCOPE: &str = "provider_content";
pub const DEGREED_COMPLETION_SCOPE: &str = "provider_completion";

// Status recorded when a send fails below the HTTP layer
pub const NETWORK_FAILURE_STATUS: u16 = 500;

// Separator for aggregated page statuses and errors
pub const AGGREGATE_SEPARATOR: &str = ", ";

// Interval bounds used when a course run omits its start or end
pub const UNIX_MIN_DATE_STRING: &str = "1970-01-01T00:00:00Z";
pub const UNIX_MAX_DATE_STRING: &str = "2038-01-19T03:14:07Z";
