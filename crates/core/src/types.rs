/// All timestamps are UTC. Slack message timestamps (`ts` strings like
/// `"1735689600.123456"`) are kept as opaque `String`s; this alias is for
/// wall-clock instants such as lock expiry.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
