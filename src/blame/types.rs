use serde::{Deserialize, Serialize};

/// Author name reported when the porcelain output carries no `author` record.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Author git reports for lines that only exist in the working tree.
pub const NOT_COMMITTED_AUTHOR: &str = "Not Committed Yet";

/// Author shown in place of [`NOT_COMMITTED_AUTHOR`].
pub const UNCOMMITTED_AUTHOR: &str = "You";

/// Summary shown for lines that have no commit yet.
pub const UNCOMMITTED_SUMMARY: &str = "Uncommitted changes";

/// Attribution for a single line, parsed from `git blame --porcelain` output.
///
/// A value only exists when the output carried an `author-time` record;
/// output without one is unusable and the parser yields `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineAttribution {
    /// Full commit id from the porcelain header, empty if the header was missing.
    pub commit: String,
    pub author: String,
    pub author_mail: Option<String>,
    /// Seconds since the unix epoch.
    pub author_time: i64,
    pub summary: String,
    pub is_uncommitted: bool,
}
