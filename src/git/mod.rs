pub mod runner;
pub mod detector;
pub mod query;

pub use runner::{GitRunner, ProcessRunner};
pub use detector::RepositoryDetector;
pub use query::AttributionQuery;
