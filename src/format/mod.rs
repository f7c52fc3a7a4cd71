pub mod relative;
pub mod absolute;

pub use relative::relative_time;
pub use absolute::{absolute_time, DEFAULT_DATE_FORMAT};
