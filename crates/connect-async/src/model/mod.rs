//! Request and result types for every operation
//!
//! All types are plain values. Fields serialize in PascalCase and enumerations
//! in SCREAMING_SNAKE_CASE, matching the service's JSON documents. Operations
//! without a payload return `()`.

pub mod common;
pub mod contact;
pub mod federation;
pub mod hierarchy;
pub mod metrics;
pub mod queue;
pub mod routing;
pub mod tags;
pub mod user;

pub use common::{DEFAULT_PAGE_SIZE, MAX_RESULTS_LIMIT, Paginated, ResourceSummary, Tags};
pub use contact::*;
pub use federation::*;
pub use hierarchy::*;
pub use metrics::*;
pub use queue::*;
pub use routing::*;
pub use tags::*;
pub use user::*;
