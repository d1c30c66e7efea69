// Player evaluation subsystem: external service client, grade aggregation,
// and the durable review cache.

pub mod cache;
pub mod client;
pub mod grade;

pub use cache::ReviewCache;
pub use client::{EvalClient, Evaluator, GradeRequest, ReviewRequest};
pub use grade::{grade_roster, GradeReport};
