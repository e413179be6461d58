pub mod courses;
pub mod index;
pub mod liveness;
pub mod query;
pub mod readiness;
