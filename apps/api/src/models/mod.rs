pub mod candidate;
pub mod hr;
pub mod job;
pub mod recommendation;
pub mod user;
