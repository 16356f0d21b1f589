//! Directory — organization profile, departments, employees, and
//! reviewer-reviewee assignment edges.

pub mod handlers;
pub mod queries;
