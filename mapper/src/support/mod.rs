//! Runtime support shared with host applications

pub mod tracing;
