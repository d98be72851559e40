//! Analysis: semantic similarity, skill coverage, and the combined report.

pub mod coverage;
pub mod handlers;
pub mod report;
pub mod similarity;
pub mod upload;
