//! Identity-matched before/after flow graphs.

pub mod engine;
pub mod flow;
pub mod summary;
