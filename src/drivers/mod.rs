//! Effectful boundaries of the run loop.
//!
//! - [`dom`]: headless render target for view trees
//! - [`history`]: location tracking and route resolution
//! - [`manual`]: caller-controlled action source, for tests and scripts

pub mod dom;
pub mod history;
pub mod manual;
