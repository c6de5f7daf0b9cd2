//! The run loop.
//!
//! A running application is a cycle: drivers turn the outside world into
//! actions, the application turns actions into state and follow-on actions,
//! and the drivers turn those back into effects. [`RunLoop`] builds this
//! cycle once, using a [`PendingConnection`] to hand drivers the
//! application's output before it exists.

mod driver;
mod error;
mod pending;
mod run_loop;

pub use driver::{Application, Driver};
pub use error::{DriverError, RunError};
pub use pending::PendingConnection;
pub use run_loop::{RunLoop, RunOptions, Running, ACTION_LOG_TARGET};
