//! Issue model shared by the store boundary and the index
//!
//! The index never owns issue records. It copies the few fields it orders
//! on and resolves everything else through the store on demand.

mod errors;
mod record;

pub use errors::{IssueError, IssueResult};
pub use record::{IssueId, IssueRecord, IssueStatus, Priority};
