//! Log file following.
//!
//! Provides a follower that starts at the end of a file and yields every
//! complete line appended after that point, polling while no data is
//! available and reopening the file when it is truncated or replaced.

mod buffer;
mod error;
mod follower;

pub use buffer::LineBuffer;
pub use error::LineSourceError;
pub use follower::{FollowOptions, LogFollower};
