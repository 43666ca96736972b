//! Core-Domänentypen: Bézier-Pfad, Persistenz-Form, Wegpunkt-Follower.

pub mod follower;
pub mod path;

pub use follower::{nearest_point_index, DriveCommand, FollowerConfig, PathFollower};
pub use path::{BezierPath, PathData, DEFAULT_POINTS_PER_SEGMENT};
