//! Bézier-Track-Editor-Kern.
//! Datenstruktur und Algorithmen für zusammengesetzte kubische Bézier-Pfade,
//! als Library exportiert für Tests und Wiederverwendung.

pub mod core;
pub mod shared;

pub use core::{nearest_point_index, DriveCommand, FollowerConfig, PathFollower};
pub use core::{BezierPath, PathData, DEFAULT_POINTS_PER_SEGMENT};
pub use shared::{cubic_bezier_point, polyline_length};
