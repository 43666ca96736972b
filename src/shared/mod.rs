//! Geteilte, layer-neutrale Geometrie-Funktionen.

pub mod bezier_geometry;

pub use bezier_geometry::{cubic_bezier_point, polyline_length};
