//! Reine Geometrie-Funktionen für kubische Bézier-Kurven.
//!
//! Layer-neutral: kann von `core` und Tests importiert werden,
//! ohne Zirkel-Abhängigkeiten zu erzeugen.

use glam::Vec3;

/// B(t) = (1-t)³·P0 + 3(1-t)²t·P1 + 3(1-t)t²·P2 + t³·P3
///
/// An den Endpunkten exakt: B(0) == p0, B(1) == p3 (Bernstein-Basis).
pub fn cubic_bezier_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let inv = 1.0 - t;
    let inv2 = inv * inv;
    let t2 = t * t;
    inv2 * inv * p0 + 3.0 * inv2 * t * p1 + 3.0 * inv * t2 * p2 + t2 * t * p3
}

/// Approximierte Länge einer Polyline.
pub fn polyline_length(points: &[Vec3]) -> f32 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}
