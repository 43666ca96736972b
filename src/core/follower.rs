//! Wegpunkt-Follower: konsumiert die Sample-Sequenz eines Pfads read-only
//! und berechnet Lenkwinkel- und Antriebs-Kommandos für ein Fahrzeug.
//!
//! Reine Regel-Logik ohne Physik: Integration von Position und
//! Geschwindigkeit ist Sache des Aufrufers.

use super::path::BezierPath;
use glam::Vec3;

/// Parameter des Followers (Werte in Welteinheiten, Grad, km/h).
#[derive(Debug, Clone, Copy)]
pub struct FollowerConfig {
    /// Oberhalb dieser Geschwindigkeit wird kein Drehmoment mehr angelegt
    pub max_speed: f32,
    /// Antriebs-Drehmoment unterhalb von `max_speed`
    pub max_motor_torque: f32,
    /// Maximaler Lenkeinschlag in Grad
    pub max_steer_angle_deg: f32,
    /// Annäherungs-Faktor des Lenkwinkels (pro Sekunde)
    pub turn_speed: f32,
    /// Erreicht-Radius um den aktuellen Wegpunkt
    pub waypoint_radius: f32,
}

impl Default for FollowerConfig {
    fn default() -> Self {
        Self {
            max_speed: 100.0,
            max_motor_torque: 80.0,
            max_steer_angle_deg: 45.0,
            turn_speed: 5.0,
            waypoint_radius: 0.25,
        }
    }
}

/// Ergebnis eines Follower-Schritts.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DriveCommand {
    /// Geglätteter Lenkwinkel in Grad (positiv = rechts)
    pub steer_angle_deg: f32,
    /// Anzulegendes Antriebs-Drehmoment
    pub motor_torque: f32,
}

/// Läuft die Sample-Sequenz eines Pfads per Index-Fortschaltung ab.
#[derive(Debug, Clone)]
pub struct PathFollower {
    config: FollowerConfig,
    point_index: usize,
    steer_angle_deg: f32,
}

impl PathFollower {
    pub fn new(config: FollowerConfig) -> Self {
        Self {
            config,
            point_index: 0,
            steer_angle_deg: 0.0,
        }
    }

    /// Index des aktuellen Ziel-Wegpunkts.
    pub fn point_index(&self) -> usize {
        self.point_index
    }

    /// Aktueller Ziel-Wegpunkt (Index gegen die Sequenz-Länge gewrappt,
    /// falls der Pfad seit dem letzten Schritt geschrumpft ist).
    pub fn target(&self, path: &BezierPath) -> Vec3 {
        let points = path.points();
        points[self.point_index % points.len()]
    }

    /// Springt zum nächstgelegenen Wegpunkt — zum Initialisieren oder nach
    /// größeren Pfad-Änderungen.
    pub fn seek_nearest(&mut self, path: &BezierPath, position: Vec3) {
        if let Some(index) = nearest_point_index(path, position) {
            self.point_index = index;
        }
    }

    /// Ein Regel-Schritt: Lenkwinkel annähern, Drehmoment entscheiden,
    /// bei Erreichen des Wegpunkts den Index fortschalten (Loop-gewrappt).
    ///
    /// `forward` ist die Blickrichtung des Fahrzeugs (Y-up-Konvention,
    /// rechts = `(forward.z, 0, -forward.x)`).
    pub fn update(
        &mut self,
        path: &BezierPath,
        position: Vec3,
        forward: Vec3,
        current_speed: f32,
        dt: f32,
    ) -> DriveCommand {
        let points = path.points();
        self.point_index %= points.len();
        let target = points[self.point_index];

        // Lenk-Ziel: lateraler Anteil des Ziels im Fahrzeug-Koordinatensystem
        let to_target = target - position;
        let f = forward.normalize_or_zero();
        let right = Vec3::new(f.z, 0.0, -f.x);
        let distance = to_target.length();
        let steer_target = if distance > f32::EPSILON {
            (to_target.dot(right) / distance) * self.config.max_steer_angle_deg
        } else {
            0.0
        };
        let blend = (self.config.turn_speed * dt).clamp(0.0, 1.0);
        self.steer_angle_deg += (steer_target - self.steer_angle_deg) * blend;

        let motor_torque = if current_speed <= self.config.max_speed {
            self.config.max_motor_torque
        } else {
            0.0
        };

        if distance < self.config.waypoint_radius {
            self.point_index = (self.point_index + 1) % points.len();
        }

        DriveCommand {
            steer_angle_deg: self.steer_angle_deg,
            motor_torque,
        }
    }
}

/// Findet den Index des nächstgelegenen Sample-Punkts.
pub fn nearest_point_index(path: &BezierPath, position: Vec3) -> Option<usize> {
    path.points()
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            position
                .distance_squared(**a)
                .total_cmp(&position.distance_squared(**b))
        })
        .map(|(index, _)| index)
}
