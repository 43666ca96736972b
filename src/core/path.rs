//! Die zentrale Pfad-Datenstruktur: zusammengesetzte kubische Bézier-Kurve
//! mit Anker-/Tangenten-Editing, Loop-Topologie, Smooth-Modus und
//! inkrementellem Resampling der Segment-Punkte.

use crate::shared::bezier_geometry::cubic_bezier_point;
use anyhow::{bail, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Standard-Dichte der Segment-Abtastung (Punkte je Segment).
pub const DEFAULT_POINTS_PER_SEGMENT: usize = 20;

/// Zusammengesetzter kubischer Bézier-Pfad.
///
/// `handles` ist in Dreiergruppen organisiert: Anker liegen an den Indizes
/// `0, 3, 6, …`, die flankierenden Tangenten-Handles an `3k+1` und `3k+2`.
/// Offener Pfad mit N Ankern: `3N - 2` Handles; Loop: `3N` Handles.
///
/// `segment_points` ist die abgeleitete, flache Abtast-Sequenz: Segment `i`
/// belegt den Bereich `[i·pps, (i+1)·pps)`. Jede Mutation hält beide
/// Sequenzen synchron und tastet nur die betroffenen Segmente neu ab.
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPath {
    handles: Vec<Vec3>,
    segment_points: Vec<Vec3>,
    points_per_segment: usize,
    is_loop: bool,
    is_smooth: bool,
}

/// Persistenz-Form des Pfads.
///
/// Die Sample-Punkte sind abgeleitet und werden nicht gespeichert;
/// `BezierPath::from_data` baut sie deterministisch neu auf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub handles: Vec<Vec3>,
    pub points_per_segment: usize,
    pub is_loop: bool,
    pub is_smooth: bool,
}

impl BezierPath {
    /// Erstellt einen offenen Ein-Segment-Pfad (gerade Linie) um `center`.
    pub fn new(center: Vec3) -> Self {
        let mut path = Self {
            handles: vec![
                center + Vec3::NEG_X,
                center + Vec3::NEG_X * 0.5,
                center + Vec3::X * 0.5,
                center + Vec3::X,
            ],
            segment_points: vec![Vec3::ZERO; DEFAULT_POINTS_PER_SEGMENT],
            points_per_segment: DEFAULT_POINTS_PER_SEGMENT,
            is_loop: false,
            is_smooth: false,
        };
        path.update_segment_points(0);
        path
    }

    // ─── Lese-Zugriff ────────────────────────────────────────────────────────

    /// Handle an Index `i`, Loop-gewrappt (negativ-sicheres Modulo).
    pub fn handle(&self, i: isize) -> Vec3 {
        self.handles[self.wrap_handle(i)]
    }

    /// Anzahl aller Handles (Anker + Tangenten).
    pub fn num_handles(&self) -> usize {
        self.handles.len()
    }

    /// Anzahl der Bézier-Segmente.
    pub fn num_segments(&self) -> usize {
        self.handles.len() / 3
    }

    /// Abtast-Dichte je Segment.
    pub fn points_per_segment(&self) -> usize {
        self.points_per_segment
    }

    /// Loop-Topologie aktiv?
    pub fn is_loop(&self) -> bool {
        self.is_loop
    }

    /// Smooth-Modus (automatische Tangenten-Stetigkeit) aktiv?
    pub fn is_smooth(&self) -> bool {
        self.is_smooth
    }

    /// Die vier Kontrollpunkte von Segment `i`; der vierte Handle ist der
    /// Anker des Folgesegments (Loop-gewrappt).
    pub fn segment_handles(&self, segment: usize) -> [Vec3; 4] {
        let base = segment * 3;
        [
            self.handles[base],
            self.handles[base + 1],
            self.handles[base + 2],
            self.handles[self.wrap_handle(base as isize + 3)],
        ]
    }

    /// Die Sample-Punkte von Segment `i`.
    pub fn segment_points(&self, segment: usize) -> &[Vec3] {
        let base = segment * self.points_per_segment;
        &self.segment_points[base..base + self.points_per_segment]
    }

    /// Die gesamte flache Sample-Sequenz (read-only Consumer-Schnittstelle).
    pub fn points(&self) -> &[Vec3] {
        &self.segment_points
    }

    // ─── Mutation ────────────────────────────────────────────────────────────

    /// Setzt die Abtast-Dichte und tastet bei Änderung alle Segmente neu ab.
    ///
    /// Lehnt `0` ab, ohne den Zustand zu verändern.
    pub fn set_points_per_segment(&mut self, value: usize) -> Result<()> {
        if value == 0 {
            bail!("points_per_segment muss mindestens 1 sein");
        }
        if value != self.points_per_segment {
            self.points_per_segment = value;
            self.segment_points = vec![Vec3::ZERO; self.num_segments() * value];
            self.update_all_segment_points();
        }
        Ok(())
    }

    /// Schaltet die Loop-Topologie um.
    ///
    /// Beim Schließen entstehen zwei gespiegelte Handles (vom letzten und vom
    /// ersten Anker) und ein zusätzliches Segment; beim Öffnen werden beide
    /// wieder entfernt und die offenen Enden per Sehnen-Mittelpunkt-Regel
    /// nachgezogen (nur im Smooth-Modus).
    pub fn set_loop(&mut self, value: bool) {
        if value != self.is_loop {
            self.is_loop = value;
            self.toggle_loop();
        }
    }

    /// Schaltet den Smooth-Modus um.
    ///
    /// Beim Aktivieren werden sofort alle Anker-Tangenten neu geglättet;
    /// beim Deaktivieren bleibt die Geometrie unverändert.
    pub fn set_smooth(&mut self, value: bool) {
        if value != self.is_smooth {
            self.is_smooth = value;
            if value {
                self.smooth_all_anchors();
            }
        }
    }

    /// Hängt ein Segment mit End-Anker `pos` an das offene Ende an.
    ///
    /// Die neue Ausgangs-Tangente entsteht durch Spiegelung der letzten
    /// Eingangs-Tangente am letzten Anker, die Eingangs-Tangente des neuen
    /// Ankers als Mittelpunkt zwischen Spiegelung und `pos`.
    pub fn add_segment(&mut self, pos: Vec3) -> Result<()> {
        if self.is_loop {
            bail!("add_segment ist nur fuer offene Pfade definiert");
        }
        let n = self.handles.len();
        let reflected = self.handles[n - 1] * 2.0 - self.handles[n - 2];
        self.handles.push(reflected);
        self.handles.push((reflected + pos) * 0.5);
        self.handles.push(pos);
        let new_len = self.segment_points.len() + self.points_per_segment;
        self.segment_points.resize(new_len, Vec3::ZERO);

        if self.is_smooth {
            // Der vorletzte Anker hat einen neuen Nachbarn bekommen
            self.smooth_neighbour_anchors(self.handles.len() as isize - 1);
            self.update_segment_points(self.num_segments() - 2);
        }
        self.update_segment_points(self.num_segments() - 1);
        Ok(())
    }

    /// Fügt einen Anker bei `anchor_pos` in Segment `segment` ein und teilt
    /// es in zwei Segmente.
    ///
    /// Ohne Smooth-Modus werden die Tangenten des neuen Ankers einmalig per
    /// Einzel-Anker-Glättung gesetzt (Platzhalter wären sonst Nullvektoren).
    pub fn split_segment(&mut self, anchor_pos: Vec3, segment: usize) -> Result<()> {
        if segment >= self.num_segments() {
            bail!(
                "Segment-Index {} ausserhalb des Bereichs (NumSegments = {})",
                segment,
                self.num_segments()
            );
        }
        let pps = self.points_per_segment;
        let handle_base = segment * 3 + 2;
        self.handles
            .splice(handle_base..handle_base, [Vec3::ZERO, anchor_pos, Vec3::ZERO]);
        let point_base = segment * pps;
        self.segment_points
            .splice(point_base..point_base, vec![Vec3::ZERO; pps]);

        if self.is_smooth {
            self.smooth_neighbour_anchors((segment * 3 + 3) as isize);
        } else {
            self.smooth_anchor(segment * 3 + 3);
        }
        Ok(())
    }

    /// Entfernt den Anker an `anchor_index` samt zugehöriger Tangenten.
    ///
    /// Gibt `Ok(false)` zurück (kein Fehler, kein Zustandswechsel), wenn die
    /// Mindest-Segmentzahl unterschritten würde: 2 im Loop, 1 offen.
    pub fn delete_segment(&mut self, anchor_index: usize) -> Result<bool> {
        if anchor_index >= self.handles.len() {
            bail!(
                "Anker-Index {} ausserhalb des Bereichs (NumHandles = {})",
                anchor_index,
                self.handles.len()
            );
        }
        if anchor_index % 3 != 0 {
            bail!("Index {} ist kein Anker", anchor_index);
        }
        if !(self.num_segments() > 2 || (!self.is_loop && self.num_segments() > 1)) {
            log::debug!(
                "delete_segment abgelehnt: Minimal-Segmentzahl erreicht (NumSegments = {})",
                self.num_segments()
            );
            return Ok(false);
        }

        let pps = self.points_per_segment;
        if anchor_index == 0 {
            if self.is_loop {
                // Schließ-Handle auf die Ausgangs-Tangente des neuen ersten
                // Ankers umbiegen, bevor die Dreiergruppe entfällt
                let last = self.handles.len() - 1;
                self.handles[last] = self.handles[2];
            }
            self.handles.drain(0..3);
            self.segment_points.drain(0..pps);
            self.update_segment_points(self.num_segments() - 1);
        } else if anchor_index == self.handles.len() - 1 && !self.is_loop {
            self.handles.drain(anchor_index - 2..anchor_index + 1);
            let block = (anchor_index / 3 - 1) * pps;
            self.segment_points.drain(block..block + pps);
        } else {
            self.handles.drain(anchor_index - 1..anchor_index + 2);
            let block = anchor_index / 3 * pps;
            self.segment_points.drain(block..block + pps);
            self.update_segment_points(anchor_index / 3 - 1);
        }

        if self.is_smooth {
            self.smooth_neighbour_anchors(anchor_index as isize);
        }
        Ok(true)
    }

    /// Verschiebt einen Handle nach `pos` — die zentrale Editier-Operation.
    ///
    /// - Anker-Verschiebung ohne Smooth-Modus: beide Nachbar-Tangenten werden
    ///   starr mitverschoben.
    /// - Tangenten-Verschiebung ohne Smooth-Modus: die polare Tangente am
    ///   selben Anker wird gespiegelt (gleicher Abstand, Gegenrichtung).
    /// - Anker-Verschiebung im Smooth-Modus: Nachbar-Anker werden neu geglättet.
    /// - Tangenten-Verschiebung im Smooth-Modus: `Ok(false)`, kein
    ///   Zustandswechsel (die Tangenten gehören der Glättung).
    pub fn move_point(&mut self, handle_index: usize, pos: Vec3) -> Result<bool> {
        if handle_index >= self.handles.len() {
            bail!(
                "Handle-Index {} ausserhalb des Bereichs (NumHandles = {})",
                handle_index,
                self.handles.len()
            );
        }
        if handle_index % 3 != 0 && self.is_smooth {
            log::debug!(
                "move_point abgelehnt: Tangenten-Handle {} im Smooth-Modus",
                handle_index
            );
            return Ok(false);
        }
        self.apply_move(handle_index, pos);
        Ok(true)
    }

    /// Setzt die Y-Komponente aller Anker auf 0, über den normalen
    /// Anker-Verschiebe-Pfad (inklusive aller Seiteneffekte).
    ///
    /// Ohne Smooth-Modus werden zusätzlich alle Tangenten-Handles geplättet;
    /// im Smooth-Modus hat die Glättung sie bereits neu platziert.
    pub fn flatten(&mut self) {
        for i in (0..self.handles.len()).step_by(3) {
            let h = self.handles[i];
            self.apply_move(i, Vec3::new(h.x, 0.0, h.z));
        }

        if !self.is_smooth {
            for i in 0..self.handles.len() {
                if i % 3 != 0 {
                    let h = self.handles[i];
                    self.apply_move(i, Vec3::new(h.x, 0.0, h.z));
                }
            }
        }
    }

    // ─── Persistenz-Form ─────────────────────────────────────────────────────

    /// Extrahiert die Persistenz-Form (ohne abgeleitete Sample-Punkte).
    pub fn to_data(&self) -> PathData {
        PathData {
            handles: self.handles.clone(),
            points_per_segment: self.points_per_segment,
            is_loop: self.is_loop,
            is_smooth: self.is_smooth,
        }
    }

    /// Baut einen Pfad aus der Persistenz-Form und tastet alle Segmente ab.
    ///
    /// Validiert die Handle-Anzahl-Regel (`3N` im Loop, `3N-2` offen) und die
    /// Abtast-Dichte, bevor irgendetwas aufgebaut wird.
    pub fn from_data(data: PathData) -> Result<Self> {
        if data.points_per_segment == 0 {
            bail!("points_per_segment muss mindestens 1 sein");
        }
        let n = data.handles.len();
        let valid = if data.is_loop {
            n >= 6 && n % 3 == 0
        } else {
            n >= 4 && n % 3 == 1
        };
        if !valid {
            bail!(
                "Handle-Anzahl {} ungueltig fuer {} Pfad",
                n,
                if data.is_loop { "geschlossenen" } else { "offenen" }
            );
        }

        let mut path = Self {
            handles: data.handles,
            segment_points: Vec::new(),
            points_per_segment: data.points_per_segment,
            is_loop: data.is_loop,
            is_smooth: data.is_smooth,
        };
        path.segment_points = vec![Vec3::ZERO; path.num_segments() * path.points_per_segment];
        path.update_all_segment_points();
        Ok(path)
    }

    // ─── Interne Mutation ────────────────────────────────────────────────────

    /// Verschiebung nach bestandener Validierung anwenden und die ein bis
    /// zwei betroffenen Segmente neu abtasten.
    fn apply_move(&mut self, handle_index: usize, pos: Vec3) {
        let delta = pos - self.handles[handle_index];
        self.handles[handle_index] = pos;
        // Für Tangenten wird auf den Anker-Index umgelenkt, dessen beide
        // Nachbar-Segmente von der Spiegelung betroffen sind
        let mut resample_index = handle_index as isize;

        if self.is_smooth {
            self.smooth_neighbour_anchors(handle_index as isize);
        } else if handle_index % 3 == 0 {
            if handle_index + 1 < self.handles.len() || self.is_loop {
                let i = self.wrap_handle(handle_index as isize + 1);
                self.handles[i] += delta;
            }
            if handle_index >= 1 || self.is_loop {
                let i = self.wrap_handle(handle_index as isize - 1);
                self.handles[i] += delta;
            }
        } else {
            let next_is_anchor = (handle_index + 1) % 3 == 0;
            let polar_index = if next_is_anchor {
                handle_index as isize + 2
            } else {
                handle_index as isize - 2
            };
            let anchor_index = if next_is_anchor {
                handle_index as isize + 1
            } else {
                handle_index as isize - 1
            };
            resample_index = anchor_index;

            if (0 <= polar_index && polar_index < self.handles.len() as isize) || self.is_loop {
                let anchor = self.handles[self.wrap_handle(anchor_index)];
                let polar = self.wrap_handle(polar_index);
                let dist = (anchor - self.handles[polar]).length();
                let dir = (anchor - pos).normalize_or_zero();
                self.handles[polar] = anchor + dir * dist;
            }
        }

        let segment = resample_index / 3;
        if segment < self.num_segments() as isize || self.is_loop {
            let s = self.wrap_segment(segment);
            self.update_segment_points(s);
        }
        if segment - 1 >= 0 || self.is_loop {
            let s = self.wrap_segment(segment - 1);
            self.update_segment_points(s);
        }
    }

    /// Loop-Umschaltung nach bereits geändertem `is_loop`-Flag.
    fn toggle_loop(&mut self) {
        let pps = self.points_per_segment;
        if self.is_loop {
            let n = self.handles.len();
            let closing = self.handles[n - 1] * 2.0 - self.handles[n - 2];
            let opening = self.handles[0] * 2.0 - self.handles[1];
            self.handles.push(closing);
            self.handles.push(opening);
            let new_len = self.segment_points.len() + pps;
            self.segment_points.resize(new_len, Vec3::ZERO);

            if self.is_smooth {
                self.smooth_anchor(0);
                self.smooth_anchor(self.handles.len() - 3);
            }
            self.update_segment_points(self.num_segments() - 1);
        } else {
            let n = self.handles.len();
            self.handles.truncate(n - 2);
            let sp = self.segment_points.len();
            self.segment_points.truncate(sp - pps);

            if self.is_smooth {
                self.smooth_start_and_end_handles();
            }
        }
    }

    // ─── Glättung ────────────────────────────────────────────────────────────

    fn smooth_all_anchors(&mut self) {
        for i in (0..self.handles.len()).step_by(3) {
            self.smooth_anchor(i);
        }
        self.smooth_start_and_end_handles();
    }

    /// Glättet den Anker bei `central_anchor` und seine beiden Nachbar-Anker.
    ///
    /// Akzeptiert auch Indizes außerhalb des gültigen Bereichs (der
    /// Lösch-Pfad ruft mit dem bereits entfernten Index auf); die Guards
    /// filtern bzw. wrappen pro Nachbar.
    fn smooth_neighbour_anchors(&mut self, central_anchor: isize) {
        let n = self.handles.len() as isize;
        let mut i = central_anchor - 3;
        while i <= central_anchor + 3 {
            if (0 <= i && i < n) || self.is_loop {
                let idx = self.wrap_handle(i);
                self.smooth_anchor(idx);
            }
            i += 3;
        }
        self.smooth_start_and_end_handles();
    }

    /// Sehnen-Mittelpunkt-Regel für die beiden offenen Enden: die einzige
    /// freie Tangente eines End-Ankers hat keinen Mittelungs-Partner.
    fn smooth_start_and_end_handles(&mut self) {
        if self.is_loop {
            return;
        }
        let n = self.handles.len();
        self.handles[1] = (self.handles[0] + self.handles[2]) * 0.5;
        self.handles[n - 2] = (self.handles[n - 1] + self.handles[n - 3]) * 0.5;

        self.update_segment_points(0);
        self.update_segment_points(self.num_segments() - 1);
    }

    /// Platziert die beiden Tangenten eines Ankers kolinear entlang der
    /// gemittelten Nachbar-Richtung, skaliert auf den halben Abstand zum
    /// jeweiligen Nachbar-Anker (Catmull-Rom-artige Tangenten-Mittelung).
    fn smooth_anchor(&mut self, anchor_index: usize) {
        let anchor = self.handles[anchor_index];
        let n = self.handles.len() as isize;
        let ai = anchor_index as isize;
        let mut dir = Vec3::ZERO;
        let mut polar_dists = [0.0f32; 2];

        if ai - 3 >= 0 || self.is_loop {
            let offset = self.handles[self.wrap_handle(ai - 3)] - anchor;
            dir += offset.normalize_or_zero();
            polar_dists[0] = offset.length();
        }
        if ai + 3 < n || self.is_loop {
            let offset = self.handles[self.wrap_handle(ai + 3)] - anchor;
            dir -= offset.normalize_or_zero();
            polar_dists[1] = -offset.length();
        }
        dir = dir.normalize_or_zero();

        for (side, &dist) in polar_dists.iter().enumerate() {
            let handle_index = ai + side as isize * 2 - 1;
            if (0 <= handle_index && handle_index < n) || self.is_loop {
                let idx = self.wrap_handle(handle_index);
                self.handles[idx] = anchor + dir * dist * 0.5;
            }
        }

        self.update_segment_points(self.wrap_segment(ai / 3));
        self.update_segment_points(self.wrap_segment(ai / 3 - 1));
    }

    // ─── Abtastung ───────────────────────────────────────────────────────────

    fn update_all_segment_points(&mut self) {
        for i in 0..self.num_segments() {
            self.update_segment_points(i);
        }
    }

    /// Tastet Segment `i` an `pps` inneren Parameterwerten ab:
    /// `t_j = (j+1) / (pps+1)` — Endpunkte ausgeschlossen, Anker werden
    /// nicht in die Sample-Sequenz dupliziert.
    fn update_segment_points(&mut self, segment: usize) {
        let [p0, p1, p2, p3] = self.segment_handles(segment);
        let pps = self.points_per_segment;
        for j in 0..pps {
            let t = (j + 1) as f32 / (pps + 1) as f32;
            self.segment_points[segment * pps + j] = cubic_bezier_point(p0, p1, p2, p3, t);
        }
    }

    // ─── Index-Wrapping ──────────────────────────────────────────────────────

    fn wrap_handle(&self, i: isize) -> usize {
        let n = self.handles.len() as isize;
        ((i % n + n) % n) as usize
    }

    fn wrap_segment(&self, i: isize) -> usize {
        let n = self.num_segments() as isize;
        ((i % n + n) % n) as usize
    }
}
