use crate::bounds::{BBox, Bounds};
use crate::pos::Pos;
use crate::scale::note_frequency;

/// Ladder of fixed-height note lanes growing upward from the canvas bottom.
///
/// Lane `i` (counted from the top) is centred on the divider at
/// `top + i * note_height` and plays `note_start + note_count - i` half-steps
/// from A4. Only the right-aligned key, `note_width` wide, is hit-tested.
#[derive(Clone, Debug)]
pub struct PianoRollArea {
    bbox: BBox,
    a4: f32,
    note_start: i32,
    note_count: u32,
    note_height: f32,
    note_width: f32,
}

impl PianoRollArea {
    /// `bottom` is the fixed lower edge; the box extends `note_count` lanes
    /// above it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f32,
        width: f32,
        bottom: f32,
        a4: f32,
        note_start: i32,
        note_count: u32,
        note_height: f32,
        note_width: f32,
    ) -> Self {
        let height = note_count as f32 * note_height;
        PianoRollArea {
            bbox: BBox::new(x, bottom - height, width, height),
            a4,
            note_start,
            note_count,
            note_height,
            note_width,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bbox.bounds()
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn note_start(&self) -> i32 {
        self.note_start
    }

    pub fn note_count(&self) -> u32 {
        self.note_count
    }

    pub fn top_note(&self) -> i32 {
        self.note_start + self.note_count as i32
    }

    pub fn note_height(&self) -> f32 {
        self.note_height
    }

    pub fn note_width(&self) -> f32 {
        self.note_width
    }

    /// Half-steps played by the lane `lane` positions from the top.
    pub fn lane_note(&self, lane: u32) -> i32 {
        self.top_note() - lane as i32
    }

    pub fn lane_divider_y(&self, lane: u32) -> f32 {
        self.bbox.y + self.note_height * lane as f32
    }

    pub fn lane_key_bbox(&self, lane: u32) -> BBox {
        let bounds = self.bounds();
        let line = self.lane_divider_y(lane);
        BBox::new(
            bounds.right - self.note_width,
            line - self.note_height / 2.0 + 1.0,
            self.note_width,
            self.note_height - 1.0,
        )
    }

    pub fn add_top_note(&mut self) {
        self.note_count += 1;
        self.bbox.y -= self.note_height;
        self.bbox.height += self.note_height;
    }

    pub fn add_top_notes(&mut self, n: u32) {
        for _ in 0..n {
            self.add_top_note();
        }
    }

    pub fn is_point_in_bounds(&self, x: f32, y: f32) -> bool {
        self.bbox.contains(Pos::new(x, y))
    }

    pub fn is_point_in_note_bounds(&self, x: f32, y: f32, lane: u32) -> bool {
        self.lane_key_bbox(lane).contains(Pos::new(x, y))
    }

    /// First lane, scanning from the top, whose key contains the point.
    pub fn lane_at_point(&self, x: f32, y: f32) -> Option<u32> {
        (0..self.note_count).find(|&lane| self.is_point_in_note_bounds(x, y, lane))
    }

    /// Frequency of the key under the point, or `0.0` when there is none.
    pub fn note_frequency_of_point(&self, x: f32, y: f32) -> f32 {
        match self.lane_at_point(x, y) {
            Some(lane) => note_frequency(self.a4, self.lane_note(lane) as f32),
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scale::A4_FREQUENCY;
    use assert_approx_eq::assert_approx_eq;

    fn roll() -> PianoRollArea {
        PianoRollArea::new(0.0, 360.0, 640.0, A4_FREQUENCY, -20, 2, 20.0, 40.0)
    }

    #[test]
    fn height_tracks_note_count() {
        let mut roll = roll();
        assert_approx_eq!(roll.bounds().top, 600.0);
        assert_eq!(roll.top_note(), -18);

        roll.add_top_notes(3);
        assert_eq!(roll.note_count(), 5);
        assert_eq!(roll.top_note(), roll.note_start() + 5);
        assert_approx_eq!(roll.bounds().top, 540.0);
        assert_approx_eq!(roll.bounds().bottom, 640.0);
        assert_approx_eq!(roll.bbox().height, roll.note_count() as f32 * roll.note_height());
    }

    #[test]
    fn key_hits_map_lanes_from_the_top() {
        let roll = roll();
        // lane 0 sits on the top edge, lane 1 one lane below
        assert_approx_eq!(roll.note_frequency_of_point(350.0, 600.0), note_frequency(A4_FREQUENCY, -18.0));
        assert_approx_eq!(roll.note_frequency_of_point(350.0, 621.0), note_frequency(A4_FREQUENCY, -19.0));
    }

    #[test]
    fn key_area_reaches_half_a_lane_above_the_top_edge() {
        let roll = roll();
        assert!(!roll.is_point_in_bounds(350.0, 592.0));
        assert_eq!(roll.lane_at_point(350.0, 592.0), Some(0));
    }

    #[test]
    fn points_outside_the_keys_play_nothing() {
        let roll = roll();
        // inside the lane band but left of the keys
        assert!(roll.is_point_in_bounds(100.0, 610.0));
        assert_eq!(roll.note_frequency_of_point(100.0, 610.0), 0.0);
        // on the one pixel divider gap between keys
        assert_eq!(roll.note_frequency_of_point(350.0, 610.5), 0.0);
        // below the last key
        assert_eq!(roll.note_frequency_of_point(350.0, 635.0), 0.0);
    }

    #[test]
    fn added_lanes_play_higher_notes() {
        let mut roll = roll();
        roll.add_top_note();
        assert_eq!(roll.lane_at_point(350.0, 580.0), Some(0));
        assert_eq!(roll.lane_note(0), -17);
    }
}
