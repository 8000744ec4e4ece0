use crate::bounds::{BBox, Bounds};
use crate::scale::{frequency_of_position_in_linear_range, note_frequency, scale};

/// Region where the ball's height plays a continuous pitch.
///
/// The bottom edge sounds `note_bottom` and the top edge sounds
/// `frequency_end`; anything in between is linear in frequency.
#[derive(Clone, Debug)]
pub struct LinearFrequencyArea {
    bbox: BBox,
    a4: f32,
    note_bottom: i32,
    frequency_end: f32,
    note_height: f32,
}

impl LinearFrequencyArea {
    pub fn new(bbox: BBox, a4: f32, note_bottom: i32, frequency_end: f32, note_height: f32) -> Self {
        LinearFrequencyArea {
            bbox,
            a4,
            note_bottom,
            frequency_end,
            note_height,
        }
    }

    pub fn bounds(&self) -> Bounds {
        self.bbox.bounds()
    }

    pub fn bbox(&self) -> BBox {
        self.bbox
    }

    pub fn note_bottom(&self) -> i32 {
        self.note_bottom
    }

    pub fn frequency_start(&self) -> f32 {
        note_frequency(self.a4, self.note_bottom as f32)
    }

    pub fn frequency_end(&self) -> f32 {
        self.frequency_end
    }

    pub fn frequency_of_position(&self, y: f32) -> f32 {
        let bounds = self.bounds();
        frequency_of_position_in_linear_range(
            self.frequency_start(),
            self.frequency_end,
            bounds.bottom,
            bounds.top,
            y,
        )
    }

    pub fn position_of_frequency(&self, frequency: f32) -> f32 {
        let bounds = self.bounds();
        scale(
            self.frequency_start(),
            self.frequency_end,
            frequency,
            bounds.bottom,
            bounds.top,
        )
    }

    /// Raises the floor of the range by one half-step and gives up one lane
    /// height at the bottom edge.
    pub fn pop_bottom_note(&mut self) {
        self.note_bottom += 1;
        self.bbox.height -= self.note_height;
    }

    pub fn pop_bottom_notes(&mut self, n: u32) {
        for _ in 0..n {
            self.pop_bottom_note();
        }
    }

    /// Fill colour stops for the background gradient, bottom to top.
    ///
    /// The brightness follows where the floor sits within the full octave
    /// span, so the fill darkens a little as the floor climbs.
    pub fn fill_stops(&self) -> [(f32, f32); 2] {
        let floor = scale(0.0, self.frequency_end, self.frequency_start(), 0.0, 1.0);
        [(0.1, 0.1 + floor * 0.2), (1.0, 1.0 - floor * 0.3)]
    }
}
