/// Reset position of the line, the top edge of the canvas.
pub const ARMED_Y: f32 = 0.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineState {
    Armed,
    Chasing,
}

/// Outcome of one [`CollapsingNoteLine::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineEvent {
    Idle,
    Triggered,
    Moved,
    /// The line reached the resting boundary; the caller shifts the note range
    /// and then calls [`CollapsingNoteLine::reset`].
    ReachedBoundary,
}

/// Marker that follows the ball back down after it has touched the ceiling.
///
/// Once chasing, the line only ever moves toward the piano roll.
#[derive(Clone, Debug)]
pub struct CollapsingNoteLine {
    y: f32,
    triggered: bool,
}

impl Default for CollapsingNoteLine {
    fn default() -> Self {
        CollapsingNoteLine {
            y: ARMED_Y,
            triggered: false,
        }
    }
}

impl CollapsingNoteLine {
    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn state(&self) -> LineState {
        if self.triggered {
            LineState::Chasing
        } else {
            LineState::Armed
        }
    }

    /// Triggers once the ball's centre comes within `reach` of the line,
    /// `reach` being the largest radius the ball can have.
    pub fn update(&mut self, ball_y: f32, reach: f32, boundary: f32) -> LineEvent {
        let mut event = LineEvent::Idle;

        if !self.triggered {
            if ball_y - reach > self.y {
                return LineEvent::Idle;
            }
            self.triggered = true;
            event = LineEvent::Triggered;
        }

        if ball_y > self.y {
            self.y = ball_y;
            if event == LineEvent::Idle {
                event = LineEvent::Moved;
            }
        }

        if self.y >= boundary {
            return LineEvent::ReachedBoundary;
        }

        event
    }

    pub fn reset(&mut self) {
        self.y = ARMED_Y;
        self.triggered = false;
    }
}
