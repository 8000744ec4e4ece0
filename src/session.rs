use std::time::Duration;

use crate::audio::{AudioSink, NoteLength};
use crate::ball::{Ball, BallState};
use crate::bounds::{BBox, Bounds};
use crate::config::Settings;
use crate::console::console_log;
use crate::linear_area::LinearFrequencyArea;
use crate::note_line::{CollapsingNoteLine, LineEvent};
use crate::piano_roll::PianoRollArea;
use crate::pos::Pos;
use crate::scale::note_frequency;

/// Pointer movement below this many pixels is stylus noise, not activity.
const QUIVER_THRESHOLD: f32 = 0.05;
/// Ticks run by one [`Session::advance`] before the backlog is dropped.
const MAX_TICKS_PER_ADVANCE: u32 = 8;
/// How far below its highest point the ball starts.
const START_DROP: f32 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InteractionMode {
    None,
    DraggingBall,
}

#[derive(Clone, Copy, Debug, Default)]
struct PointerTracker {
    pos: Option<Pos>,
    previous: Option<Pos>,
    in_bounds: bool,
}

impl PointerTracker {
    /// Movement since the last move event, zero for the first one after a
    /// reset.
    fn moved_to(&mut self, p: Pos) -> Pos {
        let delta = match self.previous {
            Some(previous) => p - previous,
            None => Pos::ZERO,
        };
        self.previous = Some(p);
        self.pos = Some(p);
        self.in_bounds = true;
        delta
    }

    fn reset(&mut self) {
        self.previous = None;
    }
}

/// All state shared by the pointer handlers and the fixed-rate tick.
pub struct Session {
    settings: Settings,
    ball: Ball,
    linear: LinearFrequencyArea,
    piano: PianoRollArea,
    line: CollapsingNoteLine,
    mode: InteractionMode,
    pointer: PointerTracker,
    idle_timer: f32,
    current_frequency: f32,
    /// Frequency and volume last sent to the audio sink.
    pushed: Option<(f32, f32)>,
    last_lane: Option<u32>,
    accumulator: Duration,
    ticks: u64,
    shifts: u32,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let piano = PianoRollArea::new(
            0.0,
            settings.canvas_width,
            settings.canvas_height,
            settings.a4,
            settings.note_start,
            settings.note_count,
            settings.note_height,
            settings.note_width,
        );
        let linear = LinearFrequencyArea::new(
            BBox::new(
                0.0,
                0.0,
                settings.canvas_width,
                piano.bounds().top - settings.note_height / 2.0,
            ),
            settings.a4,
            piano.top_note(),
            note_frequency(settings.a4, settings.frequency_end_note as f32),
            settings.note_height,
        );
        let ball = Ball::new(
            Pos::new(
                settings.canvas_width / 2.0,
                settings.max_radius + START_DROP,
            ),
            settings.physics(),
        );

        let mut session = Session {
            settings,
            ball,
            linear,
            piano,
            line: CollapsingNoteLine::default(),
            mode: InteractionMode::None,
            pointer: PointerTracker::default(),
            idle_timer: 0.0,
            current_frequency: 0.0,
            pushed: None,
            last_lane: None,
            accumulator: Duration::ZERO,
            ticks: 0,
            shifts: 0,
        };
        session.current_frequency = session.linear.frequency_of_position(session.ball.pos.y);
        session
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn linear(&self) -> &LinearFrequencyArea {
        &self.linear
    }

    pub fn piano(&self) -> &PianoRollArea {
        &self.piano
    }

    pub fn line(&self) -> &CollapsingNoteLine {
        &self.line
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn current_frequency(&self) -> f32 {
        self.current_frequency
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn shifts(&self) -> u32 {
        self.shifts
    }

    /// Lowest the ball's centre may sink: the top of the highest key.
    pub fn resting_boundary(&self) -> f32 {
        self.piano.bounds().top - self.piano.note_height() / 2.0
    }

    pub fn travel_bounds(&self) -> Bounds {
        let linear = self.linear.bounds();
        Bounds {
            top: linear.top,
            bottom: self.resting_boundary(),
            left: linear.left,
            right: linear.right,
        }
    }

    pub fn ball_state(&self) -> BallState {
        self.ball.state(self.resting_boundary())
    }

    pub fn is_on_ground(&self) -> bool {
        self.ball.is_on_ground(self.resting_boundary())
    }

    pub fn pointer_down(&mut self, p: Pos, audio: &mut dyn AudioSink) {
        self.pointer.pos = Some(p);
        self.pointer.in_bounds = true;

        if self.is_over_piano(p) {
            self.play_lane(p, audio);
            return;
        }

        if self.ball.grab(p) {
            self.mode = InteractionMode::DraggingBall;
            console_log!(
                "grabbed ball at {:.0},{:.0} ratio {:.2}",
                p.x,
                p.y,
                self.ball.grip().radial_ratio
            );
        }
    }

    /// Move events always warrant a redraw.
    pub fn pointer_move(&mut self, p: Pos, audio: &mut dyn AudioSink) {
        let delta = self.pointer.moved_to(p);
        let movement = delta.length();

        // Removes stylus quivering noise.
        if movement > QUIVER_THRESHOLD {
            self.idle_timer = 0.0;
        }

        if self.is_over_piano(p) {
            self.play_lane(p, audio);
            return;
        }
        self.last_lane = None;

        if self.mode == InteractionMode::DraggingBall {
            let travel = self.travel_bounds();
            self.ball.drag_to(p, movement, &travel);
        }
    }

    pub fn pointer_up(&mut self) {
        self.pointer.reset();
        self.release();
    }

    pub fn pointer_left(&mut self) {
        self.pointer.in_bounds = false;
        self.pointer.reset();
        self.last_lane = None;
        self.release();
    }

    fn release(&mut self) {
        if self.mode == InteractionMode::DraggingBall {
            self.mode = InteractionMode::None;
            self.ball.release();
        }
    }

    /// The top key pokes half a lane above the roll's box.
    fn is_over_piano(&self, p: Pos) -> bool {
        self.piano.is_point_in_bounds(p.x, p.y) || self.piano.lane_at_point(p.x, p.y).is_some()
    }

    fn play_lane(&mut self, p: Pos, audio: &mut dyn AudioSink) {
        let lane = self.piano.lane_at_point(p.x, p.y);
        if lane == self.last_lane {
            return;
        }
        self.last_lane = lane;

        if let Some(lane) = lane {
            let frequency = self.piano.note_frequency_of_point(p.x, p.y);
            console_log!("lane {} note {} at {:.1} Hz", lane, self.piano.lane_note(lane), frequency);
            audio.trigger_note(frequency, NoteLength::Eighth);
        }
    }

    /// Runs as many fixed-rate ticks as fit in `elapsed` plus any carried
    /// remainder. Returns whether any of them changed what is on screen.
    pub fn advance(&mut self, elapsed: Duration, audio: &mut dyn AudioSink) -> bool {
        let step = Duration::from_secs_f32(1.0 / self.settings.tick_hz);
        self.accumulator += elapsed;

        let mut worth_updating = false;
        let mut ran = 0;
        while self.accumulator >= step {
            if ran == MAX_TICKS_PER_ADVANCE {
                self.accumulator = Duration::ZERO;
                break;
            }
            worth_updating |= self.tick(step.as_secs_f32(), audio);
            self.accumulator -= step;
            ran += 1;
        }
        worth_updating
    }

    /// One physics step of `dt` seconds. Returns the "worth updating" flag.
    pub fn tick(&mut self, dt: f32, audio: &mut dyn AudioSink) -> bool {
        let mut worth_updating = false;
        let travel = self.travel_bounds();

        if !self.pointer.in_bounds {
            self.release();
        }

        if self.idle_timer > 0.0 && self.mode == InteractionMode::DraggingBall {
            if let Some(p) = self.pointer.pos {
                if self.ball.grip_is_lost(p) {
                    console_log!("grip lost at {:.0},{:.0}", p.x, p.y);
                    self.release();
                } else if self.ball.slip(dt, p, &travel) {
                    worth_updating = true;
                }
            }
        }

        // Distinct from the above because losing the grip switches state.
        if self.mode == InteractionMode::None && self.ball.fall(dt, &travel) {
            worth_updating = true;
        }

        worth_updating |= self.update_line();

        self.current_frequency = self.linear.frequency_of_position(self.ball.pos.y);
        let volume = if self.is_on_ground() {
            f32::NEG_INFINITY
        } else {
            self.settings.volume_db
        };
        self.push_audio(self.current_frequency, volume, audio);

        self.idle_timer += dt;
        self.ticks += 1;
        worth_updating
    }

    /// Makes the next tick resend frequency and volume, e.g. to a sink that
    /// was just started.
    pub fn forget_pushed_audio(&mut self) {
        self.pushed = None;
    }

    fn push_audio(&mut self, frequency: f32, volume: f32, audio: &mut dyn AudioSink) {
        let (last_frequency, last_volume) = self
            .pushed
            .map_or((None, None), |(f, v)| (Some(f), Some(v)));
        if last_frequency != Some(frequency) {
            audio.set_frequency(frequency);
        }
        if last_volume != Some(volume) {
            audio.set_volume(volume);
        }
        self.pushed = Some((frequency, volume));
    }

    fn update_line(&mut self) -> bool {
        let boundary = self.resting_boundary();
        match self
            .line
            .update(self.ball.pos.y, self.settings.max_radius, boundary)
        {
            LineEvent::Idle => false,
            LineEvent::Triggered | LineEvent::Moved => true,
            LineEvent::ReachedBoundary => {
                if !self.shift_one_note() {
                    self.line.reset();
                }
                true
            }
        }
    }

    fn can_shift(&self) -> bool {
        let shrunk_height = self.linear.bounds().height() - self.piano.note_height();
        shrunk_height >= self.settings.min_linear_height()
            && self.linear.note_bottom() + 1 < self.settings.frequency_end_note
    }

    /// Slides the playable window up one half-step: the piano roll gains the
    /// note the linear area gives up, so the total range stays the same.
    ///
    /// Returns `false`, changing nothing, when the linear area has no room
    /// left to give.
    pub fn shift_one_note(&mut self) -> bool {
        if !self.can_shift() {
            console_log!(
                "note shift refused at {} lanes, floor {}",
                self.piano.note_count(),
                self.linear.note_bottom()
            );
            return false;
        }

        self.piano.add_top_note();
        self.linear.pop_bottom_note();

        let boundary = self.resting_boundary();
        self.ball.pin_to(boundary);
        let travel = self.travel_bounds();
        self.ball.limit_to_bounds(&travel);
        self.line.reset();
        self.shifts += 1;

        console_log!(
            "shifted to {} lanes, linear floor {} (shift {})",
            self.piano.note_count(),
            self.linear.note_bottom(),
            self.shifts
        );
        true
    }
}
