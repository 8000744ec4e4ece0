use crate::audio::{AudioSink, Muted, Synth};
use crate::config::Settings;
use crate::console::console_log;
use crate::session::Session;

pub struct Model {
    pub session: Session,
    audio: Option<Synth>,
    audio_failed: bool,
    /// Whether the next `view` draws at all.
    pub redraw: bool,
    /// Set by window events between updates.
    dirty: bool,
}

impl Model {
    pub fn new(settings: Settings) -> Self {
        console_log!(
            "canvas {}x{}, A4 {} Hz, {} lanes from half-step {}",
            settings.canvas_width,
            settings.canvas_height,
            settings.a4,
            settings.note_count,
            settings.note_start
        );
        Model {
            session: Session::new(settings),
            audio: None,
            audio_failed: false,
            redraw: true,
            dirty: true,
        }
    }

    /// Opens the output stream on the first interaction; browsers refuse
    /// audio before a user gesture.
    pub fn ensure_audio(&mut self) {
        if self.audio.is_some() || self.audio_failed {
            return;
        }
        match Synth::start() {
            Ok(synth) => {
                console_log!("audio started");
                self.audio = Some(synth);
                self.session.forget_pushed_audio();
            }
            Err(e) => {
                console_log!("audio unavailable, continuing muted: {}", e);
                self.audio_failed = true;
            }
        }
    }

    pub fn with_audio<R>(&mut self, f: impl FnOnce(&mut Session, &mut dyn AudioSink) -> R) -> R {
        let mut muted = Muted;
        let audio: &mut dyn AudioSink = match self.audio.as_mut() {
            Some(synth) => synth,
            None => &mut muted,
        };
        f(&mut self.session, audio)
    }

    pub fn pointer_changed(&mut self) {
        self.dirty = true;
    }

    /// The window's frame was recreated and holds nothing.
    pub fn resized(&mut self) {
        self.dirty = true;
    }

    /// Decides whether the coming frame is drawn.
    pub fn finish_update(&mut self, worth_updating: bool) {
        self.redraw = worth_updating || std::mem::take(&mut self.dirty);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled() -> Model {
        let mut model = Model::new(Settings::default());
        model.finish_update(false);
        model
    }

    #[test]
    fn first_frame_is_drawn() {
        let mut model = Model::new(Settings::default());
        model.finish_update(false);
        assert!(model.redraw);
        model.finish_update(false);
        assert!(!model.redraw);
    }

    #[test]
    fn pointer_event_forces_one_redraw() {
        let mut model = settled();
        model.pointer_changed();
        model.finish_update(false);
        assert!(model.redraw);
        model.finish_update(false);
        assert!(!model.redraw);
    }

    #[test]
    fn resize_forces_one_redraw() {
        let mut model = settled();
        model.resized();
        model.finish_update(false);
        assert!(model.redraw);
        model.finish_update(false);
        assert!(!model.redraw);
    }

    #[test]
    fn busy_tick_redraws_without_pointer_events() {
        let mut model = settled();
        model.finish_update(true);
        assert!(model.redraw);
    }

    #[test]
    fn audio_stays_muted_until_started() {
        let mut model = settled();
        let ticked = model.with_audio(|session, audio| session.tick(1.0 / 60.0, audio));
        assert!(ticked);
        assert!(model.audio.is_none());
    }
}
