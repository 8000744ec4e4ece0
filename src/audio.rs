use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SampleFormat, SizedSample, Stream};
use ringbuf::{Consumer, Producer, RingBuffer};
use std::f32::consts::TAU;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::console::console_log;

/// Tempo the note-length tokens are measured against.
const BEATS_PER_MINUTE: f32 = 120.0;
/// Queued lane notes the audio thread has not picked up yet.
const NOTE_QUEUE_CAPACITY: usize = 32;
/// Per-sample smoothing toward the requested frequency and level.
const GLIDE: f32 = 0.002;
const PLUCK_LEVEL: f32 = 0.2;
const PLUCK_ATTACK_SECONDS: f32 = 0.01;

/// Musical duration of a triggered lane note.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoteLength {
    Eighth,
    Quarter,
}

impl NoteLength {
    pub fn seconds(&self) -> f32 {
        let beat = 60.0 / BEATS_PER_MINUTE;
        match self {
            NoteLength::Eighth => beat / 2.0,
            NoteLength::Quarter => beat,
        }
    }
}

/// The sound the app drives: one held oscillator plus fire-and-forget notes.
pub trait AudioSink {
    fn set_frequency(&mut self, hz: f32);
    /// `f32::NEG_INFINITY` mutes.
    fn set_volume(&mut self, db: f32);
    fn trigger_note(&mut self, hz: f32, length: NoteLength);
}

/// Sink used until audio is started, or when no device could be opened.
pub struct Muted;

impl AudioSink for Muted {
    fn set_frequency(&mut self, _hz: f32) {}
    fn set_volume(&mut self, _db: f32) {}
    fn trigger_note(&mut self, _hz: f32, _length: NoteLength) {}
}

pub fn db_to_amplitude(db: f32) -> f32 {
    if db == f32::NEG_INFINITY {
        0.0
    } else {
        10f32.powf(db / 20.0)
    }
}

#[derive(Debug)]
pub enum AudioError {
    NoOutputDevice,
    DefaultConfig(cpal::DefaultStreamConfigError),
    BuildStream(cpal::BuildStreamError),
    PlayStream(cpal::PlayStreamError),
    UnsupportedFormat(SampleFormat),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoOutputDevice => write!(f, "failed to find a default output device"),
            AudioError::DefaultConfig(e) => write!(f, "no default output config: {}", e),
            AudioError::BuildStream(e) => write!(f, "failed to build output stream: {}", e),
            AudioError::PlayStream(e) => write!(f, "failed to start output stream: {}", e),
            AudioError::UnsupportedFormat(format) => {
                write!(f, "unsupported sample format {:?}", format)
            }
        }
    }
}

impl std::error::Error for AudioError {}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(e: cpal::DefaultStreamConfigError) -> Self {
        AudioError::DefaultConfig(e)
    }
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(e: cpal::BuildStreamError) -> Self {
        AudioError::BuildStream(e)
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(e: cpal::PlayStreamError) -> Self {
        AudioError::PlayStream(e)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct OscParams {
    frequency: f32,
    amplitude: f32,
}

#[derive(Clone, Copy, Debug)]
struct Pluck {
    frequency: f32,
    seconds: f32,
}

#[derive(Debug)]
struct ActivePluck {
    frequency: f32,
    phase: f32,
    sample: u32,
    attack_samples: u32,
    total_samples: u32,
}

impl ActivePluck {
    fn envelope(&self) -> f32 {
        if self.sample < self.attack_samples {
            self.sample as f32 / self.attack_samples as f32
        } else {
            let release = self.total_samples - self.attack_samples;
            let progress = (self.sample - self.attack_samples) as f32 / release as f32;
            (1.0 - progress).max(0.0)
        }
    }

    fn is_finished(&self) -> bool {
        self.sample >= self.total_samples
    }
}

/// Sample generator living on the audio thread.
#[derive(Debug)]
struct Oscillator {
    sample_rate: f32,
    phase: f32,
    current: OscParams,
    target: OscParams,
    plucks: Vec<ActivePluck>,
}

impl Oscillator {
    fn new(sample_rate: f32) -> Self {
        let silent = OscParams {
            frequency: 0.0,
            amplitude: 0.0,
        };
        Oscillator {
            sample_rate,
            phase: 0.0,
            current: silent,
            target: silent,
            plucks: Vec::new(),
        }
    }

    fn pluck(&mut self, pluck: Pluck) {
        let attack_samples = ((PLUCK_ATTACK_SECONDS * self.sample_rate) as u32).max(1);
        let total_samples = ((pluck.seconds * self.sample_rate) as u32).max(attack_samples + 1);
        self.plucks.push(ActivePluck {
            frequency: pluck.frequency,
            phase: 0.0,
            sample: 0,
            attack_samples,
            total_samples,
        });
    }

    fn next_sample(&mut self) -> f32 {
        // Move value closer to the target, rather than jumping to it
        self.current.frequency += (self.target.frequency - self.current.frequency) * GLIDE;
        self.current.amplitude += (self.target.amplitude - self.current.amplitude) * GLIDE;

        self.phase = (self.phase + self.current.frequency / self.sample_rate) % 1.0;
        let mut value = (self.phase * TAU).sin() * self.current.amplitude;

        for pluck in self.plucks.iter_mut() {
            pluck.phase = (pluck.phase + pluck.frequency / self.sample_rate) % 1.0;
            value += (pluck.phase * TAU).sin() * pluck.envelope() * PLUCK_LEVEL;
            pluck.sample += 1;
        }
        self.plucks.retain(|pluck| !pluck.is_finished());

        value
    }
}

/// Output stream playing the continuous oscillator and lane notes.
pub struct Synth {
    _stream: Stream,
    params: Arc<Mutex<OscParams>>,
    notes: Producer<Pluck>,
}

impl Synth {
    pub fn start() -> Result<Synth, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        let params = Arc::new(Mutex::new(OscParams {
            frequency: 0.0,
            amplitude: 0.0,
        }));
        let (notes, plucks) = RingBuffer::<Pluck>::new(NOTE_QUEUE_CAPACITY).split();

        let stream = match config.sample_format() {
            SampleFormat::F32 => run::<f32>(&device, &config.into(), params.clone(), plucks)?,
            SampleFormat::I16 => run::<i16>(&device, &config.into(), params.clone(), plucks)?,
            SampleFormat::U16 => run::<u16>(&device, &config.into(), params.clone(), plucks)?,
            other => return Err(AudioError::UnsupportedFormat(other)),
        };

        Ok(Synth {
            _stream: stream,
            params,
            notes,
        })
    }
}

impl AudioSink for Synth {
    fn set_frequency(&mut self, hz: f32) {
        if let Ok(mut params) = self.params.lock() {
            params.frequency = hz;
        }
    }

    fn set_volume(&mut self, db: f32) {
        if let Ok(mut params) = self.params.lock() {
            params.amplitude = db_to_amplitude(db);
        }
    }

    fn trigger_note(&mut self, hz: f32, length: NoteLength) {
        let pluck = Pluck {
            frequency: hz,
            seconds: length.seconds(),
        };
        if self.notes.push(pluck).is_err() {
            console_log!("note queue full, dropped {:.1} Hz", hz);
        }
    }
}

fn run<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    params: Arc<Mutex<OscParams>>,
    mut plucks: Consumer<Pluck>,
) -> Result<Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let sample_rate = config.sample_rate.0 as f32;
    let channels = config.channels as usize;
    let mut oscillator = Oscillator::new(sample_rate);

    let err_fn = |err| console_log!("an error occurred on stream: {}", err);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Some(pluck) = plucks.pop() {
                oscillator.pluck(pluck);
            }
            if let Ok(params) = params.lock() {
                oscillator.target = *params;
            }
            write_data(data, channels, &mut || oscillator.next_sample());
        },
        err_fn,
        None,
    )?;
    stream.play()?;
    Ok(stream)
}

fn write_data<T>(output: &mut [T], channels: usize, next_sample: &mut dyn FnMut() -> f32)
where
    T: SizedSample + FromSample<f32>,
{
    for frame in output.chunks_mut(channels) {
        let value: T = T::from_sample(next_sample());
        for sample in frame.iter_mut() {
            *sample = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn decibels_convert_to_linear_gain() {
        assert_approx_eq!(db_to_amplitude(0.0), 1.0);
        assert_approx_eq!(db_to_amplitude(-20.0), 0.1);
        assert_eq!(db_to_amplitude(f32::NEG_INFINITY), 0.0);
    }

    #[test]
    fn note_lengths_follow_the_tempo() {
        assert_approx_eq!(NoteLength::Quarter.seconds(), 0.5);
        assert_approx_eq!(NoteLength::Eighth.seconds(), 0.25);
    }

    #[test]
    fn oscillator_glides_toward_the_target() {
        let mut osc = Oscillator::new(48_000.0);
        osc.target = OscParams {
            frequency: 440.0,
            amplitude: 0.1,
        };
        for _ in 0..100 {
            osc.next_sample();
        }
        assert!(osc.current.frequency > 0.0 && osc.current.frequency < 440.0);
        for _ in 0..48_000 {
            let value = osc.next_sample();
            assert!(value.abs() <= 0.1 + 1e-3);
        }
        assert_approx_eq!(osc.current.frequency, 440.0, 1e-2);
    }

    #[test]
    fn muted_oscillator_is_silent() {
        let mut osc = Oscillator::new(48_000.0);
        for _ in 0..1000 {
            assert_eq!(osc.next_sample(), 0.0);
        }
    }

    #[test]
    fn plucks_end_after_their_length() {
        let mut osc = Oscillator::new(1000.0);
        osc.pluck(Pluck {
            frequency: 220.0,
            seconds: NoteLength::Eighth.seconds(),
        });
        for _ in 0..249 {
            osc.next_sample();
        }
        assert_eq!(osc.plucks.len(), 1);
        osc.next_sample();
        assert!(osc.plucks.is_empty());
    }

    #[test]
    fn full_note_queue_drops_instead_of_blocking() {
        let (mut notes, _plucks) = RingBuffer::<Pluck>::new(1).split();
        let pluck = Pluck {
            frequency: 220.0,
            seconds: 0.1,
        };
        assert!(notes.push(pluck).is_ok());
        assert!(notes.push(pluck).is_err());
    }
}
