//! Best-effort UI sound cues gated by a session-scoped mute flag.
//!
//! Cues never block and never fail the caller: output errors are logged at
//! debug level and dropped. The mute flag lives only in memory.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Click,
    Swoosh,
}

/// A sine tone with an exponential frequency sweep and decay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub start_hz: f32,
    pub end_hz: f32,
    pub duration: Duration,
    /// Initial gain; decays exponentially to near silence.
    pub gain: f32,
}

impl Cue {
    #[must_use]
    pub fn tone(self) -> Tone {
        match self {
            Cue::Click => Tone {
                start_hz: 800.0,
                end_hz: 800.0,
                duration: Duration::from_millis(50),
                gain: 0.08,
            },
            Cue::Swoosh => Tone {
                start_hz: 400.0,
                end_hz: 200.0,
                duration: Duration::from_millis(150),
                gain: 0.06,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output: {0}")]
    NoDevice(String),
    #[error("audio thread is gone")]
    Disconnected,
}

pub trait AudioOutput: Send {
    fn play(&mut self, tone: Tone) -> Result<(), AudioError>;
}

/// Discards every tone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentOutput;

impl AudioOutput for SilentOutput {
    fn play(&mut self, _tone: Tone) -> Result<(), AudioError> {
        Ok(())
    }
}

/// The platform output when built with audio support, otherwise silence.
#[must_use]
pub fn default_output() -> Box<dyn AudioOutput> {
    #[cfg(feature = "audio")]
    {
        Box::new(rodio_output::RodioOutput::new())
    }
    #[cfg(not(feature = "audio"))]
    {
        Box::new(SilentOutput)
    }
}

#[cfg(feature = "audio")]
pub use rodio_output::RodioOutput;

#[derive(Debug, Clone, Copy)]
struct ScheduledCue {
    cue: Cue,
    remaining: Duration,
}

pub struct SoundCue {
    muted: bool,
    output: Box<dyn AudioOutput>,
    scheduled: Vec<ScheduledCue>,
}

impl std::fmt::Debug for SoundCue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SoundCue")
            .field("muted", &self.muted)
            .field("scheduled", &self.scheduled)
            .finish_non_exhaustive()
    }
}

impl SoundCue {
    #[must_use]
    pub fn new(output: Box<dyn AudioOutput>, muted: bool) -> Self {
        Self {
            muted,
            output,
            scheduled: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            self.scheduled.clear();
        }
    }

    pub fn toggle_mute(&mut self) {
        self.set_muted(!self.muted);
        tracing::debug!(muted = self.muted, "Sound toggled");
    }

    pub fn play_click(&mut self) {
        self.play(Cue::Click);
    }

    pub fn play_swoosh(&mut self) {
        self.play(Cue::Swoosh);
    }

    pub fn play(&mut self, cue: Cue) {
        if self.muted {
            return;
        }
        if let Err(err) = self.output.play(cue.tone()) {
            tracing::debug!(?cue, "Sound cue dropped: {err}");
        }
    }

    /// Play `cue` after `delay`, if still unmuted then.
    pub fn play_after(&mut self, cue: Cue, delay: Duration) {
        self.scheduled.push(ScheduledCue {
            cue,
            remaining: delay,
        });
    }

    pub fn advance(&mut self, delta: Duration) {
        if self.scheduled.is_empty() {
            return;
        }
        let mut due = Vec::new();
        self.scheduled.retain_mut(|entry| {
            entry.remaining = entry.remaining.saturating_sub(delta);
            if entry.remaining.is_zero() {
                due.push(entry.cue);
                false
            } else {
                true
            }
        });
        for cue in due {
            self.play(cue);
        }
    }
}

#[cfg(feature = "audio")]
mod rodio_output {
    use std::sync::mpsc::{self, Sender};
    use std::thread;
    use std::time::Duration;

    use rodio::{OutputStream, Source};

    use super::{AudioError, AudioOutput, Tone};

    const SAMPLE_RATE: u32 = 44_100;
    const FLOOR_GAIN: f32 = 0.001;

    /// Plays tones on a dedicated audio thread created on first use.
    #[derive(Debug, Default)]
    pub struct RodioOutput {
        tx: Option<Sender<Tone>>,
    }

    impl RodioOutput {
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        fn sender(&mut self) -> Result<&Sender<Tone>, AudioError> {
            if self.tx.is_none() {
                let (tx, rx) = mpsc::channel::<Tone>();
                thread::Builder::new()
                    .name("fitsyn-audio".to_string())
                    .spawn(move || {
                        let (_stream, handle) = match OutputStream::try_default() {
                            Ok(pair) => pair,
                            Err(err) => {
                                tracing::warn!("Could not open audio output: {err}");
                                return;
                            }
                        };
                        while let Ok(tone) = rx.recv() {
                            if let Err(err) = handle.play_raw(ToneSource::new(tone)) {
                                tracing::debug!("Tone playback failed: {err}");
                            }
                        }
                    })
                    .map_err(|e| AudioError::NoDevice(e.to_string()))?;
                self.tx = Some(tx);
            }
            self.tx.as_ref().ok_or(AudioError::Disconnected)
        }
    }

    impl AudioOutput for RodioOutput {
        fn play(&mut self, tone: Tone) -> Result<(), AudioError> {
            self.sender()?
                .send(tone)
                .map_err(|_| AudioError::Disconnected)
        }
    }

    struct ToneSource {
        tone: Tone,
        index: u32,
        total: u32,
        phase: f32,
    }

    impl ToneSource {
        fn new(tone: Tone) -> Self {
            let total = (tone.duration.as_secs_f32() * SAMPLE_RATE as f32) as u32;
            Self {
                tone,
                index: 0,
                total,
                phase: 0.0,
            }
        }
    }

    impl Iterator for ToneSource {
        type Item = f32;

        fn next(&mut self) -> Option<f32> {
            if self.index >= self.total {
                return None;
            }
            let t = self.index as f32 / self.total.max(1) as f32;
            let freq = self.tone.start_hz * (self.tone.end_hz / self.tone.start_hz).powf(t);
            let gain = self.tone.gain * (FLOOR_GAIN / self.tone.gain).powf(t);
            self.phase = (self.phase + freq / SAMPLE_RATE as f32).fract();
            self.index += 1;
            Some((self.phase * std::f32::consts::TAU).sin() * gain)
        }
    }

    impl Source for ToneSource {
        fn current_frame_len(&self) -> Option<usize> {
            Some((self.total - self.index) as usize)
        }

        fn channels(&self) -> u16 {
            1
        }

        fn sample_rate(&self) -> u32 {
            SAMPLE_RATE
        }

        fn total_duration(&self) -> Option<Duration> {
            Some(self.tone.duration)
        }
    }
}
