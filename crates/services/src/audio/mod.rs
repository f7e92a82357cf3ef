//! Sound effects. Playback is fire-and-forget: nothing here can fail into
//! the game loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use crate::error::AudioError;

pub mod synth;

pub use synth::{Synthesizer, Tone, Waveform};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    Click,
    Correct,
    Wrong,
    LevelComplete,
    GameOver,
}

impl SoundEvent {
    pub const ALL: [SoundEvent; 5] = [
        SoundEvent::Click,
        SoundEvent::Correct,
        SoundEvent::Wrong,
        SoundEvent::LevelComplete,
        SoundEvent::GameOver,
    ];
}

pub trait AudioEffectPlayer: Send + Sync {
    fn play(&self, event: SoundEvent);
}

/// Plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct SilentPlayer;

impl AudioEffectPlayer for SilentPlayer {
    fn play(&self, _event: SoundEvent) {}
}

/// Remembers what was played, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingPlayer {
    played: Arc<Mutex<Vec<SoundEvent>>>,
}

impl RecordingPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<SoundEvent> {
        self.played
            .lock()
            .map(|played| played.clone())
            .unwrap_or_default()
    }
}

impl AudioEffectPlayer for RecordingPlayer {
    fn play(&self, event: SoundEvent) {
        if let Ok(mut played) = self.played.lock() {
            played.push(event);
        }
    }
}

/// A rendered effect ready for an output device.
#[derive(Clone, Debug)]
pub struct RenderedSound {
    pub event: SoundEvent,
    pub sample_rate: u32,
    pub samples: Arc<[f32]>,
}

/// Where rendered buffers go.
pub trait SampleSink: Send + Sync {
    /// # Errors
    ///
    /// Returns `AudioError` if the output cannot take the buffer.
    fn submit(&self, sound: RenderedSound) -> Result<(), AudioError>;
}

/// Forwards buffers to whoever owns the real output, e.g. the UI's webview.
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<RenderedSound>,
}

impl ChannelSink {
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RenderedSound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl SampleSink for ChannelSink {
    fn submit(&self, sound: RenderedSound) -> Result<(), AudioError> {
        self.tx.send(sound).map_err(|_| AudioError::Closed)
    }
}

/// Renders every effect once up front and hands copies to `sink` on demand.
pub struct SynthPlayer<S: SampleSink> {
    sink: S,
    sample_rate: u32,
    rendered: HashMap<SoundEvent, Arc<[f32]>>,
}

impl<S: SampleSink> SynthPlayer<S> {
    #[must_use]
    pub fn new(synth: Synthesizer, sink: S) -> Self {
        let rendered = SoundEvent::ALL
            .into_iter()
            .map(|event| (event, Arc::from(synth.render(event))))
            .collect();
        Self {
            sink,
            sample_rate: synth.sample_rate(),
            rendered,
        }
    }
}

impl<S: SampleSink> AudioEffectPlayer for SynthPlayer<S> {
    fn play(&self, event: SoundEvent) {
        let Some(samples) = self.rendered.get(&event) else {
            return;
        };
        let sound = RenderedSound {
            event,
            sample_rate: self.sample_rate,
            samples: Arc::clone(samples),
        };
        if let Err(err) = self.sink.submit(sound) {
            tracing::warn!(?event, %err, "dropping sound effect");
        }
    }
}

/// Mutes `inner` while the player has sound switched off.
pub struct SoundToggle {
    inner: Arc<dyn AudioEffectPlayer>,
    enabled: AtomicBool,
}

impl SoundToggle {
    #[must_use]
    pub fn new(inner: Arc<dyn AudioEffectPlayer>, enabled: bool) -> Self {
        Self {
            inner,
            enabled: AtomicBool::new(enabled),
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
    }
}

impl AudioEffectPlayer for SoundToggle {
    fn play(&self, event: SoundEvent) {
        if self.is_enabled() {
            self.inner.play(event);
        }
    }
}
