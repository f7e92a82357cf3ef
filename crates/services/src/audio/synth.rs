//! Offline renderer for the game's sound effects.
//!
//! Every effect is a handful of oscillator tones with a gain envelope, mixed
//! into one mono `f32` buffer. Ramps follow the usual web-audio shapes: linear
//! attack from silence, exponential decay towards `SILENCE`, and exponential
//! frequency sweeps.

use std::f32::consts::TAU;

use super::SoundEvent;

pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// Floor for exponential ramps, which cannot reach zero.
const SILENCE: f32 = 0.0001;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

impl Waveform {
    /// Value at `phase` cycles, starting at zero like an oscillator node.
    fn sample(self, phase: f32) -> f32 {
        let x = phase.fract();
        match self {
            Waveform::Sine => (TAU * x).sin(),
            Waveform::Triangle => {
                if x < 0.25 {
                    4.0 * x
                } else if x < 0.75 {
                    2.0 - 4.0 * x
                } else {
                    4.0 * x - 4.0
                }
            }
            Waveform::Sawtooth => 2.0 * (x + 0.5).fract() - 1.0,
        }
    }
}

/// One oscillator voice. Times are seconds; `start` is absolute, the rest are
/// relative to `start`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    pub start: f32,
    pub length: f32,
    pub freq_from: f32,
    pub freq_to: f32,
    pub sweep: f32,
    pub peak: f32,
    /// Linear rise from silence; zero starts the tone at `peak`.
    pub attack: f32,
    /// When the exponential decay reaches `SILENCE`.
    pub release_at: f32,
}

impl Tone {
    fn note(waveform: Waveform, start: f32, freq: f32) -> Self {
        Self {
            waveform,
            start,
            length: 0.0,
            freq_from: freq,
            freq_to: freq,
            sweep: 0.0,
            peak: 0.0,
            attack: 0.0,
            release_at: 0.0,
        }
    }

    fn end(&self) -> f32 {
        self.start + self.length
    }

    fn frequency(&self, t: f32) -> f32 {
        if self.sweep <= 0.0 || t >= self.sweep {
            return self.freq_to;
        }
        self.freq_from * (self.freq_to / self.freq_from).powf(t / self.sweep)
    }

    fn gain(&self, t: f32) -> f32 {
        if self.attack > 0.0 && t < self.attack {
            return self.peak * t / self.attack;
        }
        let span = self.release_at - self.attack;
        if span <= 0.0 || t >= self.release_at {
            return SILENCE;
        }
        self.peak * (SILENCE / self.peak).powf((t - self.attack) / span)
    }
}

/// The tones that make up `event`.
#[must_use]
pub fn recipe(event: SoundEvent) -> Vec<Tone> {
    match event {
        SoundEvent::Click => vec![Tone {
            length: 0.07,
            freq_to: 600.0,
            sweep: 0.05,
            peak: 0.12,
            release_at: 0.07,
            ..Tone::note(Waveform::Sine, 0.0, 1200.0)
        }],
        SoundEvent::Correct => [523.25, 783.99]
            .iter()
            .enumerate()
            .map(|(i, &freq)| Tone {
                length: 0.35,
                peak: 0.15,
                attack: 0.03,
                release_at: 0.3,
                ..Tone::note(Waveform::Sine, i as f32 * 0.12, freq)
            })
            .collect(),
        SoundEvent::Wrong => vec![Tone {
            length: 0.3,
            freq_to: 110.0,
            sweep: 0.25,
            peak: 0.08,
            release_at: 0.28,
            ..Tone::note(Waveform::Sawtooth, 0.0, 220.0)
        }],
        SoundEvent::LevelComplete => {
            let notes = [523.25, 659.25, 783.99, 1046.5];
            let last = notes.len() - 1;
            notes
                .iter()
                .enumerate()
                .map(|(i, &freq)| {
                    let hold = if i == last { 0.35 } else { 0.1 };
                    Tone {
                        length: hold + 0.05,
                        peak: if i == last { 0.18 } else { 0.13 },
                        attack: 0.02,
                        release_at: hold,
                        ..Tone::note(Waveform::Triangle, i as f32 * 0.1, freq)
                    }
                })
                .collect()
        }
        SoundEvent::GameOver => [392.0, 349.23, 311.13, 261.63]
            .iter()
            .enumerate()
            .map(|(i, &freq)| Tone {
                length: 0.25,
                peak: 0.1,
                attack: 0.03,
                release_at: 0.22,
                ..Tone::note(Waveform::Sine, i as f32 * 0.18, freq)
            })
            .collect(),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Synthesizer {
    sample_rate: u32,
}

impl Default for Synthesizer {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_RATE)
    }
}

impl Synthesizer {
    #[must_use]
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate: sample_rate.max(1),
        }
    }

    #[must_use]
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Mix the tones of `event` into a mono buffer.
    #[must_use]
    pub fn render(&self, event: SoundEvent) -> Vec<f32> {
        self.render_tones(&recipe(event))
    }

    #[must_use]
    pub fn render_tones(&self, tones: &[Tone]) -> Vec<f32> {
        let rate = self.sample_rate as f32;
        let total = tones.iter().map(Tone::end).fold(0.0_f32, f32::max);
        let mut buffer = vec![0.0_f32; self.samples_for(total)];

        for tone in tones {
            let first = self.samples_for(tone.start);
            let last = self.samples_for(tone.end()).min(buffer.len());
            let mut phase = 0.0_f32;
            for (n, slot) in buffer[first..last].iter_mut().enumerate() {
                let t = n as f32 / rate;
                *slot += tone.waveform.sample(phase) * tone.gain(t);
                phase = (phase + tone.frequency(t) / rate).fract();
            }
        }

        for sample in &mut buffer {
            *sample = sample.clamp(-1.0, 1.0);
        }
        buffer
    }

    fn samples_for(&self, seconds: f32) -> usize {
        (seconds * self.sample_rate as f32).round() as usize
    }
}
