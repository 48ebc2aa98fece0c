//! Synthesized sound effects.
//!
//! Each cue is rendered once up front with fundsp and replayed from memory
//! through rodio, fire-and-forget.

use fundsp::prelude32::*;
use log::warn;
use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle};

use crate::engine::Cue;
use crate::error::{Error, Result};

const SAMPLE_RATE: u32 = 44_100;

fn render(mut sound: impl AudioUnit, seconds: f32) -> Vec<f32> {
    sound.set_sample_rate(SAMPLE_RATE as f64);
    sound.reset();
    let len = (SAMPLE_RATE as f32 * seconds) as usize;
    (0..len).map(|_| sound.get_mono()).collect()
}

// Quick upward chirp.
fn jump() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(320.0, 640.0, (t / 0.12).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.12, 0.0, (t / 0.12).min(1.0)));
    render((freq >> sine()) * gain, 0.12)
}

// Two-note blip.
fn score() -> Vec<f32> {
    let freq = lfo(|t: f32| if t < 0.07 { 880.0 } else { 1320.0 });
    let gain = lfo(|t: f32| lerp(0.08, 0.0, (t / 0.16).min(1.0)));
    render((freq >> square()) * gain, 0.16)
}

// Falling sawtooth, 400Hz to 80Hz.
fn game_over() -> Vec<f32> {
    let freq = lfo(|t: f32| lerp(400.0, 80.0, (t / 0.4).min(1.0)));
    let gain = lfo(|t: f32| lerp(0.15, 0.0, (t / 0.5).min(1.0)));
    render((freq >> saw()) * gain, 0.5)
}

pub struct Audio {
    // Dropping the stream silences everything.
    _stream: OutputStream,
    handle: OutputStreamHandle,
    jump: Vec<f32>,
    score: Vec<f32>,
    game_over: Vec<f32>,
}

impl Audio {
    pub fn new() -> Result<Self> {
        let (stream, handle) =
            OutputStream::try_default().map_err(|e| Error::Audio(e.to_string()))?;
        Ok(Self {
            _stream: stream,
            handle,
            jump: jump(),
            score: score(),
            game_over: game_over(),
        })
    }

    /// Falls back to no audio when there is no output device.
    pub fn try_new() -> Option<Self> {
        match Self::new() {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("{e}; playing without sound");
                None
            }
        }
    }

    pub fn play(&self, cue: Cue) {
        let samples = match cue {
            Cue::Jump => &self.jump,
            Cue::Score => &self.score,
            Cue::GameOver => &self.game_over,
        };
        let source = SamplesBuffer::new(1, SAMPLE_RATE, samples.clone());
        if let Err(e) = self.handle.play_raw(source) {
            warn!("could not play {cue:?}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cues_have_expected_length_and_stay_in_range() {
        for (samples, seconds) in [(jump(), 0.12), (score(), 0.16), (game_over(), 0.5)] {
            assert_eq!(samples.len(), (SAMPLE_RATE as f32 * seconds) as usize);
            assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
        }
    }
}
