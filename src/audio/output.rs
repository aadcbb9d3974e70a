use cpal::{
    self,
    traits::{DeviceTrait, HostTrait, StreamTrait},
    FromSample, Sample, SizedSample,
};
use log::{debug, trace, warn};
use ringbuf::{HeapProducer, HeapRb};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::audio::synth::{Mixer, Voice, MAX_VOICES};
use crate::audio::SoundPlayer;

#[derive(Debug, thiserror::Error)]
pub enum AudioError {
    #[error("No output device available")]
    NoOutputDevice,

    #[error("Output config not supported: {0}")]
    Config(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Audio stream error: {0}")]
    Stream(String),
}

/// An open output stream and the handles used to feed it
struct Output {
    stream: cpal::Stream,
    voices: HeapProducer<Voice>,
    clock: Arc<AtomicU64>,
    sample_rate: f32,
    playing: bool,
}

impl Output {
    fn open() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;

        let supported = device
            .default_output_config()
            .map_err(|e| AudioError::Config(e.to_string()))?;
        let sample_format = supported.sample_format();
        let config: cpal::StreamConfig = supported.into();
        let sample_rate = config.sample_rate.0 as f32;

        let (voices, queue) = HeapRb::<Voice>::new(MAX_VOICES).split();
        let clock = Arc::new(AtomicU64::new(0));
        let mixer = Mixer::new(queue, Arc::clone(&clock), sample_rate);

        let stream = match sample_format {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config, mixer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config, mixer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config, mixer)?,
            other => return Err(AudioError::UnsupportedFormat(format!("{:?}", other))),
        };

        debug!(
            "Opened audio output: {} Hz, {} channels, {:?}",
            config.sample_rate.0, config.channels, sample_format
        );

        Ok(Self {
            stream,
            voices,
            clock,
            sample_rate,
            playing: false,
        })
    }

    /// Starts the stream if it is paused. Safe to call repeatedly.
    fn resume(&mut self) -> Result<(), AudioError> {
        if !self.playing {
            self.stream
                .play()
                .map_err(|e| AudioError::Stream(e.to_string()))?;
            self.playing = true;
        }
        Ok(())
    }

    fn pause(&mut self) {
        if self.playing {
            if let Err(e) = self.stream.pause() {
                debug!("Failed to pause audio output: {}", e);
            }
            self.playing = false;
        }
    }

    /// Frames rendered by the device so far
    fn now(&self) -> u64 {
        self.clock.load(Ordering::Relaxed)
    }

    fn schedule(&mut self, voice: Voice) {
        if self.voices.push(voice).is_err() {
            trace!("Voice queue full, dropping {:?}", voice.kind);
        }
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut mixer: Mixer,
) -> Result<cpal::Stream, AudioError>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = config.channels as usize;
    let err_fn = |err: cpal::StreamError| {
        warn!("An error occurred on the audio output stream: {}", err);
    };

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = T::from_sample(mixer.next_sample());
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            err_fn,
            None,
        )
        .map_err(|e| AudioError::Stream(e.to_string()))
}

enum Backend {
    /// Not opened yet
    Idle,
    Ready(Output),
    /// Opening failed; sounds are skipped from now on
    Unavailable,
}

/// Plays the wheel's sound effects on the default output device.
///
/// The device is opened on the first sound and resumed before every sound.
/// When no output can be opened the player goes quiet for good.
pub struct AudioFeedback {
    backend: Backend,
    muted: bool,
}

impl AudioFeedback {
    pub fn new() -> Self {
        Self {
            backend: Backend::Idle,
            muted: false,
        }
    }

    /// False once opening the output has failed
    pub fn is_available(&self) -> bool {
        !matches!(self.backend, Backend::Unavailable)
    }

    fn ensure_ready(&mut self) -> Option<&mut Output> {
        if self.muted {
            return None;
        }

        if matches!(self.backend, Backend::Idle) {
            self.backend = match Output::open() {
                Ok(output) => Backend::Ready(output),
                Err(e) => {
                    warn!("Audio disabled: {}", e);
                    Backend::Unavailable
                }
            };
        }

        let resumed = match &mut self.backend {
            Backend::Ready(output) => output.resume(),
            _ => return None,
        };
        if let Err(e) = resumed {
            warn!("Audio disabled: {}", e);
            self.backend = Backend::Unavailable;
            return None;
        }

        match &mut self.backend {
            Backend::Ready(output) => Some(output),
            _ => None,
        }
    }
}

impl Default for AudioFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl SoundPlayer for AudioFeedback {
    fn play_tick(&mut self) {
        if let Some(output) = self.ensure_ready() {
            let voice = Voice::tick(output.now(), output.sample_rate);
            output.schedule(voice);
        }
    }

    fn play_fanfare(&mut self) {
        if let Some(output) = self.ensure_ready() {
            let now = output.now();
            for voice in Voice::fanfare(now, output.sample_rate) {
                output.schedule(voice);
            }
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if muted {
            if let Backend::Ready(output) = &mut self.backend {
                output.pause();
            }
        }
    }

    fn is_muted(&self) -> bool {
        self.muted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_muted_player_never_opens_device() {
        let mut player = AudioFeedback::new();
        player.set_muted(true);
        player.play_tick();
        player.play_fanfare();

        assert!(player.is_muted());
        assert!(matches!(player.backend, Backend::Idle));
    }

    #[test]
    fn test_sounds_never_fail_without_device() {
        // Whether or not the machine has an output device, these return quietly
        let mut player = AudioFeedback::new();
        for _ in 0..100 {
            player.play_tick();
        }
        player.play_fanfare();
        player.set_muted(true);
        player.set_muted(false);
        player.play_tick();
    }

    #[test]
    fn test_unavailable_backend_stays_quiet() {
        let mut player = AudioFeedback {
            backend: Backend::Unavailable,
            muted: false,
        };
        player.play_tick();
        player.play_fanfare();
        assert!(!player.is_available());
        assert!(matches!(player.backend, Backend::Unavailable));
    }
}
