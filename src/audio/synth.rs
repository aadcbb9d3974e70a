// Sound synthesis
// Voices, envelopes and the mixer that runs inside the output callback

use ringbuf::HeapConsumer;
use std::f32::consts::TAU;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on voices playing at once (and on voices waiting to start)
pub const MAX_VOICES: usize = 32;

pub const TICK_DURATION: f32 = 0.05;
pub const TICK_START_FREQUENCY: f32 = 800.0;
pub const TICK_END_FREQUENCY: f32 = 100.0;
pub const TICK_START_GAIN: f32 = 0.1;
pub const TICK_END_GAIN: f32 = 0.01;

/// C5, E5, G5, C6
pub const FANFARE_NOTES: [f32; 4] = [523.25, 659.25, 783.99, 1046.50];
pub const NOTE_DURATION: f32 = 0.4;
pub const NOTE_STAGGER: f32 = 0.1;
pub const NOTE_ATTACK: f32 = 0.05;
pub const NOTE_PEAK_GAIN: f32 = 0.2;

/// Time from the first fanfare note starting to the last one ending
pub fn fanfare_length() -> Duration {
    let notes = FANFARE_NOTES.len() as f32;
    Duration::from_secs_f32(NOTE_STAGGER * (notes - 1.0) + NOTE_DURATION)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
}

impl Waveform {
    /// Oscillator output for `phase` in cycles, `[0, 1)`
    pub fn sample(self, phase: f32) -> f32 {
        match self {
            Waveform::Sine => (TAU * phase).sin(),
            Waveform::Triangle => {
                if phase < 0.25 {
                    4.0 * phase
                } else if phase < 0.75 {
                    2.0 - 4.0 * phase
                } else {
                    4.0 * phase - 4.0
                }
            }
        }
    }
}

fn exponential_ramp(from: f32, to: f32, progress: f32) -> f32 {
    from * (to / from).powf(progress.clamp(0.0, 1.0))
}

/// Tick pitch `t` seconds into the sweep
pub fn tick_frequency(t: f32) -> f32 {
    exponential_ramp(TICK_START_FREQUENCY, TICK_END_FREQUENCY, t / TICK_DURATION)
}

/// Tick gain `t` seconds into the sweep
pub fn tick_gain(t: f32) -> f32 {
    exponential_ramp(TICK_START_GAIN, TICK_END_GAIN, t / TICK_DURATION)
}

/// Linear attack to the peak, then linear release to silence
pub fn note_gain(t: f32) -> f32 {
    if t < 0.0 || t >= NOTE_DURATION {
        0.0
    } else if t < NOTE_ATTACK {
        NOTE_PEAK_GAIN * t / NOTE_ATTACK
    } else {
        NOTE_PEAK_GAIN * (NOTE_DURATION - t) / (NOTE_DURATION - NOTE_ATTACK)
    }
}

fn seconds_to_frames(seconds: f32, sample_rate: f32) -> u64 {
    (seconds * sample_rate).round() as u64
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VoiceKind {
    Tick,
    Note { frequency: f32 },
}

/// One scheduled oscillator with its envelope, timed in output frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub kind: VoiceKind,
    pub start_frame: u64,
    pub duration_frames: u64,
    phase: f32,
}

impl Voice {
    pub fn tick(start_frame: u64, sample_rate: f32) -> Self {
        Self {
            kind: VoiceKind::Tick,
            start_frame,
            duration_frames: seconds_to_frames(TICK_DURATION, sample_rate),
            phase: 0.0,
        }
    }

    pub fn note(frequency: f32, start_frame: u64, sample_rate: f32) -> Self {
        Self {
            kind: VoiceKind::Note { frequency },
            start_frame,
            duration_frames: seconds_to_frames(NOTE_DURATION, sample_rate),
            phase: 0.0,
        }
    }

    /// The four fanfare notes, all offset from the same `now`
    pub fn fanfare(now: u64, sample_rate: f32) -> [Voice; 4] {
        let mut notes = [Voice::note(0.0, now, sample_rate); 4];
        for (i, (voice, frequency)) in notes.iter_mut().zip(FANFARE_NOTES).enumerate() {
            let offset = seconds_to_frames(NOTE_STAGGER * i as f32, sample_rate);
            *voice = Voice::note(frequency, now + offset, sample_rate);
        }
        notes
    }

    pub fn end_frame(&self) -> u64 {
        self.start_frame + self.duration_frames
    }

    pub fn is_finished(&self, frame: u64) -> bool {
        frame >= self.end_frame()
    }

    /// Produces the sample for absolute output frame `frame` and advances the
    /// oscillator. Silent outside the voice's lifetime.
    pub fn render(&mut self, frame: u64, sample_rate: f32) -> f32 {
        if frame < self.start_frame || self.is_finished(frame) {
            return 0.0;
        }

        let t = (frame - self.start_frame) as f32 / sample_rate;
        let (waveform, frequency, gain) = match self.kind {
            VoiceKind::Tick => (Waveform::Sine, tick_frequency(t), tick_gain(t)),
            VoiceKind::Note { frequency } => (Waveform::Triangle, frequency, note_gain(t)),
        };

        let sample = waveform.sample(self.phase) * gain;
        self.phase = (self.phase + frequency / sample_rate).fract();
        sample
    }
}

/// Sums queued voices into a mono signal. Lives on the audio thread.
pub struct Mixer {
    queue: HeapConsumer<Voice>,
    voices: Vec<Voice>,
    frame: u64,
    clock: Arc<AtomicU64>,
    sample_rate: f32,
}

impl Mixer {
    pub fn new(queue: HeapConsumer<Voice>, clock: Arc<AtomicU64>, sample_rate: f32) -> Self {
        Self {
            queue,
            voices: Vec::with_capacity(MAX_VOICES),
            frame: clock.load(Ordering::Relaxed),
            clock,
            sample_rate,
        }
    }

    pub fn active_voices(&self) -> usize {
        self.voices.len()
    }

    pub fn next_sample(&mut self) -> f32 {
        while self.voices.len() < MAX_VOICES {
            match self.queue.pop() {
                Some(voice) => self.voices.push(voice),
                None => break,
            }
        }

        let frame = self.frame;
        let sample_rate = self.sample_rate;
        let mixed: f32 = self
            .voices
            .iter_mut()
            .map(|voice| voice.render(frame, sample_rate))
            .sum();
        self.voices.retain(|voice| !voice.is_finished(frame + 1));

        self.frame += 1;
        self.clock.store(self.frame, Ordering::Relaxed);
        mixed.clamp(-1.0, 1.0)
    }
}
