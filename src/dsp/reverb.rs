//! Comb and all-pass sections, the building blocks of a Schroeder reverb.
//!
//! A feedback comb produces a train of equally spaced echoes:
//!
//! ```text
//! y[n] = buf[n - delay];  buf[n] = x[n] + feedback · y[n]
//! ```
//!
//! An all-pass passes all frequencies at equal gain but smears phase, adding
//! echo density without coloring the tail:
//!
//! ```text
//! y[n] = -x[n] + buf[n - delay];  buf[n] = x[n] + feedback · y[n-delay]
//! ```

/// Feedback comb filter. Its feedback is derived from a damping control:
/// `feedback = 0.7 · (1 − damping)`.
pub struct CombFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
}

impl CombFilter {
    pub fn new(delay_samples: usize, damping: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            feedback: 0.7 * (1.0 - damping),
        }
    }

    pub fn set_damping(&mut self, damping: f32) {
        self.feedback = 0.7 * (1.0 - damping);
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        self.buffer[self.index] = input + output * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

/// All-pass diffusion stage with fixed feedback.
pub struct AllPassFilter {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
}

impl AllPassFilter {
    pub fn new(delay_samples: usize, feedback: f32) -> Self {
        Self {
            buffer: vec![0.0; delay_samples.max(1)],
            index: 0,
            feedback,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.index];
        let output = -input + buffered;
        self.buffer[self.index] = input + buffered * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}
