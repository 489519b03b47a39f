//! Low-level DSP primitives used by the graph nodes.
//!
//! These blocks are allocation-free after construction and carry no
//! parameters or note handling; the graph layer owns that. They stay focused
//! on the per-sample math.

/// RBJ biquad coefficients and filter state.
pub mod biquad;
/// Circular delay buffer with integer and interpolated taps.
pub mod delay_line;
/// Comb and all-pass sections for the Schroeder reverb.
pub mod reverb;
