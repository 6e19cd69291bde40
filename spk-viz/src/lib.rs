//! # spk-viz — Charts for VAD Experiments
//!
//! Plotting helpers used while experimenting with voice activity detection:
//! a waveform/markup overlay and a frame-energy histogram.
//!
//! Each chart comes in two flavors: a `plot_*` function that renders to a
//! PNG file, and a backend-generic `draw_*` function that renders onto any
//! plotters drawing area.
//!
//! ## Example
//!
//! ```ignore
//! use spk_viz::{plot_signal_with_markup, plot_frames_energy};
//!
//! plot_signal_with_markup(&signal, &vad_markup_ideal, "vad.png")?;
//! plot_frames_energy(&frame_energies, "energy.png")?;
//! ```

pub mod error;
pub mod histogram;
pub mod signal;

pub use error::{Result, VizError};
pub use histogram::{draw_frames_energy, plot_frames_energy};
pub use signal::{draw_signal_with_markup, plot_signal_with_markup};
