//! # Waveform and Ideal VAD Markup
//!
//! Overlays the audio signal and the ideal voice-activity markup on one
//! axis, the chart used to eyeball how well a markup tracks the waveform.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Result, VizError, draw_err};

/// Output size of [`plot_signal_with_markup`], 16:4 proportions.
pub const SIGNAL_CHART_SIZE: (u32, u32) = (1600, 400);

/// Vertical headroom added around the data range.
const Y_PAD: f64 = 0.05;

/// Render the waveform/markup overlay to a PNG file.
pub fn plot_signal_with_markup<P: AsRef<Path>>(
    signal: &[f64],
    markup: &[f64],
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let root = BitMapBackend::new(path, SIGNAL_CHART_SIZE).into_drawing_area();
    draw_signal_with_markup(&root, signal, markup)?;
    root.present().map_err(draw_err)?;
    tracing::info!(path = %path.display(), "wrote waveform/markup chart");
    Ok(())
}

/// Draw the waveform/markup overlay onto any plotters drawing area.
///
/// The signal is drawn in green, the markup in red; both run over their own
/// sample index, so series of different lengths are fine.
pub fn draw_signal_with_markup<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    signal: &[f64],
    markup: &[f64],
) -> Result<()> {
    if signal.is_empty() {
        return Err(VizError::EmptyInput("signal"));
    }

    area.fill(&WHITE).map_err(draw_err)?;

    let n = signal.len().max(markup.len());
    let (y_min, y_max) = value_range(signal.iter().chain(markup.iter()));
    let pad = (y_max - y_min) * Y_PAD;

    let mut chart = ChartBuilder::on(area)
        .caption("Waveform and markup of ideal VAD", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..n as f64, (y_min - pad)..(y_max + pad))
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("n")
        .y_desc("x(n)")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(indexed(signal), &GREEN))
        .map_err(draw_err)?
        .label("Waveform")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &GREEN));

    chart
        .draw_series(LineSeries::new(indexed(markup), &RED))
        .map_err(draw_err)?
        .label("Ideal VAD")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(draw_err)?;

    Ok(())
}

fn indexed(values: &[f64]) -> impl Iterator<Item = (f64, f64)> + '_ {
    values.iter().enumerate().map(|(i, &v)| (i as f64, v))
}

/// Min/max over the joined series; the pad keeps a flat signal visible.
fn value_range<'a>(values: impl Iterator<Item = &'a f64>) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(n: usize) -> Vec<f64> {
        (0..n).map(|i| (i as f64 * 0.1).sin()).collect()
    }

    fn square_markup(n: usize) -> Vec<f64> {
        (0..n).map(|i| if (i / 50) % 2 == 0 { 0.0 } else { 1.0 }).collect()
    }

    #[test]
    fn test_plot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vad.png");

        plot_signal_with_markup(&sine(500), &square_markup(500), &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_mismatched_lengths_are_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vad.png");

        plot_signal_with_markup(&sine(500), &square_markup(200), &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_markup_is_drawn() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vad.png");

        plot_signal_with_markup(&sine(100), &[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_signal_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vad.png");

        let err = plot_signal_with_markup(&[], &square_markup(10), &path);
        assert!(matches!(err, Err(VizError::EmptyInput("signal"))));
    }

    #[test]
    fn test_flat_signal_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vad.png");

        plot_signal_with_markup(&[0.25; 64], &[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_value_range_widens_flat_data() {
        let data = [1.0, 1.0, 1.0];
        let (lo, hi) = value_range(data.iter());
        assert!(lo < 1.0 && hi > 1.0);
    }
}
