//! # Frame-Energy Histogram
//!
//! Step-style histogram of normalized frame energies, used to pick the
//! energy threshold separating speech from silence. Bin count follows the
//! square-root rule, `floor(sqrt(len))`.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::{Result, VizError, draw_err};

/// Output size of [`plot_frames_energy`].
pub const HIST_CHART_SIZE: (u32, u32) = (640, 480);

/// Render the frame-energy histogram to a PNG file.
pub fn plot_frames_energy<P: AsRef<Path>>(energies: &[f64], path: P) -> Result<()> {
    let path = path.as_ref();
    let root = BitMapBackend::new(path, HIST_CHART_SIZE).into_drawing_area();
    draw_frames_energy(&root, energies)?;
    root.present().map_err(draw_err)?;
    tracing::info!(path = %path.display(), "wrote frame-energy histogram");
    Ok(())
}

/// Draw the frame-energy histogram onto any plotters drawing area.
pub fn draw_frames_energy<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    energies: &[f64],
) -> Result<()> {
    if energies.is_empty() {
        return Err(VizError::EmptyInput("energies"));
    }

    area.fill(&WHITE).map_err(draw_err)?;

    let bins = (energies.len() as f64).sqrt() as usize;
    let bins = bins.max(1);
    let (counts, lo, hi) = bin_counts(energies, bins);
    let max_count = *counts.iter().max().unwrap_or(&1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Histogram of frame energies", ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, 0f64..(max_count * 1.05))
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc("e_norm")
        .y_desc("W(e_norm)")
        .draw()
        .map_err(draw_err)?;

    chart
        .draw_series(LineSeries::new(step_outline(&counts, lo, hi), &GREEN))
        .map_err(draw_err)?;

    Ok(())
}

/// Count samples per bin over `bins` uniform bins spanning the data range.
///
/// A constant-valued series gets its range widened so every sample lands in
/// one bin instead of dividing by zero.
fn bin_counts(energies: &[f64], bins: usize) -> (Vec<usize>, f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for &e in energies {
        lo = lo.min(e);
        hi = hi.max(e);
    }
    if hi - lo < f64::EPSILON {
        lo -= 0.5;
        hi += 0.5;
    }

    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &e in energies {
        let idx = ((e - lo) / width) as usize;
        counts[idx.min(bins - 1)] += 1;
    }
    (counts, lo, hi)
}

/// Polyline tracing the histogram outline, down to zero at both ends.
fn step_outline(counts: &[usize], lo: f64, hi: f64) -> Vec<(f64, f64)> {
    let width = (hi - lo) / counts.len() as f64;
    let mut points = Vec::with_capacity(counts.len() * 2 + 2);
    points.push((lo, 0.0));
    for (i, &c) in counts.iter().enumerate() {
        let left = lo + i as f64 * width;
        let right = lo + (i + 1) as f64 * width;
        points.push((left, c as f64));
        points.push((right, c as f64));
    }
    points.push((hi, 0.0));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn energies(n: usize) -> Vec<f64> {
        // Deterministic bimodal-ish spread over [0, 1]
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                if i % 3 == 0 { t * 0.4 } else { 0.6 + t * 0.4 }
            })
            .collect()
    }

    #[test]
    fn test_bin_counts_cover_all_samples() {
        let data = energies(100);
        let (counts, lo, hi) = bin_counts(&data, 10);

        assert_eq!(counts.len(), 10);
        assert_eq!(counts.iter().sum::<usize>(), 100);
        assert!(lo <= hi);
    }

    #[test]
    fn test_bin_counts_max_value_lands_in_last_bin() {
        let data = [0.0, 0.5, 1.0];
        let (counts, _, _) = bin_counts(&data, 2);
        // Half-open bins: 0.5 falls into the upper bin, 1.0 is clamped into it
        assert_eq!(counts, vec![1, 2]);
    }

    #[test]
    fn test_bin_counts_constant_data() {
        let data = [0.3; 16];
        let (counts, lo, hi) = bin_counts(&data, 4);

        assert_eq!(counts.iter().sum::<usize>(), 16);
        assert!(lo < 0.3 && hi > 0.3);
    }

    #[test]
    fn test_step_outline_starts_and_ends_at_zero() {
        let outline = step_outline(&[3, 1, 2], 0.0, 3.0);

        assert_eq!(outline.first(), Some(&(0.0, 0.0)));
        assert_eq!(outline.last(), Some(&(3.0, 0.0)));
        assert_eq!(outline.len(), 3 * 2 + 2);
    }

    #[test]
    fn test_plot_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.png");

        plot_frames_energy(&energies(400), &path).unwrap();

        let meta = std::fs::metadata(&path).unwrap();
        assert!(meta.len() > 0);
    }

    #[test]
    fn test_single_sample_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.png");

        plot_frames_energy(&[0.42], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("energy.png");

        let err = plot_frames_energy(&[], &path);
        assert!(matches!(err, Err(VizError::EmptyInput("energies"))));
    }
}
