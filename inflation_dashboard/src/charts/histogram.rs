//! Distribution histogram with a kernel density overlay

use super::{colors, draw_filled_rect, draw_line, ChartConfig};
use crate::error::Result;
use image::{Rgb, RgbImage};
use macro_math::{gaussian_kde, histogram, Histogram};

/// Histogram of one column and whether a density curve was drawn
#[derive(Debug, Clone)]
pub struct Distribution {
    pub histogram: Histogram,
    pub with_kde: bool,
}

/// Draw `bins` bars and a KDE curve scaled to counts.
///
/// A constant column has no density estimate and gets bars only.
pub fn render_distribution(
    values: &[f64],
    bins: usize,
    color: Rgb<u8>,
    config: &ChartConfig,
) -> Result<(RgbImage, Distribution)> {
    let hist = histogram(values, bins)?;
    let lo = hist.edges[0];
    let hi = hist.edges[hist.edges.len() - 1];

    let grid: Vec<f64> = (0..200).map(|i| lo + (hi - lo) * i as f64 / 199.0).collect();
    let curve: Option<Vec<f64>> = gaussian_kde(values, &grid).ok().map(|density| {
        let scale = values.len() as f64 * hist.bin_width();
        density.into_iter().map(|d| d * scale).collect()
    });

    let peak = curve
        .iter()
        .flatten()
        .copied()
        .fold(hist.max_count() as f64, f64::max)
        .max(1.0);

    let mut img = config.canvas();
    let area = config.plot_area();
    area.draw_axes(&mut img, 4);

    let bar_width = (area.width / bins as u32).max(1);
    for (i, &count) in hist.counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let x = area.left + i as u32 * bar_width;
        let top = area.y(count as f64 / peak);
        draw_filled_rect(
            &mut img,
            x + 1,
            top,
            bar_width.saturating_sub(1).max(1),
            area.bottom() - top,
            color,
        );
    }

    if let Some(curve) = &curve {
        let points: Vec<(u32, u32)> = curve
            .iter()
            .enumerate()
            .map(|(i, d)| (area.x(i as f64 / 199.0), area.y(d / peak)))
            .collect();
        for pair in points.windows(2) {
            draw_line(&mut img, pair[0], pair[1], colors::NAVY);
        }
    }

    Ok((
        img,
        Distribution {
            histogram: hist,
            with_kde: curve.is_some(),
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thirty_bins_with_density() {
        let values: Vec<f64> = (0..300).map(|i| ((i as f64) * 0.37).sin() * 5.0 + 15.0).collect();
        let (img, dist) =
            render_distribution(&values, 30, colors::SKY_BLUE, &ChartConfig::default()).unwrap();

        assert_eq!(dist.histogram.counts.len(), 30);
        assert_eq!(dist.histogram.total(), 300);
        assert!(dist.with_kde);
        assert!(img.pixels().any(|p| *p == colors::SKY_BLUE));
        assert!(img.pixels().any(|p| *p == colors::NAVY));
    }

    #[test]
    fn test_constant_column_has_no_density() {
        let (_, dist) =
            render_distribution(&[3.0; 10], 30, colors::SKY_BLUE, &ChartConfig::default()).unwrap();
        assert!(!dist.with_kde);
        assert_eq!(dist.histogram.total(), 10);
    }

    #[test]
    fn test_empty_column_is_an_error() {
        assert!(render_distribution(&[], 30, colors::SKY_BLUE, &ChartConfig::default()).is_err());
    }
}
