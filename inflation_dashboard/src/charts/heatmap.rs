//! Correlation heatmap

use super::{blues, colors, draw_filled_rect, ChartConfig};
use image::RgbImage;
use macro_math::CorrelationMatrix;

/// One square cell per pair, shaded on the Blues scale from -1 to +1.
///
/// Undefined coefficients are drawn in gray.
pub fn render_heatmap(matrix: &CorrelationMatrix, config: &ChartConfig) -> RgbImage {
    let config = config.square();
    let mut img = config.canvas();
    let area = config.plot_area();

    let n = matrix.size().max(1) as u32;
    let cell = (area.width / n).max(1);
    let gap = if cell > 8 { 2 } else { 0 };

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let color = match value {
                Some(r) => blues((r + 1.0) / 2.0),
                None => colors::MID_GRAY,
            };
            draw_filled_rect(
                &mut img,
                area.left + j as u32 * cell,
                area.top + i as u32 * cell,
                cell - gap,
                cell - gap,
                color,
            );
        }
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_diagonal_is_darkest() {
        let matrix = CorrelationMatrix {
            labels: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![Some(1.0), Some(-1.0)], vec![Some(-1.0), Some(1.0)]],
        };
        let config = ChartConfig {
            width: 120,
            height: 120,
            margin: 10,
        };
        let img = render_heatmap(&matrix, &config);
        let area = config.plot_area();

        assert_eq!(*img.get_pixel(area.left + 1, area.top + 1), colors::NAVY);
        let cell = area.width / 2;
        assert_eq!(
            *img.get_pixel(area.left + cell + 1, area.top + 1),
            Rgb([247, 251, 255])
        );
    }
}
