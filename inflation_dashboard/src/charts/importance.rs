//! Horizontal feature-importance bars

use super::{draw_filled_rect, viridis, ChartConfig};
use crate::error::{DashboardError, Result};
use image::RgbImage;
use inflation_forecast::FeatureImportance;

/// One bar per entry, longest first from the top, colored along viridis
pub fn render_importance(entries: &[FeatureImportance], config: &ChartConfig) -> Result<RgbImage> {
    if entries.is_empty() {
        return Err(DashboardError::Chart(
            "no feature importances to plot".to_string(),
        ));
    }
    let max = entries
        .iter()
        .map(|e| e.importance)
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let mut img = config.canvas();
    let area = config.plot_area();
    area.draw_axes(&mut img, 0);

    let slot = (area.height / entries.len() as u32).max(1);
    let bar_height = (slot * 3 / 4).max(1);
    let last = (entries.len() - 1).max(1) as f64;

    for (i, entry) in entries.iter().enumerate() {
        let length = ((entry.importance / max) * area.width as f64).round() as u32;
        draw_filled_rect(
            &mut img,
            area.left + 1,
            area.top + i as u32 * slot + (slot - bar_height) / 2,
            length.max(1),
            bar_height,
            viridis(i as f64 / last),
        );
    }

    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_bar_spans_the_width() {
        let entries = vec![
            FeatureImportance { feature: "moneySupply_M3".to_string(), importance: 0.6 },
            FeatureImportance { feature: "mpr".to_string(), importance: 0.3 },
            FeatureImportance { feature: "oil_price".to_string(), importance: 0.1 },
        ];
        let config = ChartConfig { width: 300, height: 150, margin: 10 };
        let img = render_importance(&entries, &config).unwrap();
        let area = config.plot_area();

        let slot = area.height / 3;
        let y = area.top + slot / 2;
        assert_eq!(*img.get_pixel(area.right() - 1, y), viridis(0.0));
    }

    #[test]
    fn test_no_entries() {
        assert!(render_importance(&[], &ChartConfig::default()).is_err());
    }
}
