use assert_approx_eq::assert_approx_eq;
use macro_math::statistics::{correlation_matrix, gaussian_kde, histogram, pearson};

#[test]
fn test_correlation_matrix_with_missing_values() {
    let columns = vec![
        (
            "inflation".to_string(),
            vec![Some(1.0), Some(2.0), Some(3.0), None, Some(5.0)],
        ),
        (
            "m3".to_string(),
            vec![Some(2.0), Some(4.0), Some(6.0), Some(8.0), Some(10.0)],
        ),
        (
            "mpr".to_string(),
            vec![Some(5.0), Some(4.0), Some(3.0), Some(2.0), Some(1.0)],
        ),
    ];

    let matrix = correlation_matrix(&columns).unwrap();
    assert_eq!(matrix.size(), 3);
    assert_eq!(matrix.get("inflation", "inflation"), Some(1.0));
    assert_approx_eq!(matrix.get("inflation", "m3").unwrap(), 1.0);
    assert_approx_eq!(matrix.get("m3", "mpr").unwrap(), -1.0);
    assert_eq!(matrix.get("m3", "mpr"), matrix.get("mpr", "m3"));
    assert_eq!(matrix.get("m3", "unknown"), None);
}

#[test]
fn test_correlation_matrix_constant_column() {
    let columns = vec![
        ("a".to_string(), vec![Some(1.0), Some(2.0), Some(3.0)]),
        ("b".to_string(), vec![Some(7.0), Some(7.0), Some(7.0)]),
    ];

    let matrix = correlation_matrix(&columns).unwrap();
    assert_eq!(matrix.get("a", "b"), None);
    assert_eq!(matrix.get("b", "b"), None);
}

#[test]
fn test_pearson_partial_relationship() {
    let x = vec![1.0, 2.0, 3.0, 4.0, 5.0];
    let y = vec![2.0, 1.0, 4.0, 3.0, 5.0];
    let r = pearson(&x, &y).unwrap();
    assert_approx_eq!(r, 0.8, 0.001);
}

#[test]
fn test_histogram_constant_series() {
    let hist = histogram(&[4.0, 4.0, 4.0], 5).unwrap();
    assert_eq!(hist.total(), 3);
    assert_approx_eq!(hist.bin_width(), 0.2);
    assert_eq!(hist.max_count(), 3);
}

#[test]
fn test_histogram_rejects_bad_input() {
    assert!(histogram(&[], 10).is_err());
    assert!(histogram(&[1.0, 2.0], 0).is_err());
}

#[test]
fn test_kde_integrates_to_one() {
    let values: Vec<f64> = (0..50).map(|i| (i as f64 * 0.37).sin() * 3.0 + 10.0).collect();
    let lo = 0.0;
    let step = 0.05;
    let grid: Vec<f64> = (0..400).map(|i| lo + step * i as f64).collect();

    let density = gaussian_kde(&values, &grid).unwrap();
    assert_eq!(density.len(), grid.len());
    assert!(density.iter().all(|d| *d >= 0.0));

    let area: f64 = density.iter().sum::<f64>() * step;
    assert_approx_eq!(area, 1.0, 0.02);
}

#[test]
fn test_kde_needs_variation() {
    assert!(gaussian_kde(&[1.0], &[1.0]).is_err());
    assert!(gaussian_kde(&[2.0, 2.0, 2.0], &[2.0]).is_err());
}
