//! Score aggregation over flattened records
//!
//! All aggregates ignore null cells and surface "no data" as `None` rather
//! than zero. The category average is a mean of per-record means: each
//! record first averages whichever of the category's metrics it has, then
//! the record means are averaged. Records with no scored metric in the
//! category drop out of the outer mean entirely. This differs from a flat
//! mean over all cells whenever null patterns are uneven, and the
//! distinction is load-bearing for the charts.

use crate::flatten::FlatRecord;
use crate::taxonomy::{Category, Metric};

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

fn record_category_mean(record: &FlatRecord, category: Category) -> Option<f64> {
    mean(category.metrics().iter().filter_map(|m| record.metric(*m)))
}

/// Mean of per-record category means, ignoring nulls at both levels.
pub fn category_average(records: &[FlatRecord], category: Category) -> Option<f64> {
    mean(records.iter().filter_map(|r| record_category_mean(r, category)))
}

/// All four category averages, taxonomy order.
pub fn category_averages(records: &[FlatRecord]) -> [(Category, Option<f64>); 4] {
    Category::ALL.map(|c| (c, category_average(records, c)))
}

/// Mean of one metric over records, ignoring nulls.
pub fn metric_average(records: &[FlatRecord], metric: Metric) -> Option<f64> {
    mean(records.iter().filter_map(|r| r.metric(metric)))
}

/// Per-metric means for one category, document order.
pub fn metric_averages(records: &[FlatRecord], category: Category) -> Vec<(Metric, Option<f64>)> {
    category
        .metrics()
        .iter()
        .map(|m| (*m, metric_average(records, *m)))
        .collect()
}

/// Pearson correlation over pairwise-complete observations. Fewer than two
/// pairs, or a zero-variance series, yields `None`.
fn pearson(pairs: &[(f64, f64)]) -> Option<f64> {
    let n = pairs.len();
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / nf;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / nf;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Pairwise correlation matrix between a category's metrics, indexed like
/// [`Category::metrics`]. Each cell uses only records where both metrics are
/// present.
pub fn correlation_matrix(records: &[FlatRecord], category: Category) -> Vec<Vec<Option<f64>>> {
    let metrics = category.metrics();
    metrics
        .iter()
        .map(|a| {
            metrics
                .iter()
                .map(|b| {
                    let pairs: Vec<(f64, f64)> = records
                        .iter()
                        .filter_map(|r| Some((r.metric(*a)?, r.metric(*b)?)))
                        .collect();
                    pearson(&pairs)
                })
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // AGGREGATION TESTS
    // ==========================================================================
    //
    // The category average is a mean of row means, nulls are ignored rather
    // than treated as zero, and empty input yields None across the board.
    // ==========================================================================

    fn visual_record(attire: Option<f64>, background: Option<f64>) -> FlatRecord {
        FlatRecord {
            attire_score: attire,
            background_score: background,
            ..FlatRecord::default()
        }
    }

    #[test]
    fn test_category_average_is_mean_of_row_means() {
        // Row means: (8+4)/2 = 6 and 10/1 = 10 → category average 8.
        // A flat mean over all three cells would give 22/3 ≈ 7.33.
        let records = vec![
            visual_record(Some(8.0), Some(4.0)),
            visual_record(Some(10.0), None),
        ];
        let avg = category_average(&records, Category::Visual).unwrap();
        assert!((avg - 8.0).abs() < 1e-12);
    }

    #[test]
    fn test_all_null_category_is_none_not_zero() {
        let records = vec![visual_record(None, None), visual_record(None, None)];
        assert_eq!(category_average(&records, Category::Visual), None);
        assert_eq!(category_average(&records, Category::Audio), None);
    }

    #[test]
    fn test_empty_subset_yields_none_everywhere() {
        let records: Vec<FlatRecord> = vec![];
        for (_, avg) in category_averages(&records) {
            assert_eq!(avg, None);
        }
        assert_eq!(metric_average(&records, Metric::Attire), None);
    }

    #[test]
    fn test_category_average_order_invariant() {
        let mut records = vec![
            visual_record(Some(3.0), Some(5.0)),
            visual_record(Some(9.0), None),
            visual_record(None, Some(7.0)),
        ];
        let forward = category_average(&records, Category::Visual).unwrap();
        records.reverse();
        let backward = category_average(&records, Category::Visual).unwrap();
        assert!((forward - backward).abs() < 1e-12);
    }

    #[test]
    fn test_absent_metric_ignored_not_zeroed() {
        // attire present at 7, delivery absent: Visual uses the 7, Audio
        // stays None rather than counting a zero
        let records = vec![visual_record(Some(7.0), None)];
        assert_eq!(category_average(&records, Category::Visual), Some(7.0));
        assert_eq!(category_average(&records, Category::Audio), None);
        assert_eq!(metric_average(&records, Metric::Delivery), None);
    }

    #[test]
    fn test_metric_average_skips_null_records() {
        let records = vec![
            visual_record(Some(6.0), None),
            visual_record(None, None),
            visual_record(Some(8.0), None),
        ];
        assert_eq!(metric_average(&records, Metric::Attire), Some(7.0));
    }

    #[test]
    fn test_metric_averages_document_order() {
        let records = vec![visual_record(Some(5.0), Some(9.0))];
        let averages = metric_averages(&records, Category::Visual);
        assert_eq!(averages.len(), 5);
        assert_eq!(averages[0], (Metric::Attire, Some(5.0)));
        assert_eq!(averages[1], (Metric::Background, Some(9.0)));
        assert_eq!(averages[2], (Metric::VideoQuality, None));
    }

    #[test]
    fn test_correlation_perfectly_linear() {
        let records = vec![
            visual_record(Some(1.0), Some(2.0)),
            visual_record(Some(2.0), Some(4.0)),
            visual_record(Some(3.0), Some(6.0)),
        ];
        let matrix = correlation_matrix(&records, Category::Visual);
        // attire vs background: exact positive correlation
        let r = matrix[0][1].unwrap();
        assert!((r - 1.0).abs() < 1e-12);
        assert!((matrix[1][0].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_anticorrelated() {
        let records = vec![
            visual_record(Some(1.0), Some(9.0)),
            visual_record(Some(2.0), Some(7.0)),
            visual_record(Some(3.0), Some(5.0)),
        ];
        let matrix = correlation_matrix(&records, Category::Visual);
        let r = matrix[0][1].unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_pairwise_complete() {
        // Middle record has no background: the attire/background cell uses
        // only the two complete pairs
        let records = vec![
            visual_record(Some(1.0), Some(1.0)),
            visual_record(Some(100.0), None),
            visual_record(Some(2.0), Some(2.0)),
        ];
        let matrix = correlation_matrix(&records, Category::Visual);
        assert!((matrix[0][1].unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correlation_degenerate_cells_are_none() {
        // Constant series and sub-two-pair cells carry no correlation
        let records = vec![
            visual_record(Some(5.0), Some(1.0)),
            visual_record(Some(5.0), Some(2.0)),
        ];
        let matrix = correlation_matrix(&records, Category::Visual);
        assert_eq!(matrix[0][1], None); // attire is constant
        assert_eq!(matrix[0][0], None); // even against itself
        assert!((matrix[1][1].unwrap() - 1.0).abs() < 1e-12);
        assert_eq!(matrix[2][2], None); // videoQuality has no observations
    }

    #[test]
    fn test_correlation_matrix_shape() {
        let matrix = correlation_matrix(&[], Category::Audio);
        assert_eq!(matrix.len(), 3);
        assert!(matrix.iter().all(|row| row.len() == 3));
        assert!(matrix.iter().flatten().all(|cell| cell.is_none()));
    }
}
