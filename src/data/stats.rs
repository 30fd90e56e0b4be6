use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{Field, RecordTable, Value};

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Distinct values of `field` in order of first appearance, each with the
/// indices of the rows holding it.
pub fn group_indices(table: &RecordTable, field: Field) -> Vec<(Value, Vec<usize>)> {
    let mut slot_of: BTreeMap<&Value, usize> = BTreeMap::new();
    let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();

    for (i, rec) in table.records.iter().enumerate() {
        let val = rec.get(field);
        let slot = *slot_of.entry(val).or_insert_with(|| {
            groups.push((val.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(i);
    }
    groups
}

/// Numeric values of `field` for the given rows; non-numeric cells are skipped.
pub fn numeric_values(table: &RecordTable, rows: &[usize], field: Field) -> Vec<f64> {
    rows.iter()
        .filter_map(|&i| table.records[i].get(field).as_f64())
        .collect()
}

// ---------------------------------------------------------------------------
// Box summary
// ---------------------------------------------------------------------------

/// Five-number summary drawn as the box inside a violin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
}

impl BoxSummary {
    /// Quartiles by linear interpolation; whiskers reach the most extreme
    /// observations within 1.5 IQR of the box. `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<BoxSummary> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let q1 = quantile(&sorted, 0.25);
        let median = quantile(&sorted, 0.5);
        let q3 = quantile(&sorted, 0.75);
        let fence = 1.5 * (q3 - q1);

        let lower_whisker = sorted
            .iter()
            .copied()
            .find(|&v| v >= q1 - fence)
            .unwrap_or(q1);
        let upper_whisker = sorted
            .iter()
            .rev()
            .copied()
            .find(|&v| v <= q3 + fence)
            .unwrap_or(q3);

        Some(BoxSummary {
            lower_whisker,
            q1,
            median,
            q3,
            upper_whisker,
        })
    }
}

/// `p`-quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// Kernel density
// ---------------------------------------------------------------------------

/// Number of points on each density curve.
pub const DENSITY_POINTS: usize = 64;

/// Silverman's rule-of-thumb bandwidth.
pub fn silverman_bandwidth(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    let sd = var.sqrt();

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let iqr = quantile(&sorted, 0.75) - quantile(&sorted, 0.25);

    let spread = if iqr > 0.0 { sd.min(iqr / 1.34) } else { sd };
    0.9 * spread * (n as f64).powf(-0.2)
}

/// Gaussian kernel density estimate as `[value, density]` pairs, spanning two
/// bandwidths past the data on both sides. Empty when the bandwidth is not positive.
pub fn kernel_density(values: &[f64]) -> Vec<[f64; 2]> {
    let h = silverman_bandwidth(values);
    if !(h.is_finite() && h > 0.0) {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let start = min - 2.0 * h;
    let step = (max - min + 4.0 * h) / (DENSITY_POINTS - 1) as f64;

    let norm = 1.0 / (values.len() as f64 * h * (2.0 * std::f64::consts::PI).sqrt());
    (0..DENSITY_POINTS)
        .map(|i| {
            let x = start + step * i as f64;
            let sum: f64 = values
                .iter()
                .map(|&v| {
                    let u = (x - v) / h;
                    (-0.5 * u * u).exp()
                })
                .sum();
            [x, sum * norm]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Binning
// ---------------------------------------------------------------------------

/// Half-open interval `[start, end)`; the last bin also includes its end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Equal-width bins covering `values` (Sturges rule). A zero range gives a
/// single unit-wide bin; no values give no bins.
pub fn sturges_bins(values: &[f64]) -> Vec<Bin> {
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range <= 0.0 {
        return vec![Bin {
            start: min - 0.5,
            end: min + 0.5,
        }];
    }

    let count = (values.len() as f64).log2().ceil() as usize + 1;
    let width = range / count as f64;
    (0..count)
        .map(|i| Bin {
            start: min + width * i as f64,
            end: if i + 1 == count {
                max
            } else {
                min + width * (i + 1) as f64
            },
        })
        .collect()
}

/// Index of the bin containing `v`, if any.
pub fn bin_index(bins: &[Bin], v: f64) -> Option<usize> {
    let first = bins.first()?;
    let last = bins.last()?;
    if v < first.start || v > last.end {
        return None;
    }
    let idx = bins
        .iter()
        .position(|b| v < b.end)
        .unwrap_or(bins.len() - 1);
    Some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;

    #[test]
    fn groups_follow_first_appearance() {
        let table = sample_table();
        let groups = group_indices(&table, Field::Outcome);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Value::Integer(0));
        assert_eq!(groups[0].1, vec![0, 1, 3, 6]);
        assert_eq!(groups[1].0, Value::Integer(1));
        assert_eq!(groups[1].1, vec![2, 4, 5, 7]);
    }

    #[test]
    fn numeric_values_skip_text() {
        let table = sample_table();
        let rows: Vec<usize> = (0..table.len()).collect();
        assert_eq!(numeric_values(&table, &rows, Field::Age).len(), 8);
        assert!(numeric_values(&table, &rows, Field::Job).is_empty());
    }

    #[test]
    fn box_summary_quartiles() {
        let summary = BoxSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
        assert_eq!(summary.q1, 2.0);
        assert_eq!(summary.median, 3.0);
        assert_eq!(summary.q3, 4.0);
        assert_eq!(summary.lower_whisker, 1.0);
        assert_eq!(summary.upper_whisker, 5.0);
        assert!(BoxSummary::from_values(&[]).is_none());
    }

    #[test]
    fn whiskers_stop_at_the_fence() {
        let summary = BoxSummary::from_values(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert_eq!(summary.upper_whisker, 4.0);
        assert_eq!(summary.lower_whisker, 1.0);
    }

    #[test]
    fn density_integrates_to_about_one() {
        let values: Vec<f64> = (0..200).map(|i| (i % 20) as f64).collect();
        let curve = kernel_density(&values);
        assert_eq!(curve.len(), DENSITY_POINTS);
        let step = curve[1][0] - curve[0][0];
        let area: f64 = curve.iter().map(|p| p[1] * step).sum();
        assert!((area - 1.0).abs() < 0.05, "area = {area}");
    }

    #[test]
    fn constant_sample_has_no_density() {
        assert!(kernel_density(&[7.0, 7.0, 7.0]).is_empty());
        assert!(kernel_density(&[]).is_empty());
    }

    #[test]
    fn bins_cover_the_range() {
        let values: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let bins = sturges_bins(&values);
        assert_eq!(bins.len(), 5);
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 15.0);
        assert_eq!(bin_index(&bins, 0.0), Some(0));
        assert_eq!(bin_index(&bins, 15.0), Some(4));
        assert_eq!(bin_index(&bins, 16.0), None);
    }

    #[test]
    fn zero_range_gives_one_bin() {
        let bins = sturges_bins(&[3.0, 3.0]);
        assert_eq!(bins.len(), 1);
        assert_eq!(bin_index(&bins, 3.0), Some(0));
    }
}
