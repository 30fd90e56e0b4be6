//! Chart resolver: selector values + table → the three chart specifications.
//!
//! ```text
//!   SelectorState ──┐
//!                   ├──► resolve() ──► Charts { comparison, distribution, segment }
//!   RecordTable  ───┘
//! ```
//!
//! Pure and stateless; every selector change recomputes all three charts.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Field, RecordTable, Value};
use crate::data::stats::{self, Bin, BoxSummary};
use crate::selector::SelectorState;

/// Axis label of the outcome field.
pub const OUTCOME_LABEL: &str = "Compra (1: Sí, 0: No)";

const DISTRIBUTION_PROMPT: &str = "Seleccione ambas características para visualizar la distribución";
const SEGMENT_PROMPT: &str = "Seleccione un segmento para visualizar la probabilidad de compra";
const COUNT_LABEL: &str = "count";

// ---------------------------------------------------------------------------
// Chart specification types
// ---------------------------------------------------------------------------

/// One renderable chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Title of the colour legend, when the chart is coloured by a field.
    pub legend_title: Option<String>,
    /// Column name → display label overrides.
    pub labels: BTreeMap<String, String>,
    pub kind: ChartKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ChartKind {
    Violin(ViolinChart),
    Histogram(HistogramChart),
    /// Placeholder shown while a required selector is unset.
    Empty,
}

/// Per-outcome distribution of a numeric field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinChart {
    pub feature: Field,
    pub group_by: Field,
    pub groups: Vec<ViolinGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViolinGroup {
    pub label: String,
    /// Every observation, drawn as points next to the violin.
    pub values: Vec<f64>,
    pub summary: Option<BoxSummary>,
    /// `[value, density]` pairs; empty when no curve can be estimated.
    pub density: Vec<[f64; 2]>,
}

/// Stacked histogram: one series per colour value, one count per x slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramChart {
    pub x: Field,
    pub color: Field,
    pub axis: HistogramAxis,
    pub series: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistogramAxis {
    /// One slot per category, in order of first appearance.
    Categories(Vec<String>),
    /// One slot per numeric bin.
    Bins(Vec<Bin>),
}

impl HistogramAxis {
    pub fn len(&self) -> usize {
        match self {
            HistogramAxis::Categories(c) => c.len(),
            HistogramAxis::Bins(b) => b.len(),
        }
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub counts: Vec<u64>,
}

impl ChartSpec {
    /// Data-less chart carrying only a prompt title.
    pub fn empty(title: &str) -> Self {
        ChartSpec {
            title: title.to_string(),
            x_label: "x".to_string(),
            y_label: "y".to_string(),
            legend_title: None,
            labels: BTreeMap::new(),
            kind: ChartKind::Empty,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, ChartKind::Empty)
    }
}

/// The three charts of the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Charts {
    pub comparison: ChartSpec,
    pub distribution: ChartSpec,
    pub segment: ChartSpec,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Derive all three charts from the current selector values.
pub fn resolve(selectors: &SelectorState, table: &RecordTable) -> Charts {
    let comparison = comparison_chart(selectors.comparison().unwrap_or(Field::Balance), table);

    let distribution = match (selectors.x_axis(), selectors.color()) {
        (Some(x), Some(color)) => distribution_chart(x, color, table),
        _ => ChartSpec::empty(DISTRIBUTION_PROMPT),
    };

    let segment = match selectors.segment() {
        Some(field) => segment_chart(field, table),
        None => ChartSpec::empty(SEGMENT_PROMPT),
    };

    Charts {
        comparison,
        distribution,
        segment,
    }
}

fn comparison_chart(feature: Field, table: &RecordTable) -> ChartSpec {
    let groups = stats::group_indices(table, Field::Outcome)
        .into_iter()
        .map(|(outcome, rows)| {
            let values = stats::numeric_values(table, &rows, feature);
            ViolinGroup {
                label: outcome.to_string(),
                summary: BoxSummary::from_values(&values),
                density: stats::kernel_density(&values),
                values,
            }
        })
        .collect();

    let mut labels = BTreeMap::new();
    labels.insert(Field::Outcome.column().to_string(), OUTCOME_LABEL.to_string());
    labels.insert(feature.column().to_string(), feature.capitalized());

    ChartSpec {
        title: format!("Comparación de {feature} entre clientes que compraron y no compraron"),
        x_label: OUTCOME_LABEL.to_string(),
        y_label: feature.capitalized(),
        legend_title: Some(OUTCOME_LABEL.to_string()),
        labels,
        kind: ChartKind::Violin(ViolinChart {
            feature,
            group_by: Field::Outcome,
            groups,
        }),
    }
}

fn distribution_chart(x: Field, color: Field, table: &RecordTable) -> ChartSpec {
    let mut labels = BTreeMap::new();
    labels.insert(x.column().to_string(), x.capitalized());
    labels.insert(color.column().to_string(), color.capitalized());

    ChartSpec {
        title: format!(
            "Distribución de {} y {}",
            x.capitalized(),
            color.capitalized()
        ),
        x_label: x.capitalized(),
        y_label: COUNT_LABEL.to_string(),
        legend_title: Some(color.capitalized()),
        labels,
        kind: ChartKind::Histogram(histogram(x, color, table)),
    }
}

fn segment_chart(field: Field, table: &RecordTable) -> ChartSpec {
    let mut labels = BTreeMap::new();
    labels.insert(field.column().to_string(), field.capitalized());
    labels.insert(Field::Outcome.column().to_string(), OUTCOME_LABEL.to_string());

    ChartSpec {
        title: format!("Distribución de probabilidad de compra por {field}"),
        x_label: field.capitalized(),
        y_label: COUNT_LABEL.to_string(),
        legend_title: Some(OUTCOME_LABEL.to_string()),
        labels,
        kind: ChartKind::Histogram(histogram(field, Field::Outcome, table)),
    }
}

/// Count rows per (x slot, colour value). Rows without an x value are dropped.
fn histogram(x: Field, color: Field, table: &RecordTable) -> HistogramChart {
    let rows: Vec<usize> = (0..table.len())
        .filter(|&i| *table.records[i].get(x) != Value::Null)
        .collect();

    let (axis, slot_of_row): (HistogramAxis, Vec<Option<usize>>) = if x.is_numeric() {
        let values = stats::numeric_values(table, &rows, x);
        let bins = stats::sturges_bins(&values);
        let slots: Vec<Option<usize>> = rows
            .iter()
            .map(|&i| {
                table.records[i]
                    .get(x)
                    .as_f64()
                    .and_then(|v| stats::bin_index(&bins, v))
            })
            .collect();
        (HistogramAxis::Bins(bins), slots)
    } else {
        let mut categories: Vec<String> = Vec::new();
        let mut slot_of: BTreeMap<&Value, usize> = BTreeMap::new();
        let slots: Vec<Option<usize>> = rows
            .iter()
            .map(|&i| {
                let val = table.records[i].get(x);
                let slot = *slot_of.entry(val).or_insert_with(|| {
                    categories.push(val.to_string());
                    categories.len() - 1
                });
                Some(slot)
            })
            .collect();
        (HistogramAxis::Categories(categories), slots)
    };

    let width = axis.len();
    let mut series: Vec<Series> = Vec::new();
    let mut series_of: BTreeMap<&Value, usize> = BTreeMap::new();

    for (&i, slot) in rows.iter().zip(slot_of_row) {
        let Some(slot) = slot else {
            continue;
        };
        let val = table.records[i].get(color);
        let s = *series_of.entry(val).or_insert_with(|| {
            series.push(Series {
                name: val.to_string(),
                counts: vec![0; width],
            });
            series.len() - 1
        });
        series[s].counts[slot] += 1;
    }

    HistogramChart {
        x,
        color,
        axis,
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::sample_table;
    use crate::selector::SelectorId;

    fn state(
        comparison: Option<Field>,
        x: Option<Field>,
        color: Option<Field>,
        segment: Option<Field>,
    ) -> SelectorState {
        SelectorState::cleared()
            .with(SelectorId::Comparison, comparison)
            .and_then(|s| s.with(SelectorId::XAxis, x))
            .and_then(|s| s.with(SelectorId::Color, color))
            .and_then(|s| s.with(SelectorId::Segment, segment))
            .unwrap()
    }

    fn all_states() -> Vec<SelectorState> {
        let mut out = Vec::new();
        let opts = |id: SelectorId| {
            std::iter::once(None)
                .chain(id.options().iter().map(|o| Some(o.value)))
                .collect::<Vec<_>>()
        };
        for c in opts(SelectorId::Comparison) {
            for x in opts(SelectorId::XAxis) {
                for col in opts(SelectorId::Color) {
                    for s in opts(SelectorId::Segment) {
                        out.push(state(c, x, col, s));
                    }
                }
            }
        }
        out
    }

    fn histogram_of(spec: &ChartSpec) -> &HistogramChart {
        match &spec.kind {
            ChartKind::Histogram(h) => h,
            other => panic!("expected histogram, got {other:?}"),
        }
    }

    #[test]
    fn age_only_gives_two_placeholders() {
        let table = sample_table();
        let charts = resolve(&state(Some(Field::Age), None, None, None), &table);

        let ChartKind::Violin(violin) = &charts.comparison.kind else {
            panic!("comparison must be a violin");
        };
        assert_eq!(violin.feature, Field::Age);
        assert_eq!(violin.group_by, Field::Outcome);
        assert_eq!(violin.groups.len(), 2);
        assert_eq!(violin.groups[0].label, "0");
        assert_eq!(violin.groups[0].values, vec![58.0, 44.0, 47.0, 28.0]);
        assert_eq!(
            charts.comparison.title,
            "Comparación de age entre clientes que compraron y no compraron"
        );
        assert_eq!(charts.comparison.y_label, "Age");
        assert_eq!(charts.comparison.labels["y"], OUTCOME_LABEL);

        assert_eq!(
            charts.distribution,
            ChartSpec::empty("Seleccione ambas características para visualizar la distribución")
        );
        assert_eq!(
            charts.segment,
            ChartSpec::empty("Seleccione un segmento para visualizar la probabilidad de compra")
        );
    }

    #[test]
    fn fully_selected_dashboard() {
        let table = sample_table();
        let charts = resolve(
            &state(
                Some(Field::Balance),
                Some(Field::Job),
                Some(Field::Marital),
                Some(Field::Education),
            ),
            &table,
        );

        let ChartKind::Violin(violin) = &charts.comparison.kind else {
            panic!("comparison must be a violin");
        };
        assert_eq!(violin.feature, Field::Balance);

        let dist = histogram_of(&charts.distribution);
        assert_eq!(charts.distribution.title, "Distribución de Job y Marital");
        assert_eq!((dist.x, dist.color), (Field::Job, Field::Marital));
        assert_eq!(
            dist.axis,
            HistogramAxis::Categories(vec![
                "management".into(),
                "technician".into(),
                "entrepreneur".into(),
                "blue-collar".into(),
                "unknown".into(),
            ])
        );
        let names: Vec<&str> = dist.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["married", "single", "divorced"]);
        // management: married x2, single x1
        assert_eq!(dist.series[0].counts[0], 2);
        assert_eq!(dist.series[1].counts[0], 1);

        let seg = histogram_of(&charts.segment);
        assert_eq!(
            charts.segment.title,
            "Distribución de probabilidad de compra por education"
        );
        assert_eq!((seg.x, seg.color), (Field::Education, Field::Outcome));
        assert_eq!(charts.segment.legend_title.as_deref(), Some(OUTCOME_LABEL));
    }

    #[test]
    fn every_state_resolves() {
        let table = sample_table();
        let states = all_states();
        assert_eq!(states.len(), 4 * 5 * 5 * 5);
        for s in states {
            let charts = resolve(&s, &table);
            assert!(!charts.comparison.is_placeholder());
            assert_eq!(
                charts.distribution.is_placeholder(),
                s.x_axis().is_none() || s.color().is_none()
            );
            assert_eq!(charts.segment.is_placeholder(), s.segment().is_none());
        }
    }

    #[test]
    fn comparison_ignores_other_selectors() {
        let table = sample_table();
        let baseline = resolve(&state(Some(Field::Duration), None, None, None), &table).comparison;
        for s in all_states()
            .into_iter()
            .filter(|s| s.comparison() == Some(Field::Duration))
        {
            assert_eq!(resolve(&s, &table).comparison, baseline);
        }
    }

    #[test]
    fn unset_comparison_means_balance() {
        let table = sample_table();
        let unset = resolve(&SelectorState::cleared(), &table);
        let balance = resolve(&SelectorState::default(), &table);
        assert_eq!(unset.comparison, balance.comparison);
    }

    #[test]
    fn resolve_is_idempotent() {
        let table = sample_table();
        let s = state(
            Some(Field::Age),
            Some(Field::Balance),
            Some(Field::Education),
            Some(Field::Balance),
        );
        assert_eq!(resolve(&s, &table), resolve(&s, &table));
    }

    #[test]
    fn balance_segment_uses_the_generic_branch() {
        let table = sample_table();
        let charts = resolve(&state(None, None, None, Some(Field::Balance)), &table);
        assert_eq!(
            charts.segment.title,
            "Distribución de probabilidad de compra por balance"
        );
        assert_eq!(charts.segment.labels["balance"], "Balance");
        assert_eq!(charts.segment.labels["y"], OUTCOME_LABEL);

        let seg = histogram_of(&charts.segment);
        let HistogramAxis::Bins(bins) = &seg.axis else {
            panic!("balance is binned");
        };
        // 8 rows → ceil(log2 8) + 1 bins
        assert_eq!(bins.len(), 4);
        let total: u64 = seg.series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn counts_cover_every_row() {
        let table = sample_table();
        let charts = resolve(
            &state(None, Some(Field::Education), Some(Field::Balance), None),
            &table,
        );
        let dist = histogram_of(&charts.distribution);
        // every balance in the sample is distinct
        assert_eq!(dist.series.len(), 8);
        let total: u64 = dist.series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, table.len() as u64);
        for s in &dist.series {
            assert_eq!(s.counts.len(), dist.axis.len());
        }
    }

    #[test]
    fn empty_table_still_yields_charts() {
        let table = RecordTable::new(Vec::new(), Vec::new());
        let charts = resolve(
            &state(None, Some(Field::Job), Some(Field::Job), None),
            &table,
        );
        let ChartKind::Violin(violin) = &charts.comparison.kind else {
            panic!("comparison must be a violin");
        };
        assert!(violin.groups.is_empty());
        let dist = histogram_of(&charts.distribution);
        assert!(dist.axis.is_empty());
        assert!(dist.series.is_empty());
    }
}
