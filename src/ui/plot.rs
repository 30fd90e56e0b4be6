use std::ops::RangeInclusive;

use eframe::egui::{RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
    Polygon,
};

use crate::chart::{ChartKind, ChartSpec, HistogramAxis, HistogramChart, ViolinChart};
use crate::color::ColorMap;
use crate::layout::GraphId;

const PLOT_HEIGHT: f32 = 340.0;
/// Half the horizontal extent of a violin, in category units.
const VIOLIN_HALF_WIDTH: f64 = 0.35;
/// Horizontal offset of the point cloud to the left of each violin.
const POINTS_OFFSET: f64 = 0.42;
const BAR_WIDTH: f64 = 0.8;

// ---------------------------------------------------------------------------
// Chart dispatch
// ---------------------------------------------------------------------------

/// Render one chart specification into the graph area `id`.
pub fn chart(ui: &mut Ui, id: GraphId, spec: &ChartSpec) {
    ui.label(RichText::new(&spec.title).strong());
    if let Some(legend) = &spec.legend_title {
        ui.label(RichText::new(legend).small().weak());
    }

    match &spec.kind {
        ChartKind::Violin(violin) => violin_plot(ui, id, spec, violin),
        ChartKind::Histogram(hist) => histogram_plot(ui, id, spec, hist),
        ChartKind::Empty => empty_plot(ui, id, spec),
    }
}

fn base_plot(id: GraphId, spec: &ChartSpec) -> Plot {
    Plot::new(id.as_str())
        .height(PLOT_HEIGHT)
        .x_axis_label(spec.x_label.clone())
        .y_axis_label(spec.y_label.clone())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

/// Axis labels for category slots at integer positions.
fn category_formatter(names: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let rounded = mark.value.round();
        if (mark.value - rounded).abs() > 1e-6 || rounded < 0.0 {
            return String::new();
        }
        names.get(rounded as usize).cloned().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Violin with box overlay and all points
// ---------------------------------------------------------------------------

fn violin_plot(ui: &mut Ui, id: GraphId, spec: &ChartSpec, violin: &ViolinChart) {
    let names: Vec<String> = violin.groups.iter().map(|g| g.label.clone()).collect();
    let colors = ColorMap::new(names.iter().map(String::as_str));

    base_plot(id, spec)
        .legend(Legend::default())
        .x_axis_formatter(category_formatter(names))
        .show(ui, |plot_ui| {
            for (i, group) in violin.groups.iter().enumerate() {
                let x = i as f64;
                let color = colors.color_for(&group.label);

                let peak = group.density.iter().map(|p| p[1]).fold(0.0, f64::max);
                if peak > 0.0 {
                    let scale = VIOLIN_HALF_WIDTH / peak;
                    let right = group.density.iter().map(|p| [x + p[1] * scale, p[0]]);
                    let left = group.density.iter().rev().map(|p| [x - p[1] * scale, p[0]]);
                    let outline: PlotPoints = right.chain(left).collect();
                    plot_ui.polygon(
                        Polygon::new(outline)
                            .name(&group.label)
                            .fill_color(color.gamma_multiply(0.25))
                            .stroke(Stroke::new(1.5, color)),
                    );
                }

                if let Some(s) = group.summary {
                    let spread =
                        BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker);
                    let elem = BoxElem::new(x, spread)
                        .name(&group.label)
                        .box_width(0.08)
                        .whisker_width(0.0)
                        .fill(color.gamma_multiply(0.5))
                        .stroke(Stroke::new(1.0, color));
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&group.label).color(color));
                }

                let points: PlotPoints = group
                    .values
                    .iter()
                    .enumerate()
                    .map(|(j, &v)| [x - POINTS_OFFSET + jitter(j), v])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .name(&group.label)
                        .color(color)
                        .radius(1.5),
                );
            }
        });
}

/// Deterministic horizontal scatter in `[-0.05, 0.05)` so frames don't flicker.
fn jitter(j: usize) -> f64 {
    let h = (j as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 40;
    (h as f64 / (1u64 << 24) as f64 - 0.5) * 0.1
}

// ---------------------------------------------------------------------------
// Stacked histogram
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, id: GraphId, spec: &ChartSpec, hist: &HistogramChart) {
    let colors = ColorMap::new(hist.series.iter().map(|s| s.name.as_str()));

    // stack_on matches bars by index, so every series keeps one bar per slot.
    let mut charts: Vec<BarChart> = Vec::with_capacity(hist.series.len());
    for series in &hist.series {
        let color = colors.color_for(&series.name);
        let bars: Vec<Bar> = series
            .counts
            .iter()
            .enumerate()
            .map(|(slot, &count)| {
                let (arg, width) = match &hist.axis {
                    HistogramAxis::Categories(_) => (slot as f64, BAR_WIDTH),
                    HistogramAxis::Bins(bins) => (bins[slot].center(), bins[slot].width()),
                };
                Bar::new(arg, count as f64)
                    .width(width)
                    .name(&series.name)
                    .fill(color)
            })
            .collect();

        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            BarChart::new(bars)
                .name(&series.name)
                .color(color)
                .stack_on(&below)
        };
        charts.push(chart);
    }

    let mut plot = base_plot(id, spec).legend(Legend::default()).include_y(0.0);
    if let HistogramAxis::Categories(names) = &hist.axis {
        plot = plot.x_axis_formatter(category_formatter(names.clone()));
    }

    plot.show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

// ---------------------------------------------------------------------------
// Placeholder
// ---------------------------------------------------------------------------

fn empty_plot(ui: &mut Ui, id: GraphId, spec: &ChartSpec) {
    base_plot(id, spec)
        .include_x(0.0)
        .include_x(1.0)
        .include_y(0.0)
        .include_y(1.0)
        .show(ui, |_plot_ui| {});
}
