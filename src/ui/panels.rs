use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::chart::ChartSpec;
use crate::layout::{GraphId, Panel};
use crate::selector::SelectorId;
use crate::state::AppState;
use crate::ui::plot;

const GRID_COLUMNS: f32 = 12.0;

// ---------------------------------------------------------------------------
// Page body – rows of panels
// ---------------------------------------------------------------------------

/// Render the whole page described by `state.layout`.
pub fn page(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(RichText::new(state.layout.title).size(26.0).strong());
            ui.add_space(8.0);

            let rows = state.layout.rows.clone();
            for row in &rows {
                let spacing = ui.spacing().item_spacing.x;
                let total = ui.available_width() - spacing * (row.panels.len() as f32 - 1.0);
                ui.horizontal_top(|ui: &mut Ui| {
                    for panel in &row.panels {
                        let width = total * f32::from(panel.width) / GRID_COLUMNS;
                        ui.allocate_ui_with_layout(
                            egui::vec2(width, 0.0),
                            egui::Layout::top_down(egui::Align::Min),
                            |ui: &mut Ui| panel_ui(ui, state, panel),
                        );
                    }
                });
                ui.add_space(12.0);
            }
        });
}

fn panel_ui(ui: &mut Ui, state: &mut AppState, panel: &Panel) {
    ui.group(|ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new(panel.heading).heading().size(17.0));
        for &id in &panel.selectors {
            selector_dropdown(ui, state, id);
        }
        ui.add_space(4.0);
        plot::chart(ui, panel.graph, chart_for(state, panel.graph));
    });
}

fn chart_for(state: &AppState, graph: GraphId) -> &ChartSpec {
    match graph {
        GraphId::Comparison => &state.charts.comparison,
        GraphId::Distribution => &state.charts.distribution,
        GraphId::Segment => &state.charts.segment,
    }
}

// ---------------------------------------------------------------------------
// Dropdown
// ---------------------------------------------------------------------------

/// Render one selector; a changed value is pushed into the state immediately.
fn selector_dropdown(ui: &mut Ui, state: &mut AppState, id: SelectorId) {
    let current = state.selectors.get(id);
    let selected_text = match current {
        Some(field) => RichText::new(id.label_for(field).unwrap_or(field.column())),
        None => RichText::new(id.placeholder().unwrap_or_default()).weak(),
    };

    let mut choice = current;
    egui::ComboBox::from_id_salt(id.as_str())
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for opt in id.options() {
                ui.selectable_value(&mut choice, Some(opt.value), opt.label);
            }
            ui.separator();
            ui.selectable_value(&mut choice, None, "✖ Limpiar");
        });

    state.set_selector(id, choice);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the status line above the page.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(format!(
            "{} clientes, {} columnas",
            state.table.len(),
            state.table.column_names.len()
        ));

        if state.debug {
            ui.separator();
            let s = &state.selectors;
            ui.monospace(format!(
                "feature={:?} x={:?} color={:?} segment={:?}",
                s.comparison(),
                s.x_axis(),
                s.color(),
                s.segment()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}
