use eframe::egui::{self, Color32, RichText, Ui};

use climate_folio::analysis::distribution::Threshold;

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – navigation and analysis controls
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Navigation");
    ui.separator();

    for page in Page::ALL {
        if ui.selectable_label(state.page == page, page.label()).clicked() {
            state.page = page;
        }
    }

    if state.page != Page::Analysis {
        return;
    }

    ui.add_space(8.0);
    ui.heading("Capitals");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("All").clicked() {
            state.set_selection(dataset.categories().iter().cloned().collect());
        }
        if ui.small_button("None").clicked() {
            state.set_selection(Default::default());
        }
    });

    for category in dataset.categories() {
        let mut text = RichText::new(category);
        if let Some(cm) = &state.color_map {
            text = text.color(cm.color_for(category));
        }
        let mut checked = state.selection.contains(category);
        if ui.checkbox(&mut checked, text).changed() {
            state.toggle_category(category);
        }
    }

    ui.add_space(8.0);
    threshold_controls(ui, state);
}

/// Binomial threshold: a quantile of the selection or a fixed temperature.
fn threshold_controls(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Binomial threshold");
    ui.separator();

    let current = state.config.analysis.binomial_threshold;
    let (lo, hi) = state.value_range().unwrap_or((0.0, 40.0));
    let mut next = current;

    ui.horizontal(|ui: &mut Ui| {
        if ui
            .selectable_label(matches!(current, Threshold::Quantile(_)), "Quantile")
            .clicked()
        {
            next = Threshold::Quantile(state.config.analysis.extreme_quantile);
        }
        if ui
            .selectable_label(matches!(current, Threshold::Value(_)), "Temperature")
            .clicked()
        {
            next = Threshold::Value((lo + hi) / 2.0);
        }
    });

    match current {
        Threshold::Quantile(mut q) => {
            if ui
                .add(egui::Slider::new(&mut q, 0.0..=1.0).text("q"))
                .changed()
            {
                next = Threshold::Quantile(q);
            }
        }
        Threshold::Value(mut v) => {
            if ui
                .add(egui::Slider::new(&mut v, lo..=hi).text("°C").step_by(0.1))
                .changed()
            {
                next = Threshold::Value(v);
            }
        }
    }

    state.set_binomial_threshold(next);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.load_configured();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} observations loaded, {} selected",
                ds.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open temperature data")
        .add_filter("Supported files", &["xlsx", "xlsm", "xls", "xlsb", "ods", "csv"])
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "xlsb", "ods"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
        if state.status_message.is_none() {
            state.config.data.path = path;
            state.page = Page::Analysis;
        }
    }
}
