use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use climate_folio::analysis::describe::Stat;
use climate_folio::analysis::AnalysisReport;
use climate_folio::config::Profile;
use climate_folio::data::model::Dataset;

use crate::state::AppState;
use crate::ui::plot;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Profile pages
// ---------------------------------------------------------------------------

pub fn home(ui: &mut Ui, profile: &Profile) {
    ui.heading("Climate Variation Dashboard");
    ui.label("Welcome to a climate dashboard built on ten years of monthly data.");
    ui.label("Pick a section in the side menu to navigate.");
    ui.add_space(12.0);
    ui.heading(&profile.name);
    paragraphs(ui, &profile.about);
}

pub fn education(ui: &mut Ui, profile: &Profile) {
    ui.heading("Education");
    paragraphs(ui, &profile.education);
    ui.add_space(12.0);
    ui.heading("Professional experience");
    paragraphs(ui, &profile.experience);
}

pub fn skills(ui: &mut Ui, profile: &Profile) {
    ui.heading("Technical skills");
    bullets(ui, &profile.skills);
    ui.add_space(12.0);
    ui.heading("Languages");
    bullets(ui, &profile.languages);
}

fn paragraphs(ui: &mut Ui, lines: &[String]) {
    for line in lines {
        ui.label(line);
    }
}

fn bullets(ui: &mut Ui, lines: &[String]) {
    for line in lines {
        ui.label(format!("• {line}"));
    }
}

// ---------------------------------------------------------------------------
// Analysis page
// ---------------------------------------------------------------------------

pub fn analysis(ui: &mut Ui, state: &AppState) {
    ui.heading("📊 Data analysis: mean monthly temperatures");

    let (Some(dataset), Some(report)) = (&state.dataset, &state.report) else {
        ui.label("No dataset loaded. Use File → Open… to pick a spreadsheet.");
        return;
    };

    ui.label(
        "Each row holds the last day of the measured month, the capital, and the \
         mean temperature of that month.",
    );
    ui.add_space(6.0);
    ui.strong("Data preview");
    preview_table(ui, dataset, state.config.analysis.preview_rows);

    ui.add_space(12.0);
    ui.heading("Descriptive statistics");
    if report.rows == 0 {
        ui.label("No capital selected.");
    }
    match &report.summary {
        Ok(summary) => key_value_table(ui, "summary_table", &summary.rows()),
        Err(e) => unavailable(ui, e),
    }

    ui.add_space(12.0);
    ui.heading("1. Is the mean temperature rising over the years?");
    plot::trend_plot(ui, &report.trend, state.color_map.as_ref());

    ui.add_space(12.0);
    ui.heading("2. Which capital varies the most?");
    variability_table(ui, state);

    ui.add_space(12.0);
    ui.heading("3. Is temperature correlated with time?");
    match &report.correlation {
        Ok(c) => {
            ui.label(
                RichText::new(format!(
                    "Pearson correlation: {:.2} (p-value: {:.5}, n = {})",
                    c.coefficient, c.p_value, c.sample_size
                ))
                .strong(),
            );
        }
        Err(e) => unavailable(ui, e),
    }

    ui.add_space(12.0);
    ui.heading("Temperature distribution");
    match &report.histogram {
        Ok(bins) => plot::histogram_plot(ui, bins, &report.normal),
        Err(e) => unavailable(ui, e),
    }

    ui.add_space(12.0);
    ui.heading("Extreme temperature events");
    match &report.poisson {
        Ok(fit) => {
            ui.label(format!(
                "{} of {} months above the {:.0}th percentile ({:.2} °C), λ = {:.3}",
                fit.events,
                fit.periods,
                state.config.analysis.extreme_quantile * 100.0,
                fit.threshold,
                fit.lambda
            ));
            plot::poisson_plot(ui, fit);
        }
        Err(e) => unavailable(ui, e),
    }

    ui.add_space(12.0);
    ui.heading("Months above threshold");
    match &report.binomial {
        Ok(fit) => {
            ui.label(format!(
                "{} of {} months above {:.2} °C, p = {:.3}",
                fit.successes, fit.trials, fit.threshold, fit.p
            ));
            plot::binomial_plot(ui, fit);
        }
        Err(e) => unavailable(ui, e),
    }

    ui.add_space(12.0);
    ui.heading("Fitted parameters");
    fits_table(ui, report);
}

fn unavailable(ui: &mut Ui, e: &impl std::fmt::Display) {
    ui.label(RichText::new(format!("Not available: {e}")).italics());
}

fn fmt_opt(v: Option<f64>) -> String {
    Stat::Value(v).to_string()
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

fn preview_table(ui: &mut Ui, dataset: &Dataset, rows: usize) {
    let head = dataset.head(rows);
    TableBuilder::new(ui)
        .id_salt("preview_table")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(100.0))
        .column(Column::auto().at_least(120.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui| {
                ui.strong("Date");
            });
            header.col(|ui| {
                ui.strong("Capital");
            });
            header.col(|ui| {
                ui.strong("Mean temp. (°C)");
            });
        })
        .body(|mut body| {
            for obs in head {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(obs.date.to_string());
                    });
                    row.col(|ui| {
                        ui.label(&obs.category);
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(obs.value));
                    });
                });
            }
        });
}

fn key_value_table(ui: &mut Ui, id: &str, rows: &[(&str, Stat)]) {
    TableBuilder::new(ui)
        .id_salt(id)
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(100.0))
        .column(Column::remainder())
        .body(|mut body| {
            for (label, value) in rows {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.strong(*label);
                    });
                    row.col(|ui| {
                        ui.label(value.to_string());
                    });
                });
            }
        });
}

fn variability_table(ui: &mut Ui, state: &AppState) {
    TableBuilder::new(ui)
        .id_salt("variability_table")
        .striped(true)
        .vscroll(false)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(80.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT, |mut header| {
            header.col(|ui| {
                ui.strong("Capital");
            });
            header.col(|ui| {
                ui.strong("var");
            });
            header.col(|ui| {
                ui.strong("std");
            });
        })
        .body(|mut body| {
            for v in &state.variability {
                body.row(ROW_HEIGHT, |mut row| {
                    row.col(|ui| {
                        ui.label(&v.category);
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(v.variance));
                    });
                    row.col(|ui| {
                        ui.label(fmt_opt(v.std));
                    });
                });
            }
        });
}

fn fits_table(ui: &mut Ui, report: &AnalysisReport) {
    let fits = report.fits();
    if fits.is_empty() {
        ui.label("No distribution could be fitted to the current selection.");
        return;
    }
    for fit in fits {
        ui.strong(fit.name());
        key_value_table(ui, fit.name(), &fit.parameters());
    }
}

