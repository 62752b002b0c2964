use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points, VLine};

use climate_folio::analysis::distribution::{BinomialFit, NormalOverlay, PoissonFit};
use climate_folio::analysis::histogram::Bin;
use climate_folio::analysis::trend::TrendSeries;
use climate_folio::error::StatsResult;

use crate::color::ColorMap;

const PLOT_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Trend (one line per selected capital)
// ---------------------------------------------------------------------------

pub fn trend_plot(ui: &mut Ui, trend: &TrendSeries, color_map: Option<&ColorMap>) {
    Plot::new("trend_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("Mean temperature (°C)")
        .show(ui, |plot_ui| {
            for (category, points) in trend.lines_by_category() {
                let color = color_map
                    .map(|cm| cm.color_for(category))
                    .unwrap_or(Color32::LIGHT_BLUE);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(category)
                        .color(color)
                        .width(1.5),
                );
                plot_ui.points(Points::new(PlotPoints::from(points)).color(color).radius(2.0));
            }
        });
}

// ---------------------------------------------------------------------------
// Density histogram with the normal overlay
// ---------------------------------------------------------------------------

pub fn histogram_plot(ui: &mut Ui, bins: &[Bin], normal: &StatsResult<NormalOverlay>) {
    let bars: Vec<Bar> = bins
        .iter()
        .map(|b| Bar::new(b.center(), b.density).width(b.width()))
        .collect();

    Plot::new("histogram_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Mean temperature (°C)")
        .y_axis_label("Probability density")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name("Observed")
                    .color(Color32::from_rgba_unmultiplied(100, 150, 250, 180)),
            );
            match normal {
                Ok(NormalOverlay::Curve(fit)) => plot_ui.line(
                    Line::new(PlotPoints::from(fit.curve()))
                        .name("Normal distribution")
                        .color(Color32::RED)
                        .width(2.0),
                ),
                Ok(NormalOverlay::PointMass(value)) => plot_ui.vline(
                    VLine::new(*value)
                        .name("All values equal")
                        .color(Color32::RED),
                ),
                Err(_) => {}
            }
        });
}

// ---------------------------------------------------------------------------
// Poisson: observed extreme events vs expected occurrences
// ---------------------------------------------------------------------------

pub fn poisson_plot(ui: &mut Ui, fit: &PoissonFit) {
    let expected: Vec<[f64; 2]> = fit
        .x
        .iter()
        .zip(&fit.expected_counts)
        .map(|(&x, &y)| [x as f64, y])
        .collect();

    Plot::new("poisson_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Events")
        .y_axis_label("Occurrences")
        .show(ui, |plot_ui| {
            let [x, height] = observed_events_bar(fit);
            plot_ui.bar_chart(
                BarChart::new(vec![Bar::new(x, height).width(0.8)])
                    .name(format!("Observed events (k = {})", fit.events))
                    .color(Color32::BLUE),
            );
            plot_ui.line(
                Line::new(PlotPoints::from(expected.clone()))
                    .name("Poisson distribution")
                    .color(Color32::RED),
            );
            plot_ui.points(Points::new(PlotPoints::from(expected)).color(Color32::RED).radius(3.0));
        });
}

/// The observed total sits left of the `0..k+5` support so it never lines up
/// with an event count.
fn observed_events_bar(fit: &PoissonFit) -> [f64; 2] {
    [-2.0, fit.events as f64]
}

// ---------------------------------------------------------------------------
// Binomial PMF
// ---------------------------------------------------------------------------

pub fn binomial_plot(ui: &mut Ui, fit: &BinomialFit) {
    let bars: Vec<Bar> = fit
        .curve()
        .into_iter()
        .map(|[x, y]| Bar::new(x, y).width(0.8))
        .collect();

    Plot::new("binomial_plot")
        .legend(Legend::default())
        .height(PLOT_HEIGHT)
        .x_axis_label("Months above threshold")
        .y_axis_label("Probability")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Binomial PMF").color(Color32::GOLD));
            plot_ui.vline(
                VLine::new(fit.successes as f64)
                    .name("Observed")
                    .color(Color32::RED),
            );
        });
}

#[cfg(test)]
mod tests {
    use climate_folio::analysis::distribution::{fit_poisson_values, Threshold};

    use super::*;

    #[test]
    fn observed_bar_stays_off_the_event_axis() {
        let values: Vec<f64> = (1..=20).map(f64::from).collect();
        let fit = fit_poisson_values(&values, 20, Threshold::Value(17.0)).unwrap();
        let [x, height] = observed_events_bar(&fit);
        assert_eq!(height, 3.0);
        assert!(fit.x.iter().all(|&k| (k as f64 - x).abs() >= 1.0));
    }
}
