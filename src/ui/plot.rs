use apoe_onset::analysis::CohortLabel;
use apoe_onset::report::Outcome;
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel: cohort bar chart and education scatter side by side
// ---------------------------------------------------------------------------

pub fn central_plots(ui: &mut Ui, state: &AppState) {
    if state.patients.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a clinical table to begin  (File → Open…)");
        });
        return;
    }

    ui.columns(2, |cols| {
        cohort_bar_chart(&mut cols[0], state);
        education_scatter(&mut cols[1], state);
    });
}

/// Mean onset age per cohort with ±1 SD whiskers.
fn cohort_bar_chart(ui: &mut Ui, state: &AppState) {
    ui.strong("APOE (grouped) vs age of onset");

    let Some(Outcome::Computed(summaries)) = state.report.as_ref().map(|r| &r.cohorts) else {
        if let Some(Outcome::Unavailable(e)) = state.report.as_ref().map(|r| &r.cohorts) {
            ui.label(e.to_string());
        }
        return;
    };

    Plot::new("cohort_bars")
        .legend(Legend::default())
        .y_axis_label("Mean age of onset (years)")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (pos, label) in CohortLabel::ALL.into_iter().enumerate() {
                let summary = summaries.get(label);
                let color = state.colors.color_for(label);
                let x = pos as f64;

                let bar = Bar::new(x, summary.mean)
                    .width(0.6)
                    .name(format!("{label} (n={})", summary.n));
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(label.label()));

                if let Some(sd) = summary.sd {
                    let whisker: PlotPoints =
                        vec![[x, summary.mean - sd], [x, summary.mean + sd]].into();
                    plot_ui.line(Line::new(whisker).color(Color32::DARK_GRAY).width(2.0));
                    for y in [summary.mean - sd, summary.mean + sd] {
                        let cap: PlotPoints = vec![[x - 0.08, y], [x + 0.08, y]].into();
                        plot_ui.line(Line::new(cap).color(Color32::DARK_GRAY).width(2.0));
                    }
                }
            }
        });
}

/// Education vs onset, one point per visible patient, plus the fitted line.
fn education_scatter(ui: &mut Ui, state: &AppState) {
    ui.strong("Education vs age of onset");

    let regression = state.report.as_ref().map(|r| &r.regression);
    if let Some(Outcome::Unavailable(e)) = regression {
        ui.label(e.to_string());
    }

    Plot::new("education_scatter")
        .legend(Legend::default())
        .x_axis_label("Years of education")
        .y_axis_label("Age of onset (years)")
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            let points: PlotPoints = state.scatter.clone().into();
            plot_ui.points(Points::new(points).radius(3.5).color(Color32::LIGHT_BLUE).name("Data"));

            let Some(Outcome::Computed(fit)) = regression else {
                return;
            };
            if !state.show_fit {
                return;
            }
            let (min_x, max_x) = state
                .scatter
                .iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                    (lo.min(p[0]), hi.max(p[0]))
                });
            let line: PlotPoints = vec![[min_x, fit.predict(min_x)], [max_x, fit.predict(max_x)]].into();
            plot_ui.line(
                Line::new(line)
                    .color(Color32::LIGHT_RED)
                    .width(2.0)
                    .name(format!(
                        "Fit: y = {:.2}x + {:.2}  (R² = {:.3})",
                        fit.slope, fit.intercept, fit.r_squared
                    )),
            );
        });
}
