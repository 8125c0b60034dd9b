use apoe_onset::analysis::{classify, CohortLabel};
use apoe_onset::report::{format_age, Outcome};
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filters and statistics
// ---------------------------------------------------------------------------

/// Render the left panel: sex filter, cohort summaries, test results.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(patients) = &state.patients else {
        ui.label("No dataset loaded.");
        return;
    };
    let sex_values = patients.sex_values();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let header_text = format!("Sex  ({}/{})", state.filters.len(), sex_values.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("sex_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_none();
                        }
                    });

                    for value in &sex_values {
                        let label = value.as_deref().unwrap_or("<missing>");
                        let mut checked = state.filters.contains(value);
                        if ui.checkbox(&mut checked, label).changed() {
                            state.toggle_filter_value(value);
                        }
                    }
                });

            ui.separator();
            cohort_statistics(ui, state);
        });
}

fn cohort_statistics(ui: &mut Ui, state: &AppState) {
    let Some(report) = &state.report else {
        return;
    };

    ui.strong("Cohorts");
    match &report.cohorts {
        Outcome::Computed(s) => {
            for label in CohortLabel::ALL {
                let c = s.get(label);
                let sd = c.sd.map_or_else(|| "n/a".to_string(), |sd| format!("{sd:.2}"));
                ui.colored_label(
                    state.colors.color_for(label),
                    format!("{label}: n={}, mean={:.2}, sd={sd}", c.n, c.mean),
                );
                if c.missing_genotype > 0 {
                    ui.small(format!("  includes {} without genotype", c.missing_genotype));
                }
            }
        }
        Outcome::Unavailable(e) => {
            ui.label(e.to_string());
        }
    }

    ui.separator();
    ui.strong("Welch's t-test");
    match &report.comparison {
        Outcome::Computed(t) => {
            ui.label(format!("t = {:.4}  (df = {:.2})", t.t, t.df));
            ui.label(format!("p = {:.6}", t.p_value));
            let (text, color) = if t.significant {
                ("Significant at α = 0.05", Color32::LIGHT_GREEN)
            } else {
                ("Not significant at α = 0.05", Color32::GRAY)
            };
            ui.colored_label(color, text);
        }
        Outcome::Unavailable(e) => {
            ui.label(e.to_string());
        }
    }

    ui.separator();
    ui.strong("Regression: onset ~ education");
    match &report.regression {
        Outcome::Computed(r) => {
            ui.label(format!("n = {}", r.n));
            ui.label(format!("slope = {:.4} ± {:.4}", r.slope, r.std_err));
            ui.label(format!("intercept = {:.4}", r.intercept));
            ui.label(format!("R² = {:.4}", r.r_squared));
            ui.label(format!("p = {:.6}", r.p_value));
        }
        Outcome::Unavailable(e) => {
            ui.label(e.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – visible patients
// ---------------------------------------------------------------------------

pub fn patient_table(ui: &mut Ui, state: &AppState) {
    let Some(patients) = &state.patients else {
        return;
    };
    let records = patients.records();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(80.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(110.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::auto().at_least(70.0))
        .column(Column::auto().at_least(50.0))
        .column(Column::remainder())
        .header(20.0, |mut header| {
            for title in ["Donor", "APOE", "Group", "Onset", "Diagnosis", "Sex", "Education"] {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, state.visible_indices.len(), |mut row| {
                let Some(p) = state
                    .visible_indices
                    .get(row.index())
                    .and_then(|&i| records.get(i))
                else {
                    return;
                };
                let cohort = classify(p.genotype.as_deref());
                let opt_num = |v: Option<f64>| v.map(format_age).unwrap_or_default();

                row.col(|ui| {
                    ui.label(p.donor_id.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(p.genotype.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.colored_label(state.colors.color_for(cohort), cohort.label());
                });
                row.col(|ui| {
                    ui.label(format_age(p.age_of_onset));
                });
                row.col(|ui| {
                    ui.label(opt_num(p.age_of_diagnosis));
                });
                row.col(|ui| {
                    ui.label(p.sex.as_deref().unwrap_or(""));
                });
                row.col(|ui| {
                    ui.label(opt_num(p.years_education));
                });
            });
        });
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
        });

        ui.separator();

        if let Some(patients) = &state.patients {
            let name = state
                .source
                .as_deref()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{name}: {} patients loaded, {} visible",
                patients.len(),
                state.visible_indices.len()
            ));
        }

        ui.separator();

        if ui.selectable_label(state.show_fit, "Regression line").clicked() {
            state.show_fit = !state.show_fit;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open clinical table")
        .add_filter("Supported files", &["csv", "tsv", "tab", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        // The error is already in the status bar.
        let _ = state.open_path(&path);
    }
}
