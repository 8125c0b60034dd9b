use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use apoe_onset::analysis::regression::education_onset_pairs;
use apoe_onset::data::filter::{filtered_indices, init_filter_state, FilterState};
use apoe_onset::data::loader::load_file;
use apoe_onset::data::model::PatientCollection;
use apoe_onset::report::AnalysisReport;

use crate::color::CohortColors;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// File the patients were loaded from.
    pub source: Option<PathBuf>,

    /// Loaded patients (None until user loads a file).
    pub patients: Option<PatientCollection>,

    /// Selected sex values.
    pub filters: FilterState,

    /// Indices of patients passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Analyses over the visible patients, rebuilt on every filter change.
    pub report: Option<AnalysisReport>,

    /// `(education, onset)` points of the visible patients.
    pub scatter: Vec<[f64; 2]>,

    pub colors: CohortColors,

    /// Whether the fitted line is drawn over the scatter.
    pub show_fit: bool,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            source: None,
            patients: None,
            filters: FilterState::default(),
            visible_indices: Vec::new(),
            report: None,
            scatter: Vec::new(),
            colors: CohortColors::default(),
            show_fit: true,
            status_message: None,
        }
    }
}

impl AppState {
    /// Load a file, replacing whatever was shown before. Errors are kept in
    /// `status_message` as well as returned.
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        match load_file(path).with_context(|| format!("loading {}", path.display())) {
            Ok(patients) => {
                log::info!("Showing {} patients from {}", patients.len(), path.display());
                self.set_patients(patients);
                self.source = Some(path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
                Err(e)
            }
        }
    }

    /// Ingest a newly loaded collection with every patient visible.
    pub fn set_patients(&mut self, patients: PatientCollection) {
        self.filters = init_filter_state(&patients);
        self.status_message = if patients.is_empty() {
            Some("No patients with an onset age were found".to_string())
        } else {
            None
        };
        self.patients = Some(patients);
        self.refilter();
    }

    /// Recompute `visible_indices` and the analyses after a filter change.
    pub fn refilter(&mut self) {
        let Some(patients) = &self.patients else {
            return;
        };
        self.visible_indices = filtered_indices(patients, &self.filters);
        let visible = patients.subset(&self.visible_indices);
        self.scatter = education_onset_pairs(visible.records())
            .into_iter()
            .map(|(x, y)| [x, y])
            .collect();
        self.report = Some(AnalysisReport::build(visible.records()));
    }

    /// Toggle a single sex value in the filter.
    pub fn toggle_filter_value(&mut self, value: &Option<String>) {
        if !self.filters.remove(value) {
            self.filters.insert(value.clone());
        }
        self.refilter();
    }

    pub fn select_all(&mut self) {
        if let Some(patients) = &self.patients {
            self.filters = init_filter_state(patients);
            self.refilter();
        }
    }

    pub fn select_none(&mut self) {
        self.filters.clear();
        self.refilter();
    }
}
