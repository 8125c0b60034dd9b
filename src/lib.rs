//! Ingestion and statistics for APOE genotype cohorts and the age at which
//! cognitive symptoms first appear.
//!
//! The GUI viewer (`src/main.rs`) and the `report` binary are thin layers on
//! top of [`data`], [`analysis`] and [`report`].

pub mod analysis;
pub mod data;
pub mod report;
