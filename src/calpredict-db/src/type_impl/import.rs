use std::{fmt, path::Path};

use anyhow::Context;
use calpredict_types::{QuantitySample, WorkoutRecord};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::DatabaseHandler;

const IMPORT_CHUNK: usize = 500;

/// On-disk export of a health store.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct HealthExport {
    #[serde(default)]
    pub samples: Vec<QuantitySample>,
    #[serde(default)]
    pub workouts: Vec<WorkoutRecord>,
}

impl HealthExport {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("invalid export {}", path.display()))
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Samples written as new rows.
    pub samples_stored: u64,
    /// Samples identical to one already stored.
    pub samples_skipped: u64,
    pub workouts_stored: u64,
    /// Samples and workouts that end before they start.
    pub rejected: u64,
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Import complete:")?;
        writeln!(f, "  samples:  {} ({} already stored)", self.samples_stored, self.samples_skipped)?;
        writeln!(f, "  workouts: {}", self.workouts_stored)?;
        write!(f, "  rejected: {}", self.rejected)
    }
}

fn bar_style() -> ProgressStyle {
    ProgressStyle::with_template("{prefix:>10} [{wide_bar:.cyan/dim}] {pos}/{len} ({eta} remaining)")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=>-")
}

impl DatabaseHandler {
    pub async fn import(&self, export: HealthExport) -> anyhow::Result<ImportReport> {
        let HealthExport { samples, workouts } = export;
        let mut report = ImportReport::default();

        let pb = ProgressBar::new((samples.len() + workouts.len()) as u64);
        pb.set_style(bar_style());
        pb.set_prefix("import");

        let (samples, inverted): (Vec<_>, Vec<_>) =
            samples.into_iter().partition(QuantitySample::is_ordered);
        for sample in &inverted {
            warn!(
                "rejecting {} sample ending before it starts ({} > {})",
                sample.quantity_type, sample.start, sample.end
            );
        }
        report.rejected += inverted.len() as u64;
        pb.inc(inverted.len() as u64);

        for chunk in samples.chunks(IMPORT_CHUNK) {
            let stored = self.create_samples(chunk.to_vec()).await?;
            report.samples_stored += stored;
            report.samples_skipped += chunk.len() as u64 - stored;
            pb.inc(chunk.len() as u64);
        }

        for workout in workouts {
            pb.inc(1);
            if !workout.window().is_ordered() {
                warn!(
                    "rejecting {} workout ending before it starts ({} > {})",
                    workout.activity, workout.start, workout.end
                );
                report.rejected += 1;
                continue;
            }
            self.create_workout(workout).await?;
            report.workouts_stored += 1;
        }

        pb.finish_and_clear();
        info!(
            "imported {} samples and {} workouts",
            report.samples_stored, report.workouts_stored
        );
        Ok(report)
    }
}
