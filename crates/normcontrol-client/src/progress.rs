//! Progress model for a workflow run
//!
//! Only two checkpoints track real work: the upload finishing (20%) and the
//! analysis body being decoded (100%). The stages in between are a
//! simulated progress display played after the server answers; they say
//! nothing about server-side progress.

use std::time::Duration;

/// Percent thresholds of the five step indicators
pub const STEP_THRESHOLDS: [u8; 5] = [20, 40, 60, 80, 100];

/// A named point on the progress bar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Uploading,
    ExtractingText,
    AnalyzingStructure,
    CheckingRules,
    BuildingReport,
    Done,
}

impl Checkpoint {
    pub fn percent(&self) -> u8 {
        match self {
            Checkpoint::Uploading => 0,
            Checkpoint::ExtractingText => 20,
            Checkpoint::AnalyzingStructure => 40,
            Checkpoint::CheckingRules => 60,
            Checkpoint::BuildingReport => 80,
            Checkpoint::Done => 100,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Checkpoint::Uploading => "Загрузка файла",
            Checkpoint::ExtractingText => "Извлечение текста",
            Checkpoint::AnalyzingStructure => "Анализ структуры",
            Checkpoint::CheckingRules => "Проверка правил",
            Checkpoint::BuildingReport => "Формирование отчета",
            Checkpoint::Done => "Завершено",
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            percent: self.percent(),
            label: self.label(),
        }
    }
}

/// Position of the progress bar plus the step caption
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub percent: u8,
    pub label: &'static str,
}

impl Progress {
    /// Which of the five step indicators are lit
    pub fn active_steps(&self) -> [bool; 5] {
        STEP_THRESHOLDS.map(|threshold| self.percent >= threshold)
    }

    /// CSS width of the fill bar
    pub fn fill_width(&self) -> String {
        format!("{}%", self.percent.min(100))
    }
}

/// Simulated stages shown once the analysis request has succeeded
pub struct SimulatedProgress;

impl SimulatedProgress {
    pub const ANALYSIS_STAGES: [Checkpoint; 3] = [
        Checkpoint::AnalyzingStructure,
        Checkpoint::CheckingRules,
        Checkpoint::BuildingReport,
    ];
}

/// Cosmetic delays of the simulated progress display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    /// Pause after each simulated analysis stage
    pub stage_delay: Duration,
    /// Pause at 100% before the results are shown
    pub results_delay: Duration,
}

impl Pacing {
    /// No cosmetic delays at all
    pub const fn immediate() -> Self {
        Self {
            stage_delay: Duration::ZERO,
            results_delay: Duration::ZERO,
        }
    }
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            stage_delay: Duration::from_millis(300),
            results_delay: Duration::from_secs(1),
        }
    }
}
