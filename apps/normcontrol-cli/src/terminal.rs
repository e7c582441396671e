//! Terminal front-end
//!
//! Progress and errors go to stderr, results to stdout, so the verdict can
//! be piped on its own.

use std::io::Write;
use std::path::PathBuf;

use normcontrol_client::view::ProgressView;
use normcontrol_client::{Frontend, ReportFile, ResultsView, View};

const BAR_WIDTH: usize = 20;

pub struct TerminalFrontend<O, E> {
    out: O,
    err: E,
    report_dir: PathBuf,
    last_results: Option<ResultsView>,
    saved_report: Option<PathBuf>,
}

impl TerminalFrontend<std::io::Stdout, std::io::Stderr> {
    pub fn stdio(report_dir: PathBuf) -> Self {
        Self::new(std::io::stdout(), std::io::stderr(), report_dir)
    }
}

impl<O: Write, E: Write> TerminalFrontend<O, E> {
    pub fn new(out: O, err: E, report_dir: PathBuf) -> Self {
        Self {
            out,
            err,
            report_dir,
            last_results: None,
            saved_report: None,
        }
    }

    pub fn last_results(&self) -> Option<&ResultsView> {
        self.last_results.as_ref()
    }

    pub fn saved_report(&self) -> Option<&PathBuf> {
        self.saved_report.as_ref()
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

/// `[████████░░░░░░░░░░░░]  40% Анализ структуры`
pub fn progress_line(progress: &ProgressView) -> String {
    let filled = (progress.percent.min(100) as usize * BAR_WIDTH) / 100;
    format!(
        "[{}{}] {:>3}% {}",
        "█".repeat(filled),
        "░".repeat(BAR_WIDTH - filled),
        progress.percent,
        progress.label
    )
}

impl<O: Write, E: Write> Frontend for TerminalFrontend<O, E> {
    fn render(&mut self, view: &View) {
        // Write failures on a closed terminal are not actionable
        if let Some(progress) = &view.progress {
            let _ = writeln!(self.err, "{}", progress_line(progress));
        }
        if let Some(message) = &view.error_message {
            let _ = writeln!(self.err, "Ошибка: {}", message);
        }
        if let Some(results) = &view.results {
            let _ = writeln!(self.out, "{}", results.to_text());
            self.last_results = Some(results.clone());
        }
    }

    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.err, "[!] {}", message);
    }

    fn save_report(&mut self, report: &ReportFile) -> Result<(), String> {
        let path = report
            .save_to_dir(&self.report_dir)
            .map_err(|e| format!("{}: {}", self.report_dir.display(), e))?;
        let _ = writeln!(self.err, "Отчет сохранен: {}", path.display());
        self.saved_report = Some(path);
        Ok(())
    }
}
