//! Console reporter with colored output

use crate::builder::{ReportSummary, SectionSummary, TableSummary};
use crate::SectionStatus;
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to list every section and table
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Print a report summary to stdout
    pub fn report(&self, summary: &ReportSummary) {
        print!("{}", self.render(summary));
    }

    /// Format a report summary as terminal text
    pub fn render(&self, summary: &ReportSummary) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let title = match &summary.version {
            Some(v) => format!("📋 {} (v{})", summary.title, v.trim_start_matches(['v', 'V'])),
            None => format!("📋 {}", summary.title),
        };
        let _ = writeln!(out, "{}", self.bold(&title));

        if self.verbose {
            for section in &summary.sections {
                self.write_section(&mut out, section);
            }
            for table in &summary.tables {
                self.write_table(&mut out, table);
            }
        }

        let evaluated: usize = summary.tables.iter().map(|t| t.evaluated).sum();
        let passed: usize = summary.tables.iter().map(|t| t.passed).sum();
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "   Sections: {} ({} failed)",
            summary.sections.len(),
            summary.failed_sections()
        );
        let _ = writeln!(
            out,
            "   Checks:   {}/{} passed ({} failed)",
            passed,
            evaluated,
            summary.failed_rows()
        );
        let verdict = if summary.is_passing() { "PASS" } else { "FAIL" };
        let verdict = if !self.use_colors {
            verdict.to_string()
        } else if summary.is_passing() {
            verdict.green().bold().to_string()
        } else {
            verdict.red().bold().to_string()
        };
        let _ = writeln!(out, "   Result:   {verdict}");
        out
    }

    fn write_section(&self, out: &mut String, section: &SectionSummary) {
        let progress = if section.progress < 100 {
            format!(" [{}%]", section.progress)
        } else {
            String::new()
        };
        let _ = writeln!(
            out,
            "   {} {}{}",
            self.colorize_status(section.status),
            section.title,
            progress
        );
    }

    fn write_table(&self, out: &mut String, table: &TableSummary) {
        let name = table.title.as_deref().unwrap_or("(untitled table)");
        let counts = format!("{}/{} passed", table.passed, table.evaluated);
        let counts = if !self.use_colors || table.evaluated == 0 {
            counts
        } else if table.failed == 0 {
            counts.green().to_string()
        } else {
            counts.red().to_string()
        };
        let _ = writeln!(out, "   ▸ {} ({} rows): {}", name, table.rows, counts);
    }

    fn bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn colorize_status(&self, status: SectionStatus) -> String {
        let label = format!("{:<7}", status.label());
        if !self.use_colors {
            return label;
        }
        match status {
            SectionStatus::Pass => label.green().bold().to_string(),
            SectionStatus::Fail => label.red().bold().to_string(),
            SectionStatus::Warning => label.yellow().to_string(),
            SectionStatus::Running => label.blue().to_string(),
            SectionStatus::Data => label.magenta().to_string(),
            SectionStatus::Default => label.dimmed().to_string(),
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary() -> ReportSummary {
        ReportSummary {
            title: "Bench".into(),
            version: Some("0.1.2".into()),
            sections: vec![
                SectionSummary {
                    title: "Power".into(),
                    status: SectionStatus::Pass,
                    progress: 100,
                },
                SectionSummary {
                    title: "Comms".into(),
                    status: SectionStatus::Running,
                    progress: 40,
                },
            ],
            tables: vec![TableSummary {
                title: Some("Rails".into()),
                rows: 3,
                evaluated: 2,
                passed: 1,
                failed: 1,
            }],
        }
    }

    #[test]
    fn test_plain_summary() {
        let text = ConsoleReporter::new().without_colors().render(&summary());
        assert!(text.contains("📋 Bench (v0.1.2)"));
        assert!(text.contains("Sections: 2 (0 failed)"));
        assert!(text.contains("Checks:   1/2 passed (1 failed)"));
        assert!(text.contains("Result:   FAIL"));
        assert!(!text.contains("Power"));
    }

    #[test]
    fn test_verbose_lists_sections_and_tables() {
        let text = ConsoleReporter::new()
            .without_colors()
            .verbose()
            .render(&summary());
        assert!(text.contains("PASS    Power"));
        assert!(text.contains("RUNNING Comms [40%]"));
        assert!(text.contains("▸ Rails (3 rows): 1/2 passed"));
    }
}
