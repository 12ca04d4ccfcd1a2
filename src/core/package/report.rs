use chrono::{DateTime, Local};

pub const REPORT_FILE_NAME: &str = "UPDATE_REPORT.txt";

/// Plain-text summary written next to the `mods/` folder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// `"<file> -> <version>"` lines.
    pub updated: Vec<String>,
    /// `"<file>: <reason>"` lines.
    pub failed: Vec<String>,
    pub total: usize,
}

impl UpdateReport {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record_success(&mut self, file_name: &str, version_label: &str) {
        self.updated.push(format!("{file_name} -> {version_label}"));
    }

    pub fn record_failure(&mut self, file_name: &str, reason: &str) {
        self.failed.push(format!("{file_name}: {reason}"));
    }

    /// Share of processed mods that made it into the archive, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.updated.len() as f64 / self.total as f64 * 100.0
    }

    pub fn render(&self, generated_at: DateTime<Local>) -> String {
        let mut out = String::from("=== MINECRAFT MOD UPDATE REPORT ===\n\n");

        if !self.updated.is_empty() {
            out.push_str(&format!("SUCCESSFULLY UPDATED ({}):\n", self.updated.len()));
            for line in &self.updated {
                out.push_str(&format!("✓ {line}\n"));
            }
            out.push('\n');
        }

        if !self.failed.is_empty() {
            out.push_str(&format!("FAILED TO UPDATE ({}):\n", self.failed.len()));
            for line in &self.failed {
                out.push_str(&format!("✗ {line}\n"));
            }
            out.push('\n');
        }

        out.push_str(&format!(
            "Generated on: {}\n",
            generated_at.format("%Y-%m-%d %H:%M:%S")
        ));
        out.push_str(&format!("Total mods processed: {}\n", self.total));
        out.push_str(&format!("Success rate: {:.1}%", self.success_rate()));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn renders_both_sections() {
        let mut report = UpdateReport::new(3);
        report.record_success("jei-1.0.jar", "15.3.0");
        report.record_failure("obscure.jar", "not matched on any registry");
        report.record_failure("broken.jar", "update failed: timeout");

        let text = report.render(at());

        assert!(text.starts_with("=== MINECRAFT MOD UPDATE REPORT ===\n\n"));
        assert!(text.contains("SUCCESSFULLY UPDATED (1):\n✓ jei-1.0.jar -> 15.3.0\n"));
        assert!(text.contains("FAILED TO UPDATE (2):\n✗ obscure.jar: not matched on any registry\n"));
        assert!(text.contains("Generated on: 2024-05-17 09:30:00\n"));
        assert!(text.contains("Total mods processed: 3\n"));
        assert!(text.ends_with("Success rate: 33.3%"));
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut report = UpdateReport::new(1);
        report.record_success("a.jar", "2.0");
        let text = report.render(at());
        assert!(!text.contains("FAILED TO UPDATE"));
        assert!(text.ends_with("Success rate: 100.0%"));
    }

    #[test]
    fn empty_batch_has_zero_rate() {
        let text = UpdateReport::new(0).render(at());
        assert!(text.ends_with("Success rate: 0.0%"));
        assert!(!text.contains("SUCCESSFULLY UPDATED"));
    }
}
