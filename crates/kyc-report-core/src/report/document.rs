//! Paginated plain-text rendering of a [`Report`], suitable for printing or
//! attaching to a case file.

use chrono::NaiveDate;

use super::assembler::Report;
use crate::assessment::findings::Finding;

const TITLE: &str = "OPEN-SOURCE INVESTIGATION REPORT";
const FORM_FEED: char = '\u{c}';
const MIN_WIDTH: usize = 40;
const MIN_LINES_PER_PAGE: usize = 12;
/// Lines reserved at the bottom of every page: a blank and the footer.
const FOOTER_LINES: usize = 2;

/// Layout options for [`render_document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentOptions {
    pub lines_per_page: usize,
    pub width: usize,
    /// Printed under the title when set.
    pub generated_on: Option<NaiveDate>,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        DocumentOptions {
            lines_per_page: 56,
            width: 90,
            generated_on: None,
        }
    }
}

struct PageWriter {
    width: usize,
    body_lines: usize,
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl PageWriter {
    fn new(options: &DocumentOptions) -> Self {
        let lines = options.lines_per_page.max(MIN_LINES_PER_PAGE);
        PageWriter {
            width: options.width.max(MIN_WIDTH),
            body_lines: lines - FOOTER_LINES,
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn remaining(&self) -> usize {
        self.body_lines - self.current.len()
    }

    fn break_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
    }

    /// Start a new page unless `lines` more lines still fit.
    fn keep_together(&mut self, lines: usize) {
        if lines <= self.body_lines && lines > self.remaining() && !self.current.is_empty() {
            self.break_page();
        }
    }

    fn line(&mut self, text: impl Into<String>) {
        if self.remaining() == 0 {
            self.break_page();
        }
        self.current.push(text.into());
    }

    fn blank(&mut self) {
        // No leading blanks at the top of a page.
        if !self.current.is_empty() && self.remaining() > 0 {
            self.current.push(String::new());
        }
    }

    fn rule(&mut self, ch: char) {
        let rule: String = std::iter::repeat(ch).take(self.width).collect();
        self.line(rule);
    }

    fn centered(&mut self, text: &str) {
        let len = text.chars().count();
        let pad = self.width.saturating_sub(len) / 2;
        self.line(format!("{}{}", " ".repeat(pad), text));
    }

    /// `left` flush left and `right` flush right on the same line.
    fn badge_line(&mut self, left: &str, right: &str) {
        let used = left.chars().count() + right.chars().count();
        if used + 1 > self.width {
            self.line(left.to_string());
            self.line(format!("{:>width$}", right, width = self.width));
        } else {
            let gap = self.width - used;
            self.line(format!("{}{}{}", left, " ".repeat(gap), right));
        }
    }

    fn heading(&mut self, title: &str) {
        self.keep_together(4);
        self.blank();
        self.line(title.to_string());
        self.rule('-');
    }

    fn paragraph(&mut self, text: &str, indent: usize) {
        let lines = wrap(text, self.width.saturating_sub(indent).max(1));
        for l in lines {
            self.line(format!("{}{}", " ".repeat(indent), l));
        }
    }

    fn finish(mut self) -> Vec<Vec<String>> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.break_page();
        }
        let total = self.pages.len();
        let width = self.width;
        let body_lines = self.body_lines;
        self.pages
            .into_iter()
            .enumerate()
            .map(|(i, mut page)| {
                page.resize(body_lines, String::new());
                page.push(String::new());
                let footer = format!("Page {} of {}", i + 1, total);
                page.push(format!("{:>width$}", footer, width = width));
                page
            })
            .collect()
    }
}

/// Greedy word wrap. Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > width {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = word.split_off(width);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let len = word.len();
        if current_len > 0 && current_len + 1 + len > width {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(word);
        current_len += len;
    }
    if current_len > 0 {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

fn write_finding(w: &mut PageWriter, finding: &Finding) {
    w.keep_together(5);
    w.blank();
    w.badge_line(
        &finding.category.to_uppercase(),
        &format!("SCORE: {}/10", finding.score.normalize()),
    );
    w.line(format!("Level: {}", finding.risk_level));
    w.line("RISK ASSESSMENT:");
    w.paragraph(&finding.description, 2);

    if !finding.evidence_sources.is_empty() {
        w.line("EVIDENCE SOURCES:");
        for (i, source) in finding.evidence_sources.iter().enumerate() {
            w.paragraph(&format!("{}. {}", i + 1, source.title), 2);
            if !source.is_placeholder() {
                w.paragraph(&source.link, 5);
            }
            w.paragraph(&source.snippet, 5);
        }
    }
}

/// Lay out the report as pages separated by form feeds. Each page is padded
/// to `lines_per_page` lines and ends with `Page i of n`.
pub fn render_document(report: &Report, options: &DocumentOptions) -> String {
    let mut w = PageWriter::new(options);

    w.rule('=');
    w.centered(TITLE);
    w.rule('=');
    w.blank();
    w.paragraph(&report.company_name, 0);
    w.line(format!("KVK: {}", report.kvk_number));
    if let Some(date) = options.generated_on {
        w.line(format!("Generated: {}", date.format("%d-%m-%Y")));
    }

    w.heading("COMPANY INTRODUCTION");
    w.paragraph(&report.introduction, 0);
    if !report.search_keywords.is_empty() {
        w.blank();
        w.line("Search keywords:");
        for keyword in &report.search_keywords {
            w.paragraph(&format!("- {}", keyword), 2);
        }
    }

    w.heading("CONCLUSION");
    w.badge_line(
        &format!("Overall risk score: {:.1}/10", report.overall_score),
        &format!("RISK: {}", report.risk_classification.label().to_uppercase()),
    );
    w.blank();
    w.paragraph(&report.conclusion_text, 0);

    w.heading("FINDINGS");
    for finding in &report.findings {
        write_finding(&mut w, finding);
    }

    let pages = w.finish();
    let rendered: Vec<String> = pages.into_iter().map(|p| p.join("\n")).collect();
    let mut out = rendered.join(&format!("\n{}", FORM_FEED));
    out.push('\n');
    out
}

/// `Acme B.V.` -> `Acme_B_V__Investigation_Report.txt`
pub fn document_file_name(report: &Report) -> String {
    let stem: String = report
        .company_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}_Investigation_Report.txt", stem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::company::fixtures::{fixture_company, fixture_investigation};
    use crate::investigation::InvestigationResult;
    use crate::report::assembler::{assemble_report, assemble_report_from_value};

    fn fixture_report() -> Report {
        let company = fixture_company("12345678").unwrap();
        let raw = fixture_investigation(&company.legal_name).unwrap();
        assemble_report_from_value(Some(&raw), Some(&company))
    }

    #[test]
    fn test_wrap_respects_width() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]);
        assert_eq!(wrap("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn test_document_sections_and_badges() {
        let doc = render_document(&fixture_report(), &DocumentOptions::default());
        assert!(doc.contains(TITLE));
        assert!(doc.contains("KVK: 12345678"));
        assert!(doc.contains("COMPANY INTRODUCTION"));
        assert!(doc.contains("RISK: LOW"));
        assert!(doc.contains("SCORE: 1/10"));
        assert!(doc.contains("RISK ASSESSMENT:"));
        assert!(doc.contains("EVIDENCE SOURCES:"));
        assert!(doc.contains("https://www.kvk.nl/zoeken/?source=all&q=12345678"));
    }

    #[test]
    fn test_every_page_has_footer_and_fixed_height() {
        let options = DocumentOptions {
            lines_per_page: 20,
            width: 60,
            generated_on: NaiveDate::from_ymd_opt(2024, 1, 20),
        };
        let doc = render_document(&fixture_report(), &options);
        let pages: Vec<&str> = doc.trim_end_matches('\n').split(FORM_FEED).collect();
        let total = pages.len();
        assert!(total > 1);
        for (i, page) in pages.iter().enumerate() {
            let lines: Vec<&str> = page.trim_matches('\n').split('\n').collect();
            assert_eq!(lines.len(), 20, "page {} height", i + 1);
            assert!(lines.iter().all(|l| l.chars().count() <= 60));
            assert_eq!(
                lines.last().unwrap().trim(),
                format!("Page {} of {}", i + 1, total)
            );
        }
        assert!(doc.contains("Generated: 20-01-2024"));
    }

    #[test]
    fn test_placeholder_links_are_omitted() {
        let report = assemble_report(&InvestigationResult::Absent, None);
        let doc = render_document(&report, &DocumentOptions::default());
        assert!(doc.contains("Pending assessment"));
        assert!(!doc.lines().any(|l| l.trim() == "#"));
    }

    #[test]
    fn test_document_file_name() {
        assert_eq!(
            document_file_name(&fixture_report()),
            "Amsterdam_Tech_Solutions_B_V__Investigation_Report.txt"
        );
    }
}
