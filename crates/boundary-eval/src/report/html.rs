use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};

use crate::config::EvaluationConfig;
use crate::confusion::ConfusionCategory;
use crate::evaluate::Evaluation;

/// A titled block of report content.
pub struct ReportSection {
    title: String,
    content: Vec<Markup>,
}

impl ReportSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            content: Vec::new(),
        }
    }

    pub fn add_content(&mut self, markup: Markup) {
        self.content.push(markup);
    }

    fn render(&self) -> Markup {
        html! {
            section {
                h2 { (self.title) }
                @for block in &self.content {
                    div class="content" { (block) }
                }
            }
        }
    }
}

/// Single-page HTML report made of sections.
pub struct Report {
    title: String,
    sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, section: ReportSection) {
        self.sections.push(section);
    }

    pub fn render(&self) -> String {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let page = html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    style {
                        "body { font-family: sans-serif; margin: 2em; }
                        table { border-collapse: collapse; }
                        td, th { border: 1px solid #ccc; padding: 4px 10px; text-align: right; }
                        .code-container {
                            background-color: #f5f5f5;
                            padding: 10px;
                            border-radius: 5px;
                            overflow-x: auto;
                            font-family: monospace;
                            white-space: pre-wrap;
                        }"
                    }
                }
                body {
                    h1 { (self.title) }
                    p class="timestamp" { "Generated " (generated) }
                    @for section in &self.sections {
                        (section.render())
                    }
                }
            }
        };
        page.into_string()
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut f = File::create(&path)
            .with_context(|| format!("Failed to create report file: {}", path.as_ref().display()))?;
        f.write_all(self.render().as_bytes())
            .with_context(|| format!("Failed to write report file: {}", path.as_ref().display()))?;
        Ok(())
    }
}

/// Build the evaluation report: metrics, confusion counts, the figure and
/// the configuration it was produced with.
///
/// `svg` is embedded as-is and should be a complete `<svg>` document.
pub fn render_report(title: &str, evaluation: &Evaluation, config: &EvaluationConfig, svg: &str) -> Result<String> {
    let mut report = Report::new(title);

    /* Section 1: Overview */
    {
        let mut overview = ReportSection::new("Overview");
        let m = &evaluation.metrics;
        overview.add_content(html! {
            p { "Evaluated on " (evaluation.labels.len()) " samples at threshold " (config.threshold) "." }
            table {
                tr { th { "accuracy" } th { "average precision" } th { "ROC AUC" } th { "PR AUC" } }
                tr {
                    td { (format!("{:.4}", m.accuracy)) }
                    td { (format!("{:.4}", m.average_precision)) }
                    td { (format!("{:.4}", m.roc_auc)) }
                    td { (format!("{:.4}", m.pr_auc)) }
                }
            }
        });
        overview.add_content(html! {
            table {
                tr {
                    @for category in ConfusionCategory::ALL {
                        th { (category.label()) }
                    }
                }
                tr {
                    @for category in ConfusionCategory::ALL {
                        td { (evaluation.partition.count(category)) }
                    }
                }
            }
        });
        report.add_section(overview);
    }

    /* Section 2: Decision boundary */
    {
        let mut figure = ReportSection::new("Decision boundary");
        figure.add_content(html! {
            div class="figure" { (PreEscaped(svg)) }
        });
        report.add_section(figure);
    }

    /* Section 3: Configuration */
    {
        let mut config_section = ReportSection::new("Configuration");
        let yaml = serde_yaml::to_string(config).context("Failed to serialize evaluation config")?;
        config_section.add_content(html! {
            div class="code-container" {
                pre {
                    code { (yaml) }
                }
            }
        });
        report.add_section(config_section);
    }

    Ok(report.render())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_render_in_order() {
        let mut report = Report::new("demo <report>");
        let mut a = ReportSection::new("First");
        a.add_content(html! { p { "alpha" } });
        report.add_section(a);
        report.add_section(ReportSection::new("Second"));

        let out = report.render();
        assert!(out.starts_with("<!DOCTYPE html>"));
        assert!(out.contains("demo &lt;report&gt;"));
        let first = out.find("First").unwrap();
        let second = out.find("Second").unwrap();
        assert!(first < second);
        assert!(out.contains("<p>alpha</p>"));
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("r.html");
        Report::new("saved").save_to_file(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("<h1>saved</h1>"));
    }
}
