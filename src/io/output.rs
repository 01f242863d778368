//! Report writers: JSON for machine consumption, terminal tables for
//! humans.

use crate::config::ProjectConfig;
use crate::core::types::ObjectiveAnswer;
use crate::formatting::percent_with_edge;
use crate::report::{ReportDisplay, ReportResult};
use clap::ValueEnum;
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}

pub trait OutputWriter {
    fn write_report(
        &mut self,
        result: &ReportResult,
        display: &ReportDisplay,
        config: &ProjectConfig,
    ) -> anyhow::Result<()>;
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    result: &'a ReportResult,
    display: &'a ReportDisplay,
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_report(
        &mut self,
        result: &ReportResult,
        display: &ReportDisplay,
        _config: &ProjectConfig,
    ) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(&JsonReport { result, display })?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct TableWriter<W: Write> {
    writer: W,
}

impl<W: Write> TableWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    fn write_objectives(&mut self, display: &ReportDisplay) -> anyhow::Result<()> {
        for status in &display.objectives {
            let tag = match status.met {
                ObjectiveAnswer::Yes => "MET".green().bold(),
                ObjectiveAnswer::No => "NOT MET".red().bold(),
            };
            writeln!(
                self.writer,
                "[{tag}] {} ({} of {} target)",
                status.msg,
                percent_with_edge(status.perc_sum),
                percent_with_edge(status.target),
            )?;
        }
        if !display.objectives.is_empty() {
            writeln!(self.writer)?;
        }
        Ok(())
    }

    fn write_group_table(
        &mut self,
        display: &ReportDisplay,
        config: &ProjectConfig,
    ) -> anyhow::Result<()> {
        let mg = config.metric_group(&display.metric_id)?;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        let mut header = vec![Cell::new("This plan contains")];
        header.extend(mg.classes.iter().map(|c| Cell::new(&c.display)));
        table.set_header(header);

        // one (group, class) cell per row in the flat aggregation, pivot
        // to one table row per group
        let mut groups: Vec<_> = Vec::new();
        for row in &display.group_rows {
            if !groups.contains(&row.group_id) {
                groups.push(row.group_id);
            }
        }
        for group in groups {
            let num_sketches = display
                .group_rows
                .iter()
                .find(|r| r.group_id == group)
                .map(|r| r.num_sketches)
                .unwrap_or(0);
            let label = config
                .display
                .get(group)
                .map(|d| {
                    if num_sketches == 1 {
                        d.display.clone()
                    } else {
                        d.display_plural.clone()
                    }
                })
                .unwrap_or_else(|| group.to_string());
            let mut cells = vec![Cell::new(format!("{num_sketches} {label}"))];
            for class in &mg.classes {
                let perc = display
                    .group_rows
                    .iter()
                    .find(|r| r.group_id == group && r.class_id == class.class_id)
                    .map(|r| r.perc_value)
                    .unwrap_or(0.0);
                cells.push(Cell::new(percent_with_edge(perc)));
            }
            table.add_row(cells);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }

    fn write_sketch_table(
        &mut self,
        display: &ReportDisplay,
        config: &ProjectConfig,
    ) -> anyhow::Result<()> {
        let mg = config.metric_group(&display.metric_id)?;
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        let mut header = vec![Cell::new("MPA")];
        header.extend(mg.classes.iter().map(|c| Cell::new(&c.display)));
        table.set_header(header);
        for row in &display.sketch_rows {
            let mut cells = vec![Cell::new(&row.sketch_name)];
            for class in &mg.classes {
                let perc = row.class_values.get(&class.class_id).copied().unwrap_or(0.0);
                cells.push(Cell::new(percent_with_edge(perc)));
            }
            table.add_row(cells);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

impl<W: Write> OutputWriter for TableWriter<W> {
    fn write_report(
        &mut self,
        result: &ReportResult,
        display: &ReportDisplay,
        config: &ProjectConfig,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} — plan {} — generated {}",
            display.metric_id,
            result.sketch.properties().name,
            result.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )?;
        writeln!(self.writer)?;
        self.write_objectives(display)?;
        self.write_group_table(display, config)?;
        writeln!(self.writer)?;
        self.write_sketch_table(display, config)?;
        Ok(())
    }
}

/// Writer for the requested format, to a file or stdout
pub fn create_writer(
    format: OutputFormat,
    output: Option<PathBuf>,
) -> anyhow::Result<Box<dyn OutputWriter>> {
    let sink: Box<dyn Write> = match output {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(std::io::stdout()),
    };
    Ok(match format {
        OutputFormat::Json => Box::new(JsonWriter::new(sink)),
        OutputFormat::Table => Box::new(TableWriter::new(sink)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::build_display;
    use crate::core::types::Metric;
    use crate::grouping::DesignationMap;
    use crate::config::{DataClass, MetricGroup};
    use crate::sketch::{Plan, Sketch, SketchProperties};
    use chrono::Utc;

    fn fixture() -> (ReportResult, ReportDisplay, ProjectConfig) {
        let config = ProjectConfig {
            metric_groups: vec![MetricGroup {
                metric_id: "habitatAreaOverlap".to_string(),
                classes: vec![DataClass::new("coral", "Coral")],
                layer_id: None,
                objective_ids: vec![],
            }],
            objectives: vec![],
            precalc: vec![Metric::new("precalc", 5_000_000.0).with_class("coral")],
            designations: DesignationMap::default(),
            display: Default::default(),
        };
        let result = ReportResult {
            metrics: vec![Metric::new("habitatAreaOverlap", 1_000_000.0)
                .with_class("coral")
                .with_sketch("sk1")],
            sketch: Plan::Sketch(Sketch::new(
                SketchProperties::new("sk1", "Zone 1").with_attribute("designation", "Ia"),
            )),
            generated_at: Utc::now(),
        };
        let display = build_display(&result, &config, "habitatAreaOverlap").unwrap();
        (result, display, config)
    }

    #[test]
    fn json_writer_emits_valid_json() {
        let (result, display, config) = fixture();
        let mut buf = Vec::new();
        JsonWriter::new(&mut buf)
            .write_report(&result, &display, &config)
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert!(value["display"]["groupRows"].is_array());
        assert_eq!(value["display"]["metricId"], "habitatAreaOverlap");
    }

    #[test]
    fn table_writer_renders_percentages() {
        let (result, display, config) = fixture();
        let mut buf = Vec::new();
        TableWriter::new(&mut buf)
            .write_report(&result, &display, &config)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Coral"));
        assert!(text.contains("20%"));
        assert!(text.contains("Zone 1"));
    }
}
