use std::io::Write;

use chrono::NaiveDateTime;
use ricochet::{Metric, ScenarioReport, Summary};
use serde::Serialize;

use crate::config::Theme;

/// Report of one requested scenario. `report` is `None` if it was never played inside
/// the day window.
#[derive(Debug, Serialize)]
pub struct ScenarioEntry {
    pub name: String,
    pub report: Option<ScenarioReport>,
}

/// Everything a renderer needs to draw the charts of a playlist
#[derive(Debug, Serialize)]
pub struct Bundle<'a> {
    pub playlist: Option<&'a str>,
    pub generated_at: NaiveDateTime,
    pub metric: Metric,
    pub theme: &'a Theme,
    pub scenarios: &'a [ScenarioEntry],
}

pub fn write_json(writer: impl Write, bundle: &Bundle) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, bundle)
}

const SUMMARY_HEADERS: [&str; 4] = ["Max", "Min", "Avg", "Std"];

/// Print the raw and averaged summaries of every scenario as a table
pub fn write_table(
    mut writer: impl Write,
    title: Option<&str>,
    metric: Metric,
    entries: &[ScenarioEntry],
) -> std::io::Result<()> {
    if let Some(title) = title {
        writeln!(writer, "{title} ({metric})")?;
    } else {
        writeln!(writer, "{metric}")?;
    }

    let name_width = entries
        .iter()
        .map(|entry| entry.name.chars().count())
        .chain(["Scenario".len()])
        .max()
        .unwrap_or_default();

    write!(writer, "{:<name_width$}  {:>8}", "Scenario", "Sessions")?;
    for prefix in ["", "Avg "] {
        for header in SUMMARY_HEADERS {
            write!(writer, "  {:>10}", format!("{prefix}{header}"))?;
        }
    }
    writeln!(writer)?;

    for entry in entries {
        write!(writer, "{:<name_width$}", entry.name)?;
        match &entry.report {
            Some(report) => {
                write!(writer, "  {:>8}", report.sessions)?;
                write_summary(&mut writer, &report.raw_summary)?;
                write_summary(&mut writer, &report.average_summary)?;
                writeln!(writer)?;
            }
            None => writeln!(writer, "  {:>8}  not played", 0)?,
        }
    }

    Ok(())
}

fn write_summary(writer: &mut impl Write, summary: &Summary) -> std::io::Result<()> {
    write!(
        writer,
        "  {:>10}  {:>10}  {:>10}  {:>10.3}",
        summary.max, summary.min, summary.avg, summary.std
    )
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use ricochet::{Configuration, MetricValue, SessionRecord};

    use super::*;

    fn entries() -> Vec<ScenarioEntry> {
        let today = NaiveDate::from_ymd_opt(2022, 10, 20).unwrap();
        let records: Vec<SessionRecord> = [(9, 600), (10, 700)]
            .into_iter()
            .map(|(hour, score)| {
                SessionRecord::new(
                    "Tile Frenzy",
                    today.and_hms_opt(hour, 0, 0).unwrap(),
                    [("score".to_string(), MetricValue::Int(score))]
                        .into_iter()
                        .collect(),
                )
            })
            .collect();

        ["Tile Frenzy", "Close Long Strafes"]
            .into_iter()
            .map(|name| ScenarioEntry {
                name: name.to_string(),
                report: ScenarioReport::build(name, &records, &Configuration::default(), today)
                    .unwrap(),
            })
            .collect()
    }

    #[test]
    fn test_table() {
        let mut output = Vec::new();
        write_table(&mut output, Some("Voltaic Novice"), Metric::Score, &entries()).unwrap();

        let output = String::from_utf8(output).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "Voltaic Novice (score)");
        assert!(lines[1].starts_with("Scenario            Sessions"));
        assert!(lines[1].ends_with("Avg Std"));
        assert!(lines[2].starts_with("Tile Frenzy  "));
        assert!(lines[2].contains("  700  "));
        assert!(lines[2].contains("50.000"));
        assert!(lines[3].ends_with("not played"));
    }

    #[test]
    fn test_json_bundle() {
        let entries = entries();
        let theme = Theme::default();
        let bundle = Bundle {
            playlist: None,
            generated_at: NaiveDate::from_ymd_opt(2022, 10, 20)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            metric: Metric::Score,
            theme: &theme,
            scenarios: &entries,
        };

        let mut output = Vec::new();
        write_json(&mut output, &bundle).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(json["playlist"], serde_json::Value::Null);
        assert_eq!(json["metric"], "score");
        assert_eq!(json["theme"]["graph"]["weekline"], "#7f7f7f");
        assert_eq!(json["scenarios"][0]["report"]["raw_summary"]["max"], 700);
        assert_eq!(json["scenarios"][0]["report"]["sessions"], 2);
        assert_eq!(json["scenarios"][1]["report"], serde_json::Value::Null);
    }
}
