use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use ricochet::Metric;

use crate::config::Settings;

#[derive(Debug, Parser)]
#[command(name = "aimtrend", version)]
#[command(about = "Track your KovaaK's progress from the game's stat files")]
pub struct Cli {
    /// Directory containing settings.toml
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The game's stats directory
    #[arg(long, global = true)]
    pub stats: Option<PathBuf>,

    /// The game's playlists directory
    #[arg(long, global = true)]
    pub playlists: Option<PathBuf>,

    /// Stop at the first stat file that fails to parse, instead of skipping it
    #[arg(long, global = true)]
    pub abort_on_error: bool,

    #[command(flatten)]
    pub analysis: AnalysisArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every scenario found in the stats directory
    Scenarios,
    /// List the playlists in the playlists directory
    Playlists,
    /// Report the progress on a playlist or on single scenarios
    Report(ReportArgs),
    /// Print the resolved settings
    Config,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Playlist file, or the name of a playlist in the playlists directory
    #[arg(required_unless_present = "scenario", conflicts_with = "scenario")]
    pub playlist: Option<PathBuf>,

    /// Scenario to report on, can be repeated
    #[arg(short, long)]
    pub scenario: Vec<String>,

    /// Print the report data as JSON
    #[arg(long)]
    pub json: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Overrides of the analysis settings
#[derive(Debug, Default, Args)]
pub struct AnalysisArgs {
    /// Only analyze sessions of the last N days
    #[arg(long, global = true, conflicts_with = "all_days")]
    pub days: Option<u32>,

    /// Analyze every session ever played
    #[arg(long, global = true)]
    pub all_days: bool,

    /// Group sessions played within this many hours of each other
    #[arg(long, global = true, conflicts_with = "no_grouping")]
    pub group_hours: Option<f64>,

    /// Do not group sessions
    #[arg(long, global = true)]
    pub no_grouping: bool,

    /// Number of sessions in the rolling average
    #[arg(long, global = true)]
    pub average: Option<usize>,

    /// Metric to report, e.g. score, accuracy or kills
    #[arg(long, global = true)]
    pub metric: Option<Metric>,
}

impl Cli {
    /// Apply the command line overrides on top of the loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(stats) = &self.stats {
            settings.stats_dir = Some(stats.clone());
        }
        if let Some(playlists) = &self.playlists {
            settings.playlists_dir = Some(playlists.clone());
        }
        settings.abort_on_error |= self.abort_on_error;

        let analysis = &mut settings.analysis;
        let overrides = &self.analysis;

        if let Some(days) = overrides.days {
            analysis.limit_days = true;
            analysis.days = days;
        }
        if overrides.all_days {
            analysis.limit_days = false;
        }
        if let Some(hours) = overrides.group_hours {
            analysis.group_sessions = true;
            analysis.group_hours = hours;
        }
        if overrides.no_grouping {
            analysis.group_sessions = false;
        }
        if let Some(average) = overrides.average {
            analysis.average_sessions = average;
        }
        if let Some(metric) = overrides.metric {
            analysis.metric = metric;
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_report_arguments() {
        let cli = Cli::try_parse_from(["aimtrend", "report", "Voltaic Novice", "--json"]).unwrap();
        let Command::Report(report) = cli.command else {
            panic!("Expected the report command");
        };
        assert_eq!(report.playlist, Some(PathBuf::from("Voltaic Novice")));
        assert!(report.json);

        let cli = Cli::try_parse_from([
            "aimtrend",
            "report",
            "-s",
            "Tile Frenzy",
            "--scenario",
            "Close Long Strafes",
        ])
        .unwrap();
        let Command::Report(report) = cli.command else {
            panic!("Expected the report command");
        };
        assert_eq!(report.scenario, vec!["Tile Frenzy", "Close Long Strafes"]);

        assert!(Cli::try_parse_from(["aimtrend", "report"]).is_err());
        assert!(
            Cli::try_parse_from(["aimtrend", "report", "playlist", "-s", "Tile Frenzy"]).is_err()
        );
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::try_parse_from([
            "aimtrend",
            "report",
            "playlist",
            "--all-days",
            "--group-hours",
            "4",
            "--metric",
            "accuracy",
            "--abort-on-error",
        ])
        .unwrap();

        let mut settings = Settings::default();
        settings.analysis.group_sessions = false;
        cli.apply(&mut settings);

        assert!(!settings.analysis.limit_days);
        assert!(settings.analysis.group_sessions);
        assert_eq!(settings.analysis.group_hours, 4.0);
        assert_eq!(settings.analysis.metric, Metric::Accuracy);
        assert!(settings.abort_on_error);
    }

    #[test]
    fn test_conflicting_overrides() {
        assert!(Cli::try_parse_from(["aimtrend", "scenarios", "--days", "7", "--all-days"]).is_err());
        assert!(
            Cli::try_parse_from(["aimtrend", "scenarios", "--no-grouping", "--group-hours", "2"])
                .is_err()
        );
        assert!(Cli::try_parse_from(["aimtrend", "scenarios", "--metric", "headshots"]).is_err());
    }
}
