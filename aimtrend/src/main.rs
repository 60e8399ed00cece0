use std::fs::File;
use std::io::{BufWriter, Write};
use std::process::ExitCode;

use chrono::{Local, NaiveDateTime};
use clap::Parser;
use ricochet::{ScenarioReport, StatsFolder};

use crate::cli::{Cli, Command, ReportArgs};
use crate::config::Settings;
use crate::error::AppError;
use crate::output::{Bundle, ScenarioEntry};
use crate::playlist::Playlist;

mod cli;
mod config;
mod error;
mod output;
mod playlist;

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("Error: {error}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut settings = Settings::load(cli.config.clone())?;
    cli.apply(&mut settings);

    let mut stdout = std::io::stdout().lock();

    match &cli.command {
        Command::Scenarios => list_scenarios(&settings, &mut stdout),
        Command::Playlists => list_playlists(&settings, &mut stdout),
        Command::Config => {
            write!(stdout, "{}", toml::to_string_pretty(&settings)?)?;
            Ok(())
        }
        Command::Report(args) => {
            let now = Local::now().naive_local();
            match &args.output {
                Some(path) => {
                    let mut writer = BufWriter::new(File::create(path)?);
                    report(&settings, args, now, &mut writer)?;
                    writer.flush()?;
                    Ok(())
                }
                None => report(&settings, args, now, &mut stdout),
            }
        }
    }
}

fn list_scenarios(settings: &Settings, out: &mut impl Write) -> Result<(), AppError> {
    let folder = StatsFolder::new(settings.stats_dir()?)?;
    for name in folder.list_scenarios()? {
        writeln!(out, "{name}")?;
    }
    Ok(())
}

fn list_playlists(settings: &Settings, out: &mut impl Write) -> Result<(), AppError> {
    for path in playlist::list_playlists(&settings.playlists_dir()?)? {
        match Playlist::from_kovaaks_json(&path) {
            Ok(playlist) => writeln!(
                out,
                "{} ({} scenarios)",
                playlist.name,
                playlist.scenarios.len()
            )?,
            Err(error) => log::warn!("Skipping playlist: {error}"),
        }
    }
    Ok(())
}

fn report(
    settings: &Settings,
    args: &ReportArgs,
    now: NaiveDateTime,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let config = settings.analysis.to_configuration()?;

    let (title, scenarios) = match &args.playlist {
        Some(argument) => {
            let playlists_dir = settings.playlists_dir().ok();
            let path = playlist::resolve(argument, playlists_dir.as_deref())
                .ok_or_else(|| AppError::PlaylistNotFound(argument.clone()))?;
            let playlist = Playlist::from_kovaaks_json(&path)?;
            (Some(playlist.name), playlist.scenarios)
        }
        None => (None, args.scenario.clone()),
    };

    let folder = StatsFolder::new(settings.stats_dir()?)?;
    let records = folder.load(settings.on_error())?;

    let entries = scenarios
        .into_iter()
        .map(|name| {
            let report = ScenarioReport::build(&name, &records, &config, now.date()).map_err(
                |error| AppError::Report {
                    scenario: name.clone(),
                    error,
                },
            )?;
            if report.is_none() {
                log::info!("'{name}' was not played in the analyzed period");
            }
            Ok(ScenarioEntry { name, report })
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    if args.json {
        let bundle = Bundle {
            playlist: title.as_deref(),
            generated_at: now,
            metric: config.metric,
            theme: &settings.theme,
            scenarios: &entries,
        };
        output::write_json(&mut *out, &bundle)?;
        writeln!(out)?;
    } else {
        output::write_table(&mut *out, title.as_deref(), config.metric, &entries)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use chrono::NaiveDate;

    use super::*;

    fn write_session(stats: &Path, scenario: &str, stamp: &str, score: u32) {
        let contents = format!(
            "Kill #,Timestamp\n1,00:00:01\n\nWeapon,Shots\nLG,1\n\n\
Score:,{score}\nHit Count:,30\nMiss Count:,10\nScenario:,{scenario}\n"
        );
        std::fs::write(
            stats.join(format!("{scenario} - Challenge - {stamp} Stats.csv")),
            contents,
        )
        .unwrap();
    }

    /// A game folder with two played scenarios and one playlist
    fn game_folder() -> (tempfile::TempDir, Settings) {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            kovaaks_dir: Some(dir.path().to_path_buf()),
            ..Settings::default()
        };

        let stats = settings.stats_dir().unwrap();
        std::fs::create_dir_all(&stats).unwrap();
        write_session(&stats, "Tile Frenzy", "2022.10.19-09.00.00", 600);
        write_session(&stats, "Tile Frenzy", "2022.10.20-09.00.00", 700);
        write_session(&stats, "Close Long Strafes", "2022.10.20-10.00.00", 3000);
        std::fs::write(
            stats.join("Tile Frenzy - Challenge - yesterday Stats.csv"),
            "",
        )
        .unwrap();

        let playlists = settings.playlists_dir().unwrap();
        std::fs::create_dir_all(&playlists).unwrap();
        std::fs::write(
            playlists.join("Warmup.json"),
            r#"{"playlistName": "Warmup", "scenarioList": [
                {"scenario_Name": "Tile Frenzy"},
                {"scenario_Name": "1wall6targets TE"}
            ]}"#,
        )
        .unwrap();

        (dir, settings)
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2022, 10, 21)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn report_args(arguments: &[&str]) -> ReportArgs {
        let cli = Cli::try_parse_from(["aimtrend", "report"].iter().chain(arguments)).unwrap();
        match cli.command {
            Command::Report(args) => args,
            _ => panic!("Expected the report command"),
        }
    }

    #[test]
    fn test_list_scenarios() {
        let (_dir, settings) = game_folder();
        let mut out = Vec::new();

        list_scenarios(&settings, &mut out).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Close Long Strafes\nTile Frenzy\n"
        );
    }

    #[test]
    fn test_list_playlists() {
        let (_dir, settings) = game_folder();
        let mut out = Vec::new();

        list_playlists(&settings, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Warmup (2 scenarios)\n");
    }

    #[test]
    fn test_playlist_report() {
        let (_dir, settings) = game_folder();
        let mut out = Vec::new();

        report(&settings, &report_args(&["Warmup"]), now(), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Warmup (score)");
        assert!(lines[2].starts_with("Tile Frenzy"));
        assert!(lines[2].contains("  650  "));
        assert!(lines[3].starts_with("1wall6targets TE"));
        assert!(lines[3].ends_with("not played"));
    }

    #[test]
    fn test_json_report() {
        let (_dir, settings) = game_folder();
        let mut out = Vec::new();

        report(
            &settings,
            &report_args(&["-s", "Close Long Strafes", "--json"]),
            now(),
            &mut out,
        )
        .unwrap();

        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["playlist"], serde_json::Value::Null);
        assert_eq!(json["generated_at"], "2022-10-21T12:00:00");
        let report = &json["scenarios"][0]["report"];
        assert_eq!(report["sessions"], 1);
        assert_eq!(report["raw_summary"]["max"], 3000);
        assert_eq!(report["curve"]["interpolated"], false);
    }

    #[test]
    fn test_report_errors() {
        let (_dir, settings) = game_folder();

        assert!(matches!(
            report(&settings, &report_args(&["Missing"]), now(), &mut Vec::new()),
            Err(AppError::PlaylistNotFound(_))
        ));

        let strict = Settings {
            abort_on_error: true,
            ..settings.clone()
        };
        assert!(matches!(
            report(&strict, &report_args(&["Warmup"]), now(), &mut Vec::new()),
            Err(AppError::Folder(_))
        ));

        let mut kills = settings;
        kills.analysis.metric = ricochet::Metric::Kills;
        assert!(matches!(
            report(&kills, &report_args(&["Warmup"]), now(), &mut Vec::new()),
            Err(AppError::Report { .. })
        ));
    }
}
