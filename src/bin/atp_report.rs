use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Serialize;

use atp_terminal::analysis_export::export_analysis;
use atp_terminal::config::AppConfig;
use atp_terminal::dataset;
use atp_terminal::match_record::YearRange;
use atp_terminal::report::{
    CareerReport, HeadToHeadReport, career_lines, career_report, head_to_head_lines,
    head_to_head_report, matrix_lines, trend_lines,
};

#[derive(Serialize)]
struct JsonOutput<'a> {
    career: Option<&'a CareerReport>,
    head_to_head: Option<&'a HeadToHeadReport>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let mut cfg = AppConfig::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cfg.log_filter)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    if let Some(path) = arg_value(&args, "data") {
        cfg.data_path = PathBuf::from(path);
    }
    let player = arg_value(&args, "player").unwrap_or_else(|| cfg.default_player.clone());
    let opponent = arg_value(&args, "vs");
    let from = parse_year_arg(&args, "from")?;
    let to = parse_year_arg(&args, "to")?;
    let as_json = args.iter().any(|a| a == "--json");
    let xlsx = arg_value(&args, "xlsx").map(PathBuf::from);

    let loaded = dataset::load_or_mock(&cfg).context("load match data")?;
    let store = loaded.store;
    let Some(bounds) = store.year_bounds() else {
        return Err(anyhow!("dataset has no matches"));
    };
    let era = YearRange::new(from.unwrap_or(bounds.start), to.unwrap_or(bounds.end));
    let window = store.filter_years(era);

    let career = career_report(&window, Some(era), &player);
    let h2h = match opponent.as_deref() {
        Some(other) if other == player => {
            return Err(anyhow!("select two different players for head-to-head"));
        }
        Some(other) => Some(head_to_head_report(&window, Some(era), &player, other)),
        None => None,
    };

    if as_json {
        let out = JsonOutput {
            career: Some(&career),
            head_to_head: h2h.as_ref(),
        };
        let json = serde_json::to_string_pretty(&out).context("serialize report")?;
        println!("{json}");
    } else {
        for line in career_lines(&career) {
            println!("{line}");
        }
        if let Some(report) = h2h.as_ref() {
            println!();
            for line in head_to_head_lines(report)
                .into_iter()
                .chain(std::iter::once(String::new()))
                .chain(trend_lines(&report.trend))
                .chain(std::iter::once(String::new()))
                .chain(matrix_lines(report))
            {
                println!("{line}");
            }
        }
    }

    if let Some(path) = xlsx {
        let done = export_analysis(&path, Some(&career), h2h.as_ref())?;
        eprintln!("Exported {} sheets to {}", done.sheets, done.path.display());
    }

    Ok(())
}

/// Value for `--name=value` or `--name value`.
fn arg_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

fn parse_year_arg(args: &[String], name: &str) -> Result<Option<i32>> {
    arg_value(args, name)
        .map(|v| {
            v.parse::<i32>()
                .with_context(|| format!("--{name} expects a year, got {v}"))
        })
        .transpose()
}
