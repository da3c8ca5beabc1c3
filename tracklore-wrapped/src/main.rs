//! tracklore-wrapped - Streaming History Year in Review CLI
//!
//! Import a streaming-history export and generate wrapped-style summaries or
//! any report from the catalogue.

use anyhow::{Context, Result};
use clap::Parser;
use tracklore_core::analytics::{
    list_reports, listening_summary, run_all, run_report, ListeningSummary, Report, SummaryConfig,
    SummaryPeriod, TrendComparison,
};
use tracklore_core::format::{format_plays, hour_display};
use tracklore_core::{Config, ImportResult, Importer};

#[derive(Parser, Debug)]
#[command(name = "tracklore-wrapped")]
#[command(about = "Streaming History Wrapped - Your Year in Review")]
#[command(version)]
struct Args {
    /// Path to the streaming-history export file
    export_file: Option<std::path::PathBuf>,

    /// Year to generate wrapped for (default: latest year in the data)
    #[arg(long)]
    year: Option<i32>,

    /// Month to generate wrapped for (format: YYYY-MM)
    #[arg(long)]
    month: Option<String>,

    /// Run a single catalogue report by name instead of the summary
    #[arg(long)]
    report: Option<String>,

    /// Run every catalogue report
    #[arg(long)]
    all: bool,

    /// List available reports and exit
    #[arg(long)]
    list: bool,

    /// Cell delimiter of the export file (default: tab)
    #[arg(long)]
    delimiter: Option<char>,

    /// Output format (json = JSON; default is terminal text)
    #[arg(long)]
    export: Option<String>,

    /// Disable trend comparison with previous period
    #[arg(long)]
    no_trends: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.list {
        print_report_list();
        return Ok(());
    }

    // Load configuration and logging
    let config = Config::load().context("failed to load configuration")?;
    let _log_guard = tracklore_core::logging::init(&config.logging).ok();

    let export_file = args
        .export_file
        .as_deref()
        .context("an export file is required (see --help)")?;

    let importer = match args.delimiter {
        Some(d) => Importer::with_delimiter(d),
        None => Importer::new(),
    };
    let imported = importer
        .import_file(export_file)
        .context("failed to import export file")?;

    if !imported.rejected.is_empty() {
        eprintln!(
            "warning: {} of {} rows rejected (see log for details)",
            imported.rows_rejected(),
            imported.rows_read
        );
    }

    let json_output = match args.export.as_deref() {
        Some("json") => true,
        Some(other) => anyhow::bail!("Unknown export format: {}. Use 'json'", other),
        None => false,
    };

    if let Some(name) = &args.report {
        let report = run_report(name, &imported.events, &config.reports)?;
        if json_output {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }
        return Ok(());
    }

    if args.all {
        let reports = run_all(&imported.events, &config.reports);
        if json_output {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        } else {
            for report in &reports {
                print_report(report);
                println!();
            }
        }
        return Ok(());
    }

    // Default mode: wrapped summary for a period
    let period = resolve_period(&args, &imported)?;
    let summary_config = SummaryConfig {
        include_trends: !args.no_trends,
        ..Default::default()
    };
    let summary = listening_summary(&imported.events, period, &summary_config, &config.reports);

    if json_output {
        print_summary_json(&summary)?;
    } else {
        print_summary(&summary);
    }

    Ok(())
}

/// Pick the summary period: explicit flags win, otherwise the latest year
/// present in the data.
fn resolve_period(args: &Args, imported: &ImportResult) -> Result<SummaryPeriod> {
    if let Some(month_str) = &args.month {
        let parts: Vec<&str> = month_str.split('-').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid month format. Use YYYY-MM (e.g., 2025-05)");
        }
        let year: i32 = parts[0].parse().context("Invalid year")?;
        let month: u32 = parts[1].parse().context("Invalid month")?;
        if !(1..=12).contains(&month) {
            anyhow::bail!("Month must be between 1 and 12");
        }
        return Ok(SummaryPeriod::Month(year, month));
    }

    if let Some(year) = args.year {
        return Ok(SummaryPeriod::Year(year));
    }

    use chrono::Datelike;
    let latest_year = imported
        .events
        .iter()
        .filter_map(|e| e.played_at.valid())
        .map(|at| at.year())
        .max()
        .context("no valid timestamps in the export; pass --year explicitly")?;
    Ok(SummaryPeriod::Year(latest_year))
}

fn print_report_list() {
    println!("Available reports:");
    for descriptor in list_reports() {
        println!(
            "  {:<26} [{}] {}",
            descriptor.name,
            descriptor.kind.as_str(),
            descriptor.summary
        );
    }
}

fn print_report(report: &Report) {
    println!("{}", report.title);
    println!("{}", "─".repeat(report.title.len().max(24)));
    println!("  {}", report.columns.join(" | "));
    for row in &report.rows {
        let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        println!("  {}", cells.join(" | "));
    }
    if report.rows.is_empty() {
        println!("  (no rows)");
    }
    if let Some(excluded) = report.excluded_invalid_timestamps {
        if excluded > 0 {
            println!("  ({} events excluded: invalid timestamp)", excluded);
        }
    }
}

fn print_summary(summary: &ListeningSummary) {
    let title = format!("YOUR {} WRAPPED", summary.period.display_name());

    println!();
    println!("╭{}╮", "─".repeat(60));
    println!("│{:^60}│", title);
    println!("╰{}╯", "─".repeat(60));
    println!();

    if summary.totals.plays == 0 {
        println!("  No plays found for this period.");
        println!();
        return;
    }

    println!("THE NUMBERS");
    println!(
        "   Plays:    {:<12} Listening time: {}",
        format_plays(summary.totals.plays),
        summary.totals.duration_display()
    );
    println!(
        "   Tracks:   {:<12} Artists: {}",
        summary.totals.unique_tracks, summary.totals.unique_artists
    );
    println!("   Skip rate: {}%", summary.skip_rate);
    println!();

    if !summary.top_tracks.is_empty() {
        println!("TOP TRACKS");
        for (i, (track, artist, plays)) in summary.top_tracks.iter().enumerate() {
            println!("   {}. {} — {} ({} plays)", i + 1, track, artist, plays);
        }
        println!();
    }

    if !summary.top_artists.is_empty() {
        println!("TOP ARTISTS");
        for (i, (artist, plays)) in summary.top_artists.iter().enumerate() {
            println!("   {}. {} ({} plays)", i + 1, artist, plays);
        }
        println!();
    }

    println!("TIME PATTERNS");
    println!("   Peak hour: {}", hour_display(summary.peak_hour));
    println!();

    if let Some(trends) = &summary.trends {
        println!("VS PREVIOUS PERIOD");
        println!(
            "   Plays: {}  │  Minutes: {}  │  Tracks: {}",
            TrendComparison::format_delta(trends.plays_delta_pct),
            TrendComparison::format_delta(trends.minutes_delta_pct),
            TrendComparison::format_delta(trends.unique_tracks_delta_pct),
        );
        println!();
    }

    if summary.invalid_timestamps > 0 {
        println!(
            "   ({} events had invalid timestamps and were excluded)",
            summary.invalid_timestamps
        );
        println!();
    }
}

fn print_summary_json(summary: &ListeningSummary) -> Result<()> {
    let json = serde_json::json!({
        "period": summary.period.display_name(),
        "totals": {
            "plays": summary.totals.plays,
            "ms_played": summary.totals.ms_played,
            "minutes_played": summary.totals.minutes_played(),
            "unique_tracks": summary.totals.unique_tracks,
            "unique_artists": summary.totals.unique_artists,
        },
        "skip_rate": summary.skip_rate.value(),
        "top_tracks": summary.top_tracks.iter().map(|(track, artist, plays)| {
            serde_json::json!({"track": track, "artist": artist, "plays": plays})
        }).collect::<Vec<_>>(),
        "top_artists": summary.top_artists.iter().map(|(artist, plays)| {
            serde_json::json!({"artist": artist, "plays": plays})
        }).collect::<Vec<_>>(),
        "time_patterns": {
            "peak_hour": summary.peak_hour,
            "hourly_distribution": summary.hourly_distribution,
        },
        "trends": summary.trends.as_ref().map(|t| serde_json::json!({
            "plays_delta_pct": t.plays_delta_pct,
            "minutes_delta_pct": t.minutes_delta_pct,
            "unique_tracks_delta_pct": t.unique_tracks_delta_pct,
        })),
        "invalid_timestamps": summary.invalid_timestamps,
    });

    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
