use anyhow::Context;
use colored::Colorize;
use feedsync_sheet::JsonFileSheet;
use feedsync_source::provider_for;
use feedsync_sync::{run_sync, SyncOutcome, SyncReport};

use crate::cli::*;
use crate::config::AppConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(&cli.config)?;
    let sync_type = cli.command.sync_type();
    let ctx = config.context(sync_type, cli.dry_run)?;

    let location = config
        .sources
        .location(sync_type)
        .with_context(|| format!("no [sources] entry for {sync_type} sync"))?;
    let provider = provider_for(location);
    let sheet = JsonFileSheet::open(&config.general.sheet)
        .with_context(|| format!("opening sheet {}", config.general.sheet.display()))?;

    let report = run_sync(&ctx, &sheet, provider.as_ref())?;
    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print_report(&report),
    }
    Ok(())
}

fn print_report(report: &SyncReport) {
    println!(
        "{} sync: {} sheet rows, {} export rows",
        report.sync_type.to_string().bold(),
        report.destination_rows,
        report.source_rows
    );
    if report.new_items > 0 || report.removed_items > 0 {
        println!(
            "  {} new in export, {} missing from export",
            report.new_items.to_string().cyan(),
            report.removed_items.to_string().cyan()
        );
    }
    for skipped in &report.skipped {
        println!(
            "  {} {}.{}: {}",
            "skipped".yellow(),
            skipped.sku,
            skipped.field,
            skipped.reason
        );
    }

    match &report.outcome {
        SyncOutcome::NoChanges => println!("{} Sheet is up to date.", "✓".green().bold()),
        SyncOutcome::Planned => {
            for write in report.plan.writes() {
                println!(
                    "  {} {} {} -> {}",
                    write.cell.to_string().yellow(),
                    write.sku,
                    write.previous.dimmed(),
                    write.value
                );
            }
            println!("{} writes planned (dry run).", report.plan.len().to_string().bold());
        }
        SyncOutcome::Written => println!(
            "{} Updated {} cells in {} rows.",
            "✓".green().bold(),
            report.updated_cells,
            report.differences
        ),
        SyncOutcome::Aborted { reason } => println!("{} Aborted: {}", "✗".red().bold(), reason),
    }
}
