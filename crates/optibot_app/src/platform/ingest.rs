use chrono::{SecondsFormat, Utc};
use optibot_engine::{run_ingest, IngestReport, IngestSettings};

use super::cli::IngestArgs;

pub fn run(settings: IngestSettings, args: &IngestArgs) -> anyhow::Result<()> {
    let settings = apply_args(settings, args);
    let scraped_utc = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    let report = run_ingest(&settings, &scraped_utc)?;
    println!("{}", summary(&report, &settings));

    if let Some(err) = report.listing_error {
        anyhow::bail!("article listing stopped early: {err}");
    }
    Ok(())
}

fn apply_args(mut settings: IngestSettings, args: &IngestArgs) -> IngestSettings {
    if let Some(out) = &args.out {
        settings.output_dir = out.clone();
    }
    if let Some(max_articles) = args.max_articles {
        settings.max_articles = max_articles;
    }
    if let Some(max_pages) = args.max_pages {
        settings.max_pages = max_pages;
    }
    settings
}

fn summary(report: &IngestReport, settings: &IngestSettings) -> String {
    format!(
        "{} articles in {} ({} added, {} updated, {} unchanged, {} skipped, {} pages)",
        report.processed(),
        settings.output_dir.display(),
        report.added.len(),
        report.updated.len(),
        report.unchanged.len(),
        report.skipped,
        report.pages
    )
}
