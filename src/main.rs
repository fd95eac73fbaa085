// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (to stderr, so JSON on stdout stays clean)
// 3. Run the crawl, cancelling it on Ctrl-C
// 4. Print the records and exit with a proper code
//    (0 = every URL worked, 1 = some URLs failed, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use sitemap_seo::{CrawlReport, Outcome, PageRecord, SitemapScraper};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// RUST_LOG wins if set, otherwise --verbose picks debug over info
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("sitemap_seo={default_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<i32> {
    let scraper = SitemapScraper::new(cli.crawl_config()).context("invalid crawl settings")?;

    // Ctrl-C stops new fetches; whatever finished is still printed
    let cancel = scraper.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, finishing in-flight requests");
            cancel.cancel();
        }
    });

    info!(url = %cli.sitemap_url, "starting crawl");
    let report = scraper.run(&cli.sitemap_url).await?;

    print_results(&report, cli.json)?;

    if report.has_failures() {
        Ok(1)
    } else {
        Ok(0)
    }
}

fn print_results(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(&report.records);
        print_summary(report);
    }
    Ok(())
}

fn print_table(records: &[PageRecord]) {
    println!(
        "{:<50} {:<6} {:<30} {:<30}",
        "URL", "STATUS", "TITLE", "META DESCRIPTION"
    );
    println!("{}", "=".repeat(119));

    for record in records {
        println!(
            "{:<50} {:<6} {:<30} {:<30}",
            truncate(&record.url, 50),
            record.status_code,
            truncate(&record.title, 30),
            truncate(&record.meta_description, 30)
        );
    }
    println!();
}

fn print_summary(report: &CrawlReport) {
    let cancelled = report
        .sitemap_reports
        .iter()
        .chain(report.page_reports.iter())
        .filter(|r| r.outcome == Outcome::Cancelled)
        .count();

    println!("📊 Summary:");
    println!("   🗺️  Sitemaps: {}", report.sitemap_reports.len());
    println!("   📄 Pages found: {}", report.pages_discovered);
    println!("   ✅ Scraped: {}", report.records.len());
    println!("   ❌ Failed: {}", report.failures().count());
    if cancelled > 0 {
        println!("   ⏹️  Cancelled: {}", cancelled);
    }

    for failure in report.failures() {
        if let Outcome::Failed { reason } = &failure.outcome {
            println!("      {} ({})", failure.url, reason);
        }
    }
}

// Cuts `text` to `width` characters, marking the cut with "..."
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let kept: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", kept)
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("Home", 10), "Home");
    }

    #[test]
    fn test_truncate_long_text() {
        assert_eq!(truncate("abcdefghij", 8), "abcde...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        // Slicing bytes here would panic in the middle of 'é'
        assert_eq!(truncate("ééééé", 4), "é...");
    }
}
