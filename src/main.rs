use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use greeks_scout::config::Settings;
use greeks_scout::{
    FinnhubClient, OptionChainSource, RunContext, StubSource, SymbolReport, logging, process_all,
    target_expiration,
};
use std::sync::Arc;
use tracing::info;

async fn run_batch<S>(source: Arc<S>, settings: &Settings) -> Result<Vec<SymbolReport>>
where
    S: OptionChainSource + Send + Sync + 'static,
{
    let today = Utc::now().date_naive();
    let ctx = RunContext {
        today,
        weights: settings.weights,
    };

    println!("{} Target expiration: {}", "ℹ".blue(), target_expiration(today));
    println!("{} Max concurrent requests: {}", "ℹ".blue(), settings.max_concurrent);
    println!();

    let start_time = std::time::Instant::now();
    let reports = process_all(source, settings.tickers.clone(), ctx, settings.max_concurrent).await;
    let elapsed = start_time.elapsed();

    info!(
        symbols = reports.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "batch finished"
    );
    println!("{} Time taken: {:.2}s", "⏱".yellow(), elapsed.as_secs_f64());
    println!();

    Ok(reports)
}

fn display_summary(reports: &[SymbolReport]) {
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Best Option per Ticker".cyan().bold());
    println!("{}", "=".repeat(60).blue());

    for report in reports {
        match (&report.best, &report.error) {
            (Some(_), _) => println!(
                "  {} {} → {}",
                "✓".green(),
                report.symbol.yellow(),
                report.status_label()
            ),
            (None, Some(error)) => println!(
                "  {} {} → {}",
                "✗".red(),
                report.symbol.yellow(),
                error.chars().take(80).collect::<String>()
            ),
            (None, None) => println!(
                "  {} {} → {} ({} contracts parsed)",
                "-".dimmed(),
                report.symbol.yellow(),
                report.status_label(),
                report.contracts_count
            ),
        }
    }

    let found = reports.iter().filter(|r| r.best.is_some()).count();
    let failed = reports.iter().filter(|r| r.error.is_some()).count();
    println!();
    println!("{} With best option: {}", "✓".green(), found);
    println!("{} Failed: {}", "✗".red(), failed);
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    println!("{}", "=".repeat(60).blue());
    println!("{}", "Greeks Scout".green().bold());
    println!("{}", "=".repeat(60).blue());
    println!();

    let settings = Settings::from_env();

    if settings.tickers.is_empty() {
        println!("{} No tickers configured (set GREEKS_TICKERS)", "⚠".yellow());
        return Ok(());
    }

    let reports = match &settings.api_key {
        Some(key) => {
            println!("{} Finnhub key loaded ({} chars)", "✓".green(), key.len());
            run_batch(Arc::new(FinnhubClient::new(key.clone())?), &settings).await?
        }
        None => {
            println!("{} FINNHUB_API_KEY not set, using stub source (no option scores will appear)", "⚠".yellow());
            run_batch(Arc::new(StubSource), &settings).await?
        }
    };

    display_summary(&reports);

    std::fs::write(&settings.output_path, serde_json::to_string_pretty(&reports)?)?;
    println!();
    println!("{} Saved {} reports to {}", "✓".green(), reports.len(), settings.output_path);

    println!();
    println!("{}", "=".repeat(60).blue());
    println!("{}", "Done!".green().bold());
    println!("{}", "=".repeat(60).blue());

    Ok(())
}
