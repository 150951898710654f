//! Appsight CLI
//!
//! Command-line front end for the app review catalog:
//! - List apps and categories
//! - Inspect an app's reviews and sentiment distribution
//! - Trigger review collection, sentiment analysis and issue previews

use anyhow::Context;
use appsight::{
    AppSummary, CatalogClient, CatalogService, Config, DashboardController, DashboardSnapshot,
    DistributionSource, FilterState, Notice, NoticeKind, Review, SentimentDistribution, Store,
};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "appsight")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Browse app reviews and sentiment from the catalog service")]
#[command(long_about = "Appsight talks to an app review catalog service.\nList apps, read their reviews, and trigger review collection and sentiment analysis.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Catalog service URL (overrides config and APPSIGHT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Config file (default: ~/.config/appsight/config.toml, ./appsight.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List apps in the catalog
    Apps {
        /// Store (google_play, app_store)
        #[arg(short, long)]
        store: Option<Store>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Free-text search
        #[arg(short = 'q', long)]
        search: Option<String>,
    },

    /// List known categories
    Categories,

    /// Show an app's overview and sentiment
    Show {
        /// App identifier
        app_id: String,
        /// Also list the loaded reviews
        #[arg(short, long)]
        reviews: bool,
    },

    /// Collect more reviews for an app
    Collect {
        /// App identifier
        app_id: String,
    },

    /// Run sentiment analysis for an app
    Analyze {
        /// App identifier
        app_id: String,
    },

    /// Preview the issue that would be filed for an app
    SimulateIssue {
        /// App identifier
        app_id: String,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        write_default_config(output.as_deref())?;
        return Ok(ExitCode::SUCCESS);
    }

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = cli.api_url {
        config.service.base_url = url;
    }
    // Held until main returns so the file appender flushes
    let _log_guard = appsight::logging::init(&config.logging)?;

    tracing::debug!(base_url = %config.service.base_url, "Using catalog service");
    let client = CatalogClient::new(config.service.client_config())
        .context("Failed to create HTTP client")?;
    let dashboard = DashboardController::new(Arc::new(client), config.dashboard.clone());
    let format = cli.format;

    match cli.command {
        Commands::Apps {
            store,
            category,
            search,
        } => {
            dashboard
                .replace_filters(FilterState::new(store, category, search))
                .await;
            dashboard.refresh_app_list().await;
            let snapshot = dashboard.snapshot().await;

            match format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&snapshot.apps)?),
                OutputFormat::Table => print_apps(&snapshot.apps),
            }
        }

        Commands::Categories => {
            dashboard.refresh_categories().await;
            let snapshot = dashboard.snapshot().await;

            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&snapshot.categories)?)
                }
                OutputFormat::Table => {
                    if snapshot.categories.is_empty() {
                        println!("No categories available.");
                    }
                    for category in &snapshot.categories {
                        println!("{}", category);
                    }
                }
            }
        }

        Commands::Show { app_id, reviews } => {
            let Some(app) = find_app(&dashboard, &app_id).await else {
                return Ok(ExitCode::FAILURE);
            };
            dashboard.select_app(Some(app)).await;
            render_detail(&dashboard, format, reviews).await?;
        }

        Commands::Collect { app_id } => {
            let Some(app) = find_app(&dashboard, &app_id).await else {
                return Ok(ExitCode::FAILURE);
            };
            dashboard.select_app(Some(app)).await;

            println!("Collecting reviews for {} (this can take a while)...", app_id);
            let outcome = dashboard.collect_data(&app_id).await;
            print_notices(&dashboard.take_notices().await);
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }
            render_detail(&dashboard, format, false).await?;
        }

        Commands::Analyze { app_id } => {
            let Some(app) = find_app(&dashboard, &app_id).await else {
                return Ok(ExitCode::FAILURE);
            };
            dashboard.select_app(Some(app)).await;

            println!("Analyzing sentiment for {}...", app_id);
            let outcome = dashboard.analyze_sentiment(&app_id).await;
            print_notices(&dashboard.take_notices().await);
            if !outcome.is_success() {
                return Ok(ExitCode::FAILURE);
            }
            render_detail(&dashboard, format, false).await?;
        }

        Commands::SimulateIssue { app_id } => {
            let preview = dashboard.simulate_issue(&app_id).await;
            let notices = dashboard.take_notices().await;

            match (preview, format) {
                (Some(preview), OutputFormat::Json) => {
                    println!("{}", serde_json::to_string_pretty(&preview)?)
                }
                (Some(_), OutputFormat::Table) => print_notices(&notices),
                (None, _) => {
                    print_notices(&notices);
                    return Ok(ExitCode::FAILURE);
                }
            }
        }

        Commands::Config { .. } => unreachable!("handled before config load"),
    }

    Ok(ExitCode::SUCCESS)
}

fn write_default_config(output: Option<&Path>) -> anyhow::Result<()> {
    let config = appsight::config::generate_default_config();

    match output {
        Some(path) => {
            // Create parent directory if needed
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &config)?;
            println!("Config written to {:?}", path);
        }
        None => {
            print!("{}", config);
        }
    }

    Ok(())
}

/// Load the app list and look up `app_id`, reporting it if missing
async fn find_app<S: CatalogService + ?Sized>(
    dashboard: &DashboardController<S>,
    app_id: &str,
) -> Option<AppSummary> {
    dashboard.refresh_app_list().await;

    let app = dashboard.snapshot().await.find_app(app_id).cloned();
    if app.is_none() {
        eprintln!("App '{}' not found in the catalog", app_id);
        eprintln!();
        eprintln!("List available apps with:");
        eprintln!("  appsight apps");
    }
    app
}

async fn render_detail<S: CatalogService + ?Sized>(
    dashboard: &DashboardController<S>,
    format: OutputFormat,
    with_reviews: bool,
) -> anyhow::Result<()> {
    let snapshot = dashboard.snapshot().await;
    let distribution = dashboard.sentiment_distribution().await;

    match format {
        OutputFormat::Json => {
            let body = serde_json::json!({
                "app": snapshot.selected_app,
                "phase": snapshot.phase,
                "analysis": snapshot.analysis,
                "distribution": distribution,
                "reviews": snapshot.reviews,
            });
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
        OutputFormat::Table => {
            print_overview(&snapshot);
            println!();
            print_distribution(&snapshot, &distribution);
            if with_reviews {
                println!();
                print_reviews(&snapshot.reviews);
            }
        }
    }

    Ok(())
}

fn print_notices(notices: &[Notice]) {
    for notice in notices {
        match notice.kind {
            NoticeKind::Success => println!("✓ {}", notice.message),
            NoticeKind::Error => eprintln!("✕ {}", notice.message),
        }
    }
}

fn print_apps(apps: &[AppSummary]) {
    if apps.is_empty() {
        println!("No applications found for the current filters.");
        return;
    }

    println!(
        "{:<28} {:<24} {:<12} {:<16} {:>7} {:>9}",
        "ID", "Name", "Store", "Category", "Rating", "Reviews"
    );
    println!("{}", "-".repeat(101));

    for app in apps {
        println!(
            "{:<28} {:<24} {:<12} {:<16} {:>7} {:>9}",
            truncate(&app.app_id, 28),
            truncate(&app.name, 24),
            app.store.label(),
            truncate(&app.category, 16),
            app.rating
                .map(|r| format!("{:.1}", r))
                .unwrap_or_else(|| "N/A".to_string()),
            app.total_reviews
                .map(|n| n.to_string())
                .unwrap_or_else(|| "0".to_string())
        );
    }
}

fn print_overview(snapshot: &DashboardSnapshot) {
    let Some(app) = &snapshot.selected_app else {
        println!("No app selected");
        return;
    };

    println!("{}", app.name);
    println!("{} • {}", app.store.label(), app.category);
    println!();
    println!("  Loaded reviews:  {}", snapshot.reviews.len());
    println!(
        "  Average rating:  {}",
        app.rating
            .map(|r| format!("⭐ {:.1}", r))
            .unwrap_or_else(|| "N/A".to_string())
    );
    println!(
        "  Current version: {}",
        app.current_version.as_deref().unwrap_or("N/A")
    );
    println!(
        "  Last updated:    {}",
        app.last_updated
            .as_deref()
            .map(format_date)
            .unwrap_or_else(|| "N/A".to_string())
    );
}

fn print_distribution(snapshot: &DashboardSnapshot, distribution: &SentimentDistribution) {
    match distribution.source {
        DistributionSource::Server => println!("Sentiment distribution"),
        DistributionSource::Local => {
            if snapshot.reviews.is_empty() {
                println!("No sentiment analysis available.");
                return;
            }
            println!("Sentiment distribution (from loaded reviews)");
        }
    }

    for (label, value) in [
        ("Positive", distribution.positive),
        ("Negative", distribution.negative),
        ("Neutral", distribution.neutral),
    ] {
        println!("  {:<9} {:<25} {}%", label, bar(value), value);
    }

    if let Some(analysis) = &snapshot.analysis {
        println!();
        println!("  Reviews analyzed:   {}", analysis.total_reviews);
        println!(
            "  Average confidence: {:.1}%",
            analysis.avg_sentiment_score * 100.0
        );
        println!("  Last updated:       {}", format_timestamp(&analysis.last_updated));
    }
}

fn print_reviews(reviews: &[Review]) {
    if reviews.is_empty() {
        println!("No reviews available for this app yet.");
        println!();
        println!("Collect some with:");
        println!("  appsight collect <app_id>");
        return;
    }

    println!("Recent reviews ({})", reviews.len());
    println!("{}", "-".repeat(60));

    for review in reviews {
        let stars = "⭐".repeat(review.rating.round().clamp(0.0, 5.0) as usize);
        let sentiment = review
            .sentiment
            .map(|s| match review.sentiment_score {
                Some(score) => format!("{} ({:.0}%)", s, score * 100.0),
                None => s.to_string(),
            })
            .unwrap_or_default();

        println!(
            "{} {} {}",
            review.user_name.as_deref().unwrap_or("Anonymous User"),
            stars,
            sentiment
        );
        println!("  {}", review.content);
        println!(
            "  {}",
            review
                .date
                .as_deref()
                .map(format_date)
                .unwrap_or_else(|| "Date not available".to_string())
        );
        println!();
    }
}

fn bar(percentage: f64) -> String {
    let filled = (percentage.clamp(0.0, 100.0) / 4.0).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(25 - filled))
}

fn format_date(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn format_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let cut: String = s.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
