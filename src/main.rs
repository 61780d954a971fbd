use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::mpsc;

use radar::app::{App, AppEvent};
use radar::config::Config;
use radar::feed::{build_client, SourceRegistry};
use radar::page::fetch_page;
use radar::theme::ThemeVariant;
use radar::ui;

/// Default config path (~/.config/radar/config.toml)
fn default_config_path() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("radar")
        .join("config.toml"))
}

#[derive(Parser, Debug)]
#[command(
    name = "radar",
    version,
    about = "Terminal news radar: latest items from a fixed set of RSS sources"
)]
struct Args {
    /// Config file (default: ~/.config/radar/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Fetch once, print the page as plain text and exit
    #[arg(long, conflicts_with = "json")]
    print: bool,

    /// Fetch once, print the page as JSON and exit
    #[arg(long)]
    json: bool,

    /// Only select this source (repeatable)
    #[arg(long = "source", value_name = "LABEL")]
    sources: Vec<String>,

    /// Items shown per source
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

/// Resolve `--source` labels to registry indices, in registry order.
fn resolve_sources(registry: &SourceRegistry, labels: &[String]) -> Result<Vec<usize>> {
    let mut indices = Vec::with_capacity(labels.len());
    for label in labels {
        match registry.position(label) {
            Some(i) => indices.push(i),
            None => {
                let known: Vec<&str> = registry.iter().map(|s| s.label.as_str()).collect();
                anyhow::bail!(
                    "Unknown source '{}'. Known sources: {}",
                    label,
                    known.join(", ")
                );
            }
        }
    }
    indices.sort_unstable();
    indices.dedup();
    Ok(indices)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with --print/--json output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_path = match args.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let registry = config.registry();
    if registry.is_empty() {
        anyhow::bail!("No valid sources configured in {}", config_path.display());
    }

    let mut settings = config.fetch_settings();
    match args.limit {
        Some(0) => tracing::warn!("--limit must be positive, ignoring"),
        Some(limit) => settings.limit = limit,
        None => {}
    }

    let client =
        build_client(config.request_timeout()).context("Failed to create HTTP client")?;

    let selection = if args.sources.is_empty() {
        None
    } else {
        Some(resolve_sources(&registry, &args.sources)?)
    };

    if args.print || args.json {
        let selected: Vec<_> = match &selection {
            Some(indices) => indices
                .iter()
                .filter_map(|&i| registry.get(i).cloned())
                .collect(),
            None => registry.as_slice().to_vec(),
        };

        let page = fetch_page(&client, &selected, &settings).await;
        let output = if args.json {
            ui::plain::render_json(&page).context("Failed to serialize page")?
        } else {
            ui::plain::render_text(&page)
        };

        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", output.trim_end()).context("Failed to write output")?;
        return Ok(());
    }

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
        ThemeVariant::Dark
    });

    let mut app = App::new(&registry, settings, client, theme);
    if let Some(indices) = &selection {
        app.select_only(indices);
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    Ok(())
}
