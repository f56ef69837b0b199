mod app;
mod barcode;
mod config;
mod install;
mod storage;
mod store;
mod table;
mod theme;
mod ui;
mod views;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use serde::Serialize;
use std::io;
use std::sync::Mutex;
use std::time::Duration;
use tracing_subscriber::{fmt::writer::BoxMakeWriter, layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use barcode::{LabelRequest, PaperSize};
use config::AppConfig;
use install::{DesktopLauncher, InstallPrompt};
use storage::{LocalStorage, SessionStorage};
use store::{ListQuery, MemoryResource, Record, Resources};
use views::ViewKind;

#[derive(Parser, Debug)]
#[command(name = "backroom")]
#[command(author = "Sean Fournier")]
#[command(version = "0.1.0")]
#[command(about = "A terminal back-office for point-of-sale administration")]
struct Args {
    /// Screen to open on startup
    #[arg(short, long, value_enum, default_value_t = ViewKind::Dashboard)]
    view: ViewKind,

    /// Print barcode labels without the TUI, as SKU:QTY (repeatable)
    #[arg(short, long, value_name = "SKU:QTY")]
    labels: Vec<String>,

    /// Paper size for --labels (A4, A5, Letter, Legal)
    #[arg(short, long)]
    paper: Option<PaperSize>,

    /// Dump the first page of a screen as JSON
    #[arg(short, long, value_enum, value_name = "SCREEN")]
    export: Option<ViewKind>,

    /// Never offer to install the desktop launcher
    #[arg(long)]
    no_install_prompt: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();
    let config = AppConfig::load()?;
    theme::init(theme::Theme::from_config(&config.theme));

    let resources = store::mock::seed(Duration::from_millis(config.mock_latency_ms));

    // Handle CLI-only commands
    if let Some(kind) = args.export {
        return export(kind, &resources, &config).await;
    }

    if !args.labels.is_empty() {
        let paper = args.paper.unwrap_or(config.paper_size);
        return print_labels(&args.labels, paper, &resources, &config).await;
    }

    let install = if config.install_prompt && !args.no_install_prompt {
        install_prompt()
    } else {
        None
    };

    // Run TUI
    run_tui(config, resources, args.view, install).await
}

/// The terminal belongs to the TUI, so logs go to a file in the cache directory
fn init_logging() {
    let Some(dir) = dirs::cache_dir().map(|d| d.join("backroom")) else {
        return;
    };
    if std::fs::create_dir_all(&dir).is_err() {
        return;
    }
    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("backroom.log"))
    {
        Ok(file) => file,
        Err(_) => return,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(BoxMakeWriter::new(Mutex::new(file))),
        )
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}

fn install_prompt() -> Option<InstallPrompt> {
    let launcher = DesktopLauncher::for_current_exe()?;
    let local = match LocalStorage::default_path() {
        Some(path) => LocalStorage::open(path),
        None => LocalStorage::in_memory(),
    };
    Some(InstallPrompt::new(local, SessionStorage::default(), Box::new(launcher)))
}

async fn export_page<T: Record + Serialize>(
    resource: &MemoryResource<T>,
    limit: usize,
) -> Result<serde_json::Value> {
    let page = resource.list(&ListQuery::new(limit)).await?;
    Ok(serde_json::json!({
        "resource": resource.name(),
        "items": page.items,
        "meta": page.meta,
    }))
}

async fn export(kind: ViewKind, resources: &Resources, config: &AppConfig) -> Result<()> {
    let limit = config.page_size;
    let output = match kind {
        ViewKind::Dashboard => serde_json::to_value(views::dashboard::load_summary(resources).await)?,
        ViewKind::Products => export_page(&resources.products, limit).await?,
        ViewKind::Purchases => export_page(&resources.purchases, limit).await?,
        ViewKind::Expenses => export_page(&resources.expenses, limit).await?,
        ViewKind::Reports => export_page(&resources.sales, limit).await?,
        ViewKind::Roles => export_page(&resources.roles, limit).await?,
        ViewKind::Settings => serde_json::to_value(config)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Parse `SKU:QTY`; a bare SKU means one label
fn parse_label_arg(arg: &str) -> Result<(String, u32)> {
    match arg.rsplit_once(':') {
        Some((sku, qty)) => {
            let qty = qty
                .trim()
                .parse()
                .with_context(|| format!("Invalid quantity in '{}'", arg))?;
            Ok((sku.trim().to_string(), qty))
        }
        None => Ok((arg.trim().to_string(), 1)),
    }
}

async fn print_labels(
    args: &[String],
    paper: PaperSize,
    resources: &Resources,
    config: &AppConfig,
) -> Result<()> {
    let products = resources.products.all().await;

    let mut requests = Vec::new();
    for arg in args {
        let (sku, quantity) = parse_label_arg(arg)?;
        let product = products
            .iter()
            .find(|p| p.sku.eq_ignore_ascii_case(&sku))
            .ok_or_else(|| anyhow::anyhow!("No product with SKU '{}'", sku))?;
        requests.push(LabelRequest {
            name: product.name.clone(),
            sku: product.sku.clone(),
            price: product.price,
            quantity,
        });
    }

    let labels = barcode::expand_labels(&requests)?;
    let title = format!("{} labels", config.store_name);
    let html = barcode::print::render_print_document(&labels, paper, &title, &config.currency)?;
    let path = barcode::print::open_print_window(&html)?;

    println!("{} labels on {} written to {}", labels.len(), paper, path.display());
    Ok(())
}

async fn run_tui(
    config: AppConfig,
    resources: Resources,
    start: ViewKind,
    install: Option<InstallPrompt>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config, &resources, start, install);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') if app.can_quit() => return Ok(()),
                        KeyCode::Char('c') if key.modifiers.contains(event::KeyModifiers::CONTROL) => {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                tracing::error!("Key handling failed: {}", e);
                                app.status_message = Some(format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Drain background fetches
        if let Err(e) = app.tick() {
            app.status_message = Some(format!("Error: {}", e));
        }

        // Keep the loop cooperative so spawned fetches make progress
        tokio::task::yield_now().await;
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("accessories-calculator")
        .show()?;
    Ok(())
}
