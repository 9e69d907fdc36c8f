use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::sync::Arc;

use rs_inbox_viewer::api::InboxApi;
use rs_inbox_viewer::api::http::HttpInboxApi;
use rs_inbox_viewer::config::{BASE_URL_ENV, Config, load_config};
use rs_inbox_viewer::controller::{DetailFetcher, InboxController};
use rs_inbox_viewer::domain::email::EmailId;
use rs_inbox_viewer::domain::query::{FilterKeyword, Limit, Status};
use rs_inbox_viewer::format::{
    EMPTY_LIST_MESSAGE, count_label, extract_address, format_display_date, sender_name,
};
use rs_inbox_viewer::terminal::run_tui;

#[derive(Parser)]
#[command(name = "rs_inbox_viewer")]
#[command(about = "Browse an HTTP email listing service (TUI + CLI)", long_about = None)]
struct Cli {
    /// Listing service origin, e.g. http://127.0.0.1:8000
    #[arg(long, global = true)]
    base_url: Option<String>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Interactive inbox
    Tui {
        #[arg(long)]
        filter: Option<FilterKeyword>,
        #[arg(long)]
        limit: Option<Limit>,
    },

    /// Print one listing and exit
    List {
        /// ALL or a category code known to the server
        #[arg(long)]
        filter: Option<FilterKeyword>,

        /// One of 10, 50, 100, 200
        #[arg(long)]
        limit: Option<Limit>,

        /// Only mail since this day (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        #[arg(long)]
        json: bool,
    },

    /// Print a single email
    Show {
        id: String,

        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let mut cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    cfg.apply_overrides(std::env::var(BASE_URL_ENV).ok(), cli.base_url);
    let api = connect(&cfg)?;

    match cli.cmd {
        Command::Tui { filter, limit } => {
            let filter = filter.map_or_else(|| cfg.filter(), Ok)?;
            let limit = limit.map_or_else(|| cfg.limit(), Ok)?;
            run_tui(api, filter, limit)
        }

        Command::List {
            filter,
            limit,
            since,
            json,
        } => {
            let filter = filter.map_or_else(|| cfg.filter(), Ok)?;
            let limit = limit.map_or_else(|| cfg.limit(), Ok)?;
            print_listing(api, filter, limit, since, json)
        }

        Command::Show { id, json } => print_detail(api, EmailId::new(id), json),
    }
}

fn connect(cfg: &Config) -> Result<Arc<dyn InboxApi>> {
    let api = HttpInboxApi::new(&cfg.base_url, cfg.timeout())
        .map_err(|e| anyhow!("base_url {:?}: {e}", cfg.base_url))?;
    log::info!("Using listing service at {}", api.base_url());
    Ok(Arc::new(api))
}

fn print_listing(
    api: Arc<dyn InboxApi>,
    filter: FilterKeyword,
    limit: Limit,
    since: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let mut inbox = InboxController::with_defaults(api, filter, limit);
    match since {
        Some(_) => inbox.set_since(since),
        None => inbox.initialize(),
    };
    inbox.wait();

    let st = inbox.state();
    if st.status == Status::Error {
        return Err(anyhow!(
            "{}",
            st.error_message.as_deref().unwrap_or("request failed")
        ));
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&st.results)?);
        return Ok(());
    }

    println!("{}", count_label(st.results.len()));
    if st.results.is_empty() {
        println!("{EMPTY_LIST_MESSAGE}");
        return Ok(());
    }
    for e in &st.results {
        let id = e.email_id.as_ref().map(EmailId::as_str).unwrap_or("-");
        let mark = if e.urgent { "!" } else { " " };
        let sku = e.sku.as_deref().map(|s| format!("  [{s}]")).unwrap_or_default();
        println!(
            "{mark} {id:>6}  {:<32}  {:<24}  {}{sku}",
            format_display_date(&e.date),
            sender_name(&e.from),
            e.subject,
        );
    }
    Ok(())
}

fn print_detail(api: Arc<dyn InboxApi>, id: EmailId, json: bool) -> Result<()> {
    let mut fetcher = DetailFetcher::new(api);
    if fetcher.select(Some(id)).is_none() {
        return Err(anyhow!("email id must not be empty"));
    }
    fetcher.wait();

    let st = fetcher.state();
    let Some(e) = &st.detail else {
        return Err(anyhow!(
            "{}",
            st.error_message.as_deref().unwrap_or("request failed")
        ));
    };

    if json {
        println!("{}", serde_json::to_string_pretty(e)?);
        return Ok(());
    }

    println!("{}", e.subject);
    println!("From: {} <{}>", sender_name(&e.from), extract_address(&e.from));
    println!("To:   {}", e.to);
    println!("Date: {}", format_display_date(&e.date));
    println!();
    println!("{}", e.body);
    Ok(())
}
