//! Labloan CLI
//!
//! Thin command-line front end over the client library, mirroring the
//! mobile app's flows: browse the catalog, book a pickup, watch a
//! transaction's status, and submit returns.

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use labloan_client::{
    config::AppConfig,
    services::{bookings, catalog, returns},
    session::Session,
    AppState,
};

#[derive(Parser)]
#[command(name = "labloan", version, about = "Laboratory equipment borrowing client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Store an auth token for subsequent requests
    Login {
        #[arg(long)]
        token: String,
        #[arg(long)]
        user_id: Option<i64>,
    },
    /// Clear the stored session
    Logout,
    /// List equipment, optionally filtered
    Equipment {
        #[arg(long)]
        category: Option<i64>,
        #[arg(long, default_value = "")]
        search: String,
    },
    /// List equipment categories
    Categories,
    /// Book a pickup for one or more equipment items
    Book {
        /// Student id the booking is made for
        #[arg(long)]
        user: i64,
        /// Items as EQUIPMENT_ID or EQUIPMENT_ID=QUANTITY, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<String>,
        /// Pickup time slot, e.g. "10:00"
        #[arg(long)]
        pickup_time: String,
        /// Booking date (RFC 3339); defaults to now
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Watch a transaction's status until it settles (Ctrl-C to stop)
    Watch { borrowing_id: i64 },
    /// Return borrowed units of a transaction
    Return {
        borrowing_id: i64,
        /// Override the returned quantity per group as NAME=QUANTITY;
        /// groups not named are returned in full
        #[arg(long = "qty")]
        quantities: Vec<String>,
    },
    /// Show a user's transaction history
    History {
        user_id: i64,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("labloan_client={}", config.logging.level).into());

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let state = AppState::new(config)?;

    match cli.command {
        Command::Login { token, user_id } => {
            state.sessions.save(&Session {
                token,
                permissions: Vec::new(),
                user_id,
            })?;
            println!("Session stored.");
        }
        Command::Logout => {
            state.sessions.clear()?;
            println!("Session cleared.");
        }
        Command::Equipment { category, search } => {
            let list = state.services.catalog.list_equipment().await?;
            for eq in catalog::filter_equipment(&list, category, &search) {
                println!("{:>6}  {}  (stock: {})", eq.id, eq.name, eq.stock);
            }
        }
        Command::Categories => {
            for cat in state.services.catalog.list_categories().await? {
                println!("{:>6}  {}", cat.id, cat.name);
            }
        }
        Command::Book {
            user,
            items,
            pickup_time,
            date,
        } => {
            let catalog_list = state.services.catalog.list_equipment().await?;
            let mut cart = labloan_client::services::cart::CartStore::new();

            for spec in &items {
                let (id, qty) = parse_item_spec(spec)?;
                let equipment = catalog_list
                    .iter()
                    .find(|eq| eq.id == id)
                    .with_context(|| format!("Equipment {} not found in catalog", id))?;
                cart.add(equipment);
                for _ in 1..qty {
                    cart.increase(id);
                }
            }

            let booking_date = date.unwrap_or_else(Utc::now);
            let id = state
                .services
                .bookings
                .checkout(&mut cart, user, &pickup_time, booking_date)
                .await?;
            let detail = state.services.bookings.fetch_detail(id).await?;
            println!("Booking {} created, status: {}", id, detail.status);
            if let Some(qr) = detail.qr_code {
                println!("QR ticket token: {}", qr);
            }
        }
        Command::Watch { borrowing_id } => {
            let session = state.services.poller.start(borrowing_id).await?;
            println!("Status: {}", session.latest().detail.status);

            let mut rx = session.subscribe();
            while !update_is_settled(&rx) {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {
                        println!("Stopped watching.");
                        break;
                    }
                    changed = rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let update = rx.borrow().clone();
                        println!("Status: {}", update.detail.status);
                    }
                }
            }
        }
        Command::Return {
            borrowing_id,
            quantities,
        } => {
            let mut groups = state.services.returns.fetch_groups(borrowing_id).await?;
            if groups.is_empty() {
                bail!("No returnable units on transaction {}", borrowing_id);
            }

            for spec in &quantities {
                apply_quantity_spec(&mut groups, spec)?;
            }
            for group in &groups {
                println!(
                    "{}: returning {} of {}",
                    group.name(),
                    group.return_qty(),
                    group.total_qty()
                );
            }

            state
                .services
                .returns
                .submit(borrowing_id, &groups)
                .await?;
            println!("Return submitted.");
        }
        Command::History {
            user_id,
            status,
            search,
        } => {
            let list = state.services.bookings.history(user_id).await?;
            let status = status
                .as_deref()
                .map(labloan_client::models::BorrowingStatus::parse);
            for summary in bookings::filter_history(&list, status.as_ref(), &search) {
                let names: Vec<&str> = summary
                    .items
                    .iter()
                    .map(|i| i.equipment_name.as_str())
                    .collect();
                println!("{:>6}  {:<10}  {}", summary.id, summary.status.to_string(), names.join(", "));
            }
        }
    }

    Ok(())
}

/// Parse "ID" or "ID=QTY"
fn parse_item_spec(spec: &str) -> anyhow::Result<(i64, u32)> {
    match spec.split_once('=') {
        Some((id, qty)) => Ok((
            id.trim().parse().context("Invalid equipment id")?,
            qty.trim().parse().context("Invalid quantity")?,
        )),
        None => Ok((spec.trim().parse().context("Invalid equipment id")?, 1)),
    }
}

/// Apply a "NAME=QUANTITY" override to the matching return group
fn apply_quantity_spec(groups: &mut [returns::ReturnGroup], spec: &str) -> anyhow::Result<()> {
    let Some((name, qty)) = spec.split_once('=') else {
        bail!("Expected NAME=QUANTITY, got '{}'", spec);
    };
    let target: usize = qty.trim().parse().context("Invalid quantity")?;
    let group = groups
        .iter_mut()
        .find(|g| g.name().eq_ignore_ascii_case(name.trim()))
        .with_context(|| format!("No returnable group named '{}'", name.trim()))?;

    // Walk to the target through the bounded adjusters.
    while group.return_qty() > target {
        group.decrement();
    }
    while group.return_qty() < target.min(group.total_qty()) {
        group.increment();
    }
    Ok(())
}

fn update_is_settled(rx: &tokio::sync::watch::Receiver<labloan_client::services::poller::StatusUpdate>) -> bool {
    rx.borrow().detail.status.is_terminal()
}
