use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttravels_app::controllers::{
    AdminPanelController, AssistantController, BookingManagementController, DashboardController,
    EditTripController, FlightSearchController, UserManagementController,
};
use ttravels_app::{AppContext, TerminalUi};
use ttravels_core::airports::{self, Direction};
use ttravels_core::dashboard::DashboardTab;
use ttravels_core::flights::{SortKey, TripType};
use ttravels_core::api::AdminCollection;
use ttravels_render::flights as flight_view;
use ttravels_store::{ApiClient, AppConfig, FileStore};

#[derive(Parser)]
#[command(name = "ttravels", about = "TTravels booking client")]
struct Cli {
    /// Directory holding default.toml and optional overrides.
    #[arg(long, default_value = "config", global = true)]
    config: PathBuf,
    /// Answer yes to every confirmation.
    #[arg(long, short = 'y', global = true)]
    yes: bool,
    /// Print rendered markup instead of its text.
    #[arg(long, global = true)]
    raw_html: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Admin overview tables.
    Admin {
        #[arg(value_enum)]
        collection: Option<CollectionArg>,
    },
    /// Admin booking management.
    Bookings {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Admin user management.
    Users {
        #[arg(long)]
        search: Option<String>,
        #[arg(long, default_value_t = 1)]
        page: usize,
    },
    /// Customer dashboard.
    Dashboard {
        /// all, flights, hotels, buses, trains or saved-plans.
        #[arg(long, default_value = "all")]
        tab: String,
    },
    /// Send one message to the travel assistant.
    Chat { message: String },
    /// Open a saved trip plan and optionally ask for a change.
    EditTrip {
        plan_id: String,
        #[arg(long)]
        message: Option<String>,
    },
    /// Search flights.
    Flights {
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
        #[arg(long)]
        departure: NaiveDate,
        #[arg(long = "return")]
        return_date: Option<NaiveDate>,
        /// price_asc, price_desc, duration_asc, departure_asc or arrival_asc.
        #[arg(long, default_value = "price_asc")]
        sort: String,
    },
    /// Airport autocomplete.
    Airports { query: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum CollectionArg {
    Bookings,
    Users,
    Payments,
    AiLogs,
}

impl From<CollectionArg> for AdminCollection {
    fn from(arg: CollectionArg) -> Self {
        match arg {
            CollectionArg::Bookings => AdminCollection::Bookings,
            CollectionArg::Users => AdminCollection::Users,
            CollectionArg::Payments => AdminCollection::Payments,
            CollectionArg::AiLogs => AdminCollection::AiLogs,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttravels_app=debug,ttravels_store=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load_from(&cli.config).context("Failed to load config")?;
    tracing::info!("Using backend at {}", config.api.base_url);

    let api = ApiClient::new(&config.api).context("Failed to build HTTP client")?;
    let store = FileStore::open(&config.storage.path).context("Failed to open local storage")?;
    let ctx = AppContext::new(Arc::new(api), Arc::new(store), config);
    let ui = TerminalUi::new(cli.yes, cli.raw_html);

    match cli.command {
        Command::Admin { collection } => {
            let mut page = AdminPanelController::new(ctx, ui);
            match collection {
                Some(c) => page.load(c.into()).await,
                None => page.load_all().await,
            }
        }
        Command::Bookings { search, page: number } => {
            let mut page = BookingManagementController::new(ctx, ui);
            if page.init().await {
                if let Some(text) = search {
                    page.search(&text);
                }
                if number > 1 {
                    page.change_page(number);
                }
            }
        }
        Command::Users { search, page: number } => {
            let mut page = UserManagementController::new(ctx, ui);
            if page.init().await {
                if let Some(text) = search {
                    page.search(&text);
                }
                if number > 1 {
                    page.change_page(number);
                }
            }
        }
        Command::Dashboard { tab } => {
            let mut page = DashboardController::new(ctx, ui);
            page.open(DashboardTab::parse(&tab)).await;
        }
        Command::Chat { message } => {
            let mut page = AssistantController::new(ctx, ui);
            page.open();
            page.send_text(&message).await;
        }
        Command::EditTrip { plan_id, message } => {
            let mut page = EditTripController::new(ctx, ui);
            if page.load(&plan_id).await {
                if let Some(message) = message {
                    page.chat(&message).await;
                }
            }
        }
        Command::Flights {
            from,
            to,
            departure,
            return_date,
            sort,
        } => {
            let mut page = FlightSearchController::new(ctx, ui);
            page.type_airport(Direction::From, &from);
            page.type_airport(Direction::To, &to);
            page.set_trip_type(if return_date.is_some() {
                TripType::RoundTrip
            } else {
                TripType::OneWay
            });
            page.set_dates(Some(departure), return_date);
            page.sort_by(SortKey::parse(&sort));
            page.search().await;
        }
        Command::Airports { query } => {
            let search = &ctx.config.search;
            let markup = if query.trim().is_empty() {
                flight_view::popular(&airports::popular(Direction::From))
            } else {
                let matches = airports::suggest(&query, search.autocomplete_min_chars, search.autocomplete_limit);
                flight_view::suggestions(&matches, &query)
            };
            if cli.raw_html {
                println!("{}", markup);
            } else {
                println!("{}", ttravels_shared::html::plain_text(&markup));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_flags_follow_subcommand() {
        let cli = Cli::try_parse_from(["ttravels", "airports", "goa", "--config", "/etc/ttravels", "--yes"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("/etc/ttravels"));
        assert!(cli.yes);
        assert!(matches!(cli.command, Command::Airports { ref query } if query == "goa"));
    }

    #[test]
    fn test_config_defaults_to_local_dir() {
        let cli = Cli::try_parse_from(["ttravels", "dashboard"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("config"));
        assert!(!cli.raw_html);
    }
}
