//! Hearth - Main entry point
//!
//! Prints one dashboard page from the configured backend and exits.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hearth::config::Config;
use hearth::display;
use hearth::error::Result;
use hearth::models::{BillCategory, NewShoppingItem, ShoppingCategory};
use hearth::period::{Period, PeriodKind};
use hearth::source::{Backend, MealPreferences, SnapshotBackend};
use hearth::time::Zone;
use hearth::views::{self, BillFilter, ChoreFilter, DashboardData, ViewContext};

#[derive(Parser)]
#[command(name = "hearth")]
#[command(author, version, about = "Household dashboard for the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Household timezone (IANA id), overrides the config
    #[arg(long, global = true, env = "HEARTH_TZ")]
    zone: Option<String>,

    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// Snapshot directory, overrides the config
    #[arg(long, global = true, env = "HEARTH_SNAPSHOTS")]
    snapshots: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Summary cards, family, upcoming events and system health (default)
    Dashboard,

    /// Show bills
    Bills {
        /// Only this category
        #[arg(long)]
        category: Option<BillCategory>,

        /// Include paid bills
        #[arg(long)]
        show_paid: bool,
    },

    /// Show chores
    Chores {
        /// Only chores assigned to this member
        #[arg(short, long)]
        member: Option<String>,

        /// Include completed chores
        #[arg(long)]
        show_completed: bool,
    },

    /// Show the calendar
    Calendar {
        /// Reference date (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Period to show (day, week, month)
        #[arg(long, default_value = "week")]
        view: PeriodKind,

        /// Periods to move forward (negative goes back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,

        /// Only events involving this member
        #[arg(short, long)]
        member: Option<String>,
    },

    /// Show the week's meal plan
    Meals {
        /// Any date in the week (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Weeks to move forward (negative goes back)
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        offset: i32,

        /// Ask the backend to generate a plan for the week
        #[arg(long)]
        generate: bool,

        /// Dietary preferences for generation
        #[arg(long, value_delimiter = ',')]
        dietary: Vec<String>,

        /// Allergies for generation
        #[arg(long, value_delimiter = ',')]
        allergies: Vec<String>,
    },

    /// Show appointments, refills and records
    Medical {
        /// Only this patient
        #[arg(short, long)]
        member: Option<String>,
    },

    /// Show the shopping list
    Shopping {
        /// Include checked items
        #[arg(long)]
        show_checked: bool,

        /// Add an item before listing
        #[arg(long)]
        add: Option<String>,

        /// Category of the added item
        #[arg(long, default_value = "other")]
        category: ShoppingCategory,

        /// Remove checked items before listing
        #[arg(long)]
        clear_checked: bool,
    },

    /// Mark a bill paid
    Pay {
        /// Bill id
        id: String,
    },

    /// Mark a chore completed
    Complete {
        /// Chore id
        id: String,
    },

    /// Toggle a shopping item's checked flag
    Check {
        /// Item id
        id: String,
    },

    /// Show or edit configuration
    Config {
        /// Print current configuration
        #[arg(long)]
        show: bool,

        /// Create default configuration file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load and validate configuration
    let config = if let Some(ref path) = cli.config {
        Config::load_from(path)?
    } else {
        Config::load()?
    };
    config.validate()?;

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new(&config.general.log_level)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let zone = match cli.zone {
        Some(ref id) => Zone::parse(id)?,
        None => config.zone()?,
    };
    let ctx = match cli.today {
        Some(day) => ViewContext::on_day(zone, day),
        None => ViewContext::new(zone, Utc::now()),
    };

    let snapshot_dir = match cli.snapshots {
        Some(ref dir) => dir.clone(),
        None => config.snapshot_dir()?,
    };
    let backend: Arc<dyn Backend> = Arc::new(SnapshotBackend::new(snapshot_dir, zone));

    match cli.command {
        Some(Commands::Dashboard) | None => run_dashboard(&config, backend.as_ref(), &ctx).await,

        Some(Commands::Bills {
            category,
            show_paid,
        }) => {
            let filter = BillFilter {
                category,
                show_paid,
            };
            show_bills(&config, backend.as_ref(), &ctx, &filter).await
        }

        Some(Commands::Chores {
            member,
            show_completed,
        }) => {
            let filter = ChoreFilter {
                member,
                show_completed,
            };
            show_chores(&config, backend.as_ref(), &ctx, &filter).await
        }

        Some(Commands::Calendar {
            date,
            view,
            offset,
            member,
        }) => {
            let period = Period::compute(date.unwrap_or(ctx.today), view).offset(offset);
            let (start, end) = period.query_bounds(&zone);
            let events = backend.events(start, end).await?;
            let calendar = views::calendar::calendar(
                &events,
                period,
                member.as_deref(),
                &zone,
                config.display.upcoming_limit,
            );
            display::display_calendar(&calendar, &zone, ctx.today);
            Ok(())
        }

        Some(Commands::Meals {
            date,
            offset,
            generate,
            dietary,
            allergies,
        }) => {
            let period =
                Period::compute(date.unwrap_or(ctx.today), PeriodKind::Week).offset(offset);
            let plans = if generate {
                let request =
                    views::meals::plan_request(&period, MealPreferences { dietary, allergies });
                let plans = backend.generate_meal_plan(&request).await?;
                println!("Generated {} meals for {}", plans.len(), period.label());
                plans
            } else {
                let (start, end) = period.query_bounds(&zone);
                backend.meal_plans(start, end).await?
            };
            let week = views::meals::meal_week(&plans, period, &ctx);
            display::display_meals(&week, ctx.today);
            Ok(())
        }

        Some(Commands::Medical { member }) => {
            let (appointments, medications, records) = futures::try_join!(
                backend.appointments(),
                backend.medications(),
                backend.medical_records(),
            )?;
            let overview = views::medical::overview(
                &appointments,
                &medications,
                &records,
                member.as_deref(),
                &ctx,
                config.urgency.medical(),
                i64::from(config.urgency.refill_window_days),
            );
            display::display_medical(&overview, &zone, ctx.today);
            Ok(())
        }

        Some(Commands::Shopping {
            show_checked,
            add,
            category,
            clear_checked,
        }) => {
            if let Some(name) = add {
                let item = backend.add_item(NewShoppingItem::new(name, category)).await?;
                println!("Added {} ({})", item.name, item.category);
            }
            if clear_checked {
                let removed = backend.clear_checked().await?;
                println!("Cleared {removed} checked items");
            }
            let items = backend.shopping_items().await?;
            display::display_shopping(&views::shopping::by_category(&items, show_checked));
            Ok(())
        }

        Some(Commands::Pay { id }) => {
            let bill = backend.pay_bill(&id).await?;
            println!(
                "Paid {} ({})",
                bill.name,
                bill.amount.format_with(&config.display.currency_symbol)
            );
            show_bills(&config, backend.as_ref(), &ctx, &BillFilter::default()).await
        }

        Some(Commands::Complete { id }) => {
            let chore = backend.complete_chore(&id).await?;
            println!("Completed {} ({})", chore.name, chore.points());
            show_chores(&config, backend.as_ref(), &ctx, &ChoreFilter::default()).await
        }

        Some(Commands::Check { id }) => {
            let item = backend.toggle_item(&id).await?;
            let state = if item.checked { "checked" } else { "unchecked" };
            println!("{} {state}", item.name);
            let items = backend.shopping_items().await?;
            display::display_shopping(&views::shopping::by_category(&items, true));
            Ok(())
        }

        Some(Commands::Config { show, init }) => {
            if init {
                let default_config = Config::default();
                default_config.save()?;
                println!(
                    "Created default configuration at {}",
                    Config::config_path()?.display()
                );
            } else if show {
                let contents = toml::to_string_pretty(&config)?;
                println!("{contents}");
            } else {
                println!("Configuration path: {}", Config::config_path()?.display());
            }
            Ok(())
        }
    }
}

async fn run_dashboard(config: &Config, backend: &dyn Backend, ctx: &ViewContext) -> Result<()> {
    let data = DashboardData::fetch(backend, ctx, config.display.upcoming_limit).await;
    let page = views::dashboard::dashboard(
        &data,
        ctx,
        &config.urgency,
        config.display.upcoming_limit,
    );
    display::display_dashboard(&page, &config.display.currency_symbol);
    Ok(())
}

async fn show_bills(
    config: &Config,
    backend: &dyn Backend,
    ctx: &ViewContext,
    filter: &BillFilter,
) -> Result<()> {
    let bills = backend.bills().await?;
    let board = views::bills::board(
        &bills,
        filter,
        ctx,
        config.urgency.bills(),
        i64::from(config.urgency.upcoming_window_days),
    );
    display::display_bills(&board, &config.display.currency_symbol);
    Ok(())
}

async fn show_chores(
    config: &Config,
    backend: &dyn Backend,
    ctx: &ViewContext,
    filter: &ChoreFilter,
) -> Result<()> {
    let chores = backend.chores().await?;
    let board = views::chores::board(&chores, filter, ctx, config.urgency.chores());
    display::display_chores(&board);
    Ok(())
}
