pub mod dashboard;
pub mod watch;

use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::Result;
use clap::{Parser, Subcommand};
use dashboard::{render_chart, render_checklist, render_dashboard, render_log, ColorChoice, Painter};
use tracing::{info, level_filters::LevelFilter};
use watch::watch;

use crate::{
    planner::{
        catalog::{BlockId, Mode},
        payload_storage::FilePayloadStorage,
        store::PlannerStore,
        ticker::DEFAULT_TICK_INTERVAL,
    },
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{enable_logging, CLI_PREFIX, WATCH_PREFIX},
    },
};

#[derive(Parser, Debug)]
#[command(name = "planner", version, long_about = None)]
#[command(about = "Daily routine checklist with streaks and a rolling history", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Option<Commands>,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
    #[arg(long, global = true, help = "Print logs to the console")]
    log: bool,
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(about = "Show today's checklist, the last 7 days and the recent log")]
    Show,
    #[command(about = "Check or uncheck blocks by their number")]
    Toggle {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<BlockId>,
    },
    #[command(about = "Switch between the core and the lite routine")]
    Mode { mode: Mode },
    #[command(about = "Replace the motivational quote")]
    Quote { text: String },
    #[command(about = "Change the name used in the greeting")]
    Greeting { name: String },
    #[command(about = "Uncheck every block for today. History is kept")]
    Reset,
    #[command(about = "Erase history and settings")]
    Clear {
        #[arg(long, help = "Confirm that everything should be removed")]
        yes: bool,
    },
    #[command(about = "Show a progress chart for the last days")]
    History {
        #[arg(short, long, default_value_t = 7)]
        days: usize,
    },
    #[command(about = "List archived days, newest first")]
    Log {
        #[arg(short, long, default_value_t = 7)]
        limit: usize,
    },
    #[command(about = "Keep the dashboard open and roll over to a new day at midnight")]
    Watch {
        #[arg(
            short,
            long,
            default_value_t = DEFAULT_TICK_INTERVAL.as_secs(),
            value_parser = clap::value_parser!(u64).range(1..=60),
            help = "Seconds between two day checks"
        )]
        interval: u64,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    let prefix = match args.commands {
        Some(Commands::Watch { .. }) => WATCH_PREFIX,
        _ => CLI_PREFIX,
    };
    enable_logging(prefix, &dir.join("logs"), logging_level, args.log)?;

    let storage = FilePayloadStorage::in_dir(&dir);
    info!("Using payload {:?}", storage.path());
    let mut store = PlannerStore::init(storage, Arc::new(DefaultClock))?;
    let painter = Painter::new(args.color);

    match args.commands.unwrap_or(Commands::Show) {
        Commands::Show => print!("{}", render_dashboard(&store, &painter)),
        Commands::Toggle { ids } => {
            for id in ids {
                if !store.catalog().iter().any(|block| block.id == id) {
                    println!("Block {id} is not part of the {} routine", store.mode());
                }
                store.toggle(id)?;
            }
            print!("{}", render_checklist(&store, &painter));
        }
        Commands::Mode { mode } => {
            store.set_mode(mode)?;
            print!("{}", render_checklist(&store, &painter));
        }
        Commands::Quote { text } => {
            store.set_quote(text)?;
            println!("{}", store.settings().quote);
        }
        Commands::Greeting { name } => {
            store.set_greeting_name(name)?;
            println!("Hi {}", store.settings().greeting_name);
        }
        Commands::Reset => {
            store.reset_today_checks()?;
            println!("Unchecked every block for today");
        }
        Commands::Clear { yes } => {
            if store.clear_all(yes)? {
                println!("Removed all planner data");
            } else {
                println!("Nothing was removed. Pass --yes to erase history and settings");
            }
        }
        Commands::History { days } => {
            print!("{}", render_chart(store.last_n_days(days), &painter))
        }
        Commands::Log { limit } => print!("{}", render_log(&store, limit, &painter)),
        Commands::Watch { interval } => {
            watch(&mut store, Duration::from_secs(interval), painter).await?
        }
    }

    store.teardown()
}
