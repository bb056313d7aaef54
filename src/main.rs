use anyhow::Result;
use clap::Parser;
use log::{debug, info, LevelFilter};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

mod ui;
mod utils;

use crate::ui::{ChatUI, Route, UiCommand};
use parley::config::{self, Config};
use parley::delivery::{MessageDelivery, ScriptedReply};
use parley::session::ChatSession;

/// Command line arguments for Parley
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Parley: a terminal chat client with a partner directory, threads and shared media.",
    long_about = "Parley is a terminal chat client. Pick a partner from the directory, \
    exchange messages and images, and browse the media shared in each conversation.\n\n\
    Settings are read from config.json in the user's config directory unless --config is given.\n\
    Use -h or --help to see all options."
)]
struct Args {
    /// Config file to use instead of the default one
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// File the log is written to
    #[arg(long, value_name = "PATH", default_value = "parley.log")]
    log_file: PathBuf,

    /// Log level (error, warn, info, debug, trace); overrides the config file
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<LevelFilter>,

    /// Terminal width in columns at which the layout switches to side-by-side panes
    #[arg(long, value_name = "COLUMNS")]
    breakpoint: Option<u16>,

    /// Delay before the scripted reply arrives, in milliseconds
    #[arg(long, value_name = "MS")]
    reply_delay_ms: Option<u64>,

    /// Start in the chat instead of on the landing page
    #[arg(long)]
    skip_landing: bool,
}

fn apply_overrides(args: &Args, mut config: Config) -> Config {
    if let Some(breakpoint) = args.breakpoint {
        config.breakpoint_columns = breakpoint;
    }
    if let Some(delay) = args.reply_delay_ms {
        config.reply_delay_ms = delay;
    }
    if let Some(level) = args.log_level {
        config.log_level = level.to_string();
    }
    config
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments FIRST
    let args = Args::parse();

    if let Some(path) = &args.config {
        config::set_config_path_override(path.clone());
    }
    let config = apply_overrides(&args, config::load_config()?);

    utils::setup_logging(args.log_file.to_str(), config.log_level_filter())?;

    info!("Parley starting up");
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    info!("Logging to file: {}", args.log_file.display());
    debug!("Effective config: {:?}", config);

    let transport: Arc<dyn MessageDelivery> =
        Arc::new(ScriptedReply::new(&config.reply_text, config.reply_delay()));

    // Setup terminal UI
    let mut terminal = ui::setup_terminal()?;
    let width = terminal.size()?.width;
    let route = if args.skip_landing { Route::Chat } else { Route::Landing };
    let mut chat_ui = ChatUI::new(route, config.breakpoint_columns, width);
    info!("Starting on {:?} route with a {:?} viewport", chat_ui.route(), chat_ui.viewport());

    // Main event loop
    let result = run_main_loop(&mut chat_ui, &mut terminal, transport, config.typing_idle()).await;

    // Restore terminal even when the loop failed
    ui::restore_terminal(terminal)?;
    result?;

    println!("Chat session ended.");
    Ok(())
}

async fn run_main_loop(
    chat_ui: &mut ChatUI,
    terminal: &mut ui::Terminal<ui::CrosstermBackend<io::Stdout>>,
    transport: Arc<dyn MessageDelivery>,
    typing_idle: Duration,
) -> Result<()> {
    // The chat route owns a session only while it is shown
    let mut session = match chat_ui.route() {
        Route::Chat => Some(ChatSession::mount(transport.clone(), typing_idle)?),
        Route::Landing => None,
    };

    loop {
        // Draw the UI
        terminal.draw(|f| chat_ui.draw(f, session.as_ref().map(|s| s.view())))?;

        if let Some(session) = session.as_mut() {
            if session.view_mut().tick(Instant::now()) {
                debug!("Typing indicator cleared after idle period");
            }
        }

        // Handle user input
        match chat_ui.handle_input(session.as_mut().map(|s| s.view_mut()))? {
            Some(UiCommand::Quit) => {
                info!("Quit requested");
                break;
            }
            Some(UiCommand::Send(outgoing)) => {
                if let Some(session) = session.as_mut() {
                    info!("Dispatching message to {}", outgoing.partner_id);
                    session.send(outgoing);
                }
            }
            Some(UiCommand::EnterChat) => {
                session = Some(ChatSession::mount(transport.clone(), typing_idle)?);
            }
            Some(UiCommand::LeaveChat) => {
                // Dropping the session aborts replies still in flight
                session = None;
            }
            None => {}
        }

        // Replies arrive from spawned delivery tasks
        if let Some(session) = session.as_mut() {
            for appended in session.drain() {
                chat_ui.message_appended(session.view(), &appended);
            }
        }
    }

    Ok(())
}
