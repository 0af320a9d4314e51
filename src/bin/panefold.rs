use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use panefold::actor::command::{EventResponse, PaneCommand, PaneEvent};
use panefold::actor::controller::PaneController;
use panefold::actor::host::{PaneHost, ViewId};
use panefold::actor::session::WindowSession;
use panefold::common::config::{Config, config_file, state_file};
use panefold::common::log;
use panefold::layout_engine::LayoutError;
use tracing::warn;

#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to the saved window (overrides default).
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Check the configuration file and exit.
    #[arg(long)]
    validate: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the window's panes and views.
    Show,
    /// Open a view in the active pane.
    Open {
        name: String,
        /// Open an empty placeholder instead of a file.
        #[arg(long)]
        transient: bool,
    },
    /// Run a pane command given as JSON, e.g. '{"travel":{"direction":"right"}}'.
    Exec { command: String },
    /// Close a view, letting the pane close with it when configured to.
    Close { view: u64 },
    /// Focus a pane as if the user clicked into it.
    Focus { group: usize },
    /// List saved layouts.
    Layouts,
    /// Start over with a single empty pane.
    Reset,
}

fn main() {
    sigpipe::reset();
    let opt = Cli::parse();
    log::init_logging();

    if let Err(e) = run(opt) {
        eprintln!("{e:#}");
        process::exit(1);
    }
}

fn run(opt: Cli) -> anyhow::Result<()> {
    let config_path = opt.config.clone().unwrap_or_else(config_file);
    let state_path = opt.state.clone().unwrap_or_else(state_file);
    let mut config = Config::read_or_default(&config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;

    let issues = config.validate();
    if opt.validate {
        if issues.is_empty() {
            println!("Config validation passed");
            return Ok(());
        }
        for issue in &issues {
            eprintln!("{issue}");
        }
        process::exit(1);
    }
    for issue in &issues {
        warn!("{issue}");
    }

    let command = opt.command.unwrap_or(Commands::Show);
    match command {
        Commands::Layouts => {
            for name in config.saved_layouts.names() {
                println!("{name}");
            }
            return Ok(());
        }
        Commands::Reset => {
            let session = WindowSession::default();
            session.save(&state_path)?;
            print!("{}", session.host.draw_tree());
            return Ok(());
        }
        _ => {}
    }

    let session = WindowSession::load_or_default(&state_path)
        .with_context(|| format!("reading {}", state_path.display()))?;
    let mut controller =
        PaneController::new(session.host, config.settings.clone(), config.saved_layouts.clone())
            .with_state(session.state);

    let result: Result<Option<EventResponse>, LayoutError> = match command {
        Commands::Open { name, transient } => {
            let host = controller.host_mut();
            let view = if transient { host.open_transient() } else { host.open(&name) };
            println!("{view}");
            Ok(None)
        }
        Commands::Exec { command } => {
            let command: PaneCommand =
                serde_json::from_str(&command).context("parsing pane command")?;
            controller.handle_command(command).map(Some)
        }
        Commands::Close { view } => {
            let view = ViewId(view);
            let response = controller.handle_event(PaneEvent::ViewClosing(view));
            controller.host_mut().close_view(view);
            response.map(Some)
        }
        Commands::Focus { group } => {
            controller.host_mut().focus_group(group);
            controller.handle_event(PaneEvent::GroupActivated(group)).map(Some)
        }
        Commands::Show | Commands::Layouts | Commands::Reset => Ok(None),
    };

    // Failed commands may still have changed the window, e.g. by unzooming.
    let (host, state, layouts) = controller.into_parts();
    let tree = host.draw_tree();
    WindowSession { host, state }.save(&state_path)?;

    let response = result?;
    if let Some(response) = response {
        if response.layouts_changed {
            config.saved_layouts = layouts;
            config.save(&config_path)?;
        }
        if let Some(prompt) = response.prompt {
            println!("{prompt}");
        }
    }
    print!("{tree}");
    Ok(())
}
