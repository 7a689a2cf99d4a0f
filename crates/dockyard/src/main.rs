mod cli;

use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;
use std::thread;

use clap::{Parser, Subcommand};
use console_log::ConsoleLogPlugIn;
use dockyard_core::event::{Message, MessageKind};
use dockyard_core::kernel::bootstrap::Application;
use dockyard_core::kernel::constants;
use dockyard_core::plugin_system::PlugIn;
use dockyard_core::storage::HostConfig;
use welcome_screen::WelcomeScreen;

/// Dockyard: a plug-in host with routed messages and quick actions
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Configuration file (.json, .yaml or .toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List quick actions in display order
    Actions,
    /// List loaded plug-ins
    Plugins,
    /// Raise a message on the welcome screen and print the status log
    Raise {
        /// debug, info, warning or error
        kind: String,
        text: String,
    },
    /// Post a message from a background thread and deliver it through the pump
    Demo,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    let (config, load_error) = match &args.config {
        Some(path) => HostConfig::load_or_default(path),
        None => (HostConfig::default(), None),
    };

    // Installed first so the application's own start-up records reach the console
    if let Err(e) = console_log::install_subscriber(&config.log_level) {
        eprintln!("{}", e);
    }
    let log_level = config.log_level.clone();

    let built = match &args.config {
        Some(path) => Application::from_loaded_config(config, path, load_error),
        None => Application::new(config),
    };
    let mut app = built.unwrap_or_else(|e| {
        eprintln!("Failed to initialize application: {}", e);
        std::process::exit(1);
    });

    let welcome = Rc::new(WelcomeScreen::new(&app.config().welcome_title));
    let plugins: Vec<Rc<dyn PlugIn>> =
        vec![Rc::new(ConsoleLogPlugIn::new(&log_level)), welcome.clone()];
    for (id, e) in app.load_plugins(plugins) {
        eprintln!("Plug-in '{}' failed to load: {}", id, e);
    }

    let code = match args.command {
        Some(Commands::Actions) => {
            println!("Quick actions:");
            print!("{}", cli::render_actions(app.host()));
            ExitCode::SUCCESS
        }
        Some(Commands::Plugins) => {
            println!("Loaded plug-ins:");
            print!("{}", cli::render_plugins(app.host()));
            ExitCode::SUCCESS
        }
        Some(Commands::Raise { kind, text }) => match MessageKind::parse(&kind) {
            Some(kind) => match welcome.announce(kind, &text) {
                Ok(outcome) => {
                    log::debug!("Raised {} message: {:?}", kind, outcome);
                    println!("Status log:");
                    print!("{}", cli::render_status_log(app.status_log()));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Failed to raise message: {}", e);
                    ExitCode::FAILURE
                }
            },
            None => {
                eprintln!(
                    "Unknown message kind '{}': expected debug, info, warning or error",
                    kind
                );
                ExitCode::from(2)
            }
        },
        Some(Commands::Demo) => run_demo(&mut app, &welcome).await,
        None => {
            println!("{} v{}", constants::APP_NAME, constants::APP_VERSION);
            println!("Status log:");
            print!("{}", cli::render_status_log(app.status_log()));
            ExitCode::SUCCESS
        }
    };

    if let Err(e) = app.shutdown() {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }
    code
}

async fn run_demo(app: &mut Application, welcome: &WelcomeScreen) -> ExitCode {
    let Some(target) = welcome.node().map(|node| node.id()) else {
        eprintln!("Welcome screen is not attached");
        return ExitCode::FAILURE;
    };
    let poster = match app.poster() {
        Ok(poster) => poster,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let worker = thread::spawn(move || {
        poster.post(
            target,
            Message::info("Background scan finished").with_source("demo-worker"),
        )
    });
    let posted = match worker.join() {
        Ok(result) => result,
        Err(_) => {
            eprintln!("Demo worker panicked");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = posted {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let delivered = app.run_pump().await;
    println!("Delivered {} posted message(s)", delivered);
    println!("Status log:");
    print!("{}", cli::render_status_log(app.status_log()));
    ExitCode::SUCCESS
}
