use std::time::Duration;

use clap::Args;
use pomotrack_core::storage::Database;
use pomotrack_core::{Command, Config, TimerController};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::MissedTickBehavior;

use crate::terminal;

#[derive(Args)]
pub struct RunArgs {
    /// Start the first session immediately
    #[arg(long)]
    pub auto_start: bool,
}

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Intent {
    Timer(Command),
    Help,
    Quit,
}

fn parse_intent(line: &str) -> Option<Intent> {
    match line.trim().to_ascii_lowercase().as_str() {
        "s" | "start" => Some(Intent::Timer(Command::Start)),
        "p" | "pause" => Some(Intent::Timer(Command::Pause)),
        "r" | "reset" => Some(Intent::Timer(Command::Reset)),
        "k" | "skip" => Some(Intent::Timer(Command::Skip)),
        "?" | "h" | "help" => Some(Intent::Help),
        "q" | "quit" | "exit" => Some(Intent::Quit),
        _ => None,
    }
}

fn print_help() {
    eprintln!("commands: [s]tart  [p]ause  [r]eset  s[k]ip  [q]uit  [?] help");
}

pub fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut controller = TimerController::new(Box::new(db), terminal::services(config));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(event_loop(&mut controller, args.auto_start))
}

/// Drive the controller from a 1 Hz interval and stdin until quit.
///
/// Once stdin closes, the loop keeps ticking a running session to its end
/// and then exits.
async fn event_loop(
    controller: &mut TimerController,
    auto_start: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut states = controller.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately.
    interval.tick().await;

    print_help();
    terminal::render(controller.state(), controller.settings());
    if auto_start {
        controller.start();
        interval.reset();
    }

    let mut stdin_open = true;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if controller.is_ticking() {
                    controller.tick();
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line? {
                    Some(line) if line.trim().is_empty() => {}
                    Some(line) => match parse_intent(&line) {
                        Some(Intent::Timer(command)) => {
                            let starting = command == Command::Start;
                            if let Err(e) = controller.handle(command) {
                                tracing::warn!("{e}");
                            }
                            if starting {
                                // Count the first second from the keypress.
                                interval.reset();
                            }
                        }
                        Some(Intent::Help) => print_help(),
                        Some(Intent::Quit) => break,
                        None => eprintln!("unknown command: {}", line.trim()),
                    },
                    None => {
                        tracing::debug!("stdin closed");
                        stdin_open = false;
                    }
                }
            }
        }

        if states.has_changed().unwrap_or(false) {
            let state = states.borrow_and_update().clone();
            terminal::render(&state, controller.settings());
        }
        if !stdin_open && !controller.is_ticking() {
            break;
        }
    }

    println!();
    Ok(())
}
