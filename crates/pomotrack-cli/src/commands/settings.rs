use clap::Subcommand;
use pomotrack_core::settings::parse_field;
use pomotrack_core::storage::Database;
use pomotrack_core::{PomodoroSettings, Services, TimerController};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Change one or more settings
    Set {
        /// Work session length in minutes
        #[arg(long)]
        work: Option<String>,
        /// Short break length in minutes
        #[arg(long = "break")]
        break_: Option<String>,
        /// Long break length in minutes
        #[arg(long)]
        long_break: Option<String>,
        /// Work sessions before a long break (1-10)
        #[arg(long)]
        until_long_break: Option<String>,
    },
    /// Restore the default 25/5/15/4 settings
    Reset,
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut controller = TimerController::new(Box::new(db), Services::noop());

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(controller.settings())?);
        }
        SettingsAction::Set {
            work,
            break_,
            long_break,
            until_long_break,
        } => {
            let current = *controller.settings();
            let pick = |raw: Option<String>, keep: u32| raw.map_or(keep, |r| parse_field(&r));
            let candidate = PomodoroSettings::new(
                pick(work, current.work_duration),
                pick(break_, current.break_duration),
                pick(long_break, current.long_break_duration),
                pick(until_long_break, current.sessions_until_long_break),
            );
            controller.update_settings(candidate)?;
            println!("{}", serde_json::to_string_pretty(controller.settings())?);
        }
        SettingsAction::Reset => {
            controller.update_settings(PomodoroSettings::default())?;
            println!("settings reset to defaults");
        }
    }
    Ok(())
}
