use clap::Args;
use pomotrack_core::stats::recent_sessions;
use pomotrack_core::storage::Database;
use pomotrack_core::SessionStore;

#[derive(Args)]
pub struct HistoryArgs {
    /// Number of sessions to show
    #[arg(long, default_value = "5")]
    pub limit: usize,
}

pub fn run(args: HistoryArgs) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sessions = db.load_sessions()?;
    let recent = recent_sessions(&sessions, args.limit);
    println!("{}", serde_json::to_string_pretty(recent)?);
    Ok(())
}
