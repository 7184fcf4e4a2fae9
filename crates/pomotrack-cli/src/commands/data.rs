use clap::Subcommand;
use pomotrack_core::storage::Database;
use pomotrack_core::SessionStore;

#[derive(Subcommand)]
pub enum DataAction {
    /// Delete settings, session history and daily stats
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DataAction::Clear { yes } => {
            if !yes {
                return Err("refusing to clear data without --yes".into());
            }
            let mut db = Database::open()?;
            db.clear_all()?;
            tracing::info!("all stored data cleared");
            println!("all data cleared");
        }
    }
    Ok(())
}
