use chrono::{Local, NaiveDate};
use clap::Subcommand;
use pomotrack_core::stats::{list_daily_stats, totals};
use pomotrack_core::storage::Database;
use pomotrack_core::{DailyStats, SessionStore, StatsPeriod};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// The last 7 days, one entry per day
    Week,
    /// The last 30 days, one entry per day
    Month,
    /// An explicit inclusive date range
    Range {
        /// First day (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Last day (YYYY-MM-DD)
        #[arg(long)]
        to: NaiveDate,
    },
    /// All-time totals over recorded sessions
    Totals,
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let today = Local::now().date_naive();

    match action {
        StatsAction::Today => {
            let stats = db
                .daily_stats_for(today)?
                .unwrap_or_else(|| DailyStats::empty(today));
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Week => print_period(&db, StatsPeriod::Week, today)?,
        StatsAction::Month => print_period(&db, StatsPeriod::Month, today)?,
        StatsAction::Range { from, to } => {
            let days = list_daily_stats(&db.load_daily_stats()?, from, to);
            println!("{}", serde_json::to_string_pretty(&days)?);
        }
        StatsAction::Totals => {
            let sessions = db.load_sessions()?;
            println!("{}", serde_json::to_string_pretty(&totals(&sessions))?);
        }
    }
    Ok(())
}

fn print_period(
    db: &Database,
    period: StatsPeriod,
    today: NaiveDate,
) -> Result<(), Box<dyn std::error::Error>> {
    let (start, end) = period.range(today);
    let days = list_daily_stats(&db.load_daily_stats()?, start, end);
    println!("{}", serde_json::to_string_pretty(&days)?);
    Ok(())
}
