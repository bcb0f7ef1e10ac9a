use chrono::{Local, NaiveDate};
use clap::Subcommand;
use pomotui_core::session::DATE_FORMAT;
use pomotui_core::Database;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Sessions completed today
    Today,
    /// Sessions completed on a given day
    Day {
        /// Date as YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Every recorded day
    History,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Today => {
            let count = db.daily_count(Local::now().date_naive())?;
            println!("{}", serde_json::to_string_pretty(&count)?);
        }
        StatsAction::Day { date } => {
            let count = db.daily_count(date)?;
            println!("{}", serde_json::to_string_pretty(&count)?);
        }
        StatsAction::History => {
            let history = db.history()?;
            println!("{}", serde_json::to_string_pretty(&history)?);
        }
    }
    Ok(())
}
