use pomotui_core::{ByteStore, Config, Database, MemoryStore, PhaseMachine};

use crate::{logging, tui};

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    logging::init(&config)?;

    let store: Box<dyn ByteStore> = match Database::open() {
        Ok(db) => Box::new(db),
        Err(e) => {
            tracing::warn!(error = %e, "could not open database, counts will not be saved");
            Box::new(MemoryStore::new())
        }
    };

    let mut machine = PhaseMachine::from_config(&config, store)?;
    tracing::info!(total_today = machine.total_today(), "starting");
    tui::run(&mut machine)
}
