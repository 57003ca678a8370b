use sentinel_persistence::{CompanyRegistry, SeedOutcome};
use std::path::Path;

use super::open_ledger;

pub fn run(db: &Path, csv: &Path) -> anyhow::Result<SeedOutcome> {
    let ledger = open_ledger(db)?;
    let outcome = ledger.seed_from_file(csv)?;

    match outcome {
        SeedOutcome::Seeded { companies } => {
            println!("\nSeeded {companies} companies from {}\n", csv.display());
        }
        SeedOutcome::Skipped { existing } => {
            println!("\nLedger already holds {existing} companies; reference list not loaded.\n");
        }
    }
    Ok(outcome)
}
