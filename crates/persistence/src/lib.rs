//! SQLite-backed filing ledger: event store, company projection, the
//! reference-list seed, and the read-side query surface.

pub mod error;
pub mod schema;
pub mod store;
pub mod ledger;
pub mod projection;
pub mod registry;
pub mod seed;
pub mod query;
pub mod fixtures;

pub use error::{PersistenceError, Result};
pub use ledger::SqliteLedger;
pub use query::{FilingFilter, FilingView, FilterColumn, FilterOptions};
pub use seed::{CompanyRecord, REQUIRED_COLUMNS};
pub use store::{CompanyRegistry, EntityProjection, EventStore, Recorded, SeedOutcome};
