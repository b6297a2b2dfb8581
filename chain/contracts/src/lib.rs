//! Peer-to-peer swap contract
//!
//! Two parties agree off-band to exchange one asset for another. The opener
//! records the trade; the counterparty executes it, at which point both
//! assets move directly between them through their registries. The contract
//! never takes custody: it re-checks live ownership and operator approval on
//! every executability query and every execution.
//!
//! # Modules
//! - `errors`: Swap and registry error types
//! - `events`: Contract events
//! - `config`: Deployment parameters
//! - `context`: Per-call caller and ledger time
//! - `registry`: Registry capability traits and in-memory registries
//! - `book`: Append-only trade book
//! - `executability`: Live executability checks
//! - `swap`: Trade lifecycle (open, cancel, execute)
//! - `ledger`: In-process host with clock and atomic transactions

pub mod errors;
pub mod events;
pub mod config;
pub mod context;
pub mod registry;
pub mod book;
pub mod executability;
pub mod swap;
pub mod ledger;
