//! Per-call context supplied by the host

use swap_types::ids::Address;

/// Who is calling and the ledger time the call runs at.
///
/// `now` is read once per call so every check inside one operation sees the
/// same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    pub caller: Address,
    /// Unix seconds
    pub now: i64,
}

impl CallContext {
    pub fn new(caller: Address, now: i64) -> Self {
        Self { caller, now }
    }
}
