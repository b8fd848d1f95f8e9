use serde::{Deserialize, Serialize};

/// Outcome of a delete call.
///
/// `affected == 0` means the row was already gone; stores report it as a
/// success and callers decide how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReport {
    pub affected: u64,
}

impl DeleteReport {
    pub fn new(affected: u64) -> Self {
        Self { affected }
    }

    pub fn is_noop(&self) -> bool {
        self.affected == 0
    }
}
