/// Work allowance for one cooperative tick.
///
/// Budgets count abstract work units (one catalog delivery, one relaxation
/// pass) instead of wall-clock time, so a tick sequence replays identically.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TickBudget {
    remaining_units: u32,
}

impl TickBudget {
    pub fn new(units: u32) -> Self {
        Self {
            remaining_units: units,
        }
    }

    /// Runs everything that is ready; still deterministic.
    pub fn unlimited() -> Self {
        Self {
            remaining_units: u32::MAX,
        }
    }

    pub fn remaining_units(&self) -> u32 {
        self.remaining_units
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining_units == 0
    }

    /// Takes `units` if available; leaves the budget untouched otherwise.
    pub fn try_consume(&mut self, units: u32) -> bool {
        match self.remaining_units.checked_sub(units) {
            Some(rest) => {
                self.remaining_units = rest;
                true
            }
            None => false,
        }
    }
}
