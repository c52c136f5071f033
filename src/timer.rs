// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::time::Instant;

/// Logs how long a stage of lattice compilation took when dropped.
pub(crate) struct Timer {
    action: &'static str,
    start: Instant,
}

impl Timer {
    pub(crate) fn new(action: &'static str) -> Self {
        Self {
            action,
            start: Instant::now(),
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        log::debug!("{} took {:.3?}", self.action, self.start.elapsed());
    }
}

// End of File
