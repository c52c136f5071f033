// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use std::ops::AddAssign;

use serde::{Deserialize, Serialize};

use crate::error::LatticeError;

// ============================================================================
// Options
// ============================================================================

/// Options for one lattice construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LatticeOptions {
    pub mask: MaskCompilerOptions,
    /// Log a statistics summary at `debug` level when the construction finishes.
    pub log_statistics: bool,
}

impl Default for LatticeOptions {
    fn default() -> Self {
        Self {
            mask: MaskCompilerOptions::default(),
            log_statistics: true,
        }
    }
}

impl LatticeOptions {
    pub fn validate(&self) -> Result<(), LatticeError> {
        self.mask.validate()
    }
}

/// Tuning of the hierarchical plane classifier. None of these change which
/// lanes a plane selects, only how fast the selection is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskCompilerOptions {
    /// Edge of the coarse sectors classified first, in cells.
    pub sector_edge: u32,
    /// Edge of the sub-sectors straddling sectors are refined into, in cells.
    pub subsector_edge: u32,
    /// Classify z-slabs of sectors on the rayon thread pool.
    pub parallel: bool,
}

impl Default for MaskCompilerOptions {
    fn default() -> Self {
        Self {
            sector_edge: 4,
            subsector_edge: 2,
            parallel: true,
        }
    }
}

impl MaskCompilerOptions {
    pub fn validate(&self) -> Result<(), LatticeError> {
        if self.sector_edge == 0 || self.subsector_edge == 0 {
            return Err(LatticeError::InvalidOptions("sector edges must be at least one cell"));
        }
        if self.subsector_edge > self.sector_edge {
            return Err(LatticeError::InvalidOptions(
                "sub-sectors must not be larger than sectors",
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// How much work the hierarchy saved while compiling masks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskStatistics {
    pub sectors_zero: u64,
    pub sectors_one: u64,
    pub subsectors_zero: u64,
    pub subsectors_one: u64,
    /// Cells whose lanes were tested one by one.
    pub cells_evaluated: u64,
}

impl AddAssign for MaskStatistics {
    fn add_assign(&mut self, other: Self) {
        self.sectors_zero += other.sectors_zero;
        self.sectors_one += other.sectors_one;
        self.subsectors_zero += other.subsectors_zero;
        self.subsectors_one += other.subsectors_one;
        self.cells_evaluated += other.cells_evaluated;
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatticeStatistics {
    pub cells: u64,
    pub planes_compiled: u64,
    pub replaces: u64,
    pub lanes_replaced: u64,
    pub atoms: u64,
    pub masks: MaskStatistics,
}

impl LatticeStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of the cells classified so far that needed per-lane evaluation.
    pub fn exact_fraction(&self) -> f64 {
        let classified = self.planes_compiled * self.cells;
        if classified > 0 {
            self.masks.cells_evaluated as f64 / classified as f64
        } else {
            0.0
        }
    }

    pub fn log_statistics(&self) {
        log::debug!("Lattice Statistics:");
        log::debug!("  cells: {}", self.cells);
        log::debug!("  planes compiled: {}", self.planes_compiled);
        log::debug!(
            "  sectors: {} zero, {} one; sub-sectors: {} zero, {} one",
            self.masks.sectors_zero,
            self.masks.sectors_one,
            self.masks.subsectors_zero,
            self.masks.subsectors_one
        );
        log::debug!(
            "  cells evaluated per lane: {} ({:.1}%)",
            self.masks.cells_evaluated,
            self.exact_fraction() * 100.0
        );
        log::debug!("  replaces: {} ({} lanes)", self.replaces, self.lanes_replaced);
        log::debug!("  atoms: {}", self.atoms);
    }
}

// End of File
