// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use glam::UVec3;
use rayon::prelude::*;

use super::sector::{Sector, SectorClass};
use super::{cell_count, cell_index, Mask};
use crate::cell::CellTemplate;
use crate::config::{MaskCompilerOptions, MaskStatistics};
use crate::error::LatticeError;
use crate::geometry::Plane;
use crate::timer::Timer;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Level {
    Sector,
    Subsector,
}

/// Turns planes into per-cell lane masks.
///
/// Testing all eight lanes of every cell is too slow for grids with millions
/// of cells, so the grid is first cut into sectors whose corners are tested
/// against the plane. Sectors entirely on one side are resolved in one go.
/// Straddling sectors are cut into sub-sectors and tested again, and only
/// sub-sectors that still straddle fall back to per-lane evaluation. The
/// result always equals [`compile_naive`](Self::compile_naive).
#[derive(Debug, Clone, Default)]
pub struct MaskCompiler {
    options: MaskCompilerOptions,
}

impl MaskCompiler {
    pub fn new(options: MaskCompilerOptions) -> Result<Self, LatticeError> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &MaskCompilerOptions {
        &self.options
    }

    pub fn compile(
        &self,
        template: &CellTemplate,
        dimensions: UVec3,
        plane: &Plane,
        statistics: &mut MaskStatistics,
    ) -> Mask {
        let cells = cell_count(dimensions);
        let mut mask = Mask::all_ones(cells);
        if cells == 0 || plane.is_degenerate() {
            return mask;
        }
        let _timer = Timer::new("Mask compilation");

        let edge = self.options.sector_edge;
        let slab_len = dimensions.x as usize * dimensions.y as usize * edge as usize;
        let classify_slab = |(slab_index, bits): (usize, &mut [u8])| {
            let z = slab_index as u32 * edge;
            let slab = Sector::new(
                UVec3::new(0, 0, z),
                UVec3::new(dimensions.x, dimensions.y, edge.min(dimensions.z - z)),
            );
            let mut writer = SlabWriter {
                bits,
                dimensions,
                z,
            };
            let mut statistics = MaskStatistics::default();
            for sector in slab.subdivide(edge) {
                self.refine(template, plane, sector, Level::Sector, &mut writer, &mut statistics);
            }
            statistics
        };

        let slab_statistics = if self.options.parallel {
            mask.bits
                .par_chunks_mut(slab_len)
                .enumerate()
                .map(classify_slab)
                .reduce(MaskStatistics::default, |mut a, b| {
                    a += b;
                    a
                })
        } else {
            mask.bits.chunks_mut(slab_len).enumerate().map(classify_slab).fold(
                MaskStatistics::default(),
                |mut a, b| {
                    a += b;
                    a
                },
            )
        };
        *statistics += slab_statistics;

        log::trace!(
            "compiled plane {:?} over {} cells, {} selected lanes",
            plane,
            cells,
            mask.count_ones()
        );
        mask
    }

    /// Reference evaluation: every lane of every cell tested on its own.
    pub fn compile_naive(template: &CellTemplate, dimensions: UVec3, plane: &Plane) -> Mask {
        let cells = cell_count(dimensions);
        if plane.is_degenerate() {
            return Mask::all_ones(cells);
        }
        let bits = Sector::new(UVec3::ZERO, dimensions)
            .cells()
            .map(|cell| lane_bits(template, plane, cell))
            .collect();
        Mask::from_bits(bits)
    }

    fn refine(
        &self,
        template: &CellTemplate,
        plane: &Plane,
        sector: Sector,
        level: Level,
        writer: &mut SlabWriter,
        statistics: &mut MaskStatistics,
    ) {
        match sector.classify(plane) {
            SectorClass::Zero => {
                writer.fill(&sector, 0);
                match level {
                    Level::Sector => statistics.sectors_zero += 1,
                    Level::Subsector => statistics.subsectors_zero += 1,
                }
            }
            // The mask starts out all-ones.
            SectorClass::One => match level {
                Level::Sector => statistics.sectors_one += 1,
                Level::Subsector => statistics.subsectors_one += 1,
            },
            SectorClass::Straddling => {
                let subsector_edge = self.options.subsector_edge;
                if level == Level::Sector && subsector_edge < self.options.sector_edge {
                    for subsector in sector.subdivide(subsector_edge) {
                        self.refine(template, plane, subsector, Level::Subsector, writer, statistics);
                    }
                } else {
                    writer.evaluate(template, plane, &sector);
                    statistics.cells_evaluated += sector.cell_count();
                }
            }
        }
    }
}

/// The mask bits of one cell, from its lanes' exact plane tests.
#[inline]
fn lane_bits(template: &CellTemplate, plane: &Plane, cell: UVec3) -> u8 {
    let corner = cell.as_vec3();
    template
        .offsets()
        .iter()
        .enumerate()
        .fold(0, |bits, (lane, &offset)| {
            if plane.contains(corner + offset) {
                bits | CellTemplate::flag(lane)
            } else {
                bits
            }
        })
}

/// Mutable view of the mask bytes of one z-slab of sectors.
struct SlabWriter<'a> {
    bits: &'a mut [u8],
    dimensions: UVec3,
    z: u32,
}

impl SlabWriter<'_> {
    #[inline]
    fn index(&self, cell: UVec3) -> usize {
        cell_index(self.dimensions, UVec3::new(cell.x, cell.y, cell.z - self.z))
    }

    fn fill(&mut self, sector: &Sector, value: u8) {
        for cell in sector.cells() {
            let index = self.index(cell);
            self.bits[index] = value;
        }
    }

    fn evaluate(&mut self, template: &CellTemplate, plane: &Plane, sector: &Sector) {
        for cell in sector.cells() {
            let index = self.index(cell);
            self.bits[index] = lane_bits(template, plane, cell);
        }
    }
}

// End of File
