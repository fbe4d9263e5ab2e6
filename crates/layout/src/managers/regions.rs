//! Block stacks laid out side by side: list-item label and body, and the
//! cells of a table row.
//!
//! Every region is offered the same limit and the combined extent is the
//! component-wise maximum of the regions' extents.

use super::stack::BlockStack;
use super::Manager;
use crate::LayoutError;
use crate::area::Area;
use crate::context::{LayoutContext, LayoutFlags};
use crate::env::{CommitSink, LayoutEnv};
use crate::position::ManagerId;
use folio_types::{Mpt, SizeRange};
use log::debug;

/// Placement of one region within its owner's content rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegionGeometry {
    pub offset: Mpt,
    /// Content width.
    pub ipd: Mpt,
    /// Padding and border before the content, on the region's first piece.
    pub frame_before: Mpt,
    /// Padding and border after the content, on the region's last piece.
    pub frame_after: Mpt,
}

/// One piece of the combined content.
#[derive(Debug, Clone)]
pub struct RegionsRecord {
    /// Chunk committed by each region for this piece, if any.
    pub chunks: Vec<Option<usize>>,
    pub geometry: Vec<RegionGeometry>,
    pub size: SizeRange,
    pub first: bool,
    pub last: bool,
    pub overflow: bool,
    pub forced: bool,
    pub force_break: bool,
}

#[derive(Debug)]
pub struct SideBySide {
    owner: ManagerId,
    regions: Vec<BlockStack>,
    records: Vec<RegionsRecord>,
    committed: usize,
}

impl SideBySide {
    pub fn new(owner: ManagerId, regions: Vec<Vec<Manager>>) -> Self {
        Self {
            owner,
            regions: regions.into_iter().map(|children| BlockStack::new(owner, children)).collect(),
            records: Vec::new(),
            committed: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.regions.iter().all(BlockStack::is_finished)
    }

    pub fn record(&self, index: usize) -> &RegionsRecord {
        &self.records[index]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any region wants its content to start a new page.
    pub fn breaks_before(&self) -> bool {
        self.records.is_empty()
            && self.regions.iter().any(|r| r.cursor.first().is_some_and(Manager::breaks_before))
    }

    /// Fills every unfinished region against the same limit.
    ///
    /// On the first piece all regions must start together: if one region
    /// has content but nothing of it fits, the others are rolled back and
    /// `None` is returned. Later pieces may leave a region empty.
    pub fn fill(
        &mut self,
        ctx: &LayoutContext,
        env: &LayoutEnv,
        geometry: &[RegionGeometry],
    ) -> Result<Option<usize>, LayoutError> {
        let first = self.records.is_empty();
        let mut flags = LayoutFlags::empty();
        flags.set(LayoutFlags::AT_AREA_START, ctx.at_area_start());

        let mut record = RegionsRecord {
            chunks: vec![None; self.regions.len()],
            geometry: geometry.to_vec(),
            size: SizeRange::ZERO,
            first,
            last: false,
            overflow: false,
            forced: false,
            force_break: false,
        };
        let mut starved = false;
        for (index, region) in self.regions.iter_mut().enumerate() {
            if region.is_finished() {
                continue;
            }
            let frame = geometry.get(index).copied().unwrap_or_default();
            let before = if first { frame.frame_before } else { 0 };
            let limit = ctx.stack_limit - SizeRange::fixed(before + frame.frame_after);
            let region_ctx = LayoutContext::new(limit, frame.ipd).with_flags(flags);
            match region.fill(&region_ctx, env)? {
                Some(chunk_index) => {
                    let chunk = region.chunk(chunk_index);
                    let after = if region.is_finished() { frame.frame_after } else { 0 };
                    record.size = record.size.max_of(&(chunk.size + SizeRange::fixed(before + after)));
                    record.overflow |= chunk.overflow;
                    record.forced |= chunk.forced;
                    record.force_break |= chunk.force_break;
                    record.chunks[index] = Some(chunk_index);
                }
                None if region.is_finished() => {
                    let frames = SizeRange::fixed(before + frame.frame_after);
                    record.size = record.size.max_of(&frames);
                }
                None => starved = true,
            }
        }

        let placed = record.chunks.iter().any(Option::is_some);
        if (first && starved) || (!placed && !self.is_finished()) {
            debug!("{}: regions could not start together, rolling back", self.owner);
            for (index, chunk) in record.chunks.iter().enumerate() {
                if chunk.is_some() {
                    let previous = self.latest_chunk(index, self.records.len());
                    self.regions[index].reset_to(previous);
                }
            }
            return Ok(None);
        }
        if first && !placed {
            // Every region was empty from the start: a piece made of frames only.
            record.size = geometry
                .iter()
                .fold(SizeRange::ZERO, |acc, g| acc.max_of(&SizeRange::fixed(g.frame_before + g.frame_after)));
        }
        record.last = self.is_finished();
        self.records.push(record);
        Ok(Some(self.records.len() - 1))
    }

    /// The last chunk region `region` produced in records before `upto`.
    fn latest_chunk(&self, region: usize, upto: usize) -> Option<usize> {
        self.records[..upto].iter().rev().find_map(|r| r.chunks[region])
    }

    /// Rewinds to right after record `to`, or to the start.
    pub fn reset_to(&mut self, to: Option<usize>) {
        let keep = to.map_or(0, |i| i + 1);
        if keep < self.committed || keep > self.records.len() {
            debug!("{}: ignoring reset of regions to {:?}", self.owner, to);
            return;
        }
        for region in 0..self.regions.len() {
            let previous = self.latest_chunk(region, keep);
            self.regions[region].reset_to(previous);
        }
        self.records.truncate(keep);
    }

    /// Commits record `index`, returning each region's areas.
    pub fn commit(
        &mut self,
        index: usize,
        env: &LayoutEnv,
        sink: &mut CommitSink,
    ) -> Result<Vec<Vec<Area>>, LayoutError> {
        let record = self.records[index].clone();
        let mut areas = Vec::with_capacity(self.regions.len());
        for (region, chunk) in record.chunks.iter().enumerate() {
            let ipd = record.geometry.get(region).map_or(0, |g| g.ipd);
            let ctx = LayoutContext::new(SizeRange::unbounded(), ipd);
            match chunk {
                Some(chunk) => areas.push(self.regions[region].commit(*chunk, &ctx, env, sink)?),
                None => areas.push(Vec::new()),
            }
        }
        self.committed = self.committed.max(index + 1);
        Ok(areas)
    }
}
