//! Overlay records: deduplicated owner sets for cells claimed by more than
//! one primitive.
//!
//! Records live in an arena and are addressed by [`OverlayHandle`]. A record
//! is never mutated once cells point at it; joining a new owner produces (or
//! finds) a different record keyed by the canonical member list, so every
//! cell with an identical owner set shares one record.

use crate::grid::Role;
use crate::registry::PrimitiveId;
use std::collections::HashMap;

/// Index of a record inside an [`OverlayCollection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(u32);

impl OverlayHandle {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// One (owner, role) pair sharing a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayMember {
    pub owner: PrimitiveId,
    pub role: Role,
}

impl OverlayMember {
    pub fn new(owner: PrimitiveId, role: Role) -> Self {
        Self { owner, role }
    }
}

#[derive(Debug, Clone)]
pub struct OverlayRecord {
    members: Vec<OverlayMember>,
    edge_count: u32,
    background_count: u32,
    cell_refs: u32,
}

impl OverlayRecord {
    fn from_canonical(members: Vec<OverlayMember>) -> Self {
        let edge_count = members.iter().filter(|m| m.role.is_edge()).count() as u32;
        // every usage (edge or not) covers the cell as background
        let background_count = members.len() as u32;
        Self {
            members,
            edge_count,
            background_count,
            cell_refs: 0,
        }
    }

    /// Members sorted by owner, one entry per owner.
    pub fn members(&self) -> &[OverlayMember] {
        &self.members
    }

    pub fn member(&self, owner: PrimitiveId) -> Option<OverlayMember> {
        self.members
            .binary_search_by_key(&owner, |m| m.owner)
            .ok()
            .map(|i| self.members[i])
    }

    /// Owners using the cell as an edge.
    pub fn edge_count(&self) -> u32 {
        self.edge_count
    }

    /// Owners covering the cell, edge usages included.
    pub fn background_count(&self) -> u32 {
        self.background_count
    }

    /// Number of grid cells currently pointing at this record.
    pub fn cell_refs(&self) -> u32 {
        self.cell_refs
    }

    /// Purely stacked backgrounds, or more coverage than boundaries: the
    /// cell lies inside some other object.
    pub fn is_dominated(&self) -> bool {
        self.edge_count == 0 || self.background_count > self.edge_count
    }

    /// The member list this record would have after `incoming` joins it.
    pub fn with_member(&self, incoming: OverlayMember) -> Vec<OverlayMember> {
        let mut members = self.members.clone();
        match members.binary_search_by_key(&incoming.owner, |m| m.owner) {
            Ok(i) => members[i].role = members[i].role.merge(incoming.role),
            Err(i) => members.insert(i, incoming),
        }
        members
    }
}

/// Arena of overlay records with a lookup table keyed by member set.
#[derive(Debug, Default)]
pub struct OverlayCollection {
    records: Vec<OverlayRecord>,
    by_key: HashMap<Vec<OverlayMember>, OverlayHandle>,
}

impl OverlayCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, handle: OverlayHandle) -> Option<&OverlayRecord> {
        self.records.get(handle.index())
    }

    /// Total records ever created in this run.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (OverlayHandle, &OverlayRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(i, r)| (OverlayHandle::new(i as u32), r))
    }

    /// Records still referenced by at least one cell.
    pub fn live_count(&self) -> usize {
        self.records.iter().filter(|r| r.cell_refs > 0).count()
    }

    /// Returns the record for this member set, creating it on first use.
    ///
    /// Members are canonicalised (sorted by owner, one entry per owner with
    /// roles merged) before the lookup.
    pub fn find_or_create(&mut self, members: Vec<OverlayMember>) -> OverlayHandle {
        let key = canonicalise(members);
        if let Some(&handle) = self.by_key.get(&key) {
            return handle;
        }
        let handle = OverlayHandle::new(self.records.len() as u32);
        self.records.push(OverlayRecord::from_canonical(key.clone()));
        self.by_key.insert(key, handle);
        handle
    }

    pub(crate) fn attach(&mut self, handle: OverlayHandle) {
        if let Some(record) = self.records.get_mut(handle.index()) {
            record.cell_refs += 1;
        }
    }

    pub(crate) fn detach(&mut self, handle: OverlayHandle) {
        if let Some(record) = self.records.get_mut(handle.index()) {
            record.cell_refs = record.cell_refs.saturating_sub(1);
        }
    }
}

fn canonicalise(mut members: Vec<OverlayMember>) -> Vec<OverlayMember> {
    members.sort();
    members.dedup_by(|later, earlier| {
        if later.owner == earlier.owner {
            earlier.role = earlier.role.merge(later.role);
            true
        } else {
            false
        }
    });
    members
}
