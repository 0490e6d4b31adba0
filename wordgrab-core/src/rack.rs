//! Player racks

use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;
use crate::tiles::RackTile;

/// Maximum tiles a rack may hold
pub const MAX_TILES_IN_RACK: usize = 20;

/// Ordered multiset of rack tiles, never more than [`MAX_TILES_IN_RACK`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Rack {
    tiles: Vec<RackTile>,
}

impl Rack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_tiles(tiles: Vec<RackTile>) -> Result<Self, BoardError> {
        if tiles.len() > MAX_TILES_IN_RACK {
            return Err(BoardError::RackOverflow(tiles.len()));
        }
        Ok(Self { tiles })
    }

    pub fn tiles(&self) -> &[RackTile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Room left before the rack is full
    pub fn capacity_left(&self) -> usize {
        MAX_TILES_IN_RACK - self.tiles.len()
    }

    /// Whether any tile could be laid on the board
    pub fn has_placeable(&self) -> bool {
        self.tiles.iter().any(|t| t.is_placeable())
    }

    /// Letters of the non-wild letter tiles, in rack order
    pub fn letters(&self) -> Vec<char> {
        self.tiles.iter().filter_map(|t| t.letter()).collect()
    }

    /// Match each wanted tile to a distinct rack slot.
    ///
    /// A wanted letter takes an identical letter when one is free and falls
    /// back to a wildcard otherwise; wanted wildcards and bonus tiles only
    /// match their own kind. Returns the slot indices in `wanted` order.
    pub fn resolve(&self, wanted: &[RackTile]) -> Option<Vec<usize>> {
        let mut used = vec![false; self.tiles.len()];
        let mut slots = Vec::with_capacity(wanted.len());

        // Exact matches first so a wildcard is never spent on a letter we hold.
        let mut pending = Vec::new();
        for (i, want) in wanted.iter().enumerate() {
            match self.free_slot(&used, |t| t == *want) {
                Some(slot) => {
                    used[slot] = true;
                    slots.push(Some(slot));
                }
                None => {
                    slots.push(None);
                    pending.push(i);
                }
            }
        }

        for i in pending {
            if wanted[i].letter().is_none() {
                return None;
            }
            let slot = self.free_slot(&used, RackTile::is_wild)?;
            used[slot] = true;
            slots[i] = Some(slot);
        }

        slots.into_iter().collect()
    }

    fn free_slot(&self, used: &[bool], pred: impl Fn(RackTile) -> bool) -> Option<usize> {
        self.tiles
            .iter()
            .enumerate()
            .find(|&(i, &t)| !used[i] && pred(t))
            .map(|(i, _)| i)
    }

    pub fn contains_all(&self, wanted: &[RackTile]) -> bool {
        self.resolve(wanted).is_some()
    }

    /// Remove the tiles matched by [`Rack::resolve`], returning what was
    /// actually taken (a wildcard stands in for any letter it covered)
    pub fn take(&mut self, wanted: &[RackTile]) -> Option<Vec<RackTile>> {
        let slots = self.resolve(wanted)?;
        let taken: Vec<RackTile> = slots.iter().map(|&i| self.tiles[i]).collect();

        let mut remove = slots;
        remove.sort_unstable_by(|a, b| b.cmp(a));
        for i in remove {
            self.tiles.remove(i);
        }
        Some(taken)
    }

    pub fn add_all(&mut self, tiles: &[RackTile]) -> Result<(), BoardError> {
        let new_len = self.tiles.len() + tiles.len();
        if new_len > MAX_TILES_IN_RACK {
            return Err(BoardError::RackOverflow(new_len));
        }
        self.tiles.extend_from_slice(tiles);
        Ok(())
    }

    pub fn to_compact_string(&self) -> String {
        self.tiles.iter().map(|t| t.to_char()).collect()
    }
}

impl FromStr for Rack {
    type Err = BoardError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let tiles = text
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| RackTile::from_char(c).ok_or(BoardError::IllegalRackTile(c)))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_tiles(tiles)
    }
}

impl fmt::Display for Rack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_compact_string())
    }
}
