//! Decorative tile-effect registry.
//!
//! Effects are presentation markers keyed by tile coordinate. The game loop
//! appends them, ages them once per tick, and drains the active set for
//! serialization; the pathing algorithm never reads them.

use std::collections::BTreeMap;

use grid_defence_core::{EffectKind, TileCoord};

const FIRE_LIFETIME_TICKS: u32 = 30;
const STUN_LIFETIME_TICKS: u32 = 10;

/// Single effect marker attached to a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct EffectMarker {
    kind: EffectKind,
    remaining_ticks: u32,
}

impl EffectMarker {
    fn new(kind: EffectKind) -> Self {
        let remaining_ticks = match kind {
            EffectKind::Fire => FIRE_LIFETIME_TICKS,
            EffectKind::Stun => STUN_LIFETIME_TICKS,
        };
        Self {
            kind,
            remaining_ticks,
        }
    }
}

/// Registry of active effect markers ordered by tile coordinate.
#[derive(Clone, Debug, Default)]
pub(crate) struct EffectBoard {
    entries: BTreeMap<TileCoord, Vec<EffectMarker>>,
}

impl EffectBoard {
    /// Appends a marker of the provided kind to the tile.
    pub(crate) fn add(&mut self, tile: TileCoord, kind: EffectKind) {
        self.entries
            .entry(tile)
            .or_default()
            .push(EffectMarker::new(kind));
    }

    /// Head marker of every affected tile, in coordinate order.
    ///
    /// Only the oldest marker per tile is reported, matching what adapters
    /// render for a tile carrying several overlapping effects.
    #[must_use]
    pub(crate) fn active(&self) -> Vec<(TileCoord, EffectKind)> {
        self.entries
            .iter()
            .filter_map(|(tile, markers)| markers.first().map(|marker| (*tile, marker.kind)))
            .collect()
    }

    /// Ages every marker by one tick and drops the expired ones.
    pub(crate) fn tick(&mut self) {
        for markers in self.entries.values_mut() {
            for marker in markers.iter_mut() {
                marker.remaining_ticks = marker.remaining_ticks.saturating_sub(1);
            }
            markers.retain(|marker| marker.remaining_ticks > 0);
        }
        self.entries.retain(|_, markers| !markers.is_empty());
    }
}
