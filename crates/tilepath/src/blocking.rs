//! Per-tick blocking maps.
//!
//! A [`BlockingMap`] is built at most once per tick for each group of
//! equivalent movement signatures. The maps built during the previous tick
//! are kept for one more tick, then dropped.

use std::rc::Rc;

use tilepath_core::{MoveSignature, Point, Range};

use crate::traits::BlockingSource;

/// Immutable one-bit-per-tile occupancy grid for one movement signature.
#[derive(Debug)]
pub struct BlockingMap {
    game_time: u32,
    signature: MoveSignature,
    rng: Range,
    bits: Vec<u64>,
}

impl BlockingMap {
    /// Evaluate `source` over every tile of `rng`.
    pub fn build<B: BlockingSource + ?Sized>(
        source: &B,
        rng: Range,
        signature: MoveSignature,
        game_time: u32,
    ) -> Self {
        let mut bits = vec![0u64; rng.len().div_ceil(64)];
        for (i, p) in rng.iter().enumerate() {
            if source.is_blocking(p, signature) {
                bits[i / 64] |= 1u64 << (i % 64);
            }
        }
        Self {
            game_time,
            signature,
            rng,
            bits,
        }
    }

    /// Whether `p` is impassable. Tiles off the map are always blocked.
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        match self.rng.index(p) {
            Some(i) => self.bits[i / 64] & (1u64 << (i % 64)) != 0,
            None => true,
        }
    }

    /// Tick the map was built for.
    pub fn game_time(&self) -> u32 {
        self.game_time
    }

    /// Signature the map was built for.
    pub fn signature(&self) -> MoveSignature {
        self.signature
    }

    /// Map bounds.
    pub fn range(&self) -> Range {
        self.rng
    }

    /// Number of blocked tiles.
    pub fn blocked_count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Current and previous tick's blocking maps.
#[derive(Debug, Default)]
pub(crate) struct BlockingMapCache {
    game_time: u32,
    current: Vec<Rc<BlockingMap>>,
    previous: Vec<Rc<BlockingMap>>,
}

impl BlockingMapCache {
    pub(crate) fn game_time(&self) -> u32 {
        self.game_time
    }

    /// Switch to tick `game_time`. Returns `true` if the tick changed.
    pub(crate) fn begin_tick(&mut self, game_time: u32) -> bool {
        if game_time == self.game_time {
            return false;
        }
        self.game_time = game_time;
        std::mem::swap(&mut self.previous, &mut self.current);
        self.current.clear();
        true
    }

    /// Find this tick's map for `signature`, building it if needed.
    ///
    /// The flag is `true` when a new map was built.
    pub(crate) fn get<B: BlockingSource + ?Sized>(
        &mut self,
        source: &B,
        rng: Range,
        signature: MoveSignature,
    ) -> (Rc<BlockingMap>, bool) {
        if let Some(map) = self
            .current
            .iter()
            .find(|m| source.equivalent_blocking(m.signature, signature))
        {
            return (Rc::clone(map), false);
        }

        let map = Rc::new(BlockingMap::build(source, rng, signature, self.game_time));
        log::debug!(
            "built blocking map for {} at tick {} ({} of {} tiles blocked)",
            signature,
            self.game_time,
            map.blocked_count(),
            rng.len()
        );
        self.current.push(Rc::clone(&map));
        (map, true)
    }

    /// Drop everything, including the tick counter.
    pub(crate) fn clear(&mut self) {
        self.game_time = 0;
        self.current.clear();
        self.previous.clear();
    }

    pub(crate) fn current_len(&self) -> usize {
        self.current.len()
    }

    pub(crate) fn previous_len(&self) -> usize {
        self.previous.len()
    }
}
