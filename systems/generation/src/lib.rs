#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic cell-value generation for the unbounded grid.
//!
//! Generation is a pure function of the world seed and the cell coordinate:
//! no call-order dependence, no hidden state. Re-deriving a never-mutated
//! cell therefore yields the same result after arbitrary eviction and reload
//! cycles, which is what allows the world to drop off-screen cells instead of
//! keeping them alive.

use sha2::{Digest, Sha256};
use tokenfield_core::{
    CellState, GridCoord, TokenValue, DEAD_RAW_VALUE, RAW_VALUE_MODULUS, TOKEN_BAND_MAX,
    TOKEN_BAND_MIN,
};

/// Seed used when no explicit world seed is configured.
pub const DEFAULT_WORLD_SEED: u64 = 0x7f4a_91d3_0c25_b8e6;

/// Produces the raw generator value for a cell, in `0..RAW_VALUE_MODULUS`.
#[must_use]
pub fn raw_value(world_seed: u64, cell: GridCoord) -> u8 {
    let mut mixer = SplitMix64::new(derive_cell_seed(world_seed, cell));
    (mixer.next_u64() % u64::from(RAW_VALUE_MODULUS)) as u8
}

/// Resolves the initial state of a cell that was never mutated.
///
/// Raw values inside the token band become a token with that value, except
/// for the dead raw value which is remapped to an empty cell; everything
/// outside the band is empty. The dead value is a sparsity tuning constant.
#[must_use]
pub fn generate(world_seed: u64, cell: GridCoord) -> CellState {
    let raw = raw_value(world_seed, cell);
    if raw == DEAD_RAW_VALUE || !in_token_band(raw) {
        return CellState::empty();
    }

    match TokenValue::from_u32(u32::from(raw)) {
        Some(value) => CellState::with_token(value),
        None => CellState::empty(),
    }
}

const fn in_token_band(raw: u8) -> bool {
    raw >= TOKEN_BAND_MIN && raw <= TOKEN_BAND_MAX
}

fn derive_cell_seed(world_seed: u64, cell: GridCoord) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(world_seed.to_le_bytes());
    hasher.update(cell.i().to_le_bytes());
    hasher.update(cell.j().to_le_bytes());
    finalize_seed(hasher)
}

fn finalize_seed(hasher: Sha256) -> u64 {
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}
