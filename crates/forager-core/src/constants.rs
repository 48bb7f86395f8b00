/// Amount moved from a grid cell into an agent's store per successful `eat`.
pub const EAT_QUANTUM: f64 = 10.0;

/// A cell must hold strictly more than this before an agent may eat from it.
pub const EAT_THRESHOLD: f64 = 10.0;

/// Largest supported grid dimension (cells per axis).
pub const MAX_GRID_DIM: usize = 16_384;

/// Prime multiplier used to derive independent RNG streams from a base seed.
pub const RNG_DERIVATION_PRIME: u64 = 7919;
