// Shared tuning constants for the glow engine. The web frontend reads the
// same values when it builds its default configurations.

// Brightness curve
pub const FADE_BOUNDARY: f32 = 0.6; // phase split between fade-in and fade-out
pub const FADE_ACCELERATION: f32 = 1.4; // fade-out runs 40% faster than linear

// Cycle timing
pub const NEAR_END_THRESHOLD: f32 = 0.9; // phase at which the next set is chosen
pub const DEFAULT_CYCLE_MS: u64 = 5000;
pub const DEFAULT_TRANSITION_MS: u64 = 800;
pub const INACTIVE_DECAY_PER_SEC: f32 = 2.0; // linear decay for stray inactive glow

// Frame gate
pub const DEFAULT_MAX_FPS: f32 = 30.0;
pub const MAX_FPS_LIMIT: f32 = 60.0;

// Layout
pub const SCATTER_MARGIN: f32 = 0.025; // keeps scattered markers off the viewport edge
pub const DEFAULT_JITTER_PERCENT: f32 = 1.5;
pub const MAX_GRID_CELLS: usize = 4096; // guards against absurd rows*cols from attributes

// Marker sizing (pixels)
pub const DEFAULT_SIZE_RANGE: (f32, f32) = (18.0, 28.0);
pub const DEFAULT_MAX_PHASE_OFFSET: f32 = 0.15;

// Token price estimate
pub const FALLBACK_USD_RATE: f64 = 0.1;

// Phase values are kept strictly below one.
pub const MAX_PHASE: f32 = 1.0 - f32::EPSILON;
