//! Engine configuration, named presets and textual option parsing.
//!
//! Configuration never fails the animation: `sanitized` clamps whatever it
//! is given into a valid range, and attribute parse errors are reported to
//! the caller, which logs them and keeps the previous value.

use crate::constants::*;
use glam::Vec2;
use rand::Rng;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown layout mode `{0}`")]
    UnknownMode(String),
    #[error("unknown preset `{0}`")]
    UnknownPreset(String),
    #[error("unknown option `{0}`")]
    UnknownOption(String),
    #[error("malformed density `{0}` (expected `RxC` or a count)")]
    Density(String),
    #[error("malformed active range `{0}` (expected `min-max`)")]
    ActiveRange(String),
    #[error("malformed avoid rectangle `{0}` (expected `x0,y0,x1,y1`)")]
    AvoidRect(String),
    #[error("malformed number `{value}` for `{key}`")]
    Number { key: String, value: String },
}

/// Axis-aligned region, in normalized coordinates, that markers must stay
/// out of. Bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvoidRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl AvoidRect {
    /// Build from any two corners.
    pub fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Build from percentages of the viewport.
    pub fn from_percent(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Vec2::new(x0, y0) / 100.0, Vec2::new(x1, y1) / 100.0)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Layout {
    /// `rows * cols` evenly spaced positions, perturbed by up to `jitter`
    /// percent on each axis.
    Grid { rows: usize, cols: usize, jitter: f32 },
    /// Independent uniform positions inside the margin-inset unit square.
    Scatter { count: usize },
    /// A grid with every position inside an avoid rectangle dropped.
    GridWithAvoidance {
        rows: usize,
        cols: usize,
        jitter: f32,
        avoid: Vec<AvoidRect>,
    },
}

impl Layout {
    pub fn is_grid(&self) -> bool {
        !matches!(self, Layout::Scatter { .. })
    }

    /// Upper bound on the number of markers this layout produces.
    pub fn capacity(&self) -> usize {
        match self {
            Layout::Grid { rows, cols, .. } | Layout::GridWithAvoidance { rows, cols, .. } => {
                rows.saturating_mul(*cols)
            }
            Layout::Scatter { count } => *count,
        }
    }

    /// Rectangles markers keep clear of; empty for plain grids and scatter.
    pub fn avoid_rects(&self) -> &[AvoidRect] {
        match self {
            Layout::GridWithAvoidance { avoid, .. } => avoid.as_slice(),
            _ => &[],
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            Layout::Grid { .. } => "grid",
            Layout::Scatter { .. } => "scatter",
            Layout::GridWithAvoidance { .. } => "grid-with-avoidance",
        }
    }
}

/// Inclusive band for the number of simultaneously active markers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActiveRange {
    pub min: usize,
    pub max: usize,
}

impl ActiveRange {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Shrink the band so it fits a pool of `pool` markers.
    pub fn clamp_to_pool(self, pool: usize) -> Self {
        let max = self.max.min(pool);
        Self {
            min: self.min.min(max),
            max,
        }
    }

    /// Draw a set size for a pool of `pool` markers.
    pub fn pick<R: Rng + ?Sized>(&self, pool: usize, rng: &mut R) -> usize {
        let band = self.clamp_to_pool(pool);
        if band.min == band.max {
            band.max
        } else {
            rng.gen_range(band.min..=band.max)
        }
    }

    #[inline]
    pub fn contains(&self, n: usize) -> bool {
        n >= self.min && n <= self.max
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GlowConfig {
    pub layout: Layout,
    pub active_count: ActiveRange,
    pub cycle_duration: Duration,
    pub transition_duration: Duration,
    pub fade_boundary: f32,
    pub fade_acceleration: f32,
    pub near_end_threshold: f32,
    /// Per-marker size is drawn from this range (CSS pixels).
    pub size_range: (f32, f32),
    /// Phase offsets are drawn from `[0, max_phase_offset)`; 0 disables.
    pub max_phase_offset: f32,
    pub inactive_decay_per_sec: f32,
    pub max_fps: f32,
    pub seed: u64,
    /// When set, grid layouts derive rows/cols from the viewport size.
    pub cell_px: Option<f32>,
}

impl Default for GlowConfig {
    fn default() -> Self {
        Preset::Grid.config()
    }
}

/// Named visual variants used across the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preset {
    /// Grid of palms behind hero sections.
    Grid,
    /// Dense starfield scatter.
    Scatter,
    /// Grid that keeps clear of the central content column.
    Framed,
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grid" | "palms" => Ok(Preset::Grid),
            "scatter" | "stars" => Ok(Preset::Scatter),
            "framed" | "avoid" => Ok(Preset::Framed),
            other => Err(ConfigError::UnknownPreset(other.to_string())),
        }
    }
}

impl Preset {
    pub fn config(self) -> GlowConfig {
        let base = GlowConfig {
            layout: Layout::Grid {
                rows: 6,
                cols: 8,
                jitter: DEFAULT_JITTER_PERCENT,
            },
            active_count: ActiveRange::new(3, 5),
            cycle_duration: Duration::from_millis(DEFAULT_CYCLE_MS),
            transition_duration: Duration::from_millis(DEFAULT_TRANSITION_MS),
            fade_boundary: FADE_BOUNDARY,
            fade_acceleration: FADE_ACCELERATION,
            near_end_threshold: NEAR_END_THRESHOLD,
            size_range: DEFAULT_SIZE_RANGE,
            max_phase_offset: DEFAULT_MAX_PHASE_OFFSET,
            inactive_decay_per_sec: INACTIVE_DECAY_PER_SEC,
            max_fps: DEFAULT_MAX_FPS,
            seed: 42,
            cell_px: None,
        };
        match self {
            Preset::Grid => base,
            Preset::Scatter => GlowConfig {
                layout: Layout::Scatter { count: 120 },
                active_count: ActiveRange::new(16, 19),
                cycle_duration: Duration::from_millis(4000),
                size_range: (3.0, 7.0),
                max_phase_offset: 0.3,
                ..base
            },
            Preset::Framed => GlowConfig {
                layout: Layout::GridWithAvoidance {
                    rows: 8,
                    cols: 12,
                    jitter: DEFAULT_JITTER_PERCENT,
                    avoid: vec![AvoidRect::from_percent(20.0, 25.0, 80.0, 75.0)],
                },
                active_count: ActiveRange::new(3, 6),
                cell_px: Some(120.0),
                ..base
            },
        }
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse::<T>().map_err(|_| ConfigError::Number {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_f32(key: &str, value: &str) -> Result<f32, ConfigError> {
    let v: f32 = parse_number(key, value)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ConfigError::Number {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

/// `RxC` for grids, a bare count for scatter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Density {
    Grid { rows: usize, cols: usize },
    Count(usize),
}

impl FromStr for Density {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::Density(s.to_string());
        let t = s.trim().to_ascii_lowercase();
        if let Some((r, c)) = t.split_once('x') {
            let rows = r.trim().parse::<usize>().map_err(|_| err())?;
            let cols = c.trim().parse::<usize>().map_err(|_| err())?;
            Ok(Density::Grid { rows, cols })
        } else {
            t.parse::<usize>().map(Density::Count).map_err(|_| err())
        }
    }
}

impl FromStr for ActiveRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ConfigError::ActiveRange(s.to_string());
        match s.split_once('-') {
            Some((a, b)) => {
                let a = a.trim().parse::<usize>().map_err(|_| err())?;
                let b = b.trim().parse::<usize>().map_err(|_| err())?;
                Ok(ActiveRange::new(a, b))
            }
            None => {
                let n = s.trim().parse::<usize>().map_err(|_| err())?;
                Ok(ActiveRange::new(n, n))
            }
        }
    }
}

/// Parse `x0,y0,x1,y1;...` with coordinates in viewport percent.
pub fn parse_avoid_rects(s: &str) -> Result<Vec<AvoidRect>, ConfigError> {
    s.split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            let nums = part
                .split(',')
                .map(|n| n.trim().parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| ConfigError::AvoidRect(part.to_string()))?;
            match nums.as_slice() {
                [x0, y0, x1, y1] if nums.iter().all(|n| n.is_finite()) => {
                    Ok(AvoidRect::from_percent(*x0, *y0, *x1, *y1))
                }
                _ => Err(ConfigError::AvoidRect(part.to_string())),
            }
        })
        .collect()
}

impl GlowConfig {
    /// Apply one textual option. On error the config is left unchanged.
    pub fn apply_attribute(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "preset" => {
                let seed = self.seed;
                *self = GlowConfig {
                    seed,
                    ..value.parse::<Preset>()?.config()
                };
            }
            "mode" => self.set_mode(value)?,
            "density" => self.set_density(value.parse()?),
            "active" => self.active_count = value.parse()?,
            "cycle-ms" => {
                self.cycle_duration = Duration::from_millis(parse_number(key, value)?);
            }
            "transition-ms" => {
                self.transition_duration = Duration::from_millis(parse_number(key, value)?);
            }
            "fade-boundary" => self.fade_boundary = parse_f32(key, value)?,
            "fade-acceleration" => self.fade_acceleration = parse_f32(key, value)?,
            "avoid" => {
                let rects = parse_avoid_rects(value)?;
                self.layout = match std::mem::replace(&mut self.layout, Layout::Scatter { count: 0 }) {
                    Layout::Grid { rows, cols, jitter }
                    | Layout::GridWithAvoidance {
                        rows, cols, jitter, ..
                    } => Layout::GridWithAvoidance {
                        rows,
                        cols,
                        jitter,
                        avoid: rects,
                    },
                    // Scatter has no grid to thin out; avoidance is ignored.
                    scatter => scatter,
                };
            }
            "jitter" => {
                let j = parse_f32(key, value)?;
                match &mut self.layout {
                    Layout::Grid { jitter, .. } | Layout::GridWithAvoidance { jitter, .. } => {
                        *jitter = j
                    }
                    Layout::Scatter { .. } => {}
                }
            }
            "seed" => self.seed = parse_number(key, value)?,
            "fps" => self.max_fps = parse_f32(key, value)?,
            "cell-px" => {
                let px = parse_f32(key, value)?;
                self.cell_px = (px > 0.0).then_some(px);
            }
            "phase-offset" => self.max_phase_offset = parse_f32(key, value)?,
            other => return Err(ConfigError::UnknownOption(other.to_string())),
        }
        Ok(())
    }

    fn set_mode(&mut self, mode: &str) -> Result<(), ConfigError> {
        let (rows, cols, jitter, avoid) = match &self.layout {
            Layout::Grid { rows, cols, jitter } => (*rows, *cols, *jitter, Vec::new()),
            Layout::GridWithAvoidance {
                rows,
                cols,
                jitter,
                avoid,
            } => (*rows, *cols, *jitter, avoid.clone()),
            Layout::Scatter { count } => {
                let side = (*count as f32).sqrt().ceil().max(1.0) as usize;
                (side, side, DEFAULT_JITTER_PERCENT, Vec::new())
            }
        };
        self.layout = match mode.trim().to_ascii_lowercase().as_str() {
            "grid" => Layout::Grid { rows, cols, jitter },
            "scatter" => Layout::Scatter {
                count: self.layout.capacity(),
            },
            "grid-with-avoidance" | "gridwithavoidance" | "avoid" => Layout::GridWithAvoidance {
                rows,
                cols,
                jitter,
                avoid,
            },
            other => return Err(ConfigError::UnknownMode(other.to_string())),
        };
        Ok(())
    }

    fn set_density(&mut self, density: Density) {
        match (&mut self.layout, density) {
            (Layout::Scatter { count }, Density::Count(n)) => *count = n,
            (Layout::Scatter { count }, Density::Grid { rows, cols }) => {
                *count = rows.saturating_mul(cols)
            }
            (
                Layout::Grid { rows, cols, .. } | Layout::GridWithAvoidance { rows, cols, .. },
                Density::Grid { rows: r, cols: c },
            ) => {
                *rows = r;
                *cols = c;
                // explicit density wins over viewport-derived density
                self.cell_px = None;
            }
            (
                Layout::Grid { rows, cols, .. } | Layout::GridWithAvoidance { rows, cols, .. },
                Density::Count(n),
            ) => {
                let side = (n as f32).sqrt().ceil().max(1.0) as usize;
                *cols = side;
                *rows = n.div_ceil(side).max(1);
                self.cell_px = None;
            }
        }
    }

    /// Add avoid rectangles, turning a plain grid into a grid with
    /// avoidance. Scatter layouts are left alone.
    pub fn add_avoid_rects(&mut self, rects: impl IntoIterator<Item = AvoidRect>) {
        match &mut self.layout {
            Layout::GridWithAvoidance { avoid, .. } => avoid.extend(rects),
            Layout::Grid { rows, cols, jitter } => {
                let (rows, cols, jitter) = (*rows, *cols, *jitter);
                self.layout = Layout::GridWithAvoidance {
                    rows,
                    cols,
                    jitter,
                    avoid: rects.into_iter().collect(),
                };
            }
            Layout::Scatter { .. } => {
                log::debug!("[glow] avoid rectangles ignored for scatter layout");
            }
        }
    }

    /// Replace the avoid rectangles of a grid layout. A plain grid switches
    /// to avoidance only when there is something to avoid.
    pub fn set_avoid_rects(&mut self, rects: Vec<AvoidRect>) {
        if let Layout::GridWithAvoidance { avoid, .. } = &mut self.layout {
            *avoid = rects;
        } else if !rects.is_empty() {
            self.add_avoid_rects(rects);
        }
    }

    /// Recompute grid density from a viewport size when `cell_px` is set.
    pub fn fit_to_viewport(&mut self, width_px: f32, height_px: f32) {
        let Some(cell) = self.cell_px.filter(|c| *c > 0.0) else {
            return;
        };
        let fit = |len: f32| ((len / cell).ceil().max(1.0)) as usize;
        match &mut self.layout {
            Layout::Grid { rows, cols, .. } | Layout::GridWithAvoidance { rows, cols, .. } => {
                if width_px.is_finite() && height_px.is_finite() {
                    *cols = fit(width_px);
                    *rows = fit(height_px);
                }
            }
            Layout::Scatter { .. } => {}
        }
    }

    /// Clamp every value into its valid range, logging each adjustment.
    pub fn sanitized(mut self) -> Self {
        let f = &mut self;
        let clamp_grid = |rows: &mut usize, cols: &mut usize| {
            let requested = (*rows, *cols);
            *rows = (*rows).max(1);
            *cols = (*cols).max(1);
            while rows.saturating_mul(*cols) > MAX_GRID_CELLS {
                if *rows >= *cols {
                    *rows = (*rows / 2).max(1);
                } else {
                    *cols = (*cols / 2).max(1);
                }
            }
            if (*rows, *cols) != requested {
                log::warn!(
                    "[glow] grid {}x{} clamped to {}x{}",
                    requested.0,
                    requested.1,
                    rows,
                    cols
                );
            }
        };
        match &mut f.layout {
            Layout::Grid { rows, cols, jitter } => {
                clamp_grid(rows, cols);
                *jitter = sanitize_jitter(*jitter);
            }
            Layout::GridWithAvoidance {
                rows, cols, jitter, ..
            } => {
                clamp_grid(rows, cols);
                *jitter = sanitize_jitter(*jitter);
            }
            Layout::Scatter { count } => {
                if *count > MAX_GRID_CELLS {
                    log::warn!("[glow] scatter count {} clamped to {}", count, MAX_GRID_CELLS);
                    *count = MAX_GRID_CELLS;
                }
            }
        }
        f.active_count = ActiveRange::new(f.active_count.min, f.active_count.max);
        if f.cycle_duration.is_zero() {
            log::warn!("[glow] zero cycle duration; using {}ms", DEFAULT_CYCLE_MS);
            f.cycle_duration = Duration::from_millis(DEFAULT_CYCLE_MS);
        }
        if !(f.fade_boundary.is_finite() && f.fade_boundary > 0.0 && f.fade_boundary < 1.0) {
            log::warn!("[glow] fade boundary {} out of range; using {}", f.fade_boundary, FADE_BOUNDARY);
            f.fade_boundary = FADE_BOUNDARY;
        }
        if !(f.fade_acceleration.is_finite() && f.fade_acceleration > 0.0) {
            log::warn!(
                "[glow] fade acceleration {} out of range; using {}",
                f.fade_acceleration,
                FADE_ACCELERATION
            );
            f.fade_acceleration = FADE_ACCELERATION;
        }
        if !(f.near_end_threshold.is_finite()
            && f.near_end_threshold > 0.0
            && f.near_end_threshold < 1.0)
        {
            log::warn!(
                "[glow] near-end threshold {} out of range; using {}",
                f.near_end_threshold,
                NEAR_END_THRESHOLD
            );
            f.near_end_threshold = NEAR_END_THRESHOLD;
        }
        let (lo, hi) = f.size_range;
        f.size_range = if lo.is_finite() && hi.is_finite() {
            (lo.min(hi).max(0.0), lo.max(hi).max(0.0))
        } else {
            DEFAULT_SIZE_RANGE
        };
        f.max_phase_offset = if f.max_phase_offset.is_finite() {
            f.max_phase_offset.clamp(0.0, MAX_PHASE)
        } else {
            0.0
        };
        if !(f.inactive_decay_per_sec.is_finite() && f.inactive_decay_per_sec > 0.0) {
            log::warn!(
                "[glow] inactive decay {} out of range; using {}",
                f.inactive_decay_per_sec,
                INACTIVE_DECAY_PER_SEC
            );
            f.inactive_decay_per_sec = INACTIVE_DECAY_PER_SEC;
        }
        f.max_fps = if f.max_fps.is_finite() && f.max_fps > 0.0 {
            f.max_fps.min(MAX_FPS_LIMIT)
        } else {
            log::warn!("[glow] fps {} out of range; using {}", f.max_fps, DEFAULT_MAX_FPS);
            DEFAULT_MAX_FPS
        };
        self
    }
}

fn sanitize_jitter(jitter: f32) -> f32 {
    if jitter.is_finite() {
        jitter.clamp(0.0, 50.0)
    } else {
        0.0
    }
}
