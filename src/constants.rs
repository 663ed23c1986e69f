// Shared DOM hooks and visual tuning for the web frontend.

// Host elements opt in with `data-glow`; options are `data-glow-<key>`.
pub const HOST_SELECTOR: &str = "[data-glow]";
pub const ATTR_PREFIX: &str = "data-glow-";
// Applied in order; `preset` first so later keys override it.
pub const OPTION_KEYS: &[&str] = &[
    "preset",
    "mode",
    "density",
    "active",
    "cycle-ms",
    "transition-ms",
    "fade-boundary",
    "fade-acceleration",
    "avoid",
    "jitter",
    "seed",
    "fps",
    "cell-px",
    "phase-offset",
];
pub const AVOID_SELECTOR_ATTR: &str = "data-glow-avoid-selector";
pub const RENDERER_ATTR: &str = "data-glow-renderer"; // "dom" | "canvas"

// Token price estimates
pub const PRICE_URL_ATTR: &str = "data-price-url";
pub const TOKEN_AMOUNT_SELECTOR: &str = "[data-token-amount]";
pub const TOKEN_AMOUNT_ATTR: &str = "data-token-amount";

// Overlay layer: full viewport, never takes pointer input
pub const OVERLAY_CLASS: &str = "glow-overlay";
pub const OVERLAY_STYLE: &str =
    "position:fixed;inset:0;pointer-events:none;overflow:hidden;z-index:0;user-select:none;";
pub const MARKER_CLASS: &str = "glow-marker";
pub const MARKER_BASE_STYLE: &str =
    "position:absolute;transform:translate(-50%,-50%);line-height:1;opacity:0;will-change:opacity,filter;";
pub const PALM_GLYPH: &str = "\u{1F334}";
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

// Glow mapping
pub const GLOW_COLOR: [u8; 3] = [255, 214, 120]; // warm sand
pub const GLOW_BLUR_BASE_PX: f32 = 2.0; // blur at the faintest visible level
pub const GLOW_BLUR_SPAN_PX: f32 = 14.0; // extra blur at full brightness
pub const GLOW_RADIUS_SCALE: f32 = 2.5; // canvas glow radius relative to marker size
pub const GLOW_RADIUS_MIN_FRACTION: f32 = 0.6; // radius fraction at zero brightness
