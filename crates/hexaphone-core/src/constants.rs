// Shared tuning constants used by the core and the web frontend.

// Tuning
pub const A4_HZ: f32 = 440.0; // pitch of the origin cell
pub const A4_MIDI: i32 = 69;
pub const SEMITONES_PER_ALPHA_GAMMA: f32 = 3.5; // n = 3.5 * (alpha - gamma) + 0.5 * beta
pub const SEMITONES_PER_BETA: f32 = 0.5;

// Hexagon projection (pointed-top)
pub const SQRT_3: f32 = 1.732_050_8;
pub const ROW_SPACING: f32 = 1.5; // vertical center distance in units of the tip radius

// Layout sizing
pub const KEYS_ON_LONG_SIDE: f32 = 16.0; // how many keys span the longer viewport side
pub const MIN_KEY_SCALE: f32 = 16.0; // px, smallest tip radius we lay out
pub const SPARE_CELLS: i32 = 2; // extra cells beyond each viewport edge
pub const STROKE_RATIO: f32 = 0.0125; // stroke width relative to the tip radius
pub const LABEL_FONT_RATIO: f32 = 0.4; // label font size relative to the tip radius

// Colors
pub const BACKDROP_COLOR: &str = "#101014";
pub const MUTED_FILL_COLOR: &str = "#2b2b30";
pub const DEFAULT_LINE_COLOR: &str = "#1a1a1f";

// Input
pub const DRAG_SAMPLE_RATE_MS: f64 = 20.0; // min time between processed drag samples

// Rendering
pub const TARGET_FPS: f64 = 30.0;

// Audio
pub const NOTE_DURATION_SEC: f32 = 0.5;
pub const BASIC_GAIN_MIN: f32 = 0.1; // clamp for the 440/f loudness compensation
pub const BASIC_GAIN_MAX: f32 = 4.0;
pub const SAMPLES_BASE_URL: &str = "/assets/samples/";

// Broadcast
pub const BROADCAST_DEFAULT_PORT: u16 = 4562;
pub const BROADCAST_DEFAULT_CHANNEL: &str = "hexaphone";
