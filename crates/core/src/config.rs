//! Tunable constants for the star field, loadable from a JSON params object.

use crate::color::Srgb;
use crate::error::StarFieldError;
use crate::params::{param_f64, param_string, param_usize};
use serde_json::{json, Value};

const DEFAULT_TWINKLE_DURATION_MIN_MS: f64 = 5000.0;
const DEFAULT_TWINKLE_DURATION_MAX_MS: f64 = 8000.0;
const DEFAULT_TWINKLE_DELAY_MAX_MS: f64 = 3000.0;
const DEFAULT_HUE_DURATION_MIN_MS: f64 = 8000.0;
const DEFAULT_HUE_DURATION_MAX_MS: f64 = 11000.0;
const DEFAULT_RIPPLE_DURATION_MS: f64 = 1200.0;
const DEFAULT_RIPPLE_BAND_PX: f64 = 20.0;
const DEFAULT_RIPPLE_DIM: f64 = 0.5;
const DEFAULT_RIPPLE_TWINKLE_COUNT: usize = 5;
/// Largest highlight burst a ripple may request.
pub const MAX_RIPPLE_TWINKLE_COUNT: usize = 1000;
const DEFAULT_HIGHLIGHT_WINDOW_MS: f64 = 300.0;
const DEFAULT_HIGHLIGHT_SIZE: f64 = 3.5;
const DEFAULT_SIZE_SCALE: f64 = 1.0;
const DEFAULT_DISPLAY_SCALE: f64 = 0.6;
const DEFAULT_OPACITY_FLOOR: f64 = 0.2;
const DEFAULT_TINT: &str = "#9c27b0";
const DEFAULT_JITTER_AMPLITUDE_PX: f64 = 10.0;
const DEFAULT_JITTER_DURATION_MS: f64 = 800.0;

/// Every tunable of the star field.
///
/// [`Default`] reproduces the journaling app's background. Durations are in
/// milliseconds, distances in surface pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct StarFieldParams {
    /// Lower bound of the per-iteration twinkle ramp duration.
    pub twinkle_duration_min_ms: f64,
    /// Upper bound (exclusive) of the twinkle ramp duration.
    pub twinkle_duration_max_ms: f64,
    /// Upper bound (exclusive) of the per-iteration twinkle start delay.
    pub twinkle_delay_max_ms: f64,
    /// Lower bound of one full 0→1→0 hue-pulse loop.
    pub hue_duration_min_ms: f64,
    /// Upper bound (exclusive) of the hue-pulse loop.
    pub hue_duration_max_ms: f64,
    /// Time for a ripple to travel the full surface diagonal.
    pub ripple_duration_ms: f64,
    /// Half-width of the dimmed ring.
    pub ripple_band_px: f64,
    /// Opacity multiplier inside the ring.
    pub ripple_dim: f64,
    /// Highlight burst size that accompanies every ripple.
    pub ripple_twinkle_count: usize,
    /// Lifetime of a highlight burst.
    pub highlight_window_ms: f64,
    /// Rendered size of highlighted particles.
    pub highlight_size: f64,
    /// Per-intensity size step before the display factor.
    pub size_scale: f64,
    /// Display factor applied to non-highlighted sizes.
    pub display_scale: f64,
    /// Opacity of a particle at the bottom of its twinkle cycle.
    pub opacity_floor: f64,
    /// Color reached at the peak of the hue pulse.
    pub tint: Srgb,
    /// Maximum transition jitter offset per axis.
    pub jitter_amplitude_px: f64,
    /// Duration of each half (out, back) of the transition jitter.
    pub jitter_duration_ms: f64,
}

impl Default for StarFieldParams {
    fn default() -> Self {
        Self {
            twinkle_duration_min_ms: DEFAULT_TWINKLE_DURATION_MIN_MS,
            twinkle_duration_max_ms: DEFAULT_TWINKLE_DURATION_MAX_MS,
            twinkle_delay_max_ms: DEFAULT_TWINKLE_DELAY_MAX_MS,
            hue_duration_min_ms: DEFAULT_HUE_DURATION_MIN_MS,
            hue_duration_max_ms: DEFAULT_HUE_DURATION_MAX_MS,
            ripple_duration_ms: DEFAULT_RIPPLE_DURATION_MS,
            ripple_band_px: DEFAULT_RIPPLE_BAND_PX,
            ripple_dim: DEFAULT_RIPPLE_DIM,
            ripple_twinkle_count: DEFAULT_RIPPLE_TWINKLE_COUNT,
            highlight_window_ms: DEFAULT_HIGHLIGHT_WINDOW_MS,
            highlight_size: DEFAULT_HIGHLIGHT_SIZE,
            size_scale: DEFAULT_SIZE_SCALE,
            display_scale: DEFAULT_DISPLAY_SCALE,
            opacity_floor: DEFAULT_OPACITY_FLOOR,
            tint: Srgb {
                r: 0x9c as f64 / 255.0,
                g: 0x27 as f64 / 255.0,
                b: 0xb0 as f64 / 255.0,
            },
            jitter_amplitude_px: DEFAULT_JITTER_AMPLITUDE_PX,
            jitter_duration_ms: DEFAULT_JITTER_DURATION_MS,
        }
    }
}

impl StarFieldParams {
    /// Extracts parameters from a JSON object, falling back to defaults for
    /// missing keys, then validates the result.
    pub fn from_json(params: &Value) -> Result<Self, StarFieldError> {
        let parsed = Self {
            twinkle_duration_min_ms: param_f64(
                params,
                "twinkle_duration_min_ms",
                DEFAULT_TWINKLE_DURATION_MIN_MS,
            ),
            twinkle_duration_max_ms: param_f64(
                params,
                "twinkle_duration_max_ms",
                DEFAULT_TWINKLE_DURATION_MAX_MS,
            ),
            twinkle_delay_max_ms: param_f64(
                params,
                "twinkle_delay_max_ms",
                DEFAULT_TWINKLE_DELAY_MAX_MS,
            ),
            hue_duration_min_ms: param_f64(
                params,
                "hue_duration_min_ms",
                DEFAULT_HUE_DURATION_MIN_MS,
            ),
            hue_duration_max_ms: param_f64(
                params,
                "hue_duration_max_ms",
                DEFAULT_HUE_DURATION_MAX_MS,
            ),
            ripple_duration_ms: param_f64(params, "ripple_duration_ms", DEFAULT_RIPPLE_DURATION_MS),
            ripple_band_px: param_f64(params, "ripple_band_px", DEFAULT_RIPPLE_BAND_PX),
            ripple_dim: param_f64(params, "ripple_dim", DEFAULT_RIPPLE_DIM),
            ripple_twinkle_count: param_usize(
                params,
                "ripple_twinkle_count",
                DEFAULT_RIPPLE_TWINKLE_COUNT,
            ),
            highlight_window_ms: param_f64(
                params,
                "highlight_window_ms",
                DEFAULT_HIGHLIGHT_WINDOW_MS,
            ),
            highlight_size: param_f64(params, "highlight_size", DEFAULT_HIGHLIGHT_SIZE),
            size_scale: param_f64(params, "size_scale", DEFAULT_SIZE_SCALE),
            display_scale: param_f64(params, "display_scale", DEFAULT_DISPLAY_SCALE),
            opacity_floor: param_f64(params, "opacity_floor", DEFAULT_OPACITY_FLOOR),
            tint: Srgb::from_hex(&param_string(params, "tint", DEFAULT_TINT))?,
            jitter_amplitude_px: param_f64(
                params,
                "jitter_amplitude_px",
                DEFAULT_JITTER_AMPLITUDE_PX,
            ),
            jitter_duration_ms: param_f64(params, "jitter_duration_ms", DEFAULT_JITTER_DURATION_MS),
        };
        parsed.validate()?;
        Ok(parsed)
    }

    /// Current values as a JSON object with the same keys `from_json` reads.
    pub fn to_json(&self) -> Value {
        json!({
            "twinkle_duration_min_ms": self.twinkle_duration_min_ms,
            "twinkle_duration_max_ms": self.twinkle_duration_max_ms,
            "twinkle_delay_max_ms": self.twinkle_delay_max_ms,
            "hue_duration_min_ms": self.hue_duration_min_ms,
            "hue_duration_max_ms": self.hue_duration_max_ms,
            "ripple_duration_ms": self.ripple_duration_ms,
            "ripple_band_px": self.ripple_band_px,
            "ripple_dim": self.ripple_dim,
            "ripple_twinkle_count": self.ripple_twinkle_count,
            "highlight_window_ms": self.highlight_window_ms,
            "highlight_size": self.highlight_size,
            "size_scale": self.size_scale,
            "display_scale": self.display_scale,
            "opacity_floor": self.opacity_floor,
            "tint": self.tint.to_hex(),
            "jitter_amplitude_px": self.jitter_amplitude_px,
            "jitter_duration_ms": self.jitter_duration_ms,
        })
    }

    /// Checks ranges that the scheduler and projector rely on.
    ///
    /// Cycle durations must be strictly positive, otherwise a timeline could
    /// never consume a tick.
    pub fn validate(&self) -> Result<(), StarFieldError> {
        let finite = [
            ("twinkle_duration_min_ms", self.twinkle_duration_min_ms),
            ("twinkle_duration_max_ms", self.twinkle_duration_max_ms),
            ("twinkle_delay_max_ms", self.twinkle_delay_max_ms),
            ("hue_duration_min_ms", self.hue_duration_min_ms),
            ("hue_duration_max_ms", self.hue_duration_max_ms),
            ("ripple_duration_ms", self.ripple_duration_ms),
            ("ripple_band_px", self.ripple_band_px),
            ("ripple_dim", self.ripple_dim),
            ("highlight_window_ms", self.highlight_window_ms),
            ("highlight_size", self.highlight_size),
            ("size_scale", self.size_scale),
            ("display_scale", self.display_scale),
            ("opacity_floor", self.opacity_floor),
            ("jitter_amplitude_px", self.jitter_amplitude_px),
            ("jitter_duration_ms", self.jitter_duration_ms),
        ];
        if let Some((name, value)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        let positive = [
            ("twinkle_duration_min_ms", self.twinkle_duration_min_ms),
            ("hue_duration_min_ms", self.hue_duration_min_ms),
            ("ripple_duration_ms", self.ripple_duration_ms),
            ("jitter_duration_ms", self.jitter_duration_ms),
            ("highlight_size", self.highlight_size),
            ("display_scale", self.display_scale),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| *v <= 0.0) {
            return Err(invalid(format!("{name} must be positive, got {value}")));
        }

        let non_negative = [
            ("twinkle_delay_max_ms", self.twinkle_delay_max_ms),
            ("ripple_band_px", self.ripple_band_px),
            ("highlight_window_ms", self.highlight_window_ms),
            ("size_scale", self.size_scale),
            ("jitter_amplitude_px", self.jitter_amplitude_px),
        ];
        if let Some((name, value)) = non_negative.iter().find(|(_, v)| *v < 0.0) {
            return Err(invalid(format!("{name} must not be negative, got {value}")));
        }

        if self.twinkle_duration_min_ms > self.twinkle_duration_max_ms {
            return Err(invalid(format!(
                "twinkle duration range is inverted: {} > {}",
                self.twinkle_duration_min_ms, self.twinkle_duration_max_ms
            )));
        }
        if self.hue_duration_min_ms > self.hue_duration_max_ms {
            return Err(invalid(format!(
                "hue duration range is inverted: {} > {}",
                self.hue_duration_min_ms, self.hue_duration_max_ms
            )));
        }
        if self.ripple_twinkle_count > MAX_RIPPLE_TWINKLE_COUNT {
            return Err(invalid(format!(
                "ripple_twinkle_count must be at most {MAX_RIPPLE_TWINKLE_COUNT}, got {}",
                self.ripple_twinkle_count
            )));
        }
        if !(0.0..=1.0).contains(&self.ripple_dim) {
            return Err(invalid(format!(
                "ripple_dim must be in [0, 1], got {}",
                self.ripple_dim
            )));
        }
        if !(0.0..=1.0).contains(&self.opacity_floor) {
            return Err(invalid(format!(
                "opacity_floor must be in [0, 1], got {}",
                self.opacity_floor
            )));
        }
        Ok(())
    }

    /// Schema describing every key, its type, range and default.
    pub fn schema() -> Value {
        json!({
            "twinkle_duration_min_ms": number_schema(DEFAULT_TWINKLE_DURATION_MIN_MS, 1.0, 60000.0, "Shortest twinkle ramp (each of rise and fall)"),
            "twinkle_duration_max_ms": number_schema(DEFAULT_TWINKLE_DURATION_MAX_MS, 1.0, 60000.0, "Longest twinkle ramp (exclusive)"),
            "twinkle_delay_max_ms": number_schema(DEFAULT_TWINKLE_DELAY_MAX_MS, 0.0, 60000.0, "Longest random pause before each twinkle rise (exclusive)"),
            "hue_duration_min_ms": number_schema(DEFAULT_HUE_DURATION_MIN_MS, 1.0, 120000.0, "Shortest full hue pulse loop"),
            "hue_duration_max_ms": number_schema(DEFAULT_HUE_DURATION_MAX_MS, 1.0, 120000.0, "Longest full hue pulse loop (exclusive)"),
            "ripple_duration_ms": number_schema(DEFAULT_RIPPLE_DURATION_MS, 1.0, 10000.0, "Time for a ripple to cross the surface diagonal"),
            "ripple_band_px": number_schema(DEFAULT_RIPPLE_BAND_PX, 0.0, 500.0, "Half-width of the dimmed ripple ring"),
            "ripple_dim": number_schema(DEFAULT_RIPPLE_DIM, 0.0, 1.0, "Opacity multiplier inside the ripple ring"),
            "ripple_twinkle_count": {
                "type": "integer",
                "default": DEFAULT_RIPPLE_TWINKLE_COUNT,
                "min": 0,
                "max": MAX_RIPPLE_TWINKLE_COUNT,
                "description": "Highlight burst size that accompanies each ripple"
            },
            "highlight_window_ms": number_schema(DEFAULT_HIGHLIGHT_WINDOW_MS, 0.0, 10000.0, "Lifetime of a highlight burst"),
            "highlight_size": number_schema(DEFAULT_HIGHLIGHT_SIZE, 0.1, 50.0, "Rendered size of highlighted particles"),
            "size_scale": number_schema(DEFAULT_SIZE_SCALE, 0.0, 10.0, "Size added per intensity level"),
            "display_scale": number_schema(DEFAULT_DISPLAY_SCALE, 0.01, 10.0, "Display factor for non-highlighted sizes"),
            "opacity_floor": number_schema(DEFAULT_OPACITY_FLOOR, 0.0, 1.0, "Opacity at the bottom of a twinkle"),
            "tint": {
                "type": "string",
                "default": DEFAULT_TINT,
                "description": "Hex color reached at the peak of the hue pulse"
            },
            "jitter_amplitude_px": number_schema(DEFAULT_JITTER_AMPLITUDE_PX, 0.0, 200.0, "Largest transition jitter offset per axis"),
            "jitter_duration_ms": number_schema(DEFAULT_JITTER_DURATION_MS, 1.0, 10000.0, "Duration of each half of the transition jitter"),
        })
    }
}

fn number_schema(default: f64, min: f64, max: f64, description: &str) -> Value {
    json!({
        "type": "number",
        "default": default,
        "min": min,
        "max": max,
        "description": description,
    })
}

fn invalid(msg: String) -> StarFieldError {
    StarFieldError::InvalidConfiguration(msg)
}
