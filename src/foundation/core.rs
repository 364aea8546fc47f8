pub use kurbo::{Affine, Vec2};

/// Tempo used when a caller supplies no usable BPM.
pub const DEFAULT_BPM: f64 = 120.0;

/// One laser sample: a position plus the beam color at that position.
///
/// Coordinates are normalized to `[-1, 1]` on both axes; colors are normalized to `[0, 1]`.
/// A point with all color channels at zero is blanked (laser off, not drawn).
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal position in `[-1, 1]`.
    pub x: f64,
    /// Vertical position in `[-1, 1]`.
    pub y: f64,
    /// Red channel in `[0, 1]`.
    pub r: f64,
    /// Green channel in `[0, 1]`.
    pub g: f64,
    /// Blue channel in `[0, 1]`.
    pub b: f64,
}

/// One ordered point sequence rendered at a single time instant.
pub type Frame = Vec<Point>;

impl Point {
    /// Build a point from position and color.
    pub fn new(x: f64, y: f64, r: f64, g: f64, b: f64) -> Self {
        Self { x, y, r, g, b }
    }

    /// Blanked point at `(x, y)`.
    pub fn blank(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0, 0.0, 0.0)
    }

    /// Return `true` when the laser is off for this point.
    pub fn is_blanked(self) -> bool {
        self.r == 0.0 && self.g == 0.0 && self.b == 0.0
    }

    /// Same position, new color.
    pub fn with_rgb(self, r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, ..self }
    }

    /// Same color, new position.
    pub fn with_xy(self, x: f64, y: f64) -> Self {
        Self { x, y, ..self }
    }

    /// Same position, color turned off.
    pub fn blanked(self) -> Self {
        self.with_rgb(0.0, 0.0, 0.0)
    }

    /// Color channels as an array.
    pub fn rgb(self) -> [f64; 3] {
        [self.r, self.g, self.b]
    }

    /// Apply a 2D affine transform to the position, keeping the color.
    pub fn transformed(self, affine: Affine) -> Self {
        let p = affine * kurbo::Point::new(self.x, self.y);
        self.with_xy(p.x, p.y)
    }

    /// Clamp position into `[-1, 1]` and color into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(-1.0, 1.0),
            y: self.y.clamp(-1.0, 1.0),
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }
}

/// Time and tempo at which a frame is rendered.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimeCtx {
    /// Show time in milliseconds.
    pub time_ms: f64,
    /// Current tempo in beats per minute (always `> 0`).
    pub bpm: f64,
}

impl TimeCtx {
    /// Build a sanitized time context.
    ///
    /// Non-finite time maps to `0`; non-finite or non-positive BPM maps to [`DEFAULT_BPM`].
    pub fn new(time_ms: f64, bpm: f64) -> Self {
        let time_ms = if time_ms.is_finite() { time_ms } else { 0.0 };
        let bpm = if bpm.is_finite() && bpm > 0.0 {
            bpm
        } else {
            DEFAULT_BPM
        };
        Self { time_ms, bpm }
    }

    /// Elapsed time in seconds.
    pub fn seconds(self) -> f64 {
        self.time_ms / 1000.0
    }

    /// Elapsed time in beats at the current tempo.
    pub fn beats(self) -> f64 {
        self.seconds() * self.bpm / 60.0
    }
}

impl Default for TimeCtx {
    fn default() -> Self {
        Self::new(0.0, DEFAULT_BPM)
    }
}

/// Per-point evaluation context handed to point-scoped effects and spatial modulators.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointCtx {
    /// Index of the point within its frame.
    pub index: usize,
    /// Number of points in the frame.
    pub count: usize,
    /// Frame time and tempo.
    pub time: TimeCtx,
}

impl PointCtx {
    /// Normalized position of the point in its frame, `0` for the first point and `1` for the
    /// last. Single-point frames report `0`.
    pub fn progress(self) -> f64 {
        if self.count <= 1 {
            0.0
        } else {
            (self.index as f64) / ((self.count - 1) as f64)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
