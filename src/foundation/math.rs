//! Color and coordinate helpers shared by the effect library.

/// Clamp into `[0, 1]`, mapping NaN to `0`.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Linear interpolation between `a` and `b`.
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Convert an 8-bit channel to `[0, 1]`.
pub fn byte_to_unit(v: u8) -> f64 {
    f64::from(v) / 255.0
}

/// Convert a `[0, 1]` channel to 8-bit, clamping first.
pub fn unit_to_byte(v: f64) -> u8 {
    (clamp01(v) * 255.0).round() as u8
}

/// Convert a signed 16-bit hardware coordinate to `[-1, 1]`.
pub fn i16_to_coord(v: i16) -> f64 {
    (f64::from(v) / f64::from(i16::MAX)).max(-1.0)
}

/// Convert a `[-1, 1]` coordinate to signed 16-bit, clamping first.
pub fn coord_to_i16(v: f64) -> i16 {
    let v = if v.is_nan() { 0.0 } else { v.clamp(-1.0, 1.0) };
    (v * f64::from(i16::MAX)).round() as i16
}

/// Map `value` from `[min, max]` onto `[-1, 1]`. A degenerate range maps to `0`.
pub fn normalize_coord(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span.abs() <= f64::EPSILON {
        return 0.0;
    }
    ((value - min) / span) * 2.0 - 1.0
}

/// Map a `[-1, 1]` coordinate onto `[min, max]`.
pub fn denormalize_coord(value: f64, min: f64, max: f64) -> f64 {
    min + (value + 1.0) * 0.5 * (max - min)
}

/// Convert HSV to RGB.
///
/// `h` is in degrees (any value, wrapped into `[0, 360)`), `s` and `v` in `[0, 1]`.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> [f64; 3] {
    let s = clamp01(s);
    let v = clamp01(v);
    if s == 0.0 {
        return [v, v, v];
    }

    let h = h.rem_euclid(360.0) / 60.0;
    let sector = h.floor();
    let f = h - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector as u8 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// Convert RGB in `[0, 1]` to HSV with hue in degrees `[0, 360)`.
///
/// Achromatic colors report hue `0`.
pub fn rgb_to_hsv(r: f64, g: f64, b: f64) -> [f64; 3] {
    let (r, g, b) = (clamp01(r), clamp01(g), clamp01(b));
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let v = max;
    let s = if max > 0.0 { delta / max } else { 0.0 };
    if delta <= 0.0 {
        return [0.0, s, v];
    }

    let h = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * (((b - r) / delta) + 2.0)
    } else {
        60.0 * (((r - g) / delta) + 4.0)
    };
    [h.rem_euclid(360.0), s, v]
}

/// Euclidean distance between two normalized RGB colors.
pub fn rgb_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dr = a[0] - b[0];
    let dg = a[1] - b[1];
    let db = a[2] - b[2];
    (dr * dr + dg * dg + db * db).sqrt()
}

/// Approximate the RGB color of a black body at `kelvin`, normalized to `[0, 1]`.
///
/// Tanner Helland's piecewise fit; input is clamped to `[1000, 40000]` K.
pub fn kelvin_to_rgb(kelvin: f64) -> [f64; 3] {
    let temp = kelvin.clamp(1000.0, 40000.0) / 100.0;

    let red = if temp <= 66.0 {
        255.0
    } else {
        329.698_727_446 * (temp - 60.0).powf(-0.133_204_759_2)
    };

    let green = if temp <= 66.0 {
        99.470_802_586_1 * temp.ln() - 161.119_568_166_1
    } else {
        288.122_169_528_3 * (temp - 60.0).powf(-0.075_514_849_2)
    };

    let blue = if temp >= 66.0 {
        255.0
    } else if temp <= 19.0 {
        0.0
    } else {
        138.517_731_223_1 * (temp - 10.0).ln() - 305.044_792_730_7
    };

    [
        red.clamp(0.0, 255.0) / 255.0,
        green.clamp(0.0, 255.0) / 255.0,
        blue.clamp(0.0, 255.0) / 255.0,
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
