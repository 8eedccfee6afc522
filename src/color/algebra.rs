use serde::{Deserialize, Serialize};

use crate::error::RenderingError;

use super::space::ColorSpace;

fn check_unit(value: f64) -> Result<(), RenderingError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(RenderingError::InvalidCoordinate { value });
    }
    Ok(())
}

macro_rules! normalized_color {
    ($name:ident, $space_fn:path) => {
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        pub struct $name(pub f64, pub f64, pub f64);

        impl $name {
            pub fn new(a: f64, b: f64, c: f64) -> Result<Self, RenderingError> {
                check_unit(a)?;
                check_unit(b)?;
                check_unit(c)?;
                Ok(Self(a, b, c))
            }

            pub fn components(&self) -> [f64; 3] {
                [self.0, self.1, self.2]
            }

            pub fn display_string(&self) -> String {
                let space: ColorSpace = $space_fn();
                let axes = space.axes();
                let comps = self.components();
                format!(
                    "{}: {}{} {}{} {}{}",
                    display_label(&space),
                    (comps[0] * axes[0].max as f64).round() as i64,
                    axes[0].unit,
                    (comps[1] * axes[1].max as f64).round() as i64,
                    axes[1].unit,
                    (comps[2] * axes[2].max as f64).round() as i64,
                    axes[2].unit,
                )
            }
        }
    };
}

fn display_label(space: &ColorSpace) -> &'static str {
    use super::space::ColorSpaceId::*;
    match space.id {
        Rgb => "RGB",
        Hsv => "HSV",
        Hsl => "HSL",
    }
}

normalized_color!(RgbColor, super::space::rgb_space);
normalized_color!(HsvColor, super::space::hsv_space);
normalized_color!(HslColor, super::space::hsl_space);

/// Standard triangle-wave helper shared by HSV->RGB and HSL->RGB. Matches the
/// formulation used on the GPU path bit-for-bit so boundary pixels agree.
fn triangle(h: f64, k: f64) -> f64 {
    let t = (h + k).fract().abs();
    (((t * 6.0 - 3.0).abs()) - 1.0).clamp(0.0, 1.0)
}

pub fn hsv_to_rgb(c: HsvColor) -> RgbColor {
    let HsvColor(h, s, v) = c;
    let p = |k: f64| triangle(h, k);
    RgbColor(
        v * (p(1.0) * s - s + 1.0),
        v * (p(2.0 / 3.0) * s - s + 1.0),
        v * (p(1.0 / 3.0) * s - s + 1.0),
    )
}

pub fn hsl_to_rgb(c: HslColor) -> RgbColor {
    let HslColor(h, s, l) = c;
    let chroma = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let p = |k: f64| triangle(h, k);
    RgbColor(
        l + chroma * (p(1.0) - 0.5),
        l + chroma * (p(2.0 / 3.0) - 0.5),
        l + chroma * (p(1.0 / 3.0) - 0.5),
    )
}

pub fn rgb_to_hsv(c: RgbColor) -> HsvColor {
    let RgbColor(r, g, b) = c;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;

    let hue = if delta.abs() < f64::EPSILON {
        0.0
    } else if max == r {
        (((g - b) / delta).rem_euclid(6.0)) / 6.0
    } else if max == g {
        (((b - r) / delta) + 2.0) / 6.0
    } else {
        (((r - g) / delta) + 4.0) / 6.0
    };

    let sat = if max.abs() < f64::EPSILON { 0.0 } else { delta / max };
    HsvColor(hue.rem_euclid(1.0), sat, max)
}

pub fn rgb_to_hsl(c: RgbColor) -> HslColor {
    let RgbColor(r, g, b) = c;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let lightness = (max + min) / 2.0;

    if delta.abs() < f64::EPSILON {
        return HslColor(0.0, 0.0, lightness);
    }

    let hue = if max == r {
        (((g - b) / delta).rem_euclid(6.0)) / 6.0
    } else if max == g {
        (((b - r) / delta) + 2.0) / 6.0
    } else {
        (((r - g) / delta) + 4.0) / 6.0
    };

    let sat = delta / (1.0 - (2.0 * lightness - 1.0).abs());
    HslColor(hue.rem_euclid(1.0), sat, lightness)
}

fn srgb_channel_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// CIE L*a*b* triple, D65 reference white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lab {
    pub l: f64,
    pub a: f64,
    pub b: f64,
}

const REF_WHITE: (f64, f64, f64) = (0.95047, 1.00000, 1.08883);
const LAB_KAPPA: f64 = 903.3;
const LAB_EPSILON: f64 = 216.0 / 24389.0; // (6/29)^3

fn lab_f(t: f64) -> f64 {
    if t > LAB_EPSILON {
        t.cbrt()
    } else {
        (LAB_KAPPA * t + 16.0) / 116.0
    }
}

pub fn rgb_to_lab(c: RgbColor) -> Lab {
    let r = srgb_channel_to_linear(c.0);
    let g = srgb_channel_to_linear(c.1);
    let b = srgb_channel_to_linear(c.2);

    // sRGB -> XYZ, D65.
    let x = r * 0.4124564 + g * 0.3575761 + b * 0.1804375;
    let y = r * 0.2126729 + g * 0.7151522 + b * 0.0721750;
    let z = r * 0.0193339 + g * 0.1191920 + b * 0.9503041;

    let fx = lab_f(x / REF_WHITE.0);
    let fy = lab_f(y / REF_WHITE.1);
    let fz = lab_f(z / REF_WHITE.2);

    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

pub fn delta_e(a: RgbColor, b: RgbColor) -> f64 {
    let la = rgb_to_lab(a);
    let lb = rgb_to_lab(b);
    ((la.l - lb.l).powi(2) + (la.a - lb.a).powi(2) + (la.b - lb.b).powi(2)).sqrt()
}

pub fn rgb_euclidean(a: RgbColor, b: RgbColor) -> f64 {
    ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2) + (a.2 - b.2).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: f64, b: f64, tol: f64) {
        assert!((a - b).abs() <= tol, "{a} vs {b}");
    }

    #[test]
    fn round_trip_hsv() {
        for &(r, g, b) in &[(0.1, 0.2, 0.3), (1.0, 0.0, 0.0), (0.5, 0.5, 0.5), (0.0, 1.0, 0.5)] {
            let rgb = RgbColor(r, g, b);
            let back = hsv_to_rgb(rgb_to_hsv(rgb));
            assert_close(rgb.0, back.0, 1e-6);
            assert_close(rgb.1, back.1, 1e-6);
            assert_close(rgb.2, back.2, 1e-6);
        }
    }

    #[test]
    fn round_trip_hsl() {
        for &(r, g, b) in &[(0.1, 0.2, 0.3), (1.0, 0.0, 0.0), (0.5, 0.5, 0.5), (0.0, 1.0, 0.5)] {
            let rgb = RgbColor(r, g, b);
            let back = hsl_to_rgb(rgb_to_hsl(rgb));
            assert_close(rgb.0, back.0, 1e-6);
            assert_close(rgb.1, back.1, 1e-6);
            assert_close(rgb.2, back.2, 1e-6);
        }
    }

    #[test]
    fn achromatic_hue_is_zero() {
        let gray = RgbColor(0.4, 0.4, 0.4);
        assert_eq!(rgb_to_hsv(gray).0, 0.0);
        assert_eq!(rgb_to_hsl(gray).0, 0.0);
    }

    #[test]
    fn construction_rejects_out_of_range() {
        assert!(RgbColor::new(1.5, 0.0, 0.0).is_err());
        assert!(RgbColor::new(0.5, -0.1, 0.0).is_err());
        assert!(RgbColor::new(0.1, 0.2, 0.3).is_ok());
    }

    #[test]
    fn delta_e_of_identical_colors_is_zero() {
        let c = RgbColor(0.3, 0.6, 0.9);
        assert_close(delta_e(c, c), 0.0, 1e-9);
    }

    #[test]
    fn primary_red_hue_is_zero() {
        let red = RgbColor(1.0, 0.0, 0.0);
        assert_close(rgb_to_hsv(red).0, 0.0, 1e-9);
    }
}
