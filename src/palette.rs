use serde::{Deserialize, Serialize};

use crate::color::{delta_e, rgb_euclidean, RgbColor};
use crate::error::RenderingError;

/// Alpha-channel sentinel meaning "no palette entry within threshold."
pub const NO_MATCH: u8 = 254;
/// Alpha-channel sentinel meaning "this point does not lie in the color space."
pub const OUTSIDE_COLOR_SPACE: u8 = 255;
/// Palette indices `0..MAX_PALETTE_COLORS` are reserved for real entries; the
/// two sentinel bytes above must stay free.
pub const MAX_PALETTE_COLORS: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedColor {
    pub name: String,
    pub rgb: RgbColor,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Palette(Vec<NamedColor>);

impl Palette {
    pub fn new(entries: Vec<NamedColor>) -> Result<Self, RenderingError> {
        if entries.len() > MAX_PALETTE_COLORS {
            return Err(RenderingError::PaletteTooLarge(entries.len()));
        }
        Ok(Palette(entries))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&NamedColor> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedColor> {
        self.0.iter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetricId {
    DeltaE,
    RgbEuclidean,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DistanceMetric {
    pub id: DistanceMetricId,
    pub min_threshold: f64,
    pub max_threshold: f64,
    pub default_threshold: f64,
}

impl DistanceMetric {
    pub fn delta_e() -> Self {
        DistanceMetric { id: DistanceMetricId::DeltaE, min_threshold: 0.0, max_threshold: 100.0, default_threshold: 10.0 }
    }

    pub fn rgb_euclidean() -> Self {
        DistanceMetric {
            id: DistanceMetricId::RgbEuclidean,
            min_threshold: 0.0,
            max_threshold: 1.732_050_8, // sqrt(3), the maximum possible distance in the unit cube
            default_threshold: 0.15,
        }
    }

    pub fn threshold_to_display_string(&self, threshold: f64) -> String {
        match self.id {
            DistanceMetricId::DeltaE => format!("\u{0394}E \u{2264} {threshold:.1}"),
            DistanceMetricId::RgbEuclidean => format!("distance \u{2264} {threshold:.3}"),
        }
    }

    fn distance(&self, a: RgbColor, b: RgbColor) -> f64 {
        match self.id {
            DistanceMetricId::DeltaE => delta_e(a, b),
            DistanceMetricId::RgbEuclidean => rgb_euclidean(a, b),
        }
    }
}

/// Finds the nearest palette entry to `color` under `metric`, honoring
/// `threshold`. Ties are broken by lowest index; an empty palette or a
/// distance beyond `threshold` both yield [`NO_MATCH`].
pub fn classify(color: RgbColor, palette: &Palette, metric: DistanceMetric, threshold: f64) -> u8 {
    if palette.is_empty() {
        return NO_MATCH;
    }

    let mut best_index = 0usize;
    let mut best_distance = f64::INFINITY;
    for (index, entry) in palette.iter().enumerate() {
        let distance = metric.distance(color, entry.rgb);
        if distance < best_distance {
            best_distance = distance;
            best_index = index;
        }
    }

    if best_distance > threshold {
        NO_MATCH
    } else {
        best_index as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str, r: f64, g: f64, b: f64) -> NamedColor {
        NamedColor { name: name.to_string(), rgb: RgbColor(r, g, b) }
    }

    #[test]
    fn empty_palette_never_matches() {
        let palette = Palette::new(vec![]).unwrap();
        let metric = DistanceMetric::rgb_euclidean();
        assert_eq!(classify(RgbColor(0.0, 0.0, 0.0), &palette, metric, 1.0), NO_MATCH);
    }

    #[test]
    fn exact_palette_member_is_idempotent() {
        let palette = Palette::new(vec![
            named("red", 1.0, 0.0, 0.0),
            named("green", 0.0, 1.0, 0.0),
            named("blue", 0.0, 0.0, 1.0),
        ])
        .unwrap();
        let metric = DistanceMetric::rgb_euclidean();
        for (i, entry) in palette.iter().enumerate() {
            assert_eq!(classify(entry.rgb, &palette, metric, metric.max_threshold), i as u8);
        }
    }

    #[test]
    fn distance_beyond_threshold_is_no_match() {
        let palette = Palette::new(vec![named("red", 1.0, 0.0, 0.0)]).unwrap();
        let metric = DistanceMetric::rgb_euclidean();
        assert_eq!(classify(RgbColor(0.0, 0.0, 0.0), &palette, metric, 0.1), NO_MATCH);
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let palette = Palette::new(vec![named("a", 0.0, 0.0, 0.0), named("b", 0.0, 0.0, 0.0)]).unwrap();
        let metric = DistanceMetric::rgb_euclidean();
        assert_eq!(classify(RgbColor(0.0, 0.0, 0.0), &palette, metric, 1.0), 0);
    }

    #[test]
    fn palette_too_large_is_rejected() {
        let entries = (0..MAX_PALETTE_COLORS + 1)
            .map(|i| named(&format!("c{i}"), 0.0, 0.0, 0.0))
            .collect();
        assert!(matches!(Palette::new(entries), Err(RenderingError::PaletteTooLarge(_))));
    }
}
