use serde::{Deserialize, Serialize};

/// A single labeled coordinate of a [`ColorSpace`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Axis {
    pub key: &'static str,
    pub display_name: &'static str,
    pub unit: &'static str,
    pub min: i64,
    pub max: i64,
    pub default: i64,
}

impl Axis {
    pub const fn new(
        key: &'static str,
        display_name: &'static str,
        unit: &'static str,
        max: i64,
        default: i64,
    ) -> Self {
        Axis { key, display_name, unit, min: 0, max, default }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Which of the three canonical color spaces a request concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorSpaceId {
    Rgb,
    Hsv,
    Hsl,
}

/// Immutable descriptor for one of RGB/HSV/HSL: its three axes and which one
/// is the default selection when a host first opens this space.
#[derive(Debug, Clone)]
pub struct ColorSpace {
    pub id: ColorSpaceId,
    pub axes: [Axis; 3],
    pub default_axis_index: usize,
    /// Index of the axis that may be displayed as a polar angle, if any.
    polar_axis_index: Option<usize>,
}

impl ColorSpace {
    pub fn axes(&self) -> &[Axis; 3] {
        &self.axes
    }

    pub fn default_axis(&self) -> &Axis {
        &self.axes[self.default_axis_index]
    }

    pub fn axis_index(&self, key: &str) -> Option<usize> {
        self.axes.iter().position(|a| a.key == key)
    }

    /// The space's hue axis, when it differs from `current_axis_index` — the
    /// polar remap needs two free axes to work with besides the fixed one.
    pub fn available_polar_axis(&self, current_axis_index: usize) -> Option<&Axis> {
        self.polar_axis_index
            .filter(|&idx| idx != current_axis_index)
            .map(|idx| &self.axes[idx])
    }

    pub fn polar_axis_index(&self) -> Option<usize> {
        self.polar_axis_index
    }
}

pub fn rgb_space() -> ColorSpace {
    ColorSpace {
        id: ColorSpaceId::Rgb,
        axes: [
            Axis::new("r", "Red", "", 255, 255),
            Axis::new("g", "Green", "", 255, 255),
            Axis::new("b", "Blue", "", 255, 0),
        ],
        default_axis_index: 2,
        polar_axis_index: None,
    }
}

pub fn hsv_space() -> ColorSpace {
    ColorSpace {
        id: ColorSpaceId::Hsv,
        axes: [
            Axis::new("h", "Hue", "°", 359, 0),
            Axis::new("s", "Saturation", "%", 100, 100),
            Axis::new("v", "Value", "%", 100, 100),
        ],
        default_axis_index: 0,
        polar_axis_index: Some(0),
    }
}

pub fn hsl_space() -> ColorSpace {
    ColorSpace {
        id: ColorSpaceId::Hsl,
        axes: [
            Axis::new("h", "Hue", "°", 359, 0),
            Axis::new("s", "Saturation", "%", 100, 100),
            Axis::new("l", "Lightness", "%", 100, 50),
        ],
        default_axis_index: 0,
        polar_axis_index: Some(0),
    }
}

pub fn all_spaces() -> [ColorSpace; 3] {
    [rgb_space(), hsv_space(), hsl_space()]
}

pub fn by_id(id: ColorSpaceId) -> ColorSpace {
    match id {
        ColorSpaceId::Rgb => rgb_space(),
        ColorSpaceId::Hsv => hsv_space(),
        ColorSpaceId::Hsl => hsl_space(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axes_are_uniquely_keyed() {
        for space in all_spaces() {
            let keys: Vec<_> = space.axes().iter().map(|a| a.key).collect();
            let mut sorted = keys.clone();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(keys.len(), sorted.len());
        }
    }

    #[test]
    fn hsv_and_hsl_expose_hue_as_polar_when_not_current() {
        let hsv = hsv_space();
        assert!(hsv.available_polar_axis(1).is_some());
        assert!(hsv.available_polar_axis(0).is_none());
    }

    #[test]
    fn rgb_has_no_polar_axis() {
        let rgb = rgb_space();
        assert!(rgb.available_polar_axis(0).is_none());
        assert!(rgb.available_polar_axis(1).is_none());
    }
}
