use serde::{Deserialize, Serialize};

use crate::color::{by_id, ColorSpaceId};
use crate::error::RenderingError;
use crate::palette::{DistanceMetric, Palette};

/// An inclusive integer range on one axis, used to crop the 3D volume to a
/// sub-box. `lo == hi` collapses the axis to a single slice value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisSlice {
    pub lo: i64,
    pub hi: i64,
}

impl AxisSlice {
    pub fn full(axis: &crate::color::Axis) -> Self {
        AxisSlice { lo: axis.min, hi: axis.max }
    }

    pub fn fixed(value: i64) -> Self {
        AxisSlice { lo: value, hi: value }
    }

    pub fn to_unit_range(self, axis: &crate::color::Axis) -> (f32, f32) {
        let span = (axis.max - axis.min).max(1) as f32;
        (
            (self.lo - axis.min) as f32 / span,
            (self.hi - axis.min) as f32 / span,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderMode {
    Slice2D { fixed_axis_index: usize, slice_value: i64 },
    Volume3D,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HighlightMode {
    DimOther,
    HideOther,
    Boundary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderRequest {
    pub color_space: ColorSpaceId,
    pub mode: RenderMode,
    /// Only consulted in `Volume3D` mode; crops the cube to a sub-box.
    pub axis_slices: [AxisSlice; 3],
    pub polar: bool,
    pub show_boundaries: bool,
    pub palette: Palette,
    pub distance_metric: DistanceMetric,
    pub distance_threshold: f64,
    pub highlight_mode: HighlightMode,
    pub highlight_palette_index: Option<usize>,
    pub show_unmatched: bool,
    pub rotation_matrix: [[f32; 4]; 4],
}

impl RenderRequest {
    pub fn validate(&self) -> Result<(), RenderingError> {
        let space = by_id(self.color_space);

        if self.polar && space.polar_axis_index().is_none() {
            return Err(RenderingError::AxisValueOutOfRange {
                axis: "polar".into(),
                value: 1,
                min: 0,
                max: 0,
            });
        }

        match self.mode {
            RenderMode::Slice2D { fixed_axis_index, slice_value } => {
                if self.polar && space.polar_axis_index() == Some(fixed_axis_index) {
                    return Err(RenderingError::AxisValueOutOfRange {
                        axis: space.axes()[fixed_axis_index].key.into(),
                        value: slice_value,
                        min: 0,
                        max: 0,
                    });
                }
                let axis = &space.axes()[fixed_axis_index];
                if !axis.contains(slice_value) {
                    return Err(RenderingError::AxisValueOutOfRange {
                        axis: axis.key.into(),
                        value: slice_value,
                        min: axis.min,
                        max: axis.max,
                    });
                }
            }
            RenderMode::Volume3D => {
                for (axis, slice) in space.axes().iter().zip(self.axis_slices.iter()) {
                    if !axis.contains(slice.lo) || !axis.contains(slice.hi) || slice.lo > slice.hi {
                        return Err(RenderingError::AxisValueOutOfRange {
                            axis: axis.key.into(),
                            value: slice.lo,
                            min: axis.min,
                            max: axis.max,
                        });
                    }
                }
            }
        }

        if let Some(index) = self.highlight_palette_index {
            if index >= self.palette.len() {
                return Err(RenderingError::AxisValueOutOfRange {
                    axis: "highlight_palette_index".into(),
                    value: index as i64,
                    min: 0,
                    max: self.palette.len() as i64 - 1,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::DistanceMetric;

    fn base_request() -> RenderRequest {
        RenderRequest {
            color_space: ColorSpaceId::Rgb,
            mode: RenderMode::Slice2D { fixed_axis_index: 2, slice_value: 0 },
            axis_slices: [AxisSlice::fixed(0); 3],
            polar: false,
            show_boundaries: true,
            palette: Palette::default(),
            distance_metric: DistanceMetric::rgb_euclidean(),
            distance_threshold: 0.1,
            highlight_mode: HighlightMode::DimOther,
            highlight_palette_index: None,
            show_unmatched: true,
            rotation_matrix: [[1.0, 0.0, 0.0, 0.0], [0.0, 1.0, 0.0, 0.0], [0.0, 0.0, 1.0, 0.0], [0.0, 0.0, 0.0, 1.0]],
        }
    }

    #[test]
    fn default_2d_slice_request_is_valid() {
        assert!(base_request().validate().is_ok());
    }

    #[test]
    fn polar_on_non_polar_space_is_rejected() {
        let mut req = base_request();
        req.polar = true;
        assert!(req.validate().is_err());
    }

    #[test]
    fn polar_fixed_on_the_hue_axis_is_rejected() {
        let mut req = base_request();
        req.color_space = ColorSpaceId::Hsv;
        req.polar = true;
        req.mode = RenderMode::Slice2D { fixed_axis_index: 0, slice_value: 0 };
        assert!(req.validate().is_err());
    }

    #[test]
    fn out_of_range_slice_value_is_rejected() {
        let mut req = base_request();
        req.mode = RenderMode::Slice2D { fixed_axis_index: 2, slice_value: 999 };
        assert!(req.validate().is_err());
    }

    #[test]
    fn highlight_index_beyond_palette_len_is_rejected() {
        let mut req = base_request();
        req.highlight_palette_index = Some(0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn volume_mode_validates_axis_slice_ranges() {
        let mut req = base_request();
        req.mode = RenderMode::Volume3D;
        req.axis_slices = [AxisSlice { lo: 10, hi: 5 }, AxisSlice::fixed(0), AxisSlice::fixed(0)];
        assert!(req.validate().is_err());
    }
}
