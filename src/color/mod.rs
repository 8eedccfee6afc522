pub mod algebra;
pub mod space;

pub use algebra::{
    delta_e, hsl_to_rgb, hsv_to_rgb, rgb_euclidean, rgb_to_hsl, rgb_to_hsv, rgb_to_lab, HslColor,
    HsvColor, Lab, RgbColor,
};
pub use space::{all_spaces, by_id, hsl_space, hsv_space, rgb_space, Axis, ColorSpace, ColorSpaceId};
