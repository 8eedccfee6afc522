pub mod cross_section;
pub mod cube;
pub mod cylinder;
pub mod face2d;
pub mod vertex;

pub use cross_section::cross_sections;
pub use cube::{cube_surface, cube_wireframe, CUBE_SIZE_3D};
pub use cylinder::{cylinder_surface, cylinder_wireframe, radial_axis_offset, CylinderAxes, CylinderRange};
pub use face2d::face_2d;
pub use vertex::{color_coord_to_position, Mesh, Vertex};
