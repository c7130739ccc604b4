pub mod corrupt_names;
pub mod lod_distance;
pub mod mesh_naming;
pub mod mesh_origin;
pub mod mesh_state;
pub mod name_length;
pub mod parent_mesh;
pub mod spot_naming;
pub mod surface_type;
