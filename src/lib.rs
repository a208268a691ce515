pub mod objects;

pub use objects::*;

/// Index stored for a face corner, texture or normal that is not present.
pub const ABSENT_INDEX: i32 = -1;

/// `w` of a vertex written without one.
pub const DEFAULT_W: f32 = 1.0;

/// `v` of a texture coordinate written without one.
pub const DEFAULT_V: f32 = 0.0;
