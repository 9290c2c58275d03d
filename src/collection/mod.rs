pub mod chunk;
pub mod walk_meshes;

pub use chunk::{read_chunk, write_chunk, ChunkElement};
pub use walk_meshes::{IndexEntry, SurfaceId, WalkMeshes};
