use thiserror::Error;

/// Top-level error type for the walkmesh core.
#[derive(Debug, Error)]
pub enum WalkError {
    #[error(transparent)]
    Chunk(#[from] ChunkError),

    #[error(transparent)]
    Mesh(#[from] MeshError),

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

/// Errors raised while reading or writing tagged binary chunks.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("expected chunk '{expected}', found '{found}'")]
    UnexpectedTag { expected: String, found: String },

    #[error("chunk '{tag}' has size {size}, not a multiple of element size {element}")]
    Misaligned {
        tag: String,
        size: usize,
        element: usize,
    },

    #[error("chunk '{tag}' declares {expected} bytes but only {actual} are present")]
    Truncated {
        tag: String,
        expected: usize,
        actual: usize,
    },

    #[error("chunk '{tag}' would hold {size} bytes, which does not fit a u32 header")]
    TooLarge { tag: String, size: usize },
}

/// Errors related to walk surface construction and queries.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("{vertices} vertices but {normals} normals")]
    MismatchedNormals { vertices: usize, normals: usize },

    #[error("triangle {triangle} references vertex {index}, but only {vertex_count} exist")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("directed edge ({a}, {b}) appears in more than one triangle")]
    DuplicateEdge { a: u32, b: u32 },

    #[error("triangle {triangle} has zero area")]
    Degenerate { triangle: usize },

    #[error(
        "normal of vertex {vertex} disagrees with the winding of triangle {triangle} (dot = {dot})"
    )]
    InconsistentNormal {
        triangle: usize,
        vertex: u32,
        dot: f64,
    },

    #[error("walk surface has no triangles")]
    EmptySurface,
}

/// Errors raised while validating a packed walk surface collection.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("mis-matched position ({positions}) and normal ({normals}) counts in '{resource}'")]
    MismatchedSizes {
        resource: String,
        positions: usize,
        normals: usize,
    },

    #[error("invalid {field} range [{begin}, {end}) over {len} entries in index of '{resource}'")]
    InvalidRange {
        resource: String,
        field: &'static str,
        begin: u32,
        end: u32,
        len: usize,
    },

    #[error("triangle {triangle} lies outside its entry's vertex range in '{resource}'")]
    TriangleOutsideRange { resource: String, triangle: usize },

    #[error("walk surface name is not valid UTF-8 in '{resource}'")]
    InvalidName { resource: String },

    #[error("walk surface with duplicated name '{name}' in '{resource}'")]
    DuplicateName { resource: String, name: String },

    #[error("walk surface '{name}' in '{resource}': {source}")]
    Mesh {
        resource: String,
        name: String,
        #[source]
        source: MeshError,
    },
}

/// Errors related to surface lookup.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("walk surface with name '{0}' not found")]
    NameNotFound(String),

    #[error("walk surface id is not part of this collection")]
    IdNotFound,
}

/// Convenience type alias for results using [`WalkError`].
pub type Result<T> = std::result::Result<T, WalkError>;
