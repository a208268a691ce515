use thiserror::Error;

/// A single line that could not be turned into a record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("invalid vertex: {0}")]
    Vertex(String),

    #[error("invalid texture coordinate: {0}")]
    TextureCoordinate(String),

    #[error("invalid vertex normal: {0}")]
    VertexNormal(String),

    #[error("invalid face: {0}")]
    Face(String),

    #[error("unrecognized line")]
    UnrecognizedLine,
}

/// Failure of the input itself, as opposed to the lines it contains.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read {path}")]
    File {
        #[source]
        err: std::io::Error,
        path: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
