mod error;
mod lexer;
mod object;
mod record;

pub use error::{LoadError, ParseError};
pub use object::{
    load_lines, load_path, load_reader, load_str, Diagnostic, DiagnosticKind, LoadOutcome,
    MeshDocument, Severity,
};
pub use record::{
    parse_face, parse_texture_coordinate, parse_vertex, parse_vertex_normal, Face, FaceFormat,
    FaceVertex, TextureCoordinate, Vertex, VertexNormal,
};
