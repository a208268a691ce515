use std::convert::Infallible;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::objects::error::{LoadError, ParseError};
use crate::objects::record::{
    parse_face, parse_texture_coordinate, parse_vertex, parse_vertex_normal, Face,
    TextureCoordinate, Vertex, VertexNormal,
};

/// Records of one OBJ file, in the order they appear. Append-only.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MeshDocument {
    vertices: Vec<Vertex>,
    texture_coordinates: Vec<TextureCoordinate>,
    vertex_normals: Vec<VertexNormal>,
    faces: Vec<Face>,
}

impl MeshDocument {
    pub fn new() -> Self {
        return MeshDocument::default();
    }

    pub fn add_vertex(&mut self, vertex: Vertex) {
        self.vertices.push(vertex);
    }

    pub fn add_texture_coordinate(&mut self, texture_coordinate: TextureCoordinate) {
        self.texture_coordinates.push(texture_coordinate);
    }

    pub fn add_vertex_normal(&mut self, vertex_normal: VertexNormal) {
        self.vertex_normals.push(vertex_normal);
    }

    pub fn add_face(&mut self, face: Face) {
        self.faces.push(face);
    }

    pub fn vertices(&self) -> &[Vertex] {
        return &self.vertices;
    }

    pub fn texture_coordinates(&self) -> &[TextureCoordinate] {
        return &self.texture_coordinates;
    }

    pub fn vertex_normals(&self) -> &[VertexNormal] {
        return &self.vertex_normals;
    }

    pub fn faces(&self) -> &[Face] {
        return &self.faces;
    }

    pub fn is_empty(&self) -> bool {
        return self.vertices.is_empty()
            && self.texture_coordinates.is_empty()
            && self.vertex_normals.is_empty()
            && self.faces.is_empty();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    Comment,
    /// Known command that is not loaded (`vp`).
    Unsupported,
    Malformed(ParseError),
}

/// What happened to a line that did not become a record.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 1-based, counting every line of the input.
    pub line: usize,
    pub content: String,
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    pub fn severity(&self) -> Severity {
        match self.kind {
            DiagnosticKind::Comment | DiagnosticKind::Unsupported => Severity::Info,
            DiagnosticKind::Malformed(_) => Severity::Error,
        }
    }

    pub fn error(&self) -> Option<&ParseError> {
        match &self.kind {
            DiagnosticKind::Malformed(err) => Some(err),
            _ => None,
        }
    }

    pub fn message(&self) -> String {
        match &self.kind {
            DiagnosticKind::Comment => "comment".to_string(),
            DiagnosticKind::Unsupported => "parameter space vertex, not supported".to_string(),
            DiagnosticKind::Malformed(err) => err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.severity(), self.message())?;

        if self.severity() == Severity::Error {
            write!(f, " ({})", self.content)?;
        }

        Ok(())
    }
}

/// A loaded document together with everything reported along the way.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadOutcome {
    pub mesh: MeshDocument,
    pub diagnostics: Vec<Diagnostic>,
}

impl LoadOutcome {
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        return self
            .diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.severity() == Severity::Error);
    }

    pub fn has_errors(&self) -> bool {
        return self.errors().next().is_some();
    }
}

/// Outcome of a single line.
enum Line {
    Blank,
    Comment,
    Unsupported,
    Vertex(Vertex),
    TextureCoordinate(TextureCoordinate),
    VertexNormal(VertexNormal),
    Face(Face),
}

fn classify(line: &str) -> Result<Line, ParseError> {
    let mut chars = line.chars();

    match chars.next() {
        None => Ok(Line::Blank),

        Some('#') => Ok(Line::Comment),

        Some('v') => match chars.next() {
            Some(' ') => parse_vertex(line).map(Line::Vertex),
            Some('t') => parse_texture_coordinate(line).map(Line::TextureCoordinate),
            Some('n') => parse_vertex_normal(line).map(Line::VertexNormal),
            Some('p') => Ok(Line::Unsupported),
            _ => Err(ParseError::UnrecognizedLine),
        },

        Some('f') => parse_face(line).map(Line::Face),

        _ => Err(ParseError::UnrecognizedLine),
    }
}

/// Loads every line, keeping whatever parses and reporting the rest.
pub fn load_lines<I, S>(lines: I) -> LoadOutcome
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    match load_each(lines.into_iter().map(Ok::<S, Infallible>)) {
        Ok(outcome) => outcome,
        Err(never) => match never {},
    }
}

pub fn load_str(source: &str) -> LoadOutcome {
    return load_lines(source.lines());
}

/// Like `load_lines`, but stops with an error if the reader itself fails.
///
/// Bytes that are not UTF-8 are replaced with U+FFFD; only the line that
/// holds them can fail to parse.
pub fn load_reader<R: BufRead>(reader: R) -> Result<LoadOutcome, LoadError> {
    return Ok(load_each(decoded_lines(reader))?);
}

fn load_each<I, S, E>(lines: I) -> Result<LoadOutcome, E>
where
    I: IntoIterator<Item = Result<S, E>>,
    S: AsRef<str>,
{
    let mut outcome = LoadOutcome::default();

    for (index, line) in lines.into_iter().enumerate() {
        accept(&mut outcome, index + 1, line?.as_ref());
    }

    summarize(&outcome);

    return Ok(outcome);
}

/// Splits on `\n`, drops a trailing `\r` and decodes each line lossily.
fn decoded_lines<R: BufRead>(mut reader: R) -> impl Iterator<Item = io::Result<String>> {
    let mut buffer = Vec::new();

    return std::iter::from_fn(move || {
        buffer.clear();

        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => None,

            Ok(_) => {
                if buffer.last() == Some(&b'\n') {
                    buffer.pop();

                    if buffer.last() == Some(&b'\r') {
                        buffer.pop();
                    }
                }

                Some(Ok(String::from_utf8_lossy(&buffer).into_owned()))
            }

            Err(err) => Some(Err(err)),
        }
    });
}

pub fn load_path(path: impl AsRef<Path>) -> Result<LoadOutcome, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|err| LoadError::File {
        err,
        path: path.display().to_string(),
    })?;

    debug!(path = %path.display(), "loading");

    return load_reader(BufReader::new(file));
}

fn accept(outcome: &mut LoadOutcome, number: usize, line: &str) {
    let mesh = &mut outcome.mesh;

    let kind = match classify(line) {
        Ok(Line::Blank) => return,

        Ok(Line::Vertex(vertex)) => {
            debug!(line = number, %vertex, "vertex");
            mesh.add_vertex(vertex);
            return;
        }

        Ok(Line::TextureCoordinate(texture_coordinate)) => {
            debug!(line = number, %texture_coordinate, "texture coordinate");
            mesh.add_texture_coordinate(texture_coordinate);
            return;
        }

        Ok(Line::VertexNormal(vertex_normal)) => {
            debug!(line = number, %vertex_normal, "vertex normal");
            mesh.add_vertex_normal(vertex_normal);
            return;
        }

        Ok(Line::Face(face)) => {
            debug!(line = number, %face, "face");
            mesh.add_face(face);
            return;
        }

        Ok(Line::Comment) => DiagnosticKind::Comment,

        Ok(Line::Unsupported) => DiagnosticKind::Unsupported,

        Err(err) => DiagnosticKind::Malformed(err),
    };

    let diagnostic = Diagnostic {
        line: number,
        content: line.to_string(),
        kind,
    };

    match diagnostic.severity() {
        Severity::Info => debug!(line = number, message = %diagnostic.message(), "skipped"),
        Severity::Error => warn!(line = number, content = line, "{}", diagnostic.message()),
    }

    outcome.diagnostics.push(diagnostic);
}

fn summarize(outcome: &LoadOutcome) {
    let mesh = &outcome.mesh;

    info!(
        vertices = mesh.vertices().len(),
        texture_coordinates = mesh.texture_coordinates().len(),
        vertex_normals = mesh.vertex_normals().len(),
        faces = mesh.faces().len(),
        errors = outcome.errors().count(),
        "loaded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ABSENT_INDEX;

    #[test]
    fn vertices_and_faces_in_file_order() {
        let outcome = load_str("v 1.0 2.0 3.0\nv 1.0 2.0 3.0 0.5\nf 1 2 3\nf 1//1 2//2 3//3");
        let mesh = &outcome.mesh;

        assert!(outcome.diagnostics.is_empty());
        assert_eq!(mesh.vertices().len(), 2);
        assert_eq!(mesh.vertices()[0], Vertex { x: 1.0, y: 2.0, z: 3.0, w: 1.0 });
        assert_eq!(mesh.vertices()[1], Vertex { x: 1.0, y: 2.0, z: 3.0, w: 0.5 });

        assert_eq!(mesh.faces().len(), 2);
        assert_eq!(mesh.faces()[0].indices(), [1, 2, 3, ABSENT_INDEX]);
        assert_eq!(mesh.faces()[0].normals(), [ABSENT_INDEX; 4]);
        assert_eq!(mesh.faces()[0].textures(), [ABSENT_INDEX; 4]);
        assert_eq!(mesh.faces()[1].indices(), [1, 2, 3, ABSENT_INDEX]);
        assert_eq!(mesh.faces()[1].normals(), [1, 2, 3, ABSENT_INDEX]);
        assert_eq!(mesh.faces()[1].textures(), [ABSENT_INDEX; 4]);
    }

    #[test]
    fn texture_coordinates() {
        let outcome = load_str("vt 0.5\nvt 0.1 0.9");

        assert_eq!(
            outcome.mesh.texture_coordinates(),
            &[
                TextureCoordinate { u: 0.5, v: 0.0 },
                TextureCoordinate { u: 0.1, v: 0.9 },
            ]
        );
    }

    #[test]
    fn unknown_command_is_reported_and_skipped() {
        let outcome = load_str("v 0 0 0\ng groupname\nv 1 1 1");

        assert_eq!(outcome.mesh.vertices().len(), 2);

        let errors: Vec<_> = outcome.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line, 2);
        assert_eq!(errors[0].content, "g groupname");
        assert_eq!(errors[0].error(), Some(&ParseError::UnrecognizedLine));
    }

    #[test]
    fn unknown_v_subcommands() {
        let outcome = load_str("vq 1 2 3\nv\nv\t1 2 3\nx 1");

        let lines: Vec<_> = outcome.errors().map(|diagnostic| diagnostic.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
        assert!(outcome
            .errors()
            .all(|diagnostic| diagnostic.error() == Some(&ParseError::UnrecognizedLine)));
        assert!(outcome.mesh.is_empty());
    }

    #[test]
    fn blank_and_comment_lines_are_not_errors() {
        let outcome = load_str("# cube\n\nv 0 0 0\n\n# end");

        assert!(!outcome.has_errors());
        assert_eq!(outcome.mesh.vertices().len(), 1);

        let comments: Vec<_> = outcome
            .diagnostics
            .iter()
            .map(|diagnostic| (diagnostic.line, diagnostic.severity()))
            .collect();
        assert_eq!(comments, vec![(1, Severity::Info), (5, Severity::Info)]);
    }

    #[test]
    fn parameter_space_vertices_are_skipped() {
        let outcome = load_str("vp 0.5 0.5");

        assert!(outcome.mesh.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::Unsupported);
        assert!(!outcome.has_errors());
    }

    #[test]
    fn malformed_line_does_not_affect_neighbours() {
        let outcome = load_str(
            "v 1 2 3\nv 1 oops 3\nv 4 5 6\nvt\nvn 0 0\nvn 0 0 1\nf 1 2\nf 1 2 3",
        );
        let mesh = &outcome.mesh;

        assert_eq!(mesh.vertices().len(), 2);
        assert_eq!(mesh.vertices()[1].x, 4.0);
        assert_eq!(mesh.texture_coordinates().len(), 0);
        assert_eq!(mesh.vertex_normals().len(), 1);
        assert_eq!(mesh.faces().len(), 1);

        let errors: Vec<_> = outcome
            .errors()
            .map(|diagnostic| (diagnostic.line, diagnostic.error().cloned()))
            .collect();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0].0, 2);
        assert!(matches!(errors[0].1, Some(ParseError::Vertex(_))));
        assert_eq!(errors[1].0, 4);
        assert!(matches!(errors[1].1, Some(ParseError::TextureCoordinate(_))));
        assert_eq!(errors[2].0, 5);
        assert!(matches!(errors[2].1, Some(ParseError::VertexNormal(_))));
        assert_eq!(errors[3].0, 7);
        assert!(matches!(errors[3].1, Some(ParseError::Face(_))));
    }

    #[test]
    fn nothing_valid_still_yields_a_document() {
        let outcome = load_str("hello\nworld");

        assert!(outcome.mesh.is_empty());
        assert_eq!(outcome.errors().count(), 2);
    }

    #[test]
    fn reader_counts_crlf_lines() {
        let outcome = load_reader("v 0 0 0\r\n\r\nbad\r\n".as_bytes()).unwrap();

        assert_eq!(outcome.mesh.vertices().len(), 1);
        assert_eq!(outcome.errors().next().map(|diagnostic| diagnostic.line), Some(3));
    }

    #[test]
    fn reader_survives_bytes_that_are_not_utf8() {
        let outcome = load_reader(&b"v 0 0 0\n# caf\xe9\nv 1 1 1\nf 1 2 \xff\n"[..]).unwrap();

        assert_eq!(outcome.mesh.vertices().len(), 2);
        assert_eq!(outcome.mesh.vertices()[1].x, 1.0);

        assert_eq!(outcome.diagnostics[0].line, 2);
        assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::Comment);
        assert_eq!(outcome.diagnostics[0].content, "# caf\u{fffd}");

        let errors: Vec<_> = outcome.errors().map(|diagnostic| diagnostic.line).collect();
        assert_eq!(errors, vec![4]);
    }

    #[test]
    fn reader_and_str_agree() {
        let source = "# cube\r\nv 0 0 0\r\n\r\nvt 0.5\nvq\nf 1 1 1";

        assert_eq!(load_reader(source.as_bytes()).unwrap(), load_str(source));
    }

    #[test]
    fn missing_file_is_a_load_error() {
        let result = load_path("/nonexistent/definitely/missing.obj");

        assert!(matches!(result, Err(LoadError::File { .. })));

        let err = result.unwrap_err();
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn diagnostic_display() {
        let outcome = load_str("\n\ng groupname");

        assert_eq!(
            outcome.diagnostics[0].to_string(),
            "line 3: error: unrecognized line (g groupname)"
        );
    }
}
