use std::fmt;

use crate::objects::error::ParseError;
use crate::objects::lexer::Lexer;
use crate::{ABSENT_INDEX, DEFAULT_V, DEFAULT_W};

/// Geometric vertex, `v x y z [w]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Texture coordinate, `vt u [v]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureCoordinate {
    pub u: f32,
    pub v: f32,
}

/// Vertex normal, `vn i j k`. Not normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexNormal {
    pub i: f32,
    pub j: f32,
    pub k: f32,
}

/// Which of the three face shapes a line was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceFormat {
    /// `f 1 2 3`
    Plain,
    /// `f 1//1 2//2 3//3`
    VertexNormal,
    /// `f 1/1/1 2/2/2 3/3/3`
    VertexTextureNormal,
}

/// One corner of a face. Every index is 1-based or `ABSENT_INDEX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceVertex {
    pub vertex: i32,
    pub texture: i32,
    pub normal: i32,
}

impl FaceVertex {
    pub const ABSENT: FaceVertex = FaceVertex {
        vertex: ABSENT_INDEX,
        texture: ABSENT_INDEX,
        normal: ABSENT_INDEX,
    };

    fn new(vertex: i32) -> Self {
        return FaceVertex {
            vertex,
            ..FaceVertex::ABSENT
        };
    }
}

/// Triangle or quad. The fourth corner is `FaceVertex::ABSENT` for triangles.
///
/// Indices are kept exactly as written; they are not resolved against the
/// vertex, texture or normal lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub vertices: [FaceVertex; 4],
    pub format: FaceFormat,
}

impl Face {
    pub fn indices(&self) -> [i32; 4] {
        return self.vertices.map(|corner| corner.vertex);
    }

    pub fn textures(&self) -> [i32; 4] {
        return self.vertices.map(|corner| corner.texture);
    }

    pub fn normals(&self) -> [i32; 4] {
        return self.vertices.map(|corner| corner.normal);
    }

    pub fn vertex(&self, slot: usize) -> Option<i32> {
        return present(self.vertices.get(slot)?.vertex);
    }

    pub fn texture(&self, slot: usize) -> Option<i32> {
        return present(self.vertices.get(slot)?.texture);
    }

    pub fn normal(&self, slot: usize) -> Option<i32> {
        return present(self.vertices.get(slot)?.normal);
    }

    pub fn is_quad(&self) -> bool {
        return self.vertices[3].vertex != ABSENT_INDEX;
    }

    pub fn vertex_count(&self) -> usize {
        if self.is_quad() {
            return 4;
        }

        return 3;
    }
}

fn present(index: i32) -> Option<i32> {
    if index == ABSENT_INDEX {
        return None;
    }

    return Some(index);
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v {} {} {} {}", self.x, self.y, self.z, self.w)
    }
}

impl fmt::Display for TextureCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vt {} {}", self.u, self.v)
    }
}

impl fmt::Display for VertexNormal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vn {} {} {}", self.i, self.j, self.k)
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f")?;

        for corner in &self.vertices[..self.vertex_count()] {
            match self.format {
                FaceFormat::Plain => write!(f, " {}", corner.vertex)?,
                FaceFormat::VertexNormal => write!(f, " {}//{}", corner.vertex, corner.normal)?,
                FaceFormat::VertexTextureNormal => write!(
                    f,
                    " {}/{}/{}",
                    corner.vertex, corner.texture, corner.normal
                )?,
            }
        }

        Ok(())
    }
}

fn required_float(
    lexer: &mut Lexer,
    name: &str,
    error: fn(String) -> ParseError,
) -> Result<f32, ParseError> {
    return lexer
        .consume_float()
        .ok_or_else(|| error(format!("missing or malformed {name} component")));
}

/// Parses `v x y z [w]`. A missing or unreadable `w` falls back to 1.0.
pub fn parse_vertex(line: &str) -> Result<Vertex, ParseError> {
    let mut lexer = Lexer::new(line);
    lexer.consume_word();

    let x = required_float(&mut lexer, "x", ParseError::Vertex)?;
    let y = required_float(&mut lexer, "y", ParseError::Vertex)?;
    let z = required_float(&mut lexer, "z", ParseError::Vertex)?;
    let w = lexer.consume_float().unwrap_or(DEFAULT_W);

    return Ok(Vertex { x, y, z, w });
}

/// Parses `vt u [v]`. A missing or unreadable `v` falls back to 0.0.
pub fn parse_texture_coordinate(line: &str) -> Result<TextureCoordinate, ParseError> {
    let mut lexer = Lexer::new(line);
    lexer.consume_word();

    let u = required_float(&mut lexer, "u", ParseError::TextureCoordinate)?;
    let v = lexer.consume_float().unwrap_or(DEFAULT_V);

    return Ok(TextureCoordinate { u, v });
}

/// Parses `vn i j k`.
pub fn parse_vertex_normal(line: &str) -> Result<VertexNormal, ParseError> {
    let mut lexer = Lexer::new(line);
    lexer.consume_word();

    let i = required_float(&mut lexer, "i", ParseError::VertexNormal)?;
    let j = required_float(&mut lexer, "j", ParseError::VertexNormal)?;
    let k = required_float(&mut lexer, "k", ParseError::VertexNormal)?;

    return Ok(VertexNormal { i, j, k });
}

fn read_index(lexer: &mut Lexer, name: &str) -> Result<i32, String> {
    let col = lexer.col();

    match lexer.consume_integer() {
        Some(index) if index >= 1 => Ok(index),
        Some(index) => Err(format!("{name} {index} at column {col} is not a 1-based index")),
        None => Err(format!("expected {name} at column {col}")),
    }
}

fn expect_slash(lexer: &mut Lexer) -> Result<(), String> {
    if lexer.consume('/') {
        return Ok(());
    }

    return Err(format!("expected '/' at column {}", lexer.col()));
}

/// Reads one whitespace-separated corner in the given shape.
fn read_face_vertex(lexer: &mut Lexer, format: FaceFormat) -> Result<FaceVertex, String> {
    lexer.skip_whitespace();

    let mut corner = FaceVertex::new(read_index(lexer, "vertex index")?);

    match format {
        FaceFormat::Plain => {}

        FaceFormat::VertexNormal => {
            expect_slash(lexer)?;
            expect_slash(lexer)?;
            corner.normal = read_index(lexer, "normal index")?;
        }

        FaceFormat::VertexTextureNormal => {
            expect_slash(lexer)?;
            corner.texture = read_index(lexer, "texture index")?;
            expect_slash(lexer)?;
            corner.normal = read_index(lexer, "normal index")?;
        }
    }

    return Ok(corner);
}

/// Parses `f` in any of its three shapes.
///
/// The shape is chosen by the characters right after the first vertex
/// index: whitespace or end of line means plain indices, `//` means
/// vertex/normal pairs and `/` followed by anything else means
/// vertex/texture/normal triples. The first three corners are required.
/// The fourth is optional and is read all-or-nothing: if it cannot be read
/// in full the face is a triangle.
pub fn parse_face(line: &str) -> Result<Face, ParseError> {
    let mut lexer = Lexer::new(line);
    lexer.consume_word();
    lexer.skip_whitespace();

    let first_index = read_index(&mut lexer, "vertex index").map_err(ParseError::Face)?;
    let mut first = FaceVertex::new(first_index);

    let format = match lexer.char() {
        None => FaceFormat::Plain,

        Some(c) if c.is_whitespace() => FaceFormat::Plain,

        Some('/') => {
            lexer.advance();

            if lexer.consume('/') {
                first.normal = read_index(&mut lexer, "normal index").map_err(ParseError::Face)?;
                FaceFormat::VertexNormal
            } else {
                first.texture = read_index(&mut lexer, "texture index").map_err(ParseError::Face)?;
                expect_slash(&mut lexer).map_err(ParseError::Face)?;
                first.normal = read_index(&mut lexer, "normal index").map_err(ParseError::Face)?;
                FaceFormat::VertexTextureNormal
            }
        }

        Some(c) => {
            return Err(ParseError::Face(format!(
                "unexpected '{c}' at column {}",
                lexer.col()
            )));
        }
    };

    let mut vertices = [first, FaceVertex::ABSENT, FaceVertex::ABSENT, FaceVertex::ABSENT];

    for (slot, corner) in vertices.iter_mut().enumerate().skip(1).take(2) {
        *corner = read_face_vertex(&mut lexer, format)
            .map_err(|message| ParseError::Face(format!("corner {}: {message}", slot + 1)))?;
    }

    let mut fourth = lexer;
    vertices[3] = read_face_vertex(&mut fourth, format).unwrap_or(FaceVertex::ABSENT);

    return Ok(Face { vertices, format });
}
