//! Tagged binary chunks: a 4-byte tag, a little-endian `u32` byte count, then
//! the packed elements.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::error::ChunkError;
use crate::math::{Point3, Vector3};

/// Fixed-size record stored in a chunk.
pub trait ChunkElement: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Decodes one element.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader runs out of bytes.
    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self>;

    /// Encodes one element.
    ///
    /// # Errors
    ///
    /// Returns an error if the writer fails.
    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()>;
}

fn read_vec3<R: Read>(reader: &mut R) -> std::io::Result<[f64; 3]> {
    Ok([
        f64::from(reader.read_f32::<LE>()?),
        f64::from(reader.read_f32::<LE>()?),
        f64::from(reader.read_f32::<LE>()?),
    ])
}

#[allow(clippy::cast_possible_truncation)]
fn write_vec3<W: Write>(writer: &mut W, v: [f64; 3]) -> std::io::Result<()> {
    for c in v {
        writer.write_f32::<LE>(c as f32)?;
    }
    Ok(())
}

impl ChunkElement for Point3 {
    const SIZE: usize = 12;

    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let [x, y, z] = read_vec3(reader)?;
        Ok(Point3::new(x, y, z))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_vec3(writer, [self.x, self.y, self.z])
    }
}

impl ChunkElement for Vector3 {
    const SIZE: usize = 12;

    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let [x, y, z] = read_vec3(reader)?;
        Ok(Vector3::new(x, y, z))
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write_vec3(writer, [self.x, self.y, self.z])
    }
}

impl ChunkElement for [u32; 3] {
    const SIZE: usize = 12;

    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok([
            reader.read_u32::<LE>()?,
            reader.read_u32::<LE>()?,
            reader.read_u32::<LE>()?,
        ])
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for &i in self {
            writer.write_u32::<LE>(i)?;
        }
        Ok(())
    }
}

impl ChunkElement for u8 {
    const SIZE: usize = 1;

    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        reader.read_u8()
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writer.write_u8(*self)
    }
}

fn tag_name(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).into_owned()
}

/// Reads a chunk tagged `tag` and decodes its elements.
///
/// # Errors
///
/// Returns an error if the tag differs, the byte count is not a multiple of
/// the element size, or the body is shorter than declared.
pub fn read_chunk<T: ChunkElement, R: Read>(
    reader: &mut R,
    tag: &[u8; 4],
) -> Result<Vec<T>, ChunkError> {
    let mut found = [0u8; 4];
    reader.read_exact(&mut found)?;
    if &found != tag {
        return Err(ChunkError::UnexpectedTag {
            expected: tag_name(tag),
            found: tag_name(&found),
        });
    }

    let declared = reader.read_u32::<LE>()?;
    let size = declared as usize;
    if size % T::SIZE != 0 {
        return Err(ChunkError::Misaligned {
            tag: tag_name(tag),
            size,
            element: T::SIZE,
        });
    }

    let mut body = Vec::new();
    reader.by_ref().take(u64::from(declared)).read_to_end(&mut body)?;
    if body.len() != size {
        return Err(ChunkError::Truncated {
            tag: tag_name(tag),
            expected: size,
            actual: body.len(),
        });
    }

    let mut cursor = body.as_slice();
    (0..size / T::SIZE)
        .map(|_| T::read_from(&mut cursor).map_err(ChunkError::from))
        .collect()
}

/// Writes `elements` as a chunk tagged `tag`.
///
/// # Errors
///
/// Returns an error if the chunk is too large for its header or the writer
/// fails.
pub fn write_chunk<T: ChunkElement, W: Write>(
    writer: &mut W,
    tag: &[u8; 4],
    elements: &[T],
) -> Result<(), ChunkError> {
    let bytes = elements.len() * T::SIZE;
    let size = u32::try_from(bytes).map_err(|_| ChunkError::TooLarge {
        tag: tag_name(tag),
        size: bytes,
    })?;

    writer.write_all(tag)?;
    writer.write_u32::<LE>(size)?;
    for element in elements {
        element.write_to(writer)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn reads_what_was_written() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, b"tri0", &[[0u32, 1, 2], [2, 1, 3]]).unwrap();
        assert_eq!(buf.len(), 8 + 24);
        assert_eq!(&buf[..4], b"tri0");
        assert_eq!(&buf[4..8], &24u32.to_le_bytes());

        let tris: Vec<[u32; 3]> = read_chunk(&mut buf.as_slice(), b"tri0").unwrap();
        assert_eq!(tris, vec![[0, 1, 2], [2, 1, 3]]);
    }

    #[test]
    fn positions_are_stored_as_f32() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, b"p...", &[Point3::new(1.5, -2.0, 0.25)]).unwrap();
        assert_eq!(&buf[8..12], &1.5f32.to_le_bytes());

        let points: Vec<Point3> = read_chunk(&mut buf.as_slice(), b"p...").unwrap();
        assert_eq!(points, vec![Point3::new(1.5, -2.0, 0.25)]);
    }

    #[test]
    fn wrong_tag_is_rejected() {
        let mut buf = Vec::new();
        write_chunk(&mut buf, b"str0", b"abc".as_slice()).unwrap();
        let err = read_chunk::<u8, _>(&mut buf.as_slice(), b"idxA").unwrap_err();
        assert!(matches!(
            err,
            ChunkError::UnexpectedTag { ref expected, ref found } if expected == "idxA" && found == "str0"
        ));
    }

    #[test]
    fn misaligned_size_is_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"tri0");
        buf.extend_from_slice(&13u32.to_le_bytes());
        buf.extend_from_slice(&[0u8; 13]);
        let err = read_chunk::<[u32; 3], _>(&mut buf.as_slice(), b"tri0").unwrap_err();
        assert!(matches!(
            err,
            ChunkError::Misaligned {
                size: 13,
                element: 12,
                ..
            }
        ));
    }

    #[test]
    fn short_body_is_rejected() {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"str0");
        buf.extend_from_slice(&10u32.to_le_bytes());
        buf.extend_from_slice(b"short");
        let err = read_chunk::<u8, _>(&mut buf.as_slice(), b"str0").unwrap_err();
        assert!(matches!(
            err,
            ChunkError::Truncated {
                expected: 10,
                actual: 5,
                ..
            }
        ));
    }

    #[test]
    fn missing_header_is_io_error() {
        let err = read_chunk::<u8, _>(&mut [0u8; 2].as_slice(), b"str0").unwrap_err();
        assert!(matches!(err, ChunkError::Io(_)));
    }
}
