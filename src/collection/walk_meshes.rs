use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use byteorder::{ReadBytesExt, WriteBytesExt, LE};
use slotmap::SlotMap;
use tracing::{debug, warn};

use crate::error::{ChunkError, LoadError, LookupError, Result};
use crate::math::{Point3, Vector3};
use crate::mesh::WalkMesh;

use super::chunk::{read_chunk, write_chunk, ChunkElement};

slotmap::new_key_type! {
    /// Unique identifier for a walk surface in a [`WalkMeshes`] collection.
    pub struct SurfaceId;
}

/// One row of the `idxA` chunk: half-open ranges into the shared pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexEntry {
    pub name_begin: u32,
    pub name_end: u32,
    pub vertex_begin: u32,
    pub vertex_end: u32,
    pub triangle_begin: u32,
    pub triangle_end: u32,
}

impl ChunkElement for IndexEntry {
    const SIZE: usize = 24;

    fn read_from<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        Ok(Self {
            name_begin: reader.read_u32::<LE>()?,
            name_end: reader.read_u32::<LE>()?,
            vertex_begin: reader.read_u32::<LE>()?,
            vertex_end: reader.read_u32::<LE>()?,
            triangle_begin: reader.read_u32::<LE>()?,
            triangle_end: reader.read_u32::<LE>()?,
        })
    }

    fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for v in [
            self.name_begin,
            self.name_end,
            self.vertex_begin,
            self.vertex_end,
            self.triangle_begin,
            self.triangle_end,
        ] {
            writer.write_u32::<LE>(v)?;
        }
        Ok(())
    }
}

/// Chunk tags, in file order.
const POSITIONS: &[u8; 4] = b"p...";
const NORMALS: &[u8; 4] = b"n...";
const TRIANGLES: &[u8; 4] = b"tri0";
const NAMES: &[u8; 4] = b"str0";
const INDEX: &[u8; 4] = b"idxA";

/// Named walk surfaces loaded from one packed resource.
#[derive(Debug, Default)]
pub struct WalkMeshes {
    meshes: SlotMap<SurfaceId, WalkMesh>,
    names: HashMap<String, SurfaceId>,
}

impl WalkMeshes {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a packed walk surface file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or its contents fail
    /// validation (see [`WalkMeshes::from_reader`]).
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(ChunkError::from)?;
        Self::from_reader(BufReader::new(file), &path.display().to_string())
    }

    /// Reads a packed collection; `resource` names the source in errors.
    ///
    /// Chunks are read in order `p...`, `n...`, `tri0`, `str0`, `idxA`.
    /// Bytes after the index only produce a warning.
    ///
    /// # Errors
    ///
    /// Returns an error if a chunk is malformed, position and normal counts
    /// differ, an index entry's ranges are out of bounds, a triangle reaches
    /// outside its entry's vertex range, a name repeats or is not UTF-8, or a
    /// surface fails construction.
    pub fn from_reader<R: Read>(mut reader: R, resource: &str) -> Result<Self> {
        let vertices: Vec<Point3> = read_chunk(&mut reader, POSITIONS)?;
        let normals: Vec<Vector3> = read_chunk(&mut reader, NORMALS)?;
        let triangles: Vec<[u32; 3]> = read_chunk(&mut reader, TRIANGLES)?;
        let names: Vec<u8> = read_chunk(&mut reader, NAMES)?;
        let index: Vec<IndexEntry> = read_chunk(&mut reader, INDEX)?;

        let mut probe = [0u8; 1];
        if reader.read(&mut probe).map_err(ChunkError::from)? != 0 {
            warn!(resource, "trailing data in walk surface file");
        }

        if vertices.len() != normals.len() {
            return Err(LoadError::MismatchedSizes {
                resource: resource.into(),
                positions: vertices.len(),
                normals: normals.len(),
            }
            .into());
        }

        let mut collection = Self::new();
        for entry in &index {
            let name_range =
                checked_range(resource, "name", entry.name_begin, entry.name_end, names.len())?;
            let vertex_range = checked_range(
                resource,
                "vertex",
                entry.vertex_begin,
                entry.vertex_end,
                vertices.len(),
            )?;
            let triangle_range = checked_range(
                resource,
                "triangle",
                entry.triangle_begin,
                entry.triangle_end,
                triangles.len(),
            )?;

            let local_triangles = triangle_range
                .map(|triangle| {
                    let tri = triangles[triangle];
                    if tri.iter().all(|&i| entry.vertex_begin <= i && i < entry.vertex_end) {
                        Ok(tri.map(|i| i - entry.vertex_begin))
                    } else {
                        Err(LoadError::TriangleOutsideRange {
                            resource: resource.into(),
                            triangle,
                        })
                    }
                })
                .collect::<std::result::Result<Vec<_>, _>>()?;

            let name = std::str::from_utf8(&names[name_range])
                .map_err(|_| LoadError::InvalidName {
                    resource: resource.into(),
                })?
                .to_owned();

            let mesh = WalkMesh::new(
                vertices[vertex_range.clone()].to_vec(),
                normals[vertex_range].to_vec(),
                local_triangles,
            )
            .map_err(|source| LoadError::Mesh {
                resource: resource.into(),
                name: name.clone(),
                source,
            })?;

            if collection.names.contains_key(&name) {
                return Err(LoadError::DuplicateName {
                    resource: resource.into(),
                    name,
                }
                .into());
            }

            debug!(
                resource,
                name = %name,
                vertices = mesh.vertices().len(),
                triangles = mesh.triangles().len(),
                "loaded walk surface"
            );
            collection.insert_unchecked(name, mesh);
        }

        Ok(collection)
    }

    /// Adds a surface under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already taken.
    pub fn insert(&mut self, name: &str, mesh: WalkMesh) -> Result<SurfaceId> {
        if self.names.contains_key(name) {
            return Err(LoadError::DuplicateName {
                resource: "<memory>".into(),
                name: name.into(),
            }
            .into());
        }
        Ok(self.insert_unchecked(name.to_owned(), mesh))
    }

    fn insert_unchecked(&mut self, name: String, mesh: WalkMesh) -> SurfaceId {
        let id = self.meshes.insert(mesh);
        self.names.insert(name, id);
        id
    }

    /// Returns the surface called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no surface has that name.
    pub fn lookup(&self, name: &str) -> std::result::Result<&WalkMesh, LookupError> {
        let id = self.id(name)?;
        self.get(id)
    }

    /// Returns the id of the surface called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if no surface has that name.
    pub fn id(&self, name: &str) -> std::result::Result<SurfaceId, LookupError> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| LookupError::NameNotFound(name.into()))
    }

    /// Returns the surface with the given id.
    ///
    /// # Errors
    ///
    /// Returns an error if the id does not belong to this collection.
    pub fn get(&self, id: SurfaceId) -> std::result::Result<&WalkMesh, LookupError> {
        self.meshes.get(id).ok_or(LookupError::IdNotFound)
    }

    /// Iterates over the surface names, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    /// Number of surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Returns `true` if the collection holds no surfaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Writes the collection in the packed format read by
    /// [`WalkMeshes::from_reader`]. Surfaces are written in name order.
    ///
    /// # Errors
    ///
    /// Returns an error if a pool outgrows `u32` offsets or the writer fails.
    pub fn write_to<W: Write>(&self, mut writer: W) -> std::result::Result<(), ChunkError> {
        let mut sorted: Vec<(&String, &SurfaceId)> = self.names.iter().collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let mut vertices = Vec::new();
        let mut normals = Vec::new();
        let mut triangles = Vec::new();
        let mut names = Vec::new();
        let mut index = Vec::new();

        for (name, &id) in sorted {
            let Some(mesh) = self.meshes.get(id) else {
                continue;
            };
            let name_begin = offset(NAMES, names.len())?;
            let vertex_begin = offset(POSITIONS, vertices.len())?;
            let triangle_begin = offset(TRIANGLES, triangles.len())?;

            names.extend_from_slice(name.as_bytes());
            vertices.extend_from_slice(mesh.vertices());
            normals.extend_from_slice(mesh.normals());
            triangles.extend(mesh.triangles().iter().map(|tri| tri.map(|i| i + vertex_begin)));

            index.push(IndexEntry {
                name_begin,
                name_end: offset(NAMES, names.len())?,
                vertex_begin,
                vertex_end: offset(POSITIONS, vertices.len())?,
                triangle_begin,
                triangle_end: offset(TRIANGLES, triangles.len())?,
            });
        }

        write_chunk(&mut writer, POSITIONS, &vertices)?;
        write_chunk(&mut writer, NORMALS, &normals)?;
        write_chunk(&mut writer, TRIANGLES, &triangles)?;
        write_chunk(&mut writer, NAMES, &names)?;
        write_chunk(&mut writer, INDEX, &index)?;
        Ok(())
    }
}

fn offset(tag: &[u8; 4], len: usize) -> std::result::Result<u32, ChunkError> {
    u32::try_from(len).map_err(|_| ChunkError::TooLarge {
        tag: String::from_utf8_lossy(tag).into_owned(),
        size: len,
    })
}

/// `begin..end` as indices into a pool of `len` entries, if in bounds.
fn checked_range(
    resource: &str,
    field: &'static str,
    begin: u32,
    end: u32,
    len: usize,
) -> std::result::Result<std::ops::Range<usize>, LoadError> {
    let (b, e) = (begin as usize, end as usize);
    if b <= e && e <= len {
        Ok(b..e)
    } else {
        Err(LoadError::InvalidRange {
            resource: resource.into(),
            field,
            begin,
            end,
            len,
        })
    }
}
