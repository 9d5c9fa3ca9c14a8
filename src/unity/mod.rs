mod builder;
mod catalog;
mod crc32;
mod decoders;
mod error;
mod fs;
mod objects;
mod reader;
mod resolve;
mod schema;
mod value;

/// Directory scanning and object graph assembly.
pub use builder::{ObjectGraphBuilder, ScanReport};
/// File and archive-entry catalog types.
pub use catalog::{CatalogEntry, EntryId, FileCatalog};
/// Checksum utility for decoded object attributes.
pub use crc32::{Crc32, crc32};
/// Type-name decoder dispatch.
pub use decoders::{DecodeCx, decode_object};
/// Error and result aliases.
pub use error::{Result, UnityError};
/// Low-level container layer contract and its data carriers.
pub use fs::{Archive, ArchiveEntry, ArchiveEntryFlags, ByteSource, ExternalFileRef, FileApi, RawObjectDescriptor, RefTypeKey, SerializedFile};
/// Decoded object model and the global keyed store.
pub use objects::{
	AnimationClip, AudioClip, DecodedObject, FieldRef, GenericObject, Mesh, ObjectRecord, ObjectStore, Pass, ProgramKind, Shader, ShaderProgram,
	SubProgram, SubShader, Texture2D,
};
/// Schema-interpreted random-access reader.
pub use reader::{FieldIter, FieldReader, ManagedReference};
/// Cross-file reference identity interning.
pub use resolve::ReferenceResolver;
/// Type schema tree supplied by the container layer.
pub use schema::{AlignFlags, BasicType, SchemaKind, SchemaNode};
/// Decoded runtime value types.
pub use value::Value;
