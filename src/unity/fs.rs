use std::sync::Arc;

use crate::unity::schema::SchemaNode;
use crate::unity::{Result, UnityError};

/// Position and identity of one object inside a serialized file.
#[derive(Debug, Clone, Copy)]
pub struct RawObjectDescriptor {
	/// File-local object id (path id).
	pub id: i64,
	/// Byte offset of the object data within the file.
	pub offset: i64,
	/// Byte length of the object data.
	pub size: i64,
	/// Serializer type id, informational only.
	pub type_id: i32,
}

/// One declared cross-file dependency of a serialized file.
///
/// Declaration order is semantically significant: it defines the local file
/// index slots 1..N used by references inside the declaring file.
#[derive(Debug, Clone)]
pub struct ExternalFileRef {
	/// Declared dependency path as stored in the file.
	pub path: Box<str>,
}

/// Identity of a managed reference runtime type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefTypeKey {
	/// Runtime class name.
	pub class_name: Box<str>,
	/// Runtime namespace name.
	pub namespace_name: Box<str>,
	/// Runtime assembly name.
	pub assembly_name: Box<str>,
}

/// Classification flags for one archive entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArchiveEntryFlags(pub u32);

impl ArchiveEntryFlags {
	/// Entry is a directory node.
	pub const DIRECTORY: u32 = 1 << 0;
	/// Entry contains a serialized file.
	pub const SERIALIZED_FILE: u32 = 1 << 1;

	/// Return whether the entry contains a serialized file.
	pub fn is_serialized_file(self) -> bool {
		self.0 & Self::SERIALIZED_FILE != 0
	}
}

/// One mounted archive entry.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
	/// Mounted virtual path of the entry.
	pub path: Box<str>,
	/// Payload size in bytes.
	pub size: u64,
	/// Entry classification flags.
	pub flags: ArchiveEntryFlags,
}

/// Random-access raw byte reads over one serialized file.
pub trait ByteSource {
	/// Fill `buf` starting at absolute byte `offset`.
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

	/// Fetch the schema root for a managed reference runtime type.
	///
	/// Sources without schema access keep the default, which reports the
	/// lookup as unavailable.
	fn ref_type_schema(&self, key: &RefTypeKey) -> Result<Arc<SchemaNode>> {
		Err(UnityError::RefTypeSchemaUnavailable {
			class_name: key.class_name.to_string(),
			namespace_name: key.namespace_name.to_string(),
			assembly_name: key.assembly_name.to_string(),
		})
	}
}

impl ByteSource for [u8] {
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		let start = usize::try_from(offset).map_err(|_| UnityError::UnexpectedEof {
			at: offset,
			need: buf.len(),
			len: self.len() as u64,
		})?;
		let end = start.checked_add(buf.len());
		match end.and_then(|end| self.get(start..end)) {
			Some(bytes) => {
				buf.copy_from_slice(bytes);
				Ok(())
			}
			None => Err(UnityError::UnexpectedEof {
				at: offset,
				need: buf.len(),
				len: self.len() as u64,
			}),
		}
	}
}

impl<T: ByteSource + ?Sized> ByteSource for &T {
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		(**self).read_at(offset, buf)
	}

	fn ref_type_schema(&self, key: &RefTypeKey) -> Result<Arc<SchemaNode>> {
		(**self).ref_type_schema(key)
	}
}

/// One opened serialized file, as exposed by the low-level container layer.
///
/// The handle owns whatever native state backs it; dropping it releases the
/// file on every exit path.
pub trait SerializedFile: ByteSource {
	/// List every contained object in file order.
	fn object_descriptors(&self) -> Result<Vec<RawObjectDescriptor>>;

	/// List the declared cross-file dependencies in declaration order.
	fn external_references(&self) -> Result<Vec<ExternalFileRef>>;

	/// Fetch the schema root describing one object's layout.
	fn object_schema(&self, object_id: i64) -> Result<Arc<SchemaNode>>;
}

/// One mounted archive. Entries stay readable while the handle is alive.
pub trait Archive {
	/// List the archive's entries under their mounted virtual paths.
	fn entries(&self) -> &[ArchiveEntry];
}

/// Narrow contract the decoder requires from the low-level container layer.
pub trait FileApi {
	/// Open a serialized file for structured and raw reads.
	///
	/// Fails with [`UnityError::NotSerializedFile`] when the target is not a
	/// supported serialized container.
	fn open_serialized_file(&self, path: &str) -> Result<Box<dyn SerializedFile + '_>>;

	/// Mount an archive bundle and list its entries.
	///
	/// Fails with [`UnityError::NotArchive`] when the target is not an
	/// archive; entries flagged as serialized files can then be opened via
	/// [`FileApi::open_serialized_file`] under their virtual paths.
	fn mount_archive(&self, path: &str) -> Result<Box<dyn Archive + '_>>;
}

#[cfg(test)]
mod tests {
	use super::{ArchiveEntryFlags, ByteSource};

	#[test]
	fn slice_source_reads_in_bounds_and_reports_eof() {
		let bytes = [1_u8, 2, 3, 4];
		let source: &[u8] = &bytes;

		let mut buf = [0_u8; 2];
		source.read_at(1, &mut buf).expect("in bounds");
		assert_eq!(buf, [2, 3]);

		let mut buf = [0_u8; 4];
		let err = source.read_at(2, &mut buf).expect_err("past end");
		assert!(err.to_string().contains("unexpected eof"));
	}

	#[test]
	fn serialized_file_flag_is_detected() {
		assert!(ArchiveEntryFlags(ArchiveEntryFlags::SERIALIZED_FILE).is_serialized_file());
		assert!(!ArchiveEntryFlags(ArchiveEntryFlags::DIRECTORY).is_serialized_file());
	}
}
