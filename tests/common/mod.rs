#![allow(missing_docs, dead_code)]

//! In-memory implementation of the container layer contract, plus byte
//! payload helpers shared by the integration tests.

use std::collections::HashMap;
use std::sync::Arc;

use assetdoc::unity::{
	Archive, ArchiveEntry, ArchiveEntryFlags, ByteSource, ExternalFileRef, FileApi, RawObjectDescriptor, RefTypeKey, Result, SchemaNode,
	SerializedFile, UnityError,
};

/// Content of one in-memory serialized file.
#[derive(Default)]
pub struct MemFileData {
	pub bytes: Vec<u8>,
	pub objects: Vec<RawObjectDescriptor>,
	pub externals: Vec<ExternalFileRef>,
	pub schemas: HashMap<i64, Arc<SchemaNode>>,
	pub ref_schemas: HashMap<RefTypeKey, Arc<SchemaNode>>,
}

impl MemFileData {
	/// Register one object with its schema; the descriptor covers
	/// `offset..offset + size` of `bytes`.
	pub fn add_object(&mut self, id: i64, offset: usize, size: usize, schema: SchemaNode) {
		self.objects.push(RawObjectDescriptor {
			id,
			offset: offset as i64,
			size: size as i64,
			type_id: 0,
		});
		self.schemas.insert(id, Arc::new(schema));
	}
}

/// In-memory container layer keyed by open path.
#[derive(Default)]
pub struct MemFs {
	pub files: HashMap<String, MemFileData>,
	pub archives: HashMap<String, Vec<ArchiveEntry>>,
}

impl MemFs {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_file(&mut self, path: &str, data: MemFileData) {
		self.files.insert(path.to_owned(), data);
	}

	/// Register an archive that exposes the given serialized-file entries.
	pub fn add_archive(&mut self, path: &str, entry_paths: &[&str]) {
		let entries = entry_paths
			.iter()
			.map(|entry_path| ArchiveEntry {
				path: (*entry_path).into(),
				size: self.files.get(*entry_path).map_or(0, |data| data.bytes.len() as u64),
				flags: ArchiveEntryFlags(ArchiveEntryFlags::SERIALIZED_FILE),
			})
			.collect();
		self.archives.insert(path.to_owned(), entries);
	}
}

impl FileApi for MemFs {
	fn open_serialized_file(&self, path: &str) -> Result<Box<dyn SerializedFile + '_>> {
		let data = self.files.get(path).ok_or_else(|| UnityError::NotSerializedFile { path: path.to_owned() })?;
		Ok(Box::new(MemFile { data }))
	}

	fn mount_archive(&self, path: &str) -> Result<Box<dyn Archive + '_>> {
		let entries = self.archives.get(path).ok_or_else(|| UnityError::NotArchive { path: path.to_owned() })?;
		Ok(Box::new(MemArchive { entries: entries.clone() }))
	}
}

struct MemFile<'a> {
	data: &'a MemFileData,
}

impl ByteSource for MemFile<'_> {
	fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
		self.data.bytes.as_slice().read_at(offset, buf)
	}

	fn ref_type_schema(&self, key: &RefTypeKey) -> Result<Arc<SchemaNode>> {
		self.data.ref_schemas.get(key).cloned().ok_or_else(|| UnityError::RefTypeSchemaUnavailable {
			class_name: key.class_name.to_string(),
			namespace_name: key.namespace_name.to_string(),
			assembly_name: key.assembly_name.to_string(),
		})
	}
}

impl SerializedFile for MemFile<'_> {
	fn object_descriptors(&self) -> Result<Vec<RawObjectDescriptor>> {
		Ok(self.data.objects.clone())
	}

	fn external_references(&self) -> Result<Vec<ExternalFileRef>> {
		Ok(self.data.externals.clone())
	}

	fn object_schema(&self, object_id: i64) -> Result<Arc<SchemaNode>> {
		self.data.schemas.get(&object_id).cloned().ok_or(UnityError::SchemaUnavailable { object_id })
	}
}

struct MemArchive {
	entries: Vec<ArchiveEntry>,
}

impl Archive for MemArchive {
	fn entries(&self) -> &[ArchiveEntry] {
		&self.entries
	}
}

/// Wrap an element schema the way serializers wrap sequence fields.
pub fn vector_of(field: &str, element: SchemaNode) -> SchemaNode {
	SchemaNode::object("vector", field, vec![SchemaNode::array("Array", element)])
}

pub fn put_i32(buf: &mut Vec<u8>, value: i32) {
	buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_u32(buf: &mut Vec<u8>, value: u32) {
	buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_u16(buf: &mut Vec<u8>, value: u16) {
	buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_i64(buf: &mut Vec<u8>, value: i64) {
	buf.extend_from_slice(&value.to_le_bytes());
}

pub fn put_f32(buf: &mut Vec<u8>, value: f32) {
	buf.extend_from_slice(&value.to_le_bytes());
}

/// Append a length-prefixed string padded to 4-byte alignment.
pub fn put_str(buf: &mut Vec<u8>, text: &str) {
	put_u32(buf, text.len() as u32);
	buf.extend_from_slice(text.as_bytes());
	pad4(buf);
}

/// Pad the buffer to the next 4-byte boundary.
pub fn pad4(buf: &mut Vec<u8>) {
	while buf.len() % 4 != 0 {
		buf.push(0);
	}
}
