use std::collections::HashMap;

use crate::unity::fs::ExternalFileRef;
use crate::unity::{Result, UnityError};

/// Process-wide identity interner for files and object references.
///
/// Every distinct file basename (case-insensitive) receives one global file
/// id, and every `(global file id, path id)` pair receives one global object
/// id, both assigned in first-seen order. Identities are stable for the
/// duration of one scan session only; they depend on traversal order and
/// must not be persisted across sessions.
///
/// Resolution is scoped: [`ReferenceResolver::begin_file`] installs the
/// declaring file's external reference table, [`ReferenceResolver::end_file`]
/// tears it down. Using the resolver outside that window is a programming
/// error and panics.
#[derive(Debug, Default)]
pub struct ReferenceResolver {
	file_ids: HashMap<Box<str>, i32>,
	object_ids: HashMap<(i32, i64), i64>,
	scope: Option<Vec<i32>>,
}

impl ReferenceResolver {
	/// Create an empty resolver.
	pub fn new() -> Self {
		Self::default()
	}

	/// Open the resolution scope for one serialized file.
	///
	/// Slot 0 of the local-index table is the file itself; slots 1..N mirror
	/// the declared external references in declaration order.
	pub fn begin_file(&mut self, filename: &str, externals: &[ExternalFileRef]) {
		assert!(self.scope.is_none(), "begin_file called while a file scope is already open");

		let mut table = Vec::with_capacity(externals.len() + 1);
		table.push(self.intern_file(filename));
		for reference in externals {
			table.push(self.intern_file(&reference.path));
		}
		self.scope = Some(table);
	}

	/// Resolve a `(local file index, path id)` pair to a global object id.
	pub fn resolve(&mut self, local_file_index: i32, path_id: i64) -> Result<i64> {
		let scope = self.scope.as_ref().expect("resolve called outside a file scope");

		let slot = usize::try_from(local_file_index)
			.ok()
			.and_then(|index| scope.get(index).copied())
			.ok_or(UnityError::UnknownLocalFileIndex {
				index: local_file_index,
				slots: scope.len(),
			})?;

		let next = self.object_ids.len() as i64 + 1;
		Ok(*self.object_ids.entry((slot, path_id)).or_insert(next))
	}

	/// Close the current file's resolution scope.
	pub fn end_file(&mut self) {
		assert!(self.scope.take().is_some(), "end_file called without a matching begin_file");
	}

	/// Wipe every interning table for a new scan session.
	pub fn reset(&mut self) {
		self.file_ids.clear();
		self.object_ids.clear();
		self.scope = None;
	}

	/// Number of distinct files interned so far.
	pub fn file_count(&self) -> usize {
		self.file_ids.len()
	}

	/// Number of distinct object identities interned so far.
	pub fn object_count(&self) -> usize {
		self.object_ids.len()
	}

	fn intern_file(&mut self, path: &str) -> i32 {
		let name = path.rsplit(['/', '\\']).next().unwrap_or(path).to_lowercase();
		let next = self.file_ids.len() as i32;
		*self.file_ids.entry(name.into_boxed_str()).or_insert(next)
	}
}
