use serde::Serialize;

/// Index of one entry in a [`FileCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntryId(pub u32);

/// One physical file or one serialized file inside a mounted archive.
#[derive(Debug, Serialize)]
pub struct CatalogEntry {
	/// Path the entry was opened under (filesystem or mounted virtual path).
	pub open_path: Box<str>,
	/// Display name relative to the scan root or archive.
	pub display_name: Box<str>,
	/// Payload size in bytes.
	pub size: u64,
	/// Whether this entry is an archive bundle.
	pub is_archive: bool,
	/// Containing archive, when the entry came from one. Display-only
	/// relation; ownership runs archive to entries.
	pub parent: Option<EntryId>,
	/// Contained serialized files, for archive entries.
	pub children: Vec<EntryId>,
}

/// Flat table of every file touched by one scan.
///
/// Containment is expressed through indices rather than references, so
/// archive entries and their children never form ownership cycles.
#[derive(Debug, Default, Serialize)]
pub struct FileCatalog {
	entries: Vec<CatalogEntry>,
}

impl FileCatalog {
	/// Create an empty catalog.
	pub fn new() -> Self {
		Self::default()
	}

	/// Record a top-level file discovered by the directory walk.
	pub fn add_root(&mut self, open_path: &str, display_name: &str, size: u64, is_archive: bool) -> EntryId {
		self.push(CatalogEntry {
			open_path: open_path.into(),
			display_name: display_name.into(),
			size,
			is_archive,
			parent: None,
			children: Vec::new(),
		})
	}

	/// Record one serialized file contained in a mounted archive.
	pub fn add_archive_entry(&mut self, parent: EntryId, open_path: &str, display_name: &str, size: u64) -> EntryId {
		let id = self.push(CatalogEntry {
			open_path: open_path.into(),
			display_name: display_name.into(),
			size,
			is_archive: false,
			parent: Some(parent),
			children: Vec::new(),
		});
		self.entries[parent.0 as usize].children.push(id);
		id
	}

	/// Look up one entry.
	pub fn entry(&self, id: EntryId) -> &CatalogEntry {
		&self.entries[id.0 as usize]
	}

	/// Render a display path, prefixing the containing archive when present.
	pub fn display_path(&self, id: EntryId) -> String {
		let entry = self.entry(id);
		match entry.parent {
			Some(parent) => format!("{}:{}", self.entry(parent).display_name, entry.display_name),
			None => entry.display_name.to_string(),
		}
	}

	/// Number of recorded entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Return whether the catalog is empty.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterate entries with their ids in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (EntryId, &CatalogEntry)> {
		self.entries.iter().enumerate().map(|(index, entry)| (EntryId(index as u32), entry))
	}

	fn push(&mut self, entry: CatalogEntry) -> EntryId {
		let id = EntryId(self.entries.len() as u32);
		self.entries.push(entry);
		id
	}
}
