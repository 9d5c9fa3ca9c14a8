use std::path::Path;

use serde::Serialize;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::unity::catalog::{EntryId, FileCatalog};
use crate::unity::crc32::Crc32;
use crate::unity::decoders::{DecodeCx, decode_object};
use crate::unity::fs::{ByteSource, FileApi, SerializedFile};
use crate::unity::objects::{ObjectRecord, ObjectStore};
use crate::unity::reader::FieldReader;
use crate::unity::resolve::ReferenceResolver;
use crate::unity::{Result, UnityError};

const READ_CHUNK: usize = 64 * 1024;

/// Outcome of one directory scan: the decoded object graph plus the
/// best-effort counters for everything that was skipped or dropped.
#[derive(Debug, Default, Serialize)]
pub struct ScanReport {
	/// Decoded objects keyed by global identity.
	pub store: ObjectStore,
	/// Every file and archive entry touched by the scan.
	pub catalog: FileCatalog,
	/// Files matched by the walk.
	pub files_scanned: u32,
	/// Files that mounted as archives.
	pub archives_mounted: u32,
	/// Objects decoded and stored.
	pub objects_decoded: u64,
	/// Objects dropped because their identity was already taken.
	pub duplicates: u64,
	/// Files skipped as unreadable or unsupported.
	pub skipped_files: u32,
	/// Objects skipped for missing schemas or decode failures.
	pub skipped_objects: u64,
}

/// Walks a build-output directory and assembles the global object store.
///
/// Scanning is strictly sequential: files are processed in walk order and
/// objects in file order, so global identities are deterministic for one
/// traversal order. The pooled read buffer and the resolver are the only
/// state carried across files; [`ObjectGraphBuilder::cleanup`] resets both
/// before the builder is reused for a new session.
pub struct ObjectGraphBuilder<'fs> {
	api: &'fs dyn FileApi,
	resolver: ReferenceResolver,
	read_buffer: Vec<u8>,
}

impl<'fs> ObjectGraphBuilder<'fs> {
	/// Create a builder over the given container layer.
	pub fn new(api: &'fs dyn FileApi) -> Self {
		Self {
			api,
			resolver: ReferenceResolver::new(),
			read_buffer: Vec::new(),
		}
	}

	/// Scan every file under `root` whose name matches `pattern`.
	///
	/// `pattern` supports `*` and `?` wildcards. Archives are mounted first;
	/// files that are neither archives nor serialized files are counted and
	/// skipped.
	pub fn scan(&mut self, root: &Path, pattern: &str) -> Result<ScanReport> {
		let mut report = ScanReport::default();

		let mut paths = Vec::new();
		for entry in WalkDir::new(root).sort_by_file_name() {
			let entry = entry.map_err(|err| UnityError::Io(err.into()))?;
			if !entry.file_type().is_file() {
				continue;
			}
			if matches_pattern(&entry.file_name().to_string_lossy(), pattern) {
				paths.push(entry.into_path());
			}
		}

		for path in paths {
			self.process_path(&path, &mut report)?;
		}
		Ok(report)
	}

	/// Release the pooled read buffer and reset identity interning.
	///
	/// Safe to call after a completed scan or after an aborted one.
	pub fn cleanup(&mut self) {
		self.read_buffer = Vec::new();
		self.resolver.reset();
	}

	fn process_path(&mut self, path: &Path, report: &mut ScanReport) -> Result<()> {
		let open_path = path.to_string_lossy().into_owned();
		let display = path.file_name().map_or_else(|| open_path.clone(), |name| name.to_string_lossy().into_owned());
		let file_size = std::fs::metadata(path).map_or(0, |meta| meta.len());
		report.files_scanned += 1;

		match self.api.mount_archive(&open_path) {
			Ok(archive) => {
				report.archives_mounted += 1;
				let parent = report.catalog.add_root(&open_path, &display, file_size, true);

				for entry in archive.entries() {
					if !entry.flags.is_serialized_file() {
						continue;
					}
					let entry_display = entry.path.rsplit('/').next().unwrap_or(&entry.path);
					let child = report.catalog.add_archive_entry(parent, &entry.path, entry_display, entry.size);
					match self.decode_serialized_file(&entry.path, child, report) {
						Ok(()) => {}
						Err(err @ UnityError::NotSerializedFile { .. }) => {
							report.skipped_files += 1;
							debug!(path = %entry.path, error = %err, "skipping unreadable archive entry");
						}
						Err(err) => return Err(err),
					}
				}
			}
			Err(UnityError::NotArchive { .. }) => {
				let id = report.catalog.add_root(&open_path, &display, file_size, false);
				match self.decode_serialized_file(&open_path, id, report) {
					Ok(()) => {}
					Err(UnityError::NotSerializedFile { .. }) => {
						report.skipped_files += 1;
						debug!(path = %open_path, "not a supported format, skipping");
					}
					Err(err) => return Err(err),
				}
			}
			Err(err) => return Err(err),
		}

		Ok(())
	}

	fn decode_serialized_file(&mut self, path: &str, entry: EntryId, report: &mut ScanReport) -> Result<()> {
		let file = self.api.open_serialized_file(path)?;
		let externals = file.external_references()?;

		self.resolver.begin_file(path, &externals);
		let result = self.decode_objects(&*file, entry, report);
		// The resolver scope closes before the error propagates; mid-file
		// state never leaks into the next file.
		self.resolver.end_file();
		result
	}

	fn decode_objects(&mut self, file: &dyn SerializedFile, entry: EntryId, report: &mut ScanReport) -> Result<()> {
		for descriptor in file.object_descriptors()? {
			let schema = match file.object_schema(descriptor.id) {
				Ok(schema) => schema,
				Err(UnityError::SchemaUnavailable { .. }) => {
					report.skipped_objects += 1;
					continue;
				}
				Err(err) => return Err(err),
			};

			let crc32 = self.checksum(file, descriptor.offset, descriptor.size)?;
			let source: &dyn ByteSource = file;
			let reader = FieldReader::new(source, schema.clone(), u64::try_from(descriptor.offset).unwrap_or(0));

			// An object always resolves itself through local index 0.
			let object_id = self.resolver.resolve(0, descriptor.id)?;
			let mut cx = DecodeCx {
				resolver: &mut self.resolver,
			};
			let data = match decode_object(&mut cx, &reader) {
				Ok(data) => data,
				Err(err) => {
					report.skipped_objects += 1;
					debug!(object = descriptor.id, error = %err, "object decode failed");
					continue;
				}
			};

			let record = ObjectRecord {
				object_id,
				catalog_entry: entry,
				type_name: schema.type_name.clone(),
				path_id: descriptor.id,
				size: descriptor.size,
				crc32,
				data,
			};
			if report.store.insert(record) {
				report.objects_decoded += 1;
			} else {
				if report.duplicates == 0 {
					warn!("input contains overlapping or duplicated bundles; later copies are dropped");
				}
				report.duplicates += 1;
			}
		}

		Ok(())
	}

	fn checksum(&mut self, file: &dyn SerializedFile, offset: i64, size: i64) -> Result<u32> {
		let mut offset = u64::try_from(offset).unwrap_or(0);
		let mut remaining = usize::try_from(size).unwrap_or(0);
		if self.read_buffer.len() < READ_CHUNK {
			self.read_buffer.resize(READ_CHUNK, 0);
		}

		let mut crc = Crc32::new();
		while remaining > 0 {
			let take = remaining.min(READ_CHUNK);
			let buf = &mut self.read_buffer[..take];
			file.read_at(offset, buf)?;
			crc.update(buf);
			offset += take as u64;
			remaining -= take;
		}
		Ok(crc.finish())
	}
}

/// Match a file name against a `*`/`?` wildcard pattern.
fn matches_pattern(name: &str, pattern: &str) -> bool {
	let name = name.as_bytes();
	let pattern = pattern.as_bytes();
	let (mut n, mut p) = (0, 0);
	let mut star: Option<(usize, usize)> = None;

	while n < name.len() {
		if p < pattern.len() && (pattern[p] == b'?' || pattern[p] == name[n]) {
			n += 1;
			p += 1;
		} else if p < pattern.len() && pattern[p] == b'*' {
			star = Some((p, n));
			p += 1;
		} else if let Some((star_p, star_n)) = star {
			p = star_p + 1;
			n = star_n + 1;
			star = Some((star_p, star_n + 1));
		} else {
			return false;
		}
	}

	while p < pattern.len() && pattern[p] == b'*' {
		p += 1;
	}
	p == pattern.len()
}
