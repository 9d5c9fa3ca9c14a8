#![allow(missing_docs)]

mod common;

use std::path::Path;

use assetdoc::unity::{DecodedObject, ExternalFileRef, ObjectGraphBuilder, ObjectRecord, SchemaNode, ScanReport};
use common::{MemFileData, MemFs, put_i32, put_i64, put_str};

fn named_object_schema(type_name: &str) -> SchemaNode {
	SchemaNode::object(type_name, "Base", vec![SchemaNode::string("m_Name")])
}

fn named_object_bytes(name: &str) -> Vec<u8> {
	let mut bytes = Vec::new();
	put_str(&mut bytes, name);
	bytes
}

fn generic_name(record: &ObjectRecord) -> Option<&str> {
	match &record.data {
		DecodedObject::Generic(object) => object.name.as_deref(),
		_ => None,
	}
}

fn scan(fs: &MemFs, root: &Path, pattern: &str) -> ScanReport {
	let _ = tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).with_test_writer().try_init();

	let mut builder = ObjectGraphBuilder::new(fs);
	let report = builder.scan(root, pattern).expect("scan completes");
	builder.cleanup();
	report
}

#[test]
fn duplicated_archives_keep_each_object_once() {
	let dir = tempfile::tempdir().expect("tempdir");
	for sub in ["sub1", "sub2"] {
		let folder = dir.path().join(sub);
		std::fs::create_dir(&folder).expect("mkdir");
		std::fs::write(folder.join("data.bundle"), b"bundle bytes").expect("write");
	}

	let mut data = MemFileData::default();
	let mut bytes = named_object_bytes("ObjA");
	let second_offset = bytes.len();
	bytes.extend_from_slice(&named_object_bytes("ObjB"));
	data.add_object(101, 0, second_offset, named_object_schema("GameObject"));
	data.add_object(102, second_offset, bytes.len() - second_offset, named_object_schema("GameObject"));
	data.bytes = bytes;

	let mut fs = MemFs::new();
	fs.add_file("archive:/CAB-dup", data);
	for sub in ["sub1", "sub2"] {
		let path = dir.path().join(sub).join("data.bundle");
		fs.add_archive(&path.to_string_lossy(), &["archive:/CAB-dup"]);
	}

	let report = scan(&fs, dir.path(), "*");
	assert_eq!(report.files_scanned, 2);
	assert_eq!(report.archives_mounted, 2);
	assert_eq!(report.objects_decoded, 2);
	assert_eq!(report.duplicates, 2);
	assert_eq!(report.store.len(), 2);

	let mut names: Vec<&str> = report.store.iter().filter_map(generic_name).collect();
	names.sort_unstable();
	assert_eq!(names, vec!["ObjA", "ObjB"]);
	assert_eq!(report.catalog.len(), 4);
}

#[test]
fn cross_file_references_resolve_to_one_identity() {
	let dir = tempfile::tempdir().expect("tempdir");
	std::fs::write(dir.path().join("a.assets"), b"a").expect("write");
	std::fs::write(dir.path().join("b.assets"), b"b").expect("write");

	let reference = SchemaNode::object(
		"PPtr<GameObject>",
		"m_Target",
		vec![SchemaNode::basic("int", "m_FileID"), SchemaNode::basic("SInt64", "m_PathID")],
	);
	let holder_schema = SchemaNode::object("Transform", "Base", vec![SchemaNode::string("m_Name"), reference]);

	let mut holder = MemFileData::default();
	let mut bytes = Vec::new();
	put_str(&mut bytes, "Root");
	put_i32(&mut bytes, 1);
	put_i64(&mut bytes, 42);
	let size = bytes.len();
	holder.bytes = bytes;
	holder.objects.push(assetdoc::unity::RawObjectDescriptor {
		id: 1,
		offset: 0,
		size: size as i64,
		type_id: 0,
	});
	holder.schemas.insert(1, std::sync::Arc::new(holder_schema));
	holder.externals.push(ExternalFileRef { path: "b.assets".into() });

	let mut target = MemFileData::default();
	target.bytes = named_object_bytes("Leaf");
	let target_size = target.bytes.len();
	target.add_object(42, 0, target_size, named_object_schema("GameObject"));

	let mut fs = MemFs::new();
	fs.add_file(&dir.path().join("a.assets").to_string_lossy(), holder);
	fs.add_file(&dir.path().join("b.assets").to_string_lossy(), target);

	let report = scan(&fs, dir.path(), "*.assets");
	assert_eq!(report.files_scanned, 2);
	assert_eq!(report.archives_mounted, 0);
	assert_eq!(report.store.len(), 2);

	let holder_record = report.store.iter().find(|record| generic_name(record) == Some("Root")).expect("holder stored");
	let target_record = report.store.iter().find(|record| generic_name(record) == Some("Leaf")).expect("target stored");

	let DecodedObject::Generic(holder_object) = &holder_record.data else {
		panic!("expected a generic decode");
	};
	assert_eq!(holder_object.references.len(), 1);
	assert_eq!(holder_object.references[0].field.as_ref(), "m_Target");
	assert_eq!(holder_object.references[0].object_id, target_record.object_id);
	assert_ne!(holder_record.object_id, target_record.object_id);
}

#[test]
fn unsupported_files_are_skipped_not_fatal() {
	let dir = tempfile::tempdir().expect("tempdir");
	std::fs::write(dir.path().join("readme.txt"), b"not a build file").expect("write");

	let fs = MemFs::new();
	let report = scan(&fs, dir.path(), "*");
	assert_eq!(report.files_scanned, 1);
	assert_eq!(report.skipped_files, 1);
	assert!(report.store.is_empty());
}

#[test]
fn objects_without_schemas_are_counted_and_skipped() {
	let dir = tempfile::tempdir().expect("tempdir");
	std::fs::write(dir.path().join("a.assets"), b"a").expect("write");

	let mut data = MemFileData::default();
	data.bytes = named_object_bytes("Kept");
	let size = data.bytes.len();
	data.add_object(1, 0, size, named_object_schema("GameObject"));
	data.objects.push(assetdoc::unity::RawObjectDescriptor {
		id: 77,
		offset: 0,
		size: size as i64,
		type_id: 0,
	});

	let mut fs = MemFs::new();
	fs.add_file(&dir.path().join("a.assets").to_string_lossy(), data);

	let report = scan(&fs, dir.path(), "*.assets");
	assert_eq!(report.store.len(), 1);
	assert_eq!(report.skipped_objects, 1);
}

#[test]
fn scan_report_serializes_for_downstream_consumers() {
	let dir = tempfile::tempdir().expect("tempdir");
	std::fs::write(dir.path().join("a.assets"), b"a").expect("write");

	let mut data = MemFileData::default();
	data.bytes = named_object_bytes("Solo");
	let size = data.bytes.len();
	data.add_object(1, 0, size, named_object_schema("GameObject"));

	let mut fs = MemFs::new();
	fs.add_file(&dir.path().join("a.assets").to_string_lossy(), data);

	let report = scan(&fs, dir.path(), "*.assets");
	let json = serde_json::to_value(&report).expect("report serializes");
	assert_eq!(json["objects_decoded"], 1);
	assert_eq!(json["duplicates"], 0);
	assert_eq!(json["catalog"]["entries"][0]["display_name"], "a.assets");
}

#[test]
fn pattern_limits_the_walk() {
	let dir = tempfile::tempdir().expect("tempdir");
	std::fs::write(dir.path().join("a.assets"), b"a").expect("write");
	std::fs::write(dir.path().join("notes.md"), b"notes").expect("write");

	let mut data = MemFileData::default();
	data.bytes = named_object_bytes("Only");
	let size = data.bytes.len();
	data.add_object(1, 0, size, named_object_schema("GameObject"));

	let mut fs = MemFs::new();
	fs.add_file(&dir.path().join("a.assets").to_string_lossy(), data);

	let report = scan(&fs, dir.path(), "*.assets");
	assert_eq!(report.files_scanned, 1);
	assert_eq!(report.skipped_files, 0);
	assert_eq!(report.store.len(), 1);
}
