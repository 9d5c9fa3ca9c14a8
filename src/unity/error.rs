use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, UnityError>;

/// Errors produced while mounting, decoding, and linking build-output data.
#[derive(Debug, Error)]
pub enum UnityError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Mount target is not an archive bundle.
	#[error("not an archive: {path}")]
	NotArchive {
		/// Path that failed to mount.
		path: String,
	},
	/// Open target is not a serialized file.
	#[error("not a serialized file: {path}")]
	NotSerializedFile {
		/// Path that failed to open.
		path: String,
	},
	/// No type schema is available for an object.
	#[error("no schema for object {object_id}")]
	SchemaUnavailable {
		/// Object id whose schema lookup failed.
		object_id: i64,
	},
	/// No schema is available for a managed reference runtime type.
	#[error("no schema for referenced type {class_name} ({namespace_name}, {assembly_name})")]
	RefTypeSchemaUnavailable {
		/// Runtime class name.
		class_name: String,
		/// Runtime namespace name.
		namespace_name: String,
		/// Runtime assembly name.
		assembly_name: String,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, source length {len}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: u64,
		/// Requested bytes.
		need: usize,
		/// Total length of the byte source.
		len: u64,
	},
	/// Array element access past the declared element count.
	#[error("element index out of range: index={index}, count={count}")]
	IndexOutOfRange {
		/// Requested element index.
		index: usize,
		/// Declared element count.
		count: usize,
	},
	/// Named field is not declared on the schema node.
	#[error("field not found: {field} on {type_name}")]
	FieldNotFound {
		/// Requested field name.
		field: String,
		/// Schema type name that was searched.
		type_name: String,
	},
	/// Enumeration requested on a node that has no elements or children.
	#[error("cannot iterate {type_name}")]
	NotIterable {
		/// Schema type name of the node.
		type_name: String,
	},
	/// Element count requested on a non-array node.
	#[error("not an array: {type_name}")]
	NotAnArray {
		/// Schema type name of the node.
		type_name: String,
	},
	/// Managed reference access requested on a non-registry node.
	#[error("not a managed reference registry: {type_name}")]
	NotARegistry {
		/// Schema type name of the node.
		type_name: String,
	},
	/// Basic type code has no supported value decode.
	#[error("unsupported basic type: {type_name}")]
	UnsupportedBasicType {
		/// Schema type name with no decodable representation.
		type_name: String,
	},
	/// Typed accessor used on a value of a different kind.
	#[error("value kind mismatch: expected {expected}, got {got}")]
	ValueMismatch {
		/// Expected logical value kind.
		expected: &'static str,
		/// Actual logical value kind.
		got: &'static str,
	},
	/// Array element count field decoded to a negative value.
	#[error("negative element count {count}")]
	NegativeElementCount {
		/// Parsed signed element count.
		count: i32,
	},
	/// Schema node shape violates the layout rules for its kind.
	#[error("malformed schema for {type_name}: {detail}")]
	MalformedSchema {
		/// Schema type name of the offending node.
		type_name: String,
		/// Short description of the violated rule.
		detail: &'static str,
	},
	/// Managed reference registry declares an unknown layout version.
	#[error("unsupported managed reference registry version {version}")]
	UnsupportedRegistryVersion {
		/// Parsed registry version.
		version: i32,
	},
	/// Reference names a local file index outside the declared external table.
	#[error("unknown local file index {index} (table has {slots} slots)")]
	UnknownLocalFileIndex {
		/// Offending local file index.
		index: i32,
		/// Slot count of the current external reference table.
		slots: usize,
	},
}
