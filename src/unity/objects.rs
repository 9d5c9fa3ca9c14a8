use std::collections::HashMap;

use serde::Serialize;

use crate::unity::catalog::EntryId;

/// One decoded object inserted into the global store.
#[derive(Debug, Serialize)]
pub struct ObjectRecord {
	/// Global object identity assigned by the reference resolver.
	pub object_id: i64,
	/// Catalog entry of the serialized file the object came from.
	pub catalog_entry: EntryId,
	/// Declared type name from the object's schema root.
	pub type_name: Box<str>,
	/// File-local path id.
	pub path_id: i64,
	/// Raw byte size of the object data.
	pub size: i64,
	/// CRC-32 of the object's raw byte range.
	pub crc32: u32,
	/// Type-specific decoded payload.
	pub data: DecodedObject,
}

/// Decoded payload for one object, by declared type.
#[derive(Debug, Serialize)]
pub enum DecodedObject {
	/// Fallback decode preserving generically resolvable fields.
	Generic(GenericObject),
	/// Animation clip summary.
	AnimationClip(AnimationClip),
	/// Audio clip summary.
	AudioClip(AudioClip),
	/// Mesh geometry summary.
	Mesh(Mesh),
	/// Shader program tree with interned keywords.
	Shader(Shader),
	/// Two-dimensional texture summary.
	Texture2D(Texture2D),
}

impl DecodedObject {
	/// Decoded object name when the type carries one.
	pub fn name(&self) -> Option<&str> {
		match self {
			Self::Generic(object) => object.name.as_deref(),
			Self::AnimationClip(clip) => Some(&clip.name),
			Self::AudioClip(clip) => Some(&clip.name),
			Self::Mesh(mesh) => Some(&mesh.name),
			Self::Shader(shader) => Some(&shader.name),
			Self::Texture2D(texture) => Some(&texture.name),
		}
	}
}

/// Fallback decode for types without a specialized decoder.
#[derive(Debug, Default, Serialize)]
pub struct GenericObject {
	/// Leading `m_Name` field when the type declares one.
	pub name: Option<Box<str>>,
	/// Resolved top-level reference fields.
	pub references: Vec<FieldRef>,
}

/// One resolved reference field on a generically decoded object.
#[derive(Debug, Serialize)]
pub struct FieldRef {
	/// Declaring field name.
	pub field: Box<str>,
	/// Global identity of the referenced object.
	pub object_id: i64,
}

/// Decoded animation clip fields.
#[derive(Debug, Serialize)]
pub struct AnimationClip {
	/// Clip name.
	pub name: Box<str>,
	/// Whether the clip uses the legacy animation system.
	pub legacy: bool,
	/// Number of embedded animation events.
	pub events: u32,
}

/// Decoded audio clip fields.
#[derive(Debug, Serialize)]
pub struct AudioClip {
	/// Clip name.
	pub name: Box<str>,
	/// Runtime load type.
	pub load_type: i32,
	/// Compression format code.
	pub format: i32,
	/// Sample frequency in Hz.
	pub frequency: i32,
	/// Channel count.
	pub channels: i32,
	/// Bits per sample.
	pub bits_per_sample: i32,
	/// Size of the streamed audio resource in bytes.
	pub stream_size: u64,
}

/// Decoded mesh fields.
#[derive(Debug, Serialize)]
pub struct Mesh {
	/// Mesh name.
	pub name: Box<str>,
	/// Vertex count.
	pub vertices: u32,
	/// Sub-mesh count.
	pub sub_meshes: u32,
	/// Index count.
	pub indices: u32,
	/// Mesh compression mode, 0 when uncompressed.
	pub compression: u8,
	/// Whether the mesh stays readable at runtime.
	pub rw_enabled: bool,
	/// Bytes per vertex across active channels.
	pub vertex_size: u32,
	/// Active vertex channel count.
	pub channels: u32,
	/// Bone count from the skin table.
	pub bones: u32,
	/// Size of the streamed vertex data in bytes.
	pub stream_size: u64,
}

/// Decoded shader with its program tree.
#[derive(Debug, Default, Serialize)]
pub struct Shader {
	/// Shader name.
	pub name: Box<str>,
	/// Decompressed blob size; averaged across graphics APIs when the
	/// schema reports one entry per API.
	pub decompressed_size: u32,
	/// Keyword names interned per shader; sub-programs store indices into
	/// this table.
	pub keywords: Vec<Box<str>>,
	/// Sub-shaders in declaration order.
	pub sub_shaders: Vec<SubShader>,
}

/// One shader sub-shader.
#[derive(Debug, Default, Serialize)]
pub struct SubShader {
	/// Passes in declaration order.
	pub passes: Vec<Pass>,
}

/// One shader pass.
#[derive(Debug, Default, Serialize)]
pub struct Pass {
	/// Pass name when the pass state declares one.
	pub name: Option<Box<str>>,
	/// Programs present on this pass.
	pub programs: Vec<ShaderProgram>,
}

/// All sub-programs of one pipeline stage on a pass.
#[derive(Debug, Serialize)]
pub struct ShaderProgram {
	/// Pipeline stage of the program.
	pub kind: ProgramKind,
	/// Compiled sub-program variants.
	pub sub_programs: Vec<SubProgram>,
}

/// Shader pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProgramKind {
	/// Vertex stage.
	Vertex,
	/// Fragment stage.
	Fragment,
	/// Geometry stage.
	Geometry,
	/// Hull stage.
	Hull,
	/// Domain stage.
	Domain,
	/// Ray tracing stage.
	RayTracing,
}

impl ProgramKind {
	/// Every stage, in the order passes declare them.
	pub const ALL: [Self; 6] = [Self::Vertex, Self::Fragment, Self::Geometry, Self::Hull, Self::Domain, Self::RayTracing];

	/// Field name carrying this stage's programs on a pass.
	pub fn pass_field(self) -> &'static str {
		match self {
			Self::Vertex => "progVertex",
			Self::Fragment => "progFragment",
			Self::Geometry => "progGeometry",
			Self::Hull => "progHull",
			Self::Domain => "progDomain",
			Self::RayTracing => "progRayTracing",
		}
	}

	/// Stable lower-case label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Vertex => "vertex",
			Self::Fragment => "fragment",
			Self::Geometry => "geometry",
			Self::Hull => "hull",
			Self::Domain => "domain",
			Self::RayTracing => "ray tracing",
		}
	}
}

/// One compiled shader variant.
#[derive(Debug, Serialize)]
pub struct SubProgram {
	/// GPU program type code.
	pub api: i32,
	/// Hardware tier the variant targets.
	pub hw_tier: i32,
	/// Index of the compiled blob in the shader data.
	pub blob_index: u32,
	/// Sorted indices into the owning shader's keyword table.
	pub keywords: Vec<u32>,
}

/// Decoded texture fields.
#[derive(Debug, Serialize)]
pub struct Texture2D {
	/// Texture name.
	pub name: Box<str>,
	/// Width in pixels.
	pub width: i32,
	/// Height in pixels.
	pub height: i32,
	/// Texture format code.
	pub format: i32,
	/// Mip level count.
	pub mip_count: i32,
	/// Whether the texture stays readable at runtime.
	pub rw_enabled: bool,
	/// Size of the streamed image data in bytes.
	pub stream_size: u64,
}

/// Global store of decoded objects keyed by global identity.
///
/// Insertion is append-only for one scan; a second insertion under an
/// existing key is rejected rather than overwriting.
#[derive(Debug, Default, Serialize)]
pub struct ObjectStore {
	records: HashMap<i64, ObjectRecord>,
	order: Vec<i64>,
}

impl ObjectStore {
	/// Create an empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Insert a record under its global identity.
	///
	/// Returns `false` without overwriting when the identity is already
	/// taken.
	pub fn insert(&mut self, record: ObjectRecord) -> bool {
		match self.records.entry(record.object_id) {
			std::collections::hash_map::Entry::Occupied(_) => false,
			std::collections::hash_map::Entry::Vacant(slot) => {
				self.order.push(record.object_id);
				slot.insert(record);
				true
			}
		}
	}

	/// Look up a record by global identity.
	pub fn get(&self, object_id: i64) -> Option<&ObjectRecord> {
		self.records.get(&object_id)
	}

	/// Number of stored records.
	pub fn len(&self) -> usize {
		self.order.len()
	}

	/// Return whether the store is empty.
	pub fn is_empty(&self) -> bool {
		self.order.is_empty()
	}

	/// Iterate records in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = &ObjectRecord> {
		self.order.iter().filter_map(|id| self.records.get(id))
	}
}
