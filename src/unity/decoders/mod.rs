mod animation;
mod audio;
mod generic;
mod mesh;
mod shader;
mod texture;

use crate::unity::objects::DecodedObject;
use crate::unity::reader::FieldReader;
use crate::unity::resolve::ReferenceResolver;
use crate::unity::schema::SchemaNode;
use crate::unity::{Result, UnityError};

/// Shared state handed to every typed decoder.
pub struct DecodeCx<'r> {
	/// Resolver scoped to the file currently being decoded.
	pub resolver: &'r mut ReferenceResolver,
}

/// Decode one object by its declared type name.
///
/// Types without a specialized decoder fall back to the generic decoder,
/// which preserves the fields resolvable without type knowledge.
pub fn decode_object(cx: &mut DecodeCx<'_>, reader: &FieldReader<'_>) -> Result<DecodedObject> {
	Ok(match reader.type_name() {
		"AnimationClip" => DecodedObject::AnimationClip(animation::decode(reader)?),
		"AudioClip" => DecodedObject::AudioClip(audio::decode(reader)?),
		"Mesh" => DecodedObject::Mesh(mesh::decode(reader)?),
		"Shader" => DecodedObject::Shader(shader::decode(reader)?),
		"Texture2D" => DecodedObject::Texture2D(texture::decode(reader)?),
		_ => DecodedObject::Generic(generic::decode(cx, reader)?),
	})
}

/// Return whether a node is shaped like a persistent object reference.
pub(crate) fn is_pptr(node: &SchemaNode) -> bool {
	node.child_index("m_FileID").is_some() && node.child_index("m_PathID").is_some()
}

/// Resolve a reference-shaped field to a global object id.
pub(crate) fn resolve_pptr(reader: &FieldReader<'_>, resolver: &mut ReferenceResolver) -> Result<i64> {
	let file_id = i32_field(reader, "m_FileID")?;
	let path_id = i64_field(reader, "m_PathID")?;
	resolver.resolve(file_id, path_id)
}

pub(crate) fn str_field(reader: &FieldReader<'_>, field: &str) -> Result<Box<str>> {
	Ok(reader.child(field)?.value()?.as_str()?.into())
}

pub(crate) fn i64_field(reader: &FieldReader<'_>, field: &str) -> Result<i64> {
	reader.child(field)?.value()?.as_i64()
}

pub(crate) fn i32_field(reader: &FieldReader<'_>, field: &str) -> Result<i32> {
	i32::try_from(i64_field(reader, field)?).map_err(|_| UnityError::ValueMismatch {
		expected: "i32",
		got: "i64",
	})
}

pub(crate) fn u64_field(reader: &FieldReader<'_>, field: &str) -> Result<u64> {
	reader.child(field)?.value()?.as_u64()
}

pub(crate) fn u32_field(reader: &FieldReader<'_>, field: &str) -> Result<u32> {
	u32::try_from(u64_field(reader, field)?).map_err(|_| UnityError::ValueMismatch {
		expected: "u32",
		got: "u64",
	})
}

pub(crate) fn bool_field(reader: &FieldReader<'_>, field: &str) -> Result<bool> {
	reader.child(field)?.value()?.as_bool()
}
