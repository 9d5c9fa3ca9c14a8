use crate::unity::decoders::{bool_field, i32_field, str_field, u32_field, u64_field};
use crate::unity::objects::Mesh;
use crate::unity::reader::FieldReader;
use crate::unity::Result;

/// Byte width of one component for a vertex channel format code.
fn format_size(format: u8) -> u32 {
	match format {
		0 => 4,        // float
		1 => 2,        // half
		2 | 3 => 1,    // 8-bit normalized
		4 | 5 => 2,    // 16-bit normalized
		6 | 7 => 1,    // 8-bit integer
		8 | 9 => 2,    // 16-bit integer
		10 | 11 => 4,  // 32-bit integer
		_ => 4,
	}
}

pub(crate) fn decode(reader: &FieldReader<'_>) -> Result<Mesh> {
	let compression = u32_field(reader, "m_MeshCompression")? as u8;

	let mut vertices = 0;
	let mut indices = 0;
	let mut vertex_size = 0;
	let mut channels = 0;

	if compression == 0 {
		let vertex_data = reader.child("m_VertexData")?;
		vertices = u32_field(&vertex_data, "m_VertexCount")?;

		for channel in vertex_data.child("m_Channels")?.iter()? {
			let channel = channel?;
			let dimension = u32_field(&channel, "dimension")? & 0xf;
			if dimension == 0 {
				continue;
			}
			let format = u32_field(&channel, "format")? as u8;
			channels += 1;
			vertex_size += dimension * format_size(format);
		}

		let index_format = if reader.has_child("m_IndexFormat") { i32_field(reader, "m_IndexFormat")? } else { 0 };
		let index_bytes = reader.child("m_IndexBuffer")?.count()?;
		indices = index_bytes / if index_format == 0 { 2 } else { 4 };
	} else {
		let compressed = reader.child("m_CompressedMesh")?;
		vertices = u32_field(&compressed.child("m_Vertices")?, "m_NumItems")? / 3;
		indices = u32_field(&compressed.child("m_Triangles")?, "m_NumItems")?;
	}

	Ok(Mesh {
		name: str_field(reader, "m_Name")?,
		vertices,
		sub_meshes: reader.child("m_SubMeshes")?.count()?,
		indices,
		compression,
		rw_enabled: bool_field(reader, "m_IsReadable")?,
		vertex_size,
		channels,
		bones: if reader.has_child("m_Skin") { reader.child("m_Skin")?.count()? } else { 0 },
		stream_size: if reader.has_child("m_StreamData") {
			u64_field(&reader.child("m_StreamData")?, "size")?
		} else {
			0
		},
	})
}
