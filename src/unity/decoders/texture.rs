use crate::unity::decoders::{bool_field, i32_field, str_field, u64_field};
use crate::unity::objects::Texture2D;
use crate::unity::reader::FieldReader;
use crate::unity::Result;

pub(crate) fn decode(reader: &FieldReader<'_>) -> Result<Texture2D> {
	Ok(Texture2D {
		name: str_field(reader, "m_Name")?,
		width: i32_field(reader, "m_Width")?,
		height: i32_field(reader, "m_Height")?,
		format: i32_field(reader, "m_TextureFormat")?,
		mip_count: if reader.has_child("m_MipCount") { i32_field(reader, "m_MipCount")? } else { 1 },
		rw_enabled: bool_field(reader, "m_IsReadable")?,
		stream_size: if reader.has_child("m_StreamData") {
			u64_field(&reader.child("m_StreamData")?, "size")?
		} else {
			0
		},
	})
}
