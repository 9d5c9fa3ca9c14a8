use crate::unity::decoders::{i32_field, str_field, u64_field};
use crate::unity::objects::AudioClip;
use crate::unity::reader::FieldReader;
use crate::unity::Result;

pub(crate) fn decode(reader: &FieldReader<'_>) -> Result<AudioClip> {
	Ok(AudioClip {
		name: str_field(reader, "m_Name")?,
		load_type: i32_field(reader, "m_LoadType")?,
		format: i32_field(reader, "m_CompressionFormat")?,
		frequency: i32_field(reader, "m_Frequency")?,
		channels: i32_field(reader, "m_Channels")?,
		bits_per_sample: i32_field(reader, "m_BitsPerSample")?,
		stream_size: u64_field(&reader.child("m_Resource")?, "m_Size")?,
	})
}
