use crate::unity::decoders::{bool_field, str_field};
use crate::unity::objects::AnimationClip;
use crate::unity::reader::FieldReader;
use crate::unity::Result;

pub(crate) fn decode(reader: &FieldReader<'_>) -> Result<AnimationClip> {
	Ok(AnimationClip {
		name: str_field(reader, "m_Name")?,
		legacy: bool_field(reader, "m_Legacy")?,
		events: reader.child("m_Events")?.count()?,
	})
}
