use crate::unity::decoders::{DecodeCx, is_pptr, resolve_pptr};
use crate::unity::objects::{FieldRef, GenericObject};
use crate::unity::reader::FieldReader;
use crate::unity::schema::SchemaKind;
use crate::unity::{Result, Value};

/// Fallback decode: keep the object name and every top-level reference.
pub(crate) fn decode(cx: &mut DecodeCx<'_>, reader: &FieldReader<'_>) -> Result<GenericObject> {
	let mut object = GenericObject::default();
	if reader.node().kind != SchemaKind::Object {
		return Ok(object);
	}

	for child in reader.iter()? {
		let child = child?;
		if child.field_name() == "m_Name" && child.node().is_string() {
			if let Value::String(name) = child.value()? {
				object.name = Some(name);
			}
			continue;
		}
		if is_pptr(child.node()) {
			object.references.push(FieldRef {
				field: child.field_name().into(),
				object_id: resolve_pptr(&child, cx.resolver)?,
			});
		}
	}

	Ok(object)
}
