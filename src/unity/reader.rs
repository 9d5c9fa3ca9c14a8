use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use crate::unity::fs::{ByteSource, RefTypeKey};
use crate::unity::schema::{BasicType, SchemaKind, SchemaNode};
use crate::unity::value::Value;
use crate::unity::{Result, UnityError};

const TERMINATOR_CLASS: &str = "Terminus";
const TERMINATOR_NAMESPACE: &str = "UnityEngine.DN";
const TERMINATOR_ASSEMBLY: &str = "FAKE_ASM";

const RID_UNKNOWN: i64 = -1;
const RID_NULL: i64 = -2;

/// Schema-interpreted random-access reader over one serialized object.
///
/// Field offsets and sizes are computed on demand from the schema and cached;
/// accessing a child resolves and caches every sibling before it. Readers are
/// cheap handles: cloning shares the underlying caches.
#[derive(Clone)]
pub struct FieldReader<'a> {
	inner: Rc<Inner<'a>>,
}

impl std::fmt::Debug for FieldReader<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FieldReader")
			.field("type_name", &self.inner.node.type_name)
			.field("field_name", &self.inner.node.field_name)
			.field("offset", &self.inner.offset)
			.finish()
	}
}

struct Inner<'a> {
	source: &'a dyn ByteSource,
	node: Arc<SchemaNode>,
	offset: u64,
	size: Cell<Option<u64>>,
	count: Cell<Option<u32>>,
	resolved: RefCell<Vec<FieldReader<'a>>>,
}

/// One resolved entry of a managed reference registry.
#[derive(Debug)]
pub struct ManagedReference<'a> {
	/// Registry lookup key for the entry.
	pub rid: i64,
	/// Runtime type identity of the referenced object.
	pub type_key: RefTypeKey,
	/// Reader over the entry payload, reinterpreted under the runtime type
	/// schema; absent for unknown and null references.
	pub data: Option<FieldReader<'a>>,
}

impl<'a> FieldReader<'a> {
	/// Construct a reader rooted at `offset` under `node`.
	///
	/// Container wrapper nodes (`vector`, `map`, `staticvector`) collapse
	/// transparently onto their single array child.
	pub fn new(source: &'a dyn ByteSource, node: Arc<SchemaNode>, offset: u64) -> Self {
		let mut node = node;
		while node.is_wrapper() {
			let child = node.children[0].clone();
			node = child;
		}

		Self {
			inner: Rc::new(Inner {
				source,
				node,
				offset,
				size: Cell::new(None),
				count: Cell::new(None),
				resolved: RefCell::new(Vec::new()),
			}),
		}
	}

	/// Return the schema node interpreted by this reader.
	pub fn node(&self) -> &Arc<SchemaNode> {
		&self.inner.node
	}

	/// Return the declared type name.
	pub fn type_name(&self) -> &str {
		&self.inner.node.type_name
	}

	/// Return the declared field name.
	pub fn field_name(&self) -> &str {
		&self.inner.node.field_name
	}

	/// Return the absolute byte offset of this field.
	pub fn offset(&self) -> u64 {
		self.inner.offset
	}

	/// Compute the byte size of this field, caching the result.
	pub fn size(&self) -> Result<u64> {
		if let Some(size) = self.inner.size.get() {
			return Ok(size);
		}

		let node = &*self.inner.node;
		let mut size = if node.is_string() {
			4 + u64::from(self.read_u32_at(self.inner.offset)?)
		} else {
			match node.kind {
				SchemaKind::Leaf | SchemaKind::Basic => {
					u64::from(node.fixed_size.ok_or_else(|| UnityError::MalformedSchema {
						type_name: node.type_name.to_string(),
						detail: "terminal node without a fixed size",
					})?)
				}
				SchemaKind::Array => self.array_byte_size()?,
				SchemaKind::Object => self.object_byte_size()?,
				SchemaKind::ManagedReferenceRegistry => {
					let (_, end) = self.walk_registry()?;
					end - self.inner.offset
				}
			}
		};

		if node.align.any() {
			size = (size + 3) & !3;
		}

		self.inner.size.set(Some(size));
		Ok(size)
	}

	/// Read the element count of an array field, caching the result.
	pub fn count(&self) -> Result<u32> {
		if self.inner.node.kind != SchemaKind::Array {
			return Err(UnityError::NotAnArray {
				type_name: self.inner.node.type_name.to_string(),
			});
		}
		if let Some(count) = self.inner.count.get() {
			return Ok(count);
		}

		let raw = self.read_i32_at(self.inner.offset)?;
		let count = u32::try_from(raw).map_err(|_| UnityError::NegativeElementCount { count: raw })?;
		self.inner.count.set(Some(count));
		Ok(count)
	}

	/// Return whether a named field is declared on this object node.
	pub fn has_child(&self, field: &str) -> bool {
		self.inner.node.kind == SchemaKind::Object && !self.inner.node.is_string() && self.inner.node.child_index(field).is_some()
	}

	/// Access a named field of an object node.
	pub fn child(&self, field: &str) -> Result<FieldReader<'a>> {
		let node = &*self.inner.node;
		let index = if node.kind == SchemaKind::Object && !node.is_string() {
			node.child_index(field)
		} else {
			None
		};
		let index = index.ok_or_else(|| UnityError::FieldNotFound {
			field: field.to_owned(),
			type_name: node.type_name.to_string(),
		})?;
		self.child_at(index)
	}

	/// Access an array element by index.
	pub fn element(&self, index: usize) -> Result<FieldReader<'a>> {
		let count = self.count()? as usize;
		if index >= count {
			return Err(UnityError::IndexOutOfRange { index, count });
		}

		let template = self.inner.node.element_template().cloned().ok_or_else(|| self.malformed("array without an element template"))?;
		loop {
			{
				let cache = self.inner.resolved.borrow();
				if let Some(existing) = cache.get(index) {
					return Ok(existing.clone());
				}
			}

			let previous = {
				let cache = self.inner.resolved.borrow();
				cache.last().cloned()
			};
			let offset = match previous {
				Some(prev) => prev.inner.offset + prev.size()?,
				None => self.inner.offset + 4,
			};
			let next = FieldReader::new(self.inner.source, template.clone(), offset);
			self.inner.resolved.borrow_mut().push(next);
		}
	}

	/// Iterate declared children of an object node, or elements of an array
	/// node, in order.
	pub fn iter(&self) -> Result<FieldIter<'a>> {
		let node = &*self.inner.node;
		let (total, elements) = match node.kind {
			SchemaKind::Object if !node.is_string() => (node.children.len(), false),
			SchemaKind::Array => (self.count()? as usize, true),
			_ => {
				return Err(UnityError::NotIterable {
					type_name: node.type_name.to_string(),
				});
			}
		};

		Ok(FieldIter {
			reader: self.clone(),
			index: 0,
			total,
			elements,
		})
	}

	/// Decode this field to a native value.
	///
	/// Supported shapes: basic-typed leaves, length-prefixed strings, and
	/// arrays of basic-typed elements (boolean arrays expand from their
	/// packed byte representation).
	pub fn value(&self) -> Result<Value> {
		let node = &*self.inner.node;
		if node.is_string() {
			let len = self.read_u32_at(self.inner.offset)? as usize;
			let bytes = self.read_bytes_at(self.inner.offset + 4, len)?;
			return Ok(Value::String(String::from_utf8_lossy(&bytes).into_owned().into_boxed_str()));
		}

		match node.kind {
			SchemaKind::Leaf | SchemaKind::Basic => {
				let basic = node.basic_type().ok_or_else(|| UnityError::UnsupportedBasicType {
					type_name: node.type_name.to_string(),
				})?;
				self.scalar_at(basic, self.inner.offset)
			}
			SchemaKind::Array => self.basic_array_value(),
			_ => Err(UnityError::UnsupportedBasicType {
				type_name: node.type_name.to_string(),
			}),
		}
	}

	/// Resolve the entries of a managed reference registry field.
	///
	/// The registry's generic schema children are not followed; the layout is
	/// interpreted from the registry version, and each resolvable entry's
	/// payload is reinterpreted under the schema of its embedded runtime
	/// type descriptor.
	pub fn managed_references(&self) -> Result<Vec<ManagedReference<'a>>> {
		let (entries, _) = self.walk_registry()?;
		Ok(entries)
	}

	fn child_at(&self, index: usize) -> Result<FieldReader<'a>> {
		loop {
			{
				let cache = self.inner.resolved.borrow();
				if let Some(existing) = cache.get(index) {
					return Ok(existing.clone());
				}
			}

			let (next_index, previous) = {
				let cache = self.inner.resolved.borrow();
				(cache.len(), cache.last().cloned())
			};
			let template = self.inner.node.children.get(next_index).cloned().ok_or(UnityError::IndexOutOfRange {
				index,
				count: self.inner.node.children.len(),
			})?;
			let offset = match previous {
				Some(prev) => prev.inner.offset + prev.size()?,
				None => self.inner.offset,
			};
			let next = FieldReader::new(self.inner.source, template, offset);
			self.inner.resolved.borrow_mut().push(next);
		}
	}

	fn object_byte_size(&self) -> Result<u64> {
		let node = &*self.inner.node;
		if let Some(fixed) = node.fixed_size {
			return Ok(u64::from(fixed));
		}
		if node.children.is_empty() {
			return Ok(0);
		}

		let last = self.child_at(node.children.len() - 1)?;
		Ok(last.inner.offset + last.size()? - self.inner.offset)
	}

	fn array_byte_size(&self) -> Result<u64> {
		let count = u64::from(self.count()?);
		let template = self.inner.node.element_template().ok_or_else(|| self.malformed("array without an element template"))?;

		if matches!(template.kind, SchemaKind::Leaf | SchemaKind::Basic) {
			let element = template.fixed_size.ok_or_else(|| self.malformed("basic array element without a fixed size"))?;
			return Ok(4 + count * u64::from(element));
		}

		if count == 0 {
			return Ok(4);
		}
		if let Some(fixed) = template.fixed_size {
			let stride = if template.align.any() { (fixed + 3) & !3 } else { fixed };
			return Ok(4 + count * u64::from(stride));
		}

		let last = self.element(count as usize - 1)?;
		Ok(last.inner.offset + last.size()? - self.inner.offset)
	}

	fn basic_array_value(&self) -> Result<Value> {
		let template = self.inner.node.element_template().ok_or_else(|| self.malformed("array without an element template"))?;
		let basic = template.basic_type().ok_or_else(|| UnityError::UnsupportedBasicType {
			type_name: template.type_name.to_string(),
		})?;
		let count = self.count()? as usize;
		let base = self.inner.offset + 4;

		match basic {
			BasicType::U8 => Ok(Value::Bytes(self.read_bytes_at(base, count)?)),
			BasicType::Bool => {
				let bytes = self.read_bytes_at(base, count)?;
				Ok(Value::Array(bytes.into_iter().map(|byte| Value::Bool(byte != 0)).collect()))
			}
			_ => {
				let stride = u64::from(basic.byte_size());
				let mut values = Vec::with_capacity(count);
				for index in 0..count {
					values.push(self.scalar_at(basic, base + index as u64 * stride)?);
				}
				Ok(Value::Array(values))
			}
		}
	}

	fn scalar_at(&self, basic: BasicType, offset: u64) -> Result<Value> {
		Ok(match basic {
			BasicType::Bool => Value::Bool(self.read_u8_at(offset)? != 0),
			BasicType::I8 => Value::I64(i64::from(self.read_u8_at(offset)? as i8)),
			BasicType::U8 => Value::U64(u64::from(self.read_u8_at(offset)?)),
			BasicType::I16 => Value::I64(i64::from(i16::from_le_bytes(self.read_array_at(offset)?))),
			BasicType::U16 => Value::U64(u64::from(u16::from_le_bytes(self.read_array_at(offset)?))),
			BasicType::I32 => Value::I64(i64::from(i32::from_le_bytes(self.read_array_at(offset)?))),
			BasicType::U32 => Value::U64(u64::from(u32::from_le_bytes(self.read_array_at(offset)?))),
			BasicType::I64 => Value::I64(i64::from_le_bytes(self.read_array_at(offset)?)),
			BasicType::U64 => Value::U64(u64::from_le_bytes(self.read_array_at(offset)?)),
			BasicType::F32 => Value::F32(f32::from_le_bytes(self.read_array_at(offset)?)),
			BasicType::F64 => Value::F64(f64::from_le_bytes(self.read_array_at(offset)?)),
		})
	}

	fn walk_registry(&self) -> Result<(Vec<ManagedReference<'a>>, u64)> {
		let node = &*self.inner.node;
		if node.kind != SchemaKind::ManagedReferenceRegistry {
			return Err(UnityError::NotARegistry {
				type_name: node.type_name.to_string(),
			});
		}

		let version = self.read_i32_at(self.inner.offset)?;
		let mut pos = self.inner.offset + 4;
		let mut out = Vec::new();

		match version {
			1 => loop {
				let (rid, key) = self.read_type_descriptor(&mut pos)?;
				if is_terminator(&key) || rid == RID_UNKNOWN || rid == RID_NULL {
					break;
				}

				let schema = self.inner.source.ref_type_schema(&key)?;
				let data = FieldReader::new(self.inner.source, schema, pos);
				pos += data.size()?;
				out.push(ManagedReference {
					rid,
					type_key: key,
					data: Some(data),
				});
			},
			2 => {
				let declared = self.read_i32_at(pos)?;
				let declared = u32::try_from(declared).map_err(|_| UnityError::NegativeElementCount { count: declared })?;
				pos += 4;

				for _ in 0..declared {
					let (rid, key) = self.read_type_descriptor(&mut pos)?;
					let schema = self.inner.source.ref_type_schema(&key)?;
					let data = FieldReader::new(self.inner.source, schema, pos);
					pos += data.size()?;
					out.push(ManagedReference {
						rid,
						type_key: key,
						data: (rid >= 0).then_some(data),
					});
				}
			}
			version => return Err(UnityError::UnsupportedRegistryVersion { version }),
		}

		Ok((out, pos))
	}

	fn read_type_descriptor(&self, pos: &mut u64) -> Result<(i64, RefTypeKey)> {
		let rid = self.read_i64_at(*pos)?;
		*pos += 8;
		let class_name = self.read_aligned_string(pos)?;
		let namespace_name = self.read_aligned_string(pos)?;
		let assembly_name = self.read_aligned_string(pos)?;
		Ok((
			rid,
			RefTypeKey {
				class_name,
				namespace_name,
				assembly_name,
			},
		))
	}

	fn read_aligned_string(&self, pos: &mut u64) -> Result<Box<str>> {
		let len = self.read_u32_at(*pos)? as usize;
		let bytes = self.read_bytes_at(*pos + 4, len)?;
		*pos = (*pos + 4 + len as u64 + 3) & !3;
		Ok(String::from_utf8_lossy(&bytes).into_owned().into_boxed_str())
	}

	fn malformed(&self, detail: &'static str) -> UnityError {
		UnityError::MalformedSchema {
			type_name: self.inner.node.type_name.to_string(),
			detail,
		}
	}

	fn read_u8_at(&self, offset: u64) -> Result<u8> {
		let mut buf = [0_u8; 1];
		self.inner.source.read_at(offset, &mut buf)?;
		Ok(buf[0])
	}

	fn read_u32_at(&self, offset: u64) -> Result<u32> {
		Ok(u32::from_le_bytes(self.read_array_at(offset)?))
	}

	fn read_i32_at(&self, offset: u64) -> Result<i32> {
		Ok(i32::from_le_bytes(self.read_array_at(offset)?))
	}

	fn read_i64_at(&self, offset: u64) -> Result<i64> {
		Ok(i64::from_le_bytes(self.read_array_at(offset)?))
	}

	fn read_array_at<const N: usize>(&self, offset: u64) -> Result<[u8; N]> {
		let mut buf = [0_u8; N];
		self.inner.source.read_at(offset, &mut buf)?;
		Ok(buf)
	}

	fn read_bytes_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
		let mut buf = vec![0_u8; len];
		self.inner.source.read_at(offset, &mut buf)?;
		Ok(buf)
	}
}

fn is_terminator(key: &RefTypeKey) -> bool {
	key.class_name.as_ref() == TERMINATOR_CLASS
		&& key.namespace_name.as_ref() == TERMINATOR_NAMESPACE
		&& key.assembly_name.as_ref() == TERMINATOR_ASSEMBLY
}

/// In-order iterator over object children or array elements.
pub struct FieldIter<'a> {
	reader: FieldReader<'a>,
	index: usize,
	total: usize,
	elements: bool,
}

impl<'a> Iterator for FieldIter<'a> {
	type Item = Result<FieldReader<'a>>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.index >= self.total {
			return None;
		}

		let index = self.index;
		self.index += 1;
		Some(if self.elements { self.reader.element(index) } else { self.reader.child_at(index) })
	}
}
