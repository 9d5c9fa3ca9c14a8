use std::sync::Arc;

/// Field kind classification for one schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaKind {
	/// Terminal node with no decodable interpretation beyond its fixed size.
	Leaf,
	/// Terminal node decoding to a native scalar value.
	Basic,
	/// Variable-length sequence with a 4-byte element count prefix.
	Array,
	/// Composite node whose children are its fields in declaration order.
	Object,
	/// Polymorphic union container resolved from embedded type metadata.
	ManagedReferenceRegistry,
}

/// Alignment metadata carried by a schema node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlignFlags {
	/// The node itself requires its decoded size rounded to 4 bytes.
	pub self_aligned: bool,
	/// Some descendant node is alignment-sensitive.
	pub child_aligned: bool,
}

impl AlignFlags {
	/// Return whether any alignment rule applies to this node.
	pub fn any(self) -> bool {
		self.self_aligned || self.child_aligned
	}
}

/// One immutable node of a type schema tree.
///
/// Nodes are supplied by the low-level container layer and shared read-only
/// across every reader constructed for objects of the described type.
#[derive(Debug)]
pub struct SchemaNode {
	/// Declared type name (`int`, `string`, `Mesh`, ...).
	pub type_name: Box<str>,
	/// Declared field name (`m_Name`, `data`, ...); empty on roots.
	pub field_name: Box<str>,
	/// Byte size when constant for every instance, `None` when variable.
	pub fixed_size: Option<u32>,
	/// Kind classification driving offset and size computation.
	pub kind: SchemaKind,
	/// Alignment metadata for this node and its subtree.
	pub align: AlignFlags,
	/// Child nodes in declaration order. Arrays carry exactly one child:
	/// the element template.
	pub children: Vec<Arc<SchemaNode>>,
}

impl SchemaNode {
	/// Build a basic-typed leaf from a recognized type name.
	pub fn basic(type_name: &str, field_name: &str) -> Self {
		let size = BasicType::from_type_name(type_name).map(BasicType::byte_size);
		Self {
			type_name: type_name.into(),
			field_name: field_name.into(),
			fixed_size: size,
			kind: SchemaKind::Basic,
			align: AlignFlags::default(),
			children: Vec::new(),
		}
	}

	/// Build a length-prefixed string node.
	pub fn string(field_name: &str) -> Self {
		Self {
			type_name: "string".into(),
			field_name: field_name.into(),
			fixed_size: None,
			kind: SchemaKind::Object,
			align: AlignFlags {
				self_aligned: true,
				child_aligned: false,
			},
			children: Vec::new(),
		}
	}

	/// Build an object node; the constant size is derived when every child
	/// has one.
	pub fn object(type_name: &str, field_name: &str, children: Vec<SchemaNode>) -> Self {
		let children: Vec<Arc<SchemaNode>> = children.into_iter().map(Arc::new).collect();
		let fixed_size = children
			.iter()
			.map(|child| {
				child
					.fixed_size
					.map(|size| if child.align.any() { (size + 3) & !3 } else { size })
			})
			.try_fold(0_u32, |total, size| size.map(|value| total + value));
		let child_aligned = children.iter().any(|child| child.align.any());

		Self {
			type_name: type_name.into(),
			field_name: field_name.into(),
			fixed_size,
			kind: SchemaKind::Object,
			align: AlignFlags {
				self_aligned: false,
				child_aligned,
			},
			children,
		}
	}

	/// Build an array node around one element template.
	pub fn array(field_name: &str, element: SchemaNode) -> Self {
		let child_aligned = element.align.any();
		Self {
			type_name: "Array".into(),
			field_name: field_name.into(),
			fixed_size: None,
			kind: SchemaKind::Array,
			align: AlignFlags {
				self_aligned: true,
				child_aligned,
			},
			children: vec![Arc::new(element)],
		}
	}

	/// Build a managed reference registry node.
	pub fn registry(field_name: &str) -> Self {
		Self {
			type_name: "ManagedReferencesRegistry".into(),
			field_name: field_name.into(),
			fixed_size: None,
			kind: SchemaKind::ManagedReferenceRegistry,
			align: AlignFlags::default(),
			children: Vec::new(),
		}
	}

	/// Mark this node as alignment-sensitive.
	pub fn aligned(mut self) -> Self {
		self.align.self_aligned = true;
		self
	}

	/// Return whether the node decodes as a length-prefixed string.
	pub fn is_string(&self) -> bool {
		self.type_name.as_ref() == "string"
	}

	/// Return whether the node is a container wrapper that collapses onto
	/// its single array child.
	pub fn is_wrapper(&self) -> bool {
		matches!(self.type_name.as_ref(), "vector" | "map" | "staticvector")
			&& self.children.len() == 1
			&& self.children[0].kind == SchemaKind::Array
	}

	/// Return the recognized basic type for this node, if any.
	pub fn basic_type(&self) -> Option<BasicType> {
		BasicType::from_type_name(&self.type_name)
	}

	/// Return the child index for a declared field name.
	pub fn child_index(&self, field: &str) -> Option<usize> {
		self.children.iter().position(|child| child.field_name.as_ref() == field)
	}

	/// Return the element template of an array node.
	pub fn element_template(&self) -> Option<&Arc<SchemaNode>> {
		if self.kind == SchemaKind::Array { self.children.first() } else { None }
	}
}

/// Native decode classification for basic-typed schema nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicType {
	/// One-byte boolean.
	Bool,
	/// Signed 8-bit integer.
	I8,
	/// Unsigned 8-bit integer.
	U8,
	/// Signed 16-bit integer.
	I16,
	/// Unsigned 16-bit integer.
	U16,
	/// Signed 32-bit integer.
	I32,
	/// Unsigned 32-bit integer.
	U32,
	/// Signed 64-bit integer.
	I64,
	/// Unsigned 64-bit integer.
	U64,
	/// 32-bit float.
	F32,
	/// 64-bit float.
	F64,
}

impl BasicType {
	/// Map a declared type name (including serializer aliases) to a basic type.
	pub fn from_type_name(name: &str) -> Option<Self> {
		Some(match name {
			"bool" => Self::Bool,
			"SInt8" => Self::I8,
			"UInt8" | "char" => Self::U8,
			"SInt16" | "short" => Self::I16,
			"UInt16" | "unsigned short" => Self::U16,
			"SInt32" | "int" | "Type*" => Self::I32,
			"UInt32" | "unsigned int" => Self::U32,
			"SInt64" | "long long" => Self::I64,
			"UInt64" | "unsigned long long" | "FileSize" => Self::U64,
			"float" => Self::F32,
			"double" => Self::F64,
			_ => return None,
		})
	}

	/// Encoded byte width of the basic type.
	pub fn byte_size(self) -> u32 {
		match self {
			Self::Bool | Self::I8 | Self::U8 => 1,
			Self::I16 | Self::U16 => 2,
			Self::I32 | Self::U32 | Self::F32 => 4,
			Self::I64 | Self::U64 | Self::F64 => 8,
		}
	}
}
