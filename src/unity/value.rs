use crate::unity::{Result, UnityError};

/// Decoded runtime value for one leaf or basic-array field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// One-byte boolean.
	Bool(bool),
	/// Signed integer of any decoded width.
	I64(i64),
	/// Unsigned integer of any decoded width.
	U64(u64),
	/// 32-bit float.
	F32(f32),
	/// 64-bit float.
	F64(f64),
	/// Raw byte payload (`UInt8` arrays).
	Bytes(Vec<u8>),
	/// Length-prefixed UTF-8 string.
	String(Box<str>),
	/// Contiguous decoded basic-typed elements.
	Array(Vec<Value>),
}

impl Value {
	/// Stable label for the value kind, used in mismatch errors.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Bool(_) => "bool",
			Self::I64(_) => "i64",
			Self::U64(_) => "u64",
			Self::F32(_) => "f32",
			Self::F64(_) => "f64",
			Self::Bytes(_) => "bytes",
			Self::String(_) => "string",
			Self::Array(_) => "array",
		}
	}

	/// Return the value as a signed integer.
	pub fn as_i64(&self) -> Result<i64> {
		match self {
			Self::I64(value) => Ok(*value),
			Self::U64(value) => i64::try_from(*value).map_err(|_| self.mismatch("i64")),
			_ => Err(self.mismatch("i64")),
		}
	}

	/// Return the value as an unsigned integer.
	pub fn as_u64(&self) -> Result<u64> {
		match self {
			Self::U64(value) => Ok(*value),
			Self::I64(value) => u64::try_from(*value).map_err(|_| self.mismatch("u64")),
			_ => Err(self.mismatch("u64")),
		}
	}

	/// Return the value as a float, widening from 32-bit when needed.
	pub fn as_f64(&self) -> Result<f64> {
		match self {
			Self::F32(value) => Ok(f64::from(*value)),
			Self::F64(value) => Ok(*value),
			_ => Err(self.mismatch("f64")),
		}
	}

	/// Return the value as a boolean.
	pub fn as_bool(&self) -> Result<bool> {
		match self {
			Self::Bool(value) => Ok(*value),
			_ => Err(self.mismatch("bool")),
		}
	}

	/// Return the value as a string slice.
	pub fn as_str(&self) -> Result<&str> {
		match self {
			Self::String(value) => Ok(value),
			_ => Err(self.mismatch("string")),
		}
	}

	/// Return the value as a decoded element slice.
	pub fn as_array(&self) -> Result<&[Value]> {
		match self {
			Self::Array(values) => Ok(values),
			_ => Err(self.mismatch("array")),
		}
	}

	/// Return the value as raw bytes.
	pub fn as_bytes(&self) -> Result<&[u8]> {
		match self {
			Self::Bytes(bytes) => Ok(bytes),
			_ => Err(self.mismatch("bytes")),
		}
	}

	fn mismatch(&self, expected: &'static str) -> UnityError {
		UnityError::ValueMismatch {
			expected,
			got: self.kind_name(),
		}
	}
}
