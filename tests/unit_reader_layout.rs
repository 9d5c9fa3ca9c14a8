#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use assetdoc::unity::{FieldReader, SchemaNode, Value, crc32};
use common::{pad4, put_f32, put_i32, put_str, vector_of};

#[test]
fn basic_array_size_is_count_header_plus_elements() {
	let schema = Arc::new(SchemaNode::array("Array", SchemaNode::basic("int", "data")));
	let mut bytes = Vec::new();
	put_i32(&mut bytes, 3);
	for value in [10, 20, 30] {
		put_i32(&mut bytes, value);
	}
	let source: &[u8] = &bytes;

	let reader = FieldReader::new(&source, schema, 0);
	assert_eq!(reader.count().expect("count"), 3);
	assert_eq!(reader.size().expect("size"), 4 + 3 * 4);
}

#[test]
fn variable_array_size_comes_from_last_element_chain() {
	let schema = Arc::new(SchemaNode::array("Array", SchemaNode::string("data")));
	let mut bytes = Vec::new();
	put_i32(&mut bytes, 2);
	put_str(&mut bytes, "ab");
	put_str(&mut bytes, "cdef");
	let source: &[u8] = &bytes;

	let reader = FieldReader::new(&source, schema, 0);
	let last = reader.element(1).expect("element");
	assert_eq!(last.offset(), 12);
	assert_eq!(last.value().expect("value"), Value::String("cdef".into()));
	assert_eq!(reader.size().expect("size"), last.offset() + last.size().expect("size"));
}

#[test]
fn empty_variable_array_is_exactly_the_count_header() {
	let schema = Arc::new(SchemaNode::array("Array", SchemaNode::string("data")));
	let bytes = 0_i32.to_le_bytes();
	let source: &[u8] = &bytes;

	let reader = FieldReader::new(&source, schema, 0);
	assert_eq!(reader.size().expect("size"), 4);
}

#[test]
fn named_access_resolves_across_variable_siblings() {
	let schema = Arc::new(SchemaNode::object(
		"Manifest",
		"Base",
		vec![
			SchemaNode::basic("int", "m_Version"),
			vector_of("m_Names", SchemaNode::string("data")),
			SchemaNode::basic("int", "m_Tail"),
		],
	));

	let mut bytes = Vec::new();
	put_i32(&mut bytes, 5);
	put_i32(&mut bytes, 2);
	put_str(&mut bytes, "one");
	put_str(&mut bytes, "two");
	pad4(&mut bytes);
	put_i32(&mut bytes, 99);
	let source: &[u8] = &bytes;

	let reader = FieldReader::new(&source, schema, 0);
	let tail = reader.child("m_Tail").expect("field");
	assert_eq!(tail.value().expect("value"), Value::I64(99));

	let names = reader.child("m_Names").expect("field");
	assert_eq!(names.count().expect("count"), 2);
	assert_eq!(names.element(0).expect("element").value().expect("value"), Value::String("one".into()));

	let missing = reader.child("m_Missing").expect_err("unknown field");
	assert!(missing.to_string().contains("field not found"));
}

#[test]
fn repeated_decode_of_one_buffer_is_bit_identical() {
	let schema = Arc::new(SchemaNode::object(
		"Record",
		"Base",
		vec![SchemaNode::string("m_Name"), SchemaNode::basic("float", "m_Weight")],
	));
	let mut bytes = Vec::new();
	put_str(&mut bytes, "anchor");
	put_f32(&mut bytes, 0.125);
	let source: &[u8] = &bytes;

	let first = FieldReader::new(&source, schema.clone(), 0);
	let second = FieldReader::new(&source, schema, 0);

	for reader in [&first, &second] {
		assert_eq!(reader.child("m_Name").expect("field").value().expect("value"), Value::String("anchor".into()));
		assert_eq!(reader.child("m_Weight").expect("field").value().expect("value"), Value::F32(0.125));
	}
	assert_eq!(crc32(&bytes), crc32(&bytes));
}
