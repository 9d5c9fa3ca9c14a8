use std::collections::HashMap;

use crate::unity::decoders::{i32_field, str_field, u32_field};
use crate::unity::objects::{Pass, ProgramKind, Shader, ShaderProgram, SubProgram, SubShader};
use crate::unity::reader::FieldReader;
use crate::unity::Result;

/// Keyword names interned per shader; every sub-program shares the table.
#[derive(Default)]
struct KeywordTable {
	names: Vec<Box<str>>,
	indices: HashMap<Box<str>, u32>,
}

impl KeywordTable {
	fn intern(&mut self, name: &str) -> u32 {
		if let Some(index) = self.indices.get(name) {
			return *index;
		}
		let index = self.names.len() as u32;
		self.names.push(name.into());
		self.indices.insert(name.into(), index);
		index
	}
}

/// Decode a shader across both historical schema generations.
///
/// Newer schemas declare a shader-wide keyword name table and tiered
/// `m_PlayerSubPrograms`; older schemas carry a per-pass name table and flat
/// `m_SubPrograms`. Either way, keyword names are interned once per shader
/// and sub-programs store indices into that table.
pub(crate) fn decode(reader: &FieldReader<'_>) -> Result<Shader> {
	let parsed = reader.child("m_ParsedForm")?;
	let mut keywords = KeywordTable::default();

	let keyword_names: Vec<Box<str>> = if parsed.has_child("m_KeywordNames") {
		let mut names = Vec::new();
		for name in parsed.child("m_KeywordNames")?.iter()? {
			names.push(name?.value()?.as_str()?.into());
		}
		names
	} else {
		Vec::new()
	};

	let mut sub_shaders = Vec::new();
	for sub_shader in parsed.child("m_SubShaders")?.iter()? {
		let sub_shader = sub_shader?;
		let mut decoded = SubShader::default();
		for pass in sub_shader.child("m_Passes")?.iter()? {
			decoded.passes.push(decode_pass(&pass?, &keyword_names, &mut keywords)?);
		}
		sub_shaders.push(decoded);
	}

	Ok(Shader {
		name: str_field(&parsed, "m_Name")?,
		decompressed_size: decompressed_size(reader)?,
		keywords: keywords.names,
		sub_shaders,
	})
}

fn decode_pass(pass: &FieldReader<'_>, keyword_names: &[Box<str>], keywords: &mut KeywordTable) -> Result<Pass> {
	// Older schemas map keyword names to pass-local indices.
	let mut name_table: HashMap<i64, Box<str>> = HashMap::new();
	if pass.has_child("m_NameIndices") {
		for pair in pass.child("m_NameIndices")?.iter()? {
			let pair = pair?;
			let name: Box<str> = pair.child("first")?.value()?.as_str()?.into();
			let index = pair.child("second")?.value()?.as_i64()?;
			name_table.insert(index, name);
		}
	}

	let name = if pass.has_child("m_State") {
		let state = pass.child("m_State")?;
		if state.has_child("m_Name") {
			Some(str_field(&state, "m_Name")?)
		} else {
			None
		}
	} else {
		None
	};

	let mut programs = Vec::new();
	for kind in ProgramKind::ALL {
		if !pass.has_child(kind.pass_field()) {
			continue;
		}

		let program = pass.child(kind.pass_field())?;
		let mut sub_programs = Vec::new();
		if program.has_child("m_PlayerSubPrograms") {
			// One sub-program list per hardware tier.
			for tier in program.child("m_PlayerSubPrograms")?.iter()? {
				for sub_program in tier?.iter()? {
					sub_programs.push(decode_sub_program(&sub_program?, keyword_names, &name_table, keywords)?);
				}
			}
		} else {
			for sub_program in program.child("m_SubPrograms")?.iter()? {
				sub_programs.push(decode_sub_program(&sub_program?, keyword_names, &name_table, keywords)?);
			}
		}

		programs.push(ShaderProgram { kind, sub_programs });
	}

	Ok(Pass { name, programs })
}

fn decode_sub_program(
	sub_program: &FieldReader<'_>,
	keyword_names: &[Box<str>],
	name_table: &HashMap<i64, Box<str>>,
	keywords: &mut KeywordTable,
) -> Result<SubProgram> {
	let mut indices = Vec::new();

	if sub_program.has_child("m_KeywordIndices") {
		for value in sub_program.child("m_KeywordIndices")?.value()?.as_array()? {
			let index = value.as_u64()? as usize;
			if let Some(name) = keyword_names.get(index) {
				indices.push(keywords.intern(name));
			}
		}
	} else {
		for field in ["m_GlobalKeywordIndices", "m_LocalKeywordIndices"] {
			if !sub_program.has_child(field) {
				continue;
			}
			for value in sub_program.child(field)?.value()?.as_array()? {
				if let Some(name) = name_table.get(&value.as_i64()?) {
					indices.push(keywords.intern(name));
				}
			}
		}
	}

	indices.sort_unstable();
	indices.dedup();

	Ok(SubProgram {
		api: i32_field(sub_program, "m_GpuProgramType")?,
		hw_tier: if sub_program.has_child("m_ShaderHardwareTier") {
			i32_field(sub_program, "m_ShaderHardwareTier")?
		} else {
			0
		},
		blob_index: u32_field(sub_program, "m_BlobIndex")?,
		keywords: indices,
	})
}

fn decompressed_size(reader: &FieldReader<'_>) -> Result<u32> {
	if !reader.has_child("decompressedLengths") {
		return u32_field(reader, "decompressedSize");
	}

	// One length list per graphics API; averaging loses per-API detail but
	// the schema reports no single total.
	let lists = reader.child("decompressedLengths")?;
	let apis = u64::from(lists.count()?);
	if apis == 0 {
		return Ok(0);
	}

	let mut total: u64 = 0;
	for list in lists.iter()? {
		for length in list?.value()?.as_array()? {
			total += length.as_u64()?;
		}
	}
	Ok((total / apis) as u32)
}
