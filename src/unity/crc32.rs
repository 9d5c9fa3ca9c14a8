/// Incremental IEEE CRC-32 state.
///
/// Checksums stream through the builder's pooled read buffer, so the state
/// accepts input in chunks.
#[derive(Debug, Clone, Copy)]
pub struct Crc32 {
	state: u32,
}

const fn build_table() -> [u32; 256] {
	let mut table = [0_u32; 256];
	let mut index = 0;
	while index < 256 {
		let mut value = index as u32;
		let mut bit = 0;
		while bit < 8 {
			value = if value & 1 != 0 { 0xedb8_8320 ^ (value >> 1) } else { value >> 1 };
			bit += 1;
		}
		table[index] = value;
		index += 1;
	}
	table
}

static TABLE: [u32; 256] = build_table();

impl Crc32 {
	/// Start a fresh checksum.
	pub fn new() -> Self {
		Self { state: 0xffff_ffff }
	}

	/// Feed one chunk of input.
	pub fn update(&mut self, bytes: &[u8]) {
		for byte in bytes {
			let index = ((self.state ^ u32::from(*byte)) & 0xff) as usize;
			self.state = TABLE[index] ^ (self.state >> 8);
		}
	}

	/// Return the finished checksum.
	pub fn finish(self) -> u32 {
		self.state ^ 0xffff_ffff
	}
}

impl Default for Crc32 {
	fn default() -> Self {
		Self::new()
	}
}

/// Checksum a whole buffer in one call.
pub fn crc32(bytes: &[u8]) -> u32 {
	let mut state = Crc32::new();
	state.update(bytes);
	state.finish()
}
