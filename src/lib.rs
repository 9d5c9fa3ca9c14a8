//! Public library API for decoding Unity build-output containers.

/// Serialized-file schema interpretation, reference resolution, and object graph assembly.
pub mod unity;
