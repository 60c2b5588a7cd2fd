//! # Facet: Projected Mesh Vertices for Batched Drawing
//!
//! The per-vertex half of a batched mesh renderer: project a vertex through a
//! 4x4 transform onto the viewport, then pack it into an interleaved stream
//! that goes to the GPU in one upload.
//!
//! Start with [`Vertex`], drive it with [`Vertex::project_local`] and
//! [`Vertex::serialize_into`], and write into a [`VertexBuffer`].
//!
//! ```
//! use facet::{DMat4, SerializeParams, Vertex, VertexBuffer};
//!
//! let mut v = Vertex::new(1.0, 2.0, 3.0, 0.5, 0.5).color(0xFF0000);
//! v.project_local(&DMat4::IDENTITY, 100.0, 50.0);
//!
//! let mut buf = VertexBuffer::for_vertices(1);
//! let end = v.serialize_into(&mut buf.view_mut(), -1, &SerializeParams::new());
//! assert_eq!(end, 6);
//! assert_eq!(buf.floats()[..2], [100.0, -100.0]);
//! ```

pub mod buffer;
pub mod color;
pub mod math;
pub mod vertex;

pub use buffer::{BufferError, VERTEX_STRIDE, VERTEX_STRIDE_BYTES, VertexBuffer, WordView};
pub use color::{ColorPacker, TintPacker, pack_tint, unpack_tint};
pub use math::{Affine2d, DMat4, DVec3, Matrix4, Transform2d};
pub use vertex::{DEFAULT_ALPHA, DEFAULT_COLOR, PackedVertex, SerializeParams, Vertex};
