//! # Buffer: One Word Block, Two Typed Views
//!
//! A batched vertex stream mixes float attributes (position, UV, texture unit,
//! tint effect) with a packed integer tint word. The GPU just sees bytes, so
//! the CPU side keeps a single block of 32-bit words and reads or writes it
//! through either interpretation:
//!
//! ```text
//! index   k-6    k-5    k-4   k-3   k-2    k-1    k
//! floats  tx     ty     u     v     unit   tint   ·
//! ints    ·      ·      ·     ·     ·      ·      color|alpha
//!         └──────────── one vertex, 7 words ─────────────┘
//! ```
//!
//! Index `k` in [`VertexBuffer::floats`] and [`VertexBuffer::ints`] is the same
//! word. The views are `bytemuck` casts over the backing `Vec<u32>`, so there
//! is no copy and no `unsafe`.

use std::fmt;

/// Words per serialized vertex.
pub const VERTEX_STRIDE: usize = 7;

/// Bytes per serialized vertex.
pub const VERTEX_STRIDE_BYTES: usize = VERTEX_STRIDE * std::mem::size_of::<u32>();

// ── Errors ──────────────────────────────────────────────────────────────

/// Errors from checked writes into a vertex stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// The block would end past the buffer.
    Overflow { needed: usize, capacity: usize },
    /// Offsets start at -1 (nothing written yet); anything lower is invalid.
    NegativeOffset(isize),
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::Overflow { needed, capacity } => {
                write!(f, "vertex buffer overflow: need {needed} words, have {capacity}")
            }
            BufferError::NegativeOffset(offset) => {
                write!(f, "invalid vertex buffer offset {offset}")
            }
        }
    }
}

impl std::error::Error for BufferError {}

// ── WordView ────────────────────────────────────────────────────────────

/// Mutable dual-typed access to a borrowed run of words.
///
/// Out-of-range indices panic, like slice indexing.
pub struct WordView<'a> {
    words: &'a mut [u32],
}

impl<'a> WordView<'a> {
    pub fn new(words: &'a mut [u32]) -> Self {
        Self { words }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn set_f32(&mut self, index: usize, value: f32) {
        self.words[index] = value.to_bits();
    }

    pub fn set_u32(&mut self, index: usize, value: u32) {
        self.words[index] = value;
    }

    pub fn get_f32(&self, index: usize) -> f32 {
        f32::from_bits(self.words[index])
    }

    pub fn get_u32(&self, index: usize) -> u32 {
        self.words[index]
    }
}

// ── VertexBuffer ────────────────────────────────────────────────────────

/// Owned backing block for an interleaved vertex stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexBuffer {
    words: Vec<u32>,
}

impl VertexBuffer {
    /// A zeroed buffer of `len` words.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len],
        }
    }

    /// A zeroed buffer sized for `count` vertices.
    pub fn for_vertices(count: usize) -> Self {
        Self::new(count * VERTEX_STRIDE)
    }

    /// Length in words (identical for both views).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// How many whole vertices fit.
    pub fn vertex_capacity(&self) -> usize {
        self.words.len() / VERTEX_STRIDE
    }

    /// Grow or shrink to `len` words; new words are zero.
    pub fn resize(&mut self, len: usize) {
        self.words.resize(len, 0);
    }

    pub fn floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.words)
    }

    pub fn floats_mut(&mut self) -> &mut [f32] {
        bytemuck::cast_slice_mut(&mut self.words)
    }

    pub fn ints(&self) -> &[u32] {
        &self.words
    }

    pub fn ints_mut(&mut self) -> &mut [u32] {
        &mut self.words
    }

    /// The raw bytes, ready for `queue.write_buffer`.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.words)
    }

    /// Dual-typed writer over the whole block.
    pub fn view_mut(&mut self) -> WordView<'_> {
        WordView::new(&mut self.words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn views_alias_the_same_words() {
        let mut buf = VertexBuffer::new(4);
        buf.floats_mut()[2] = 1.0;
        assert_eq!(buf.ints()[2], 1.0f32.to_bits());

        buf.ints_mut()[3] = 0x3F80_0000;
        assert_eq!(buf.floats()[3], 1.0);
        assert_eq!(buf.floats().len(), buf.ints().len());
    }

    #[test]
    fn word_view_reads_back_both_types() {
        let mut buf = VertexBuffer::new(2);
        let mut view = buf.view_mut();
        view.set_f32(0, -2.5);
        view.set_u32(1, 0xDEAD_BEEF);
        assert_eq!(view.get_f32(0), -2.5);
        assert_eq!(view.get_u32(1), 0xDEAD_BEEF);
        assert_eq!(buf.floats()[0], -2.5);
    }

    #[test]
    #[should_panic]
    fn word_view_out_of_range_panics() {
        let mut buf = VertexBuffer::new(1);
        buf.view_mut().set_u32(1, 0);
    }

    #[test]
    fn sized_for_vertices() {
        let buf = VertexBuffer::for_vertices(3);
        assert_eq!(buf.len(), 21);
        assert_eq!(buf.vertex_capacity(), 3);
        assert_eq!(buf.as_bytes().len(), 3 * VERTEX_STRIDE_BYTES);
    }

    #[test]
    fn resize_zero_fills() {
        let mut buf = VertexBuffer::new(1);
        buf.ints_mut()[0] = 9;
        buf.resize(3);
        assert_eq!(buf.ints(), &[9, 0, 0]);
    }

    #[test]
    fn error_messages() {
        let e = BufferError::Overflow { needed: 14, capacity: 7 };
        assert_eq!(e.to_string(), "vertex buffer overflow: need 14 words, have 7");
        assert_eq!(
            BufferError::NegativeOffset(-3).to_string(),
            "invalid vertex buffer offset -3"
        );
    }
}
