//! # Vertex: One Corner of a Face, Projected and Packed
//!
//! A face (triangle) in a batched mesh is three vertices. Each vertex owns an
//! object-space position, a texture coordinate, a 24-bit tint and its own
//! opacity. Twice per frame the owning mesh drives it through two steps:
//!
//! ```text
//!   position (x, y, z)                     u, v, color, alpha
//!          │                                      │
//!          ▼                                      │
//!   ┌───────────────┐  4x4 transform,             │
//!   │ project_local │  perspective divide,        │
//!   └──────┬────────┘  viewport scale             │
//!          │ vx, vy, vz                           │
//!          ▼                                      ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │ serialize_into                                      │
//!   │  2D affine (a..f) on (vx, vy), optional pixel snap  │
//!   │  7 words: tx ty u v unit tint | color+alpha         │
//!   └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Memory Layout
//!
//! ```text
//! PackedVertex (28 bytes per vertex)
//! ┌──────────────┬──────────────┬─────────────┬─────────────┬─────────────┐
//! │ position     │ uv           │ texture     │ tint effect │ color       │
//! │ [f32; 2]     │ [f32; 2]     │ f32         │ f32         │ u32 AARRGGBB│
//! │ offset 0     │ offset 8     │ offset 16   │ offset 20   │ offset 24   │
//! │ location(0)  │ location(1)  │ location(2) │ location(3) │ location(4) │
//! └──────────────┴──────────────┴─────────────┴─────────────┴─────────────┘
//! ```
//!
//! The texture unit is stored as a float because the shader input is a float
//! attribute; it selects a binding in a texture array on the GPU side.
//!
//! ## Degenerate Transforms
//!
//! When the homogeneous `w` of a projected point is zero (the point sits on the
//! camera plane) the divide produces infinities or NaN. They are written
//! through unchanged; callers that need finite output must guard their
//! transforms.
//!
//! ## Offsets
//!
//! `serialize_into` takes the index of the *last written* word and returns the
//! index of the last word it wrote, so an empty stream starts at `-1` and
//! consecutive calls chain without recomputing the stride.

use serde::{Deserialize, Serialize};

use crate::buffer::{BufferError, VERTEX_STRIDE, WordView};
use crate::color::{ColorPacker, TintPacker};
use crate::math::{Affine2d, DVec3, Matrix4};

/// Tint used when none is given (white, i.e. no tint).
pub const DEFAULT_COLOR: u32 = 0xFFFFFF;

/// Opacity used when none is given.
pub const DEFAULT_ALPHA: f64 = 1.0;

fn default_color() -> u32 {
    DEFAULT_COLOR
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

/// A mesh vertex with its most recent projection.
///
/// Ranges are not validated: out-of-range colors, alphas or UVs flow through
/// to the packer and the GPU as given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    /// Object-space position.
    pub position: DVec3,
    pub u: f64,
    pub v: f64,
    /// 24-bit RGB tint.
    #[serde(default = "default_color")]
    pub color: u32,
    /// This vertex's own opacity, multiplied with the parent's at pack time.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Projected x, valid after [`project_local`](Self::project_local).
    #[serde(skip)]
    pub vx: f64,
    #[serde(skip)]
    pub vy: f64,
    #[serde(skip)]
    pub vz: f64,
}

impl Vertex {
    /// White, fully opaque vertex. Chain [`color`](Self::color) and
    /// [`alpha`](Self::alpha) to override.
    pub fn new(x: f64, y: f64, z: f64, u: f64, v: f64) -> Self {
        Self::from_position(DVec3::new(x, y, z), u, v)
    }

    pub fn from_position(position: DVec3, u: f64, v: f64) -> Self {
        Self {
            position,
            u,
            v,
            color: DEFAULT_COLOR,
            alpha: DEFAULT_ALPHA,
            vx: 0.0,
            vy: 0.0,
            vz: 0.0,
        }
    }

    /// Set the tint color.
    pub fn color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    /// Set the opacity.
    pub fn alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn x(&self) -> f64 {
        self.position.x
    }

    pub fn y(&self) -> f64 {
        self.position.y
    }

    pub fn z(&self) -> f64 {
        self.position.z
    }

    pub fn set_position(&mut self, x: f64, y: f64, z: f64) {
        self.position = DVec3::new(x, y, z);
    }

    pub fn set_uvs(&mut self, u: f64, v: f64) {
        self.u = u;
        self.v = v;
    }

    /// Offset the texture coordinates, e.g. for scrolling textures.
    pub fn scroll_uv(&mut self, du: f64, dv: f64) {
        self.u += du;
        self.v += dv;
    }

    pub fn scale_uv(&mut self, su: f64, sv: f64) {
        self.u *= su;
        self.v *= sv;
    }

    /// `(vx, vy, vz)` from the last projection.
    pub fn projected(&self) -> DVec3 {
        DVec3::new(self.vx, self.vy, self.vz)
    }

    /// Project the object-space position through `transform` (column-major)
    /// and scale to a `width` x `height` viewport. Screen Y grows downward.
    ///
    /// Overwrites `vx, vy, vz`. A zero `w` is not guarded; see the module docs.
    pub fn project_local(&mut self, transform: &impl Matrix4, width: f64, height: f64) {
        let m = transform.values();
        let DVec3 { x, y, z } = self.position;

        let tx = x * m[0] + y * m[4] + z * m[8] + m[12];
        let ty = x * m[1] + y * m[5] + z * m[9] + m[13];
        let tz = x * m[2] + y * m[6] + z * m[10] + m[14];
        let tw = x * m[3] + y * m[7] + z * m[11] + m[15];

        if tw == 0.0 {
            log::trace!("vertex ({x}, {y}, {z}) projects with w = 0");
        }

        self.vx = (tx / tw) * width;
        self.vy = -(ty / tw) * height;
        self.vz = tz / tw;
    }

    /// Final screen position: the projected point through `params.matrix`,
    /// snapped when `params.round_pixels` is set.
    pub fn screen_position(&self, params: &SerializeParams) -> (f64, f64) {
        let (tx, ty) = params.matrix.apply(self.vx, self.vy);
        if params.round_pixels {
            (round_half_up(tx), round_half_up(ty))
        } else {
            (tx, ty)
        }
    }

    /// Append this vertex to `out` after index `offset` and return the new
    /// last-written index (`offset + 7`). Tint is packed with [`TintPacker`].
    ///
    /// # Panics
    ///
    /// If the 7-word block does not fit in `out` or `offset < -1`. Nothing is
    /// written in that case.
    pub fn serialize_into(
        &self,
        out: &mut WordView<'_>,
        offset: isize,
        params: &SerializeParams,
    ) -> isize {
        self.serialize_with(out, offset, params, &TintPacker)
    }

    /// [`serialize_into`](Self::serialize_into) with a caller-supplied packer.
    pub fn serialize_with<P: ColorPacker + ?Sized>(
        &self,
        out: &mut WordView<'_>,
        offset: isize,
        params: &SerializeParams,
        packer: &P,
    ) -> isize {
        let start = match block_start(offset, out.len()) {
            Ok(start) => start,
            Err(e) => panic!("{e}"),
        };

        let (tx, ty) = self.screen_position(params);

        out.set_f32(start, tx as f32);
        out.set_f32(start + 1, ty as f32);
        out.set_f32(start + 2, self.u as f32);
        out.set_f32(start + 3, self.v as f32);
        out.set_f32(start + 4, params.texture_unit as f32);
        out.set_f32(start + 5, params.tint_effect);
        out.set_u32(start + 6, packer.pack(self.color, params.parent_alpha * self.alpha));

        offset + VERTEX_STRIDE as isize
    }

    /// Checked [`serialize_into`](Self::serialize_into): refuses instead of
    /// panicking, leaving `out` untouched.
    pub fn try_serialize_into(
        &self,
        out: &mut WordView<'_>,
        offset: isize,
        params: &SerializeParams,
    ) -> Result<isize, BufferError> {
        self.try_serialize_with(out, offset, params, &TintPacker)
    }

    pub fn try_serialize_with<P: ColorPacker + ?Sized>(
        &self,
        out: &mut WordView<'_>,
        offset: isize,
        params: &SerializeParams,
        packer: &P,
    ) -> Result<isize, BufferError> {
        if let Err(e) = block_start(offset, out.len()) {
            log::warn!("Skipping vertex write: {e}");
            return Err(e);
        }
        Ok(self.serialize_with(out, offset, params, packer))
    }
}

/// First index of the block following `offset`, if the block fits.
fn block_start(offset: isize, capacity: usize) -> Result<usize, BufferError> {
    let start = offset
        .checked_add(1)
        .and_then(|s| usize::try_from(s).ok())
        .ok_or(BufferError::NegativeOffset(offset))?;
    let needed = start
        .checked_add(VERTEX_STRIDE)
        .ok_or(BufferError::Overflow { needed: usize::MAX, capacity })?;
    if needed > capacity {
        return Err(BufferError::Overflow { needed, capacity });
    }
    Ok(start)
}

/// Round to nearest, halves toward positive infinity (`-2.5 -> -2`,
/// `2.5 -> 3`). Non-finite values pass through.
fn round_half_up(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor >= 0.5 { floor + 1.0 } else { floor }
}

/// Per-draw inputs to [`Vertex::serialize_into`] that come from the parent
/// object rather than the vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SerializeParams {
    /// Texture slot the shader samples for this vertex.
    pub texture_unit: u32,
    /// Shader tint mode, written through untouched.
    pub tint_effect: f32,
    /// Parent opacity, multiplied with the vertex alpha.
    pub parent_alpha: f64,
    /// Parent's 2D screen transform, applied after projection.
    pub matrix: Affine2d,
    /// Snap the final x/y to whole pixels.
    pub round_pixels: bool,
}

impl SerializeParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture_unit(mut self, unit: u32) -> Self {
        self.texture_unit = unit;
        self
    }

    pub fn tint_effect(mut self, effect: f32) -> Self {
        self.tint_effect = effect;
        self
    }

    pub fn parent_alpha(mut self, alpha: f64) -> Self {
        self.parent_alpha = alpha;
        self
    }

    pub fn matrix(mut self, matrix: Affine2d) -> Self {
        self.matrix = matrix;
        self
    }

    pub fn round_pixels(mut self, round: bool) -> Self {
        self.round_pixels = round;
        self
    }
}

impl Default for SerializeParams {
    fn default() -> Self {
        Self {
            texture_unit: 0,
            tint_effect: 0.0,
            parent_alpha: 1.0,
            matrix: Affine2d::IDENTITY,
            round_pixels: false,
        }
    }
}

/// One serialized vertex, viewed as a struct. Cast a stream with
/// `bytemuck::cast_slice::<u32, PackedVertex>`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub texture_unit: f32,
    pub tint_effect: f32,
    pub color: u32,
}

#[cfg(feature = "layout")]
impl PackedVertex {
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<PackedVertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 8,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
            // texture unit
            wgpu::VertexAttribute {
                offset: 16,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32,
            },
            // tint effect
            wgpu::VertexAttribute {
                offset: 20,
                shader_location: 3,
                format: wgpu::VertexFormat::Float32,
            },
            // color
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 4,
                format: wgpu::VertexFormat::Unorm8x4,
            },
        ],
    };
}
