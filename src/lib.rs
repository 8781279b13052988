//! # glyphsmith
//!
//! **On-demand bitmap font atlas generation.**
//!
//! Give it some text and a font, get back a packed RGBA PNG and an
//! AngelCode BMFont descriptor naming exactly the glyphs it contains.
//! No GPU context, no windowing, no asset pipeline — just the atlas.
//!
//! ## Quick Start
//!
//! ```no_run
//! use glyphsmith::AtlasRequest;
//!
//! let req = AtlasRequest::new()
//!     .with_text("Hello, world!")
//!     .with_font("Arial")
//!     .with_size(32);
//!
//! let out = glyphsmith::generate(&req);
//! std::fs::write("atlas.png", &out.image).unwrap();
//! std::fs::write("atlas.fnt", &out.descriptor).unwrap();
//! ```
//!
//! ## Philosophy
//!
//! - **One request, one response** — an [`AtlasRequest`] in, a PNG and a
//!   descriptor out. No session state, no caching layer to reason about.
//! - **Deterministic** — the same request always produces byte-identical
//!   output, so atlases can be diffed and cached by callers.
//! - **Pluggable rasterizer** — [`FontFace`] is a trait; `fontdue` backs
//!   the production path, but nothing in the packing or emission logic
//!   depends on it directly.

mod bmfont;
mod codepoints;
mod compositor;
mod error;
mod font;
mod orchestrator;
mod packer;
mod png;
mod request;
mod sizer;

pub use error::AtlasError;
pub use font::{FontFace, FontdueFace, Glyph};
pub use orchestrator::{generate, generate_with_face, AtlasOutput};
pub use request::{AtlasRequest, PackMode};
