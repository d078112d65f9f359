//! Source positions and source maps for sfc-jest.
//!
//! Blocks extracted from a component file are tracked with [`Span`]s, lines are
//! counted with [`LineIndex`], and the generated module is mapped back to the
//! component file with a line-granular [`SourceMap`] in the standard v3 format.

mod line_index;
mod line_map;
mod span;
mod vlq;

pub use line_index::{LineCol, LineIndex};
pub use line_map::{LineMapping, SourceMap, SourceMapBuilder};
pub use span::{ByteOffset, Span};
pub use vlq::encode_vlq;
