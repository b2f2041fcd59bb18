//! Output formats for block trees
//!
//!     serializer  lossless and canonical block markup, delimiter JSON encoding
//!     treeviz     one-line-per-block outline for tests and debugging

pub mod serializer;
pub mod treeviz;

pub use serializer::{
    serialize, serialize_block_attributes, serialize_canonical, serialize_raw, SourceBlock,
};
pub use treeviz::to_treeviz_str;
