//! Decoding of the compact, line-oriented TOON dialect spoken by the saga
//! generation service.
//!
//! Two payloads arrive in this dialect:
//!
//! - **map documents**: `repoName:` / `nodes[..]` / `edges[..]` sections with
//!   comma-delimited rows, decoded by [`graph::GraphDecoder`];
//! - **panel scripts**: one `|`-delimited panel per line, decoded by
//!   [`panels::decode_panels`].
//!
//! Decoders never fail. Rows that cannot be mapped are dropped and counted.
//! Node coordinates come from an injectable [`layout::Layout`].

pub mod classify;
pub mod encode;
pub mod graph;
pub mod layout;
pub mod panels;
pub mod split;

pub use encode::{EncodeError, encode_map_request};
pub use graph::{DecodeReport, DecodedGraph, GraphDecoder, decode_graph};
pub use layout::{Layout, Placement, Scatter};
pub use panels::decode_panels;
pub use split::{FieldSplitter, split_fields};
