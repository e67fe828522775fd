//! Shape editing engine for an embeddable 2D vector editor.
//!
//! Users draw, select, move, resize, recolor and delete rectangles and
//! circles on a canvas while the page keeps a JSON copy of the shape list in
//! sync in both directions. This crate holds everything with real logic in
//! it; the page only forwards DOM events and reacts to the notifications in
//! [`host::HostSink`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Interaction state machine ([`engine::EngineCore`]) and the wired [`engine::Engine`] |
//! | [`shape`] | Shape kinds and their per-kind behavior |
//! | [`doc`] | Ordered document store (insertion order is z-order) |
//! | [`selection`] | Selected ids, aggregate box and active handles |
//! | [`geometry`] | Points, boxes and intersection tests |
//! | [`hit`] | Pointer hit-testing against handles and shapes |
//! | [`input`] | Tools, buttons, modifiers and gesture states |
//! | [`render`] | Render adapter: id to visual side table and diff ops |
//! | [`sync`] | JSON serialization of the document |
//! | [`host`] | Outbound notification interface |
//! | [`config`] | Start-up tool and paint settings |
//! | [`consts`] | Shared constants |
//! | [`web`] | wasm-bindgen export and Canvas2D painting |

pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod geometry;
pub mod hit;
pub mod host;
pub mod input;
pub mod render;
pub mod selection;
pub mod shape;
pub mod sync;
pub mod web;
