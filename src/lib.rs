//! Layered board editor core.
//!
//! A board is a fixed 32×105-unit rounded rectangle holding at most one image
//! and any number of text boxes. This crate owns the scene model and the
//! algorithms around it: collision-free layer ordering, device-to-board
//! coordinate mapping, center-anchored image transforms, back-to-front
//! composition, drag sessions, and single/batch raster export. Drawing,
//! persistence and object storage are host collaborators reached through the
//! traits in [`surface`] and [`store`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level [`engine::Editor`] and surface-free [`engine::EditorCore`] |
//! | [`doc`] | Elements, board settings, and the owning [`doc::Scene`] |
//! | [`order`] | Layer ordering: move up/down, bounds, next free layer |
//! | [`camera`] | Device-to-board coordinate mapping and viewport fitting |
//! | [`transform`] | Center-anchored image transforms and text extents |
//! | [`compose`] | Back-to-front draw list for the rendering surface |
//! | [`hit`] | Topmost element under a board point |
//! | [`input`] | Drag session state machine |
//! | [`surface`] | Rendering-surface trait and capture types |
//! | [`export`] | Single and batch raster export with state restore |
//! | [`archive`] | Zip packaging of batch output |
//! | [`snapshot`] | Persisted scene form and legacy layer back-fill |
//! | [`store`] | Persistence and object-store boundaries |
//! | [`config`] | Environment configuration |
//! | [`consts`] | Board geometry and attribute bounds |

pub mod archive;
pub mod camera;
pub mod compose;
pub mod config;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod error;
pub mod export;
pub mod hit;
pub mod input;
pub mod order;
pub mod snapshot;
pub mod store;
pub mod surface;
pub mod transform;
