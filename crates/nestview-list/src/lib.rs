//! # Nested list engine
//!
//! Renders an unbounded, lazily expanded tree (object → components →
//! properties → array elements) into a bounded scrolling viewport by
//! recycling a small pool of rows.
//!
//! Pieces, leaves first:
//!
//! - `ExpansionStore`: identity → expanded flag, kept across data refreshes.
//! - `TemplateCache`: template kind → footprint, measured once.
//! - `Walker`: depth-first pre-order layout; decides render vs. recycle.
//! - `RowPool`: rows keyed by node identity, reused per template.
//! - `diff`: keeps the array-size row alive while an array changes length.
//!
//! `NestedListController` owns all of them.
//!
//! ```rust
//! use nestview_core::*;
//! use nestview_list::*;
//!
//! let mut templates = TemplateCache::new();
//! templates.register("header", Template::fixed(RowRole::Header, Vec3::new(1.0, 0.1, 4.0)))?;
//! templates.register("plain", Template::fixed(RowRole::Plain, Vec3::new(1.0, 0.1, 4.0)))?;
//!
//! let config = ListConfig::default().with_bounds(Bounds::new(Vec3::ZERO, Vec3::new(1.0, 1.0, 10.0)));
//! let mut list = NestedListController::new(config, templates)?;
//! list.set_data(vec![
//!     Node::object(1, "header", "Cube").with_children(vec![
//!         Node::property(2, "plain", "m_Name", PropertyValue::Text("Cube".into())),
//!     ]),
//! ])?;
//!
//! let frame = list.update()?;
//! assert_eq!(frame.visible_ids(), vec![NodeId(1), NodeId(2)]);
//! # Ok::<(), ListError>(())
//! ```

pub mod controller;
mod diff;
pub mod expand;
pub mod node;
pub mod pool;
pub mod row;
pub mod scroll;
pub mod template;
pub mod walker;


pub use controller::*;
pub use expand::*;
pub use node::*;
pub use pool::*;
pub use row::*;
pub use scroll::*;
pub use template::*;
pub use walker::{FrameSummary, RowHooks, VisibleNode};
