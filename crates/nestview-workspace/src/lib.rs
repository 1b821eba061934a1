//! # nestview workspace
//!
//! Host-side glue around the list engine, as plain state machines stepped by
//! the host's frame loop:
//!
//! - [`WorkspaceHost`] opens panels, runs their one-time setup and tells
//!   listeners when one closes.
//! - [`InspectorWorkspace`] owns a [`NestedListController`] and resizes
//!   arrays when their size row is edited.
//! - [`PlacementModule`] grows new objects into view.
//! - [`KeyboardButton`] is the editing model of a keyboard key.
//!
//! [`NestedListController`]: nestview_list::NestedListController

pub mod inspector;
pub mod keyboard;
pub mod placement;
pub mod workspace;

pub use inspector::*;
pub use keyboard::*;
pub use placement::*;
pub use workspace::*;
