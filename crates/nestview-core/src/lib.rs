//! # nestview core
//!
//! Shared vocabulary for the nestview crates:
//!
//! - `geometry`: `Vec3`, `Quat`, `Bounds`, `ClipVolume` and `Pose`, the
//!   minimum math a 3D list and the placement helpers need.
//! - `animation`: easing curves and a frame-stepped `Tween`.
//! - `config`: `ListConfig`, deserializable with the `serde` feature.
//! - `error`: `ListError`, the setup-time failure taxonomy.
//!
//! All positions are expressed in a controller's local space. Lists scroll
//! along local +z; indentation runs along local +x.
//!
//! ```rust
//! use nestview_core::*;
//! use std::time::Duration;
//!
//! let mut grow = Tween::new(
//!     Vec3::ZERO,
//!     Vec3::ONE,
//!     AnimationSpec::tween(Duration::from_millis(500), Easing::EaseIn),
//! );
//! grow.advance(Duration::from_millis(250));
//! assert!((grow.get().x - 0.25).abs() < 1e-4);
//! ```

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod ids;
pub mod tests;

pub use animation::*;
pub use config::*;
pub use error::*;
pub use geometry::*;
pub use ids::*;
