//! Beam Core - Scene description and file format support.
//!
//! This crate provides:
//!
//! - **Scene description types**: `SceneDesc`, `CameraDesc`, `MaterialDesc`,
//!   `ObjectDesc`, `LightDesc`
//! - **Scene files**: JSON loading, saving and validation
//!
//! # Example
//!
//! ```ignore
//! use beam_core::load_scene;
//!
//! // Load a scene file
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} objects, {} lights",
//!     scene.object_count(),
//!     scene.light_count());
//! ```

pub mod loader;
pub mod scene;

// Re-export commonly used types
pub use loader::{load_scene, load_scene_from_str, save_scene, validate, SceneError, SceneResult};
pub use scene::{CameraDesc, LightDesc, MaterialDesc, ObjectDesc, SceneDesc};
