#![warn(missing_docs)]

//! Editor core for pipecad.
//!
//! [`SceneStore`] owns the scene, the selection, the undo history and the
//! design archive; every mutation goes through it so history capture cannot
//! be bypassed. Snapping lives in `pipecad-snap` and only borrows the scene.
//!
//! # Example
//!
//! ```
//! use pipecad_editor::SceneStore;
//! use pipecad_ir::{ComponentType, Properties, Vec3};
//!
//! let mut store = SceneStore::new();
//! let ids = store.place(ComponentType::Straight, Vec3::zero(), Vec3::zero(), Properties::new());
//! assert_eq!(ids.len(), 1);
//! assert!(store.undo());
//! assert!(store.components().is_empty());
//! ```

pub mod archive;
pub mod assembly;
pub mod bom;
mod config;
mod error;
pub mod history;
mod library;
mod selection;
mod store;

pub use archive::{ArchiveEntry, DesignArchive, ARCHIVE_LIMIT};
pub use assembly::{capture_template, instantiate_template};
pub use bom::{bill_of_materials, estimate, tag_for, BomLine, Estimate, Estimator};
pub use config::EditorConfig;
pub use error::{EditorError, Result};
pub use history::{History, Snapshot, HISTORY_LIMIT};
pub use library::PartLibrary;
pub use selection::Selection;
pub use store::{SceneStore, UNTITLED_DESIGN};
