//! Lumen Core - externally owned assets for the Lumen renderer.
//!
//! This crate provides:
//!
//! - **Image backing store**: `ImageData`, a decoded bitmap sampled by
//!   image textures, with clamped nearest-pixel lookup
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::ImageData;
//!
//! let earth = ImageData::load("earthmap.jpg")?;
//! let color = earth.sample(0.25, 0.5);
//! ```

pub mod texture;

// Re-export commonly used types
pub use texture::{ImageData, TextureError, TextureResult};
