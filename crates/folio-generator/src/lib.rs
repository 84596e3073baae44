//! folio Generator Library
//!
//! Page generation engine for folio.
//!
//! # Modules
//!
//! - [`template`] - HTML template system with variable interpolation
//! - [`render`] - Data to HTML rendering through item templates
//! - [`build`] - Build orchestration and output writing

pub mod build;
pub mod render;
pub mod template;

pub use build::{BuildError, BuildStats, Builder};
pub use render::{RenderError, Renderer, compact};
pub use template::{Template, TemplateContext, TemplateError, TemplateRegistry};
