//! Terminal user interface.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI output
//! ```
//!
//! - [`viewmodel`]: Renderable snapshot types and grid layout constants
//! - [`renderer`]: Entry point called from the plugin's `render`
//! - [`components`]: Header, tabs, grid, overlay, form, practice, footer
//! - [`helpers`]: Cursor positioning and cell-width aware text fitting
//! - [`theme`]: Color schemes and ANSI escape sequences

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::UIViewModel;
