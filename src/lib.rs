#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod editor;
pub mod element;
pub mod geometry;
pub mod history;
pub mod image_loader;
pub mod persistence;
pub mod renderer;
pub mod scene;
pub mod sync;
pub mod tools;
pub mod viewport;

pub use app::BoardApp;
pub use editor::Editor;
pub use element::{Element, ElementId, ElementKind};
pub use history::History;
pub use renderer::{RedrawScheduler, Renderer};
pub use scene::Scene;
pub use sync::{NullSync, SyncSink};
pub use tools::ToolType;
pub use viewport::Viewport;
