//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the editors and calculators so route handlers stay
//! focused on protocol translation. Every editor is a synchronous state
//! machine; async code only appears where a data source is called.

pub mod column_editor;
pub mod flights;
pub mod kanban;
pub mod mindmap;
pub mod tools;
