//! Shared helpers for the wiki server.

pub mod form;
pub mod html;
pub mod mime;
pub mod path;
