//! HTML tag rendering and placeholder splicing.

pub mod splice;
pub mod tag;

pub use splice::splice;
pub use tag::{AttrValue, Render, TagDescriptor};
