//! Application layer: line selection behaviour and the page it drives.

pub mod fragment;
pub mod navigation;
pub mod page;
pub mod registry;
pub mod selector;
pub mod source;
