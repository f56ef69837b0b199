//! Generic selectable table shared by every list screen

mod component;
mod selection;

pub use component::{Column, TableComponent};
