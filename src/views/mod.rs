pub mod templates;
pub mod fragments;

pub use templates::{escape, Templates};
