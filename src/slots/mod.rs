pub mod coloring;
pub mod selector;

pub use coloring::slot_color;
pub use selector::{current_key, select};
