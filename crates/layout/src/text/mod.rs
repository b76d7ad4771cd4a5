pub mod wrapper;

pub use wrapper::{break_lines, truncate_to_width, Fragment, LineLayout};
