pub mod font;
pub mod palette;
pub mod resolver;
pub mod text;

pub use font::{FontFamily, FontStyle, FontWeight};
pub use resolver::{RunAttributes, resolve, resolve_run};
pub use text::TextDecoration;
