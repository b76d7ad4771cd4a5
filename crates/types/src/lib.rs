pub mod color;
pub mod geometry;
pub mod ids;
pub mod page;

pub use color::Color;
pub use geometry::{Rect, Size};
pub use ids::{BlockId, DocumentId};
pub use page::{Margins, PageFormat};
