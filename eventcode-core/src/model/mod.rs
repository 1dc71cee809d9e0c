pub mod category;
pub mod text_range;

pub use category::{category_color, Category, Rgb, DEFAULT_COLOR};
pub use text_range::TextRange;
