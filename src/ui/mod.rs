pub mod card;
pub mod style;

pub use card::{page_embed, page_selector};
