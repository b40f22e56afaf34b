pub mod content_card;
pub mod content_set;
pub mod creator;
pub mod generation;
pub mod summary;
