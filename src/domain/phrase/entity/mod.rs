pub mod genre;
pub mod phrase;
pub mod phrase_genre;
pub mod phrase_image;
