//! Japanese script classification and conversion.

pub mod classifier;
pub mod converter;

pub use classifier::{classify, is_hiragana, is_kanji, is_katakana, is_romaji};
pub use converter::{
    hiragana_to_katakana, kanji_to_hiragana_reading, katakana_to_hiragana, reading_of_tokens,
    to_romaji,
};
