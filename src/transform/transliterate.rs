//! Ordering-letter tables.
//!
//! An `OrderingTable` maps a single character to the Latin letter it sorts
//! under. The bundled `PinyinTable` covers:
//! - ASCII letters (upper-cased),
//! - Han characters via the first letter of their Mandarin reading,
//! - Latin letters with diacritics via canonical decomposition ("É" -> 'E'),
//! - a handful of Latin letters that do not decompose ("ß", "Æ", "Ø", ...).
//!
//! Anything else maps to `None`, which callers render as '#'.

use std::fmt;

use pinyin::ToPinyin;
use unicode_normalization::UnicodeNormalization;

pub trait OrderingTable: fmt::Debug + Send + Sync {
    /// Upper-case ASCII letter for `c`, or `None` when unmapped.
    fn ordering_letter(&self, c: char) -> Option<char>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PinyinTable;

impl OrderingTable for PinyinTable {
    fn ordering_letter(&self, c: char) -> Option<char> {
        if c.is_ascii_alphabetic() {
            return Some(c.to_ascii_uppercase());
        }
        if c.is_ascii() {
            return None;
        }
        if let Some(reading) = c.to_pinyin() {
            return first_ascii_letter(reading.first_letter());
        }
        if let Some(base) = std::iter::once(c).nfd().next()
            && base.is_ascii_alphabetic()
        {
            return Some(base.to_ascii_uppercase());
        }
        non_decomposing_latin(c)
    }
}

fn first_ascii_letter(s: &str) -> Option<char> {
    s.chars()
        .next()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
}

fn non_decomposing_latin(c: char) -> Option<char> {
    let letter = match c {
        'ß' | 'ẞ' | 'ſ' => 'S',
        'æ' | 'Æ' => 'A',
        'œ' | 'Œ' => 'O',
        'ø' | 'Ø' => 'O',
        'đ' | 'Đ' | 'ð' | 'Ð' => 'D',
        'ł' | 'Ł' => 'L',
        'þ' | 'Þ' => 'T',
        'ħ' | 'Ħ' => 'H',
        'ı' => 'I',
        _ => return None,
    };
    Some(letter)
}
