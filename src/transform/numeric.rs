use super::{TransformOutcome, split_extension};
use crate::fs_ops::EntryKind;
use crate::report::SkipReason;

/// Keep only the digit runs of a name (plus `-`/`.` separators touching a
/// digit), in their original order. Files keep their extension.
///
/// "Vol.03-04 [scan].cbz" -> "03-04.cbz"
pub fn extract_numeric(name: &str, kind: EntryKind) -> TransformOutcome {
    let (stem, ext) = match kind {
        EntryKind::File => split_extension(name),
        EntryKind::Directory => (name, ""),
    };

    let chars: Vec<char> = stem.chars().collect();
    let touches_digit = |i: usize| {
        let before = i > 0 && chars[i - 1].is_ascii_digit();
        let after = chars.get(i + 1).is_some_and(|c| c.is_ascii_digit());
        before || after
    };

    let mut kept = String::with_capacity(stem.len());
    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_digit() || (is_separator(c) && touches_digit(i)) {
            kept.push(c);
        }
    }
    let kept = kept.trim_matches(is_separator);

    if !kept.bytes().any(|b| b.is_ascii_digit()) {
        return TransformOutcome::Unchanged(SkipReason::NoDigits);
    }
    if kept == stem {
        return TransformOutcome::Unchanged(SkipReason::AlreadyNumeric);
    }
    TransformOutcome::Rename(format!("{kept}{ext}"))
}

fn is_separator(c: char) -> bool {
    c == '-' || c == '.'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_and_touching_separators_kept() {
        assert_eq!(
            extract_numeric("Vol.03-04 [scan].cbz", EntryKind::File),
            TransformOutcome::Rename("03-04.cbz".into())
        );
        assert_eq!(
            extract_numeric("v1.2-final.txt", EntryKind::File),
            TransformOutcome::Rename("1.2.txt".into())
        );
        assert_eq!(
            extract_numeric("chapter 12 part 3.md", EntryKind::File),
            TransformOutcome::Rename("123.md".into())
        );
    }

    #[test]
    fn no_digits_is_unchanged() {
        assert_eq!(
            extract_numeric("notes.txt", EntryKind::File),
            TransformOutcome::Unchanged(SkipReason::NoDigits)
        );
        // Digits only in the extension do not count.
        assert_eq!(
            extract_numeric("track.mp3", EntryKind::File),
            TransformOutcome::Unchanged(SkipReason::NoDigits)
        );
    }

    #[test]
    fn already_numeric_is_unchanged() {
        assert_eq!(
            extract_numeric("2024-01.pdf", EntryKind::File),
            TransformOutcome::Unchanged(SkipReason::AlreadyNumeric)
        );
    }

    #[test]
    fn directories_use_whole_name() {
        assert_eq!(
            extract_numeric("season.2", EntryKind::Directory),
            TransformOutcome::Rename("2".into())
        );
    }
}
