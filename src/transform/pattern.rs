use regex::Regex;

use super::TransformOutcome;
use crate::report::SkipReason;

/// Remove every non-overlapping match of `re` from `name`.
pub fn delete_matches(re: &Regex, name: &str) -> TransformOutcome {
    let stripped = re.replace_all(name, "");
    if stripped == name {
        return TransformOutcome::Unchanged(SkipReason::NoMatch);
    }
    TransformOutcome::Rename(stripped.into_owned())
}
