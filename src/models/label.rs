//! Labels and their storage encoding
//!
//! A record's labels are stored as one string joined by [`LABEL_SEPARATOR`].
//! No label may contain the separator, which is checked by
//! [`validate_new_label`] before a label is attached to anything.

use std::collections::BTreeSet;

use crate::error::{MinexError, MinexResult};

/// Reserved sequence used to join label sets for storage
pub const LABEL_SEPARATOR: &str = "§]7%}$";

/// A record's labels: unique, unordered from the user's point of view
pub type LabelSet = BTreeSet<String>;

/// Join labels for storage
pub fn join_labels<'a, I>(labels: I) -> String
where
    I: IntoIterator<Item = &'a String>,
{
    labels
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LABEL_SEPARATOR)
}

/// Split a stored label string, dropping empty fragments
pub fn split_labels(joined: &str) -> LabelSet {
    joined
        .split(LABEL_SEPARATOR)
        .filter(|label| !label.is_empty())
        .map(str::to_string)
        .collect()
}

/// Check a label before it is added to a record
///
/// `current` are the labels already on the record, `vocabulary` the labels in
/// use anywhere. With `allow_new` unset only vocabulary labels are accepted.
pub fn validate_new_label(
    label: &str,
    current: &LabelSet,
    vocabulary: &[String],
    allow_new: bool,
) -> MinexResult<()> {
    if label.is_empty() {
        return Err(MinexError::Label("Label can't be empty".into()));
    }
    if label.contains(LABEL_SEPARATOR) {
        return Err(MinexError::Label(format!(
            "Label can't contain '{}'",
            LABEL_SEPARATOR
        )));
    }
    if current.contains(label) {
        return Err(MinexError::Label(format!("Label already added: {}", label)));
    }
    if !allow_new && !vocabulary.iter().any(|known| known == label) {
        return Err(MinexError::Label(format!("Label does not exist: {}", label)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(labels: &[&str]) -> LabelSet {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_join_and_split() {
        let labels = set(&["food", "fuel"]);
        let joined = join_labels(&labels);
        assert_eq!(joined, format!("food{}fuel", LABEL_SEPARATOR));
        assert_eq!(split_labels(&joined), labels);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_labels("").is_empty());
        assert_eq!(join_labels(&LabelSet::new()), "");
    }

    #[test]
    fn test_validate_new_label() {
        let current = set(&["food"]);
        let vocabulary = vec!["food".to_string(), "fuel".to_string()];

        assert!(validate_new_label("fuel", &current, &vocabulary, false).is_ok());
        assert!(validate_new_label("rent", &current, &vocabulary, true).is_ok());
        assert!(validate_new_label("", &current, &vocabulary, true).is_err());
        assert!(validate_new_label("food", &current, &vocabulary, true).is_err());
        assert!(validate_new_label("rent", &current, &vocabulary, false).is_err());
    }

    #[test]
    fn test_separator_rejected() {
        let label = format!("a{}b", LABEL_SEPARATOR);
        let err = validate_new_label(&label, &LabelSet::new(), &[], true).unwrap_err();
        assert!(matches!(err, MinexError::Label(_)));
    }
}
