use super::{ContinuityScope, ValidationError};
use crate::model::item::{ItemKind, ItemLocator};

/// Classified labels of one submitted day.
///
/// Order inside each list follows the raw input; relative order between
/// problems and exercises is not retained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemBatch {
    pub problems: Vec<String>,
    pub exercises: Vec<String>,
}

impl ItemBatch {
    pub fn new(problems: Vec<String>, exercises: Vec<String>) -> Self {
        Self {
            problems,
            exercises,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty() && self.exercises.is_empty()
    }

    pub fn len(&self) -> usize {
        self.problems.len() + self.exercises.len()
    }
}

/// Splits, parses and classifies comma-separated input.
///
/// Empty and whitespace-only tokens are dropped. The first unparseable token
/// rejects the whole input.
pub fn validate_batch(raw: &str) -> Result<ItemBatch, ValidationError> {
    let mut batch = ItemBatch::default();

    for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        let locator = ItemLocator::parse(token).ok_or_else(|| ValidationError::Format {
            token: token.to_string(),
        })?;
        match locator.kind() {
            ItemKind::Problem => batch.problems.push(token.to_string()),
            ItemKind::Exercise => batch.exercises.push(token.to_string()),
        }
    }

    Ok(batch)
}

/// Successor relation between two locators of the same kind.
///
/// Chapter rollover is accepted without checking the previous chapter's
/// length. Mixed kinds are never consecutive.
pub fn is_consecutive(prev: &ItemLocator, next: &ItemLocator) -> bool {
    let (c1, s1, c2, s2) = (prev.chapter(), prev.section(), next.chapter(), next.section());
    let next_chapter = c1.checked_add(1) == Some(c2);

    match (prev.sub_index(), next.sub_index()) {
        (None, None) => {
            if c1 == c2 {
                s1.checked_add(1) == Some(s2)
            } else {
                next_chapter && s2 == 1
            }
        }
        (Some(e1), Some(e2)) => {
            if c1 == c2 && s1 == s2 {
                e1.checked_add(1) == Some(e2)
            } else if c1 == c2 && s1.checked_add(1) == Some(s2) {
                e2 == 1
            } else {
                next_chapter && s2 == 1 && e2 == 1
            }
        }
        _ => false,
    }
}

fn labels_consecutive(prev: &str, next: &str) -> bool {
    match (ItemLocator::parse(prev), ItemLocator::parse(next)) {
        (Some(prev), Some(next)) => is_consecutive(&prev, &next),
        _ => false,
    }
}

fn check_intra_day(items: &[String], kind: ItemKind) -> Result<(), ValidationError> {
    match items
        .windows(2)
        .find(|pair| !labels_consecutive(&pair[0], &pair[1]))
    {
        Some(pair) => Err(ValidationError::Continuity {
            kind,
            scope: ContinuityScope::IntraDay,
            previous: pair[0].clone(),
            next: pair[1].clone(),
        }),
        None => Ok(()),
    }
}

fn check_cross_day(
    today: &[String],
    previous: &[String],
    kind: ItemKind,
) -> Result<(), ValidationError> {
    let (Some(last), Some(first)) = (previous.last(), today.first()) else {
        return Ok(());
    };
    if labels_consecutive(last, first) {
        return Ok(());
    }
    Err(ValidationError::Continuity {
        kind,
        scope: ContinuityScope::CrossDay,
        previous: last.clone(),
        next: first.clone(),
    })
}

/// Checks a day's items against themselves and the previous record.
///
/// `previous` holds the lists of the latest record strictly before the edited
/// date, or an empty batch when none exists.
pub fn validate_continuity(
    today: &ItemBatch,
    previous: &ItemBatch,
) -> Result<(), ValidationError> {
    check_intra_day(&today.problems, ItemKind::Problem)?;
    check_intra_day(&today.exercises, ItemKind::Exercise)?;
    check_cross_day(&today.problems, &previous.problems, ItemKind::Problem)?;
    check_cross_day(&today.exercises, &previous.exercises, ItemKind::Exercise)
}

#[cfg(test)]
mod tests {
    use super::{is_consecutive, validate_batch, validate_continuity, ItemBatch};
    use crate::model::item::{ItemKind, ItemLocator};
    use crate::validation::{ContinuityScope, ValidationError};

    fn loc(label: &str) -> ItemLocator {
        ItemLocator::parse(label).expect("test label should parse")
    }

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| item.to_string()).collect()
    }

    #[test]
    fn problem_successors() {
        assert!(is_consecutive(&loc("3.4"), &loc("3.5")));
        assert!(is_consecutive(&loc("3.4"), &loc("4.1")));
        assert!(is_consecutive(&loc("3.99"), &loc("4.1")));
        assert!(!is_consecutive(&loc("3.4"), &loc("3.6")));
        assert!(!is_consecutive(&loc("3.4"), &loc("3.4")));
        assert!(!is_consecutive(&loc("3.4"), &loc("4.2")));
        assert!(!is_consecutive(&loc("3.4"), &loc("5.1")));
        assert!(!is_consecutive(&loc("3.4"), &loc("3.3")));
    }

    #[test]
    fn exercise_successors() {
        assert!(is_consecutive(&loc("3.4.7"), &loc("3.4.8")));
        assert!(is_consecutive(&loc("3.4.7"), &loc("3.5.1")));
        assert!(is_consecutive(&loc("3.4.7"), &loc("4.1.1")));
        assert!(!is_consecutive(&loc("3.4.7"), &loc("3.4.9")));
        assert!(!is_consecutive(&loc("3.4.7"), &loc("3.5.2")));
        assert!(!is_consecutive(&loc("3.4.7"), &loc("3.6.1")));
        assert!(!is_consecutive(&loc("3.4.7"), &loc("4.2.1")));
        assert!(!is_consecutive(&loc("3.4.7"), &loc("4.1.2")));
    }

    #[test]
    fn mixed_kinds_are_never_consecutive() {
        assert!(!is_consecutive(&loc("3.4"), &loc("3.4.1")));
        assert!(!is_consecutive(&loc("3.4.1"), &loc("3.5")));
    }

    #[test]
    fn overflowing_components_do_not_wrap() {
        let max = u32::MAX;
        assert!(!is_consecutive(&loc(&format!("1.{max}")), &loc("1.0")));
        assert!(!is_consecutive(&loc(&format!("{max}.3")), &loc("0.1")));
    }

    #[test]
    fn batch_splits_and_drops_blank_tokens() {
        let batch = validate_batch(" 15.1, ,15.1.1,, 15.2 ,  ").unwrap();
        assert_eq!(batch.problems, labels(&["15.1", "15.2"]));
        assert_eq!(batch.exercises, labels(&["15.1.1"]));
    }

    #[test]
    fn batch_rejects_first_bad_token() {
        let err = validate_batch("15.1, 15.x, 1.2.3.4").unwrap_err();
        assert_eq!(
            err,
            ValidationError::Format {
                token: "15.x".into()
            }
        );
    }

    #[test]
    fn intra_day_problems_are_checked_before_exercises() {
        let today = ItemBatch::new(labels(&["1.1", "1.3"]), labels(&["1.1.1", "1.1.3"]));
        let err = validate_continuity(&today, &ItemBatch::default()).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::Continuity {
                kind: ItemKind::Problem,
                scope: ContinuityScope::IntraDay,
                ..
            }
        ));
    }

    #[test]
    fn intra_day_breaks_win_over_cross_day_breaks() {
        let today = ItemBatch::new(labels(&["2.2"]), labels(&["1.1.1", "1.1.3"]));
        let previous = ItemBatch::new(labels(&["1.7"]), Vec::new());
        let err = validate_continuity(&today, &previous).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Continuity {
                kind: ItemKind::Exercise,
                scope: ContinuityScope::IntraDay,
                previous: "1.1.1".into(),
                next: "1.1.3".into(),
            }
        );
    }

    #[test]
    fn cross_day_skipped_when_either_side_empty() {
        let today = ItemBatch::new(labels(&["9.9"]), Vec::new());
        let previous = ItemBatch::new(Vec::new(), labels(&["1.1.1"]));
        assert!(validate_continuity(&today, &previous).is_ok());
    }

    #[test]
    fn cross_day_exercise_break_reports_both_items() {
        let today = ItemBatch::new(labels(&["1.3"]), labels(&["1.2.5"]));
        let previous = ItemBatch::new(labels(&["1.2"]), labels(&["1.2.3"]));
        let err = validate_continuity(&today, &previous).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Exercise sequence broken across days: 1.2.3 -> 1.2.5"
        );
    }
}
