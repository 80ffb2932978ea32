//! Constraints on symbolic values
//!
//! A value carries at most one constraint per kind. Adding a constraint either narrows
//! the set (ranges intersect), is redundant, or contradicts; a contradiction means the
//! path that produced it cannot execute.
//!
//! Bool and Range constraints imply a non-null value, so they contradict `Null`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BoolConstraint {
    True,
    False,
}

impl BoolConstraint {
    pub fn from_bool(value: bool) -> Self {
        if value {
            Self::True
        } else {
            Self::False
        }
    }

    pub fn as_bool(&self) -> bool {
        matches!(self, Self::True)
    }

    pub fn opposite(&self) -> Self {
        match self {
            Self::True => Self::False,
            Self::False => Self::True,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObjectConstraint {
    Null,
    NotNull,
}

impl ObjectConstraint {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Null => Self::NotNull,
            Self::NotNull => Self::Null,
        }
    }
}

/// Closed integer interval, `None` bounds are infinite
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NumberRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl NumberRange {
    pub fn exact(value: i64) -> Self {
        Self {
            min: Some(value),
            max: Some(value),
        }
    }

    pub fn at_least(min: i64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: i64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn between(min: i64, max: i64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn exact_value(&self) -> Option<i64> {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => Some(min),
            _ => None,
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min.map_or(true, |min| value >= min) && self.max.map_or(true, |max| value <= max)
    }

    /// `None` when the intervals are disjoint
    pub fn intersect(&self, other: &NumberRange) -> Option<NumberRange> {
        let min = match (self.min, other.min) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        let max = match (self.max, other.max) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        match (min, max) {
            (Some(lo), Some(hi)) if lo > hi => None,
            _ => Some(NumberRange { min, max }),
        }
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min, self.max) {
            (Some(lo), Some(hi)) if lo == hi => write!(f, "{}", lo),
            (lo, hi) => write!(
                f,
                "{}..={}",
                lo.map_or("-inf".to_string(), |v| v.to_string()),
                hi.map_or("+inf".to_string(), |v| v.to_string())
            ),
        }
    }
}

/// A predicate narrowing what a symbolic value may be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Constraint {
    Bool(BoolConstraint),
    Object(ObjectConstraint),
    Range(NumberRange),
}

impl Constraint {
    pub const TRUE: Constraint = Constraint::Bool(BoolConstraint::True);
    pub const FALSE: Constraint = Constraint::Bool(BoolConstraint::False);
    pub const NULL: Constraint = Constraint::Object(ObjectConstraint::Null);
    pub const NOT_NULL: Constraint = Constraint::Object(ObjectConstraint::NotNull);

    pub fn from_bool(value: bool) -> Self {
        Constraint::Bool(BoolConstraint::from_bool(value))
    }
}

/// All constraints attached to one value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstraintSet {
    pub bool: Option<BoolConstraint>,
    pub object: Option<ObjectConstraint>,
    pub range: Option<NumberRange>,
}

impl ConstraintSet {
    pub fn is_empty(&self) -> bool {
        self.bool.is_none() && self.object.is_none() && self.range.is_none()
    }

    /// Effective nullness, including what Bool/Range imply
    pub fn nullness(&self) -> Option<ObjectConstraint> {
        match self.object {
            Some(object) => Some(object),
            None if self.bool.is_some() || self.range.is_some() => Some(ObjectConstraint::NotNull),
            None => None,
        }
    }

    /// Combine with `constraint`; `None` when they contradict
    pub fn with(&self, constraint: Constraint) -> Option<ConstraintSet> {
        let mut next = *self;
        match constraint {
            Constraint::Bool(value) => {
                if self.bool.map_or(false, |existing| existing != value)
                    || self.object == Some(ObjectConstraint::Null)
                {
                    return None;
                }
                next.bool = Some(value);
            }
            Constraint::Object(value) => {
                if self.nullness().map_or(false, |existing| existing != value) {
                    return None;
                }
                next.object = Some(value);
            }
            Constraint::Range(range) => {
                if self.object == Some(ObjectConstraint::Null) {
                    return None;
                }
                next.range = Some(match self.range {
                    Some(existing) => existing.intersect(&range)?,
                    None => range,
                });
            }
        }
        Some(next)
    }
}

/// A constraint kind that can be read back out of a `ConstraintSet`
pub trait ConstraintKind: Copy {
    fn from_set(set: &ConstraintSet) -> Option<Self>;
}

impl ConstraintKind for BoolConstraint {
    fn from_set(set: &ConstraintSet) -> Option<Self> {
        set.bool
    }
}

impl ConstraintKind for ObjectConstraint {
    fn from_set(set: &ConstraintSet) -> Option<Self> {
        set.nullness()
    }
}

impl ConstraintKind for NumberRange {
    fn from_set(set: &ConstraintSet) -> Option<Self> {
        set.range
    }
}

impl fmt::Display for ConstraintSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(b) = self.bool {
            parts.push(format!("{:?}", b));
        }
        if let Some(o) = self.object {
            parts.push(format!("{:?}", o));
        }
        if let Some(r) = self.range {
            parts.push(format!("Range({})", r));
        }
        write!(f, "{}", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_intersection() {
        let a = NumberRange::between(0, 10);
        let b = NumberRange::at_least(5);
        assert_eq!(a.intersect(&b), Some(NumberRange::between(5, 10)));
        assert_eq!(a.intersect(&NumberRange::at_least(11)), None);
        assert_eq!(
            NumberRange::exact(3).intersect(&NumberRange::exact(3)),
            Some(NumberRange::exact(3))
        );
    }

    #[test]
    fn test_range_display() {
        assert_eq!(NumberRange::exact(4).to_string(), "4");
        assert_eq!(NumberRange::at_least(1).to_string(), "1..=+inf");
        assert_eq!(NumberRange::at_most(-2).to_string(), "-inf..=-2");
    }

    #[test]
    fn test_bool_contradiction() {
        let set = ConstraintSet::default().with(Constraint::TRUE).unwrap();
        assert!(set.with(Constraint::TRUE).is_some());
        assert!(set.with(Constraint::FALSE).is_none());
    }

    #[test]
    fn test_null_contradicts_implied_not_null() {
        let numeric = ConstraintSet::default()
            .with(Constraint::Range(NumberRange::exact(0)))
            .unwrap();
        assert_eq!(numeric.nullness(), Some(ObjectConstraint::NotNull));
        assert!(numeric.with(Constraint::NULL).is_none());
        assert!(numeric.with(Constraint::NOT_NULL).is_some());

        let null = ConstraintSet::default().with(Constraint::NULL).unwrap();
        assert!(null.with(Constraint::TRUE).is_none());
        assert!(null.with(Constraint::Range(NumberRange::exact(1))).is_none());
    }

    #[test]
    fn test_range_narrowing_and_emptiness() {
        let set = ConstraintSet::default()
            .with(Constraint::Range(NumberRange::at_most(9)))
            .unwrap();
        let narrowed = set.with(Constraint::Range(NumberRange::at_least(9))).unwrap();
        assert_eq!(narrowed.range, Some(NumberRange::exact(9)));
        assert!(narrowed
            .with(Constraint::Range(NumberRange::at_least(10)))
            .is_none());
    }
}
