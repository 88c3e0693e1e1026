//! Stop query descriptor.

use std::fmt;

/// Error returned when a stop is configured with anything other than
/// exactly one identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "configure exactly one of stop id ({id}), stop number ({num}) or stop group ({group}); \
     {count} are set"
)]
pub struct ConfigurationError {
    pub id: u64,
    pub num: u64,
    pub group: u64,
    pub count: usize,
}

/// Which upstream identifier scheme a query uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopKind {
    Id,
    Number,
    Group,
}

impl StopKind {
    /// Short label used in sensor identifiers.
    pub fn label(&self) -> &'static str {
        match self {
            StopKind::Id => "id",
            StopKind::Number => "num",
            StopKind::Group => "group",
        }
    }
}

/// A query for one stop, addressed by exactly one identifier scheme.
///
/// A `StopQuery` can only hold one identifier, so any value of this type
/// is a valid query. Use [`StopQuery::from_identifiers`] to build one from
/// the three optional configuration fields.
///
/// # Examples
///
/// ```
/// use mpk_departures::domain::StopQuery;
///
/// let query = StopQuery::from_identifiers(0, 0, 1234).unwrap();
/// assert_eq!(query, StopQuery::ByGroup(1234));
///
/// // Nothing set
/// assert!(StopQuery::from_identifiers(0, 0, 0).is_err());
///
/// // Two schemes set
/// assert!(StopQuery::from_identifiers(12, 0, 34).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StopQuery {
    ById(u64),
    ByNumber(u64),
    ByGroup(u64),
}

impl StopQuery {
    /// Build a query from the id/number/group triple, where `0` means unset.
    ///
    /// Exactly one of the three must be non-zero.
    pub fn from_identifiers(id: u64, num: u64, group: u64) -> Result<Self, ConfigurationError> {
        let count = [id, num, group].iter().filter(|&&v| v != 0).count();

        match (count, id, num, group) {
            (1, id, 0, 0) => Ok(StopQuery::ById(id)),
            (1, 0, num, 0) => Ok(StopQuery::ByNumber(num)),
            (1, 0, 0, group) => Ok(StopQuery::ByGroup(group)),
            _ => Err(ConfigurationError {
                id,
                num,
                group,
                count,
            }),
        }
    }

    /// The identifier scheme of this query.
    pub fn kind(&self) -> StopKind {
        match self {
            StopQuery::ById(_) => StopKind::Id,
            StopQuery::ByNumber(_) => StopKind::Number,
            StopQuery::ByGroup(_) => StopKind::Group,
        }
    }

    /// The identifier value, whichever scheme it belongs to.
    pub fn value(&self) -> u64 {
        match *self {
            StopQuery::ById(v) | StopQuery::ByNumber(v) | StopQuery::ByGroup(v) => v,
        }
    }
}

impl fmt::Display for StopQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.kind().label(), self.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_identifier_builds_matching_kind() {
        assert_eq!(
            StopQuery::from_identifiers(42, 0, 0),
            Ok(StopQuery::ById(42))
        );
        assert_eq!(
            StopQuery::from_identifiers(0, 7, 0),
            Ok(StopQuery::ByNumber(7))
        );
        assert_eq!(
            StopQuery::from_identifiers(0, 0, 9),
            Ok(StopQuery::ByGroup(9))
        );
    }

    #[test]
    fn reject_no_identifier() {
        let err = StopQuery::from_identifiers(0, 0, 0).unwrap_err();
        assert_eq!(err.count, 0);
    }

    #[test]
    fn reject_multiple_identifiers() {
        assert_eq!(StopQuery::from_identifiers(1, 2, 0).unwrap_err().count, 2);
        assert_eq!(StopQuery::from_identifiers(1, 0, 3).unwrap_err().count, 2);
        assert_eq!(StopQuery::from_identifiers(0, 2, 3).unwrap_err().count, 2);
        assert_eq!(StopQuery::from_identifiers(1, 2, 3).unwrap_err().count, 3);
    }

    #[test]
    fn error_display() {
        let err = StopQuery::from_identifiers(1, 2, 0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "configure exactly one of stop id (1), stop number (2) or stop group (0); 2 are set"
        );
    }

    #[test]
    fn kind_and_value() {
        let q = StopQuery::ByNumber(1580);
        assert_eq!(q.kind(), StopKind::Number);
        assert_eq!(q.kind().label(), "num");
        assert_eq!(q.value(), 1580);
    }

    #[test]
    fn display() {
        assert_eq!(StopQuery::ById(12).to_string(), "id=12");
        assert_eq!(StopQuery::ByNumber(34).to_string(), "num=34");
        assert_eq!(StopQuery::ByGroup(56).to_string(), "group=56");
    }
}
