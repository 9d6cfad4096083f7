use crate::error::ConfigError;
use crate::store::{Column, Row};
use std::fmt;
use std::str::FromStr;

/// Which attribute row represents a contact when it has several phones or
/// emails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AttributeSelection {
    /// The first row the store returned.
    #[default]
    First,
    /// The first row flagged primary, falling back to the first row.
    Primary,
}

impl AttributeSelection {
    /// Pick one row out of the rows returned for a single contact.
    pub fn pick(self, rows: Vec<Row>) -> Option<Row> {
        match self {
            Self::First => rows.into_iter().next(),
            Self::Primary => {
                let primary = rows
                    .iter()
                    .position(|row| row.get_bool(Column::IsPrimary).unwrap_or(false));
                rows.into_iter().nth(primary.unwrap_or(0))
            }
        }
    }
}

impl FromStr for AttributeSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Self::First),
            "primary" => Ok(Self::Primary),
            other => Err(ConfigError::Other(format!(
                "unknown attribute selection '{}', expected 'first' or 'primary'",
                other
            ))),
        }
    }
}

impl fmt::Display for AttributeSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => f.write_str("first"),
            Self::Primary => f.write_str("primary"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with(Column::Number, "111").with(Column::IsPrimary, false),
            Row::new().with(Column::Number, "222").with(Column::IsPrimary, true),
            Row::new().with(Column::Number, "333").with(Column::IsPrimary, true),
        ]
    }

    fn number(row: Option<Row>) -> Option<String> {
        row.and_then(|r| r.get_str(Column::Number).map(str::to_string))
    }

    #[test]
    fn test_first_takes_store_order() {
        assert_eq!(number(AttributeSelection::First.pick(rows())), Some("111".into()));
    }

    #[test]
    fn test_primary_prefers_flagged_row() {
        assert_eq!(number(AttributeSelection::Primary.pick(rows())), Some("222".into()));
    }

    #[test]
    fn test_primary_falls_back_to_first() {
        let unflagged = vec![
            Row::new().with(Column::Number, "111"),
            Row::new().with(Column::Number, "222"),
        ];
        assert_eq!(
            number(AttributeSelection::Primary.pick(unflagged)),
            Some("111".into())
        );
    }

    #[test]
    fn test_empty_rows_pick_nothing() {
        assert!(AttributeSelection::First.pick(Vec::new()).is_none());
        assert!(AttributeSelection::Primary.pick(Vec::new()).is_none());
    }

    #[test]
    fn test_parse() {
        assert_eq!("first".parse::<AttributeSelection>().unwrap(), AttributeSelection::First);
        assert_eq!(" Primary ".parse::<AttributeSelection>().unwrap(), AttributeSelection::Primary);
        assert!("newest".parse::<AttributeSelection>().is_err());
    }
}
