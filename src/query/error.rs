use crate::field::ValueKind;
use thiserror::Error;

/// Structural failures: the input cannot be turned into a condition
///
/// Group numbers are displayed one-based, like in normalizer messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Syntax error at position {position}: {message}")]
    Syntax { position: usize, message: String },

    #[error("Unknown field '{field}' at position {position}")]
    UnknownField { field: String, position: usize },

    #[error("Field '{field}' does not accept {kind} (group {}, nesting level {nesting_level})", .group_index + 1)]
    UnsupportedValueType {
        field: String,
        kind: ValueKind,
        group_index: usize,
        nesting_level: usize,
    },

    #[error("Field '{field}' is required in group {} at nesting level {nesting_level}", .group_index + 1)]
    RequiredField {
        field: String,
        group_index: usize,
        nesting_level: usize,
    },

    #[error("Group {} at nesting level {nesting_level} exceeds the maximum nesting level of {max}", .group_index + 1)]
    NestingLevelExceeded {
        max: usize,
        group_index: usize,
        nesting_level: usize,
    },

    #[error("Group {} at nesting level {nesting_level} exceeds the maximum of {max} groups per level", .group_index + 1)]
    GroupsOverflow {
        max: usize,
        group_index: usize,
        nesting_level: usize,
    },

    #[error("Field '{field}' in group {} at nesting level {nesting_level} exceeds the maximum of {max} values", .group_index + 1)]
    ValuesOverflow {
        field: String,
        max: usize,
        group_index: usize,
        nesting_level: usize,
    },
}

impl QueryError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        QueryError::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Character offset in the input, for errors tied to a location
    pub fn position(&self) -> Option<usize> {
        match self {
            QueryError::Syntax { position, .. } | QueryError::UnknownField { position, .. } => {
                Some(*position)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_numbers_are_one_based() {
        let err = QueryError::NestingLevelExceeded {
            max: 2,
            group_index: 0,
            nesting_level: 3,
        };
        assert_eq!(
            err.to_string(),
            "Group 1 at nesting level 3 exceeds the maximum nesting level of 2"
        );
        assert_eq!(err.position(), None);
    }

    #[test]
    fn test_unsupported_value_type_names_kind() {
        let err = QueryError::UnsupportedValueType {
            field: "name".to_string(),
            kind: ValueKind::Range,
            group_index: 1,
            nesting_level: 1,
        };
        assert_eq!(
            err.to_string(),
            "Field 'name' does not accept ranges (group 2, nesting level 1)"
        );
    }
}
