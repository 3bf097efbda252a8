use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// Typed form of a literal, produced by the field type during validation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum TypedValue {
    Text(String),
    Integer(i64),
    Decimal(f64),
    Date(NaiveDate),
    Choice(String),
    Decorated(Box<DecoratedValue>),
}

/// Value accepted by one member of a type chain
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecoratedValue {
    /// Name of the member type that accepted the literal
    pub kind: String,
    pub raw: String,
    pub typed: TypedValue,
}

/// A scalar literal as entered by the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SingleValue {
    pub raw: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed: Option<TypedValue>,
}

impl SingleValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            typed: None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for SingleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.raw)
    }
}

impl From<&str> for SingleValue {
    fn from(raw: &str) -> Self {
        SingleValue::new(raw)
    }
}

/// A range between two values, each bound inclusive or exclusive
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Range {
    pub lower: SingleValue,
    pub upper: SingleValue,
    pub lower_inclusive: bool,
    pub upper_inclusive: bool,
}

impl Range {
    /// Create a range including both bounds
    pub fn new(lower: impl Into<SingleValue>, upper: impl Into<SingleValue>) -> Self {
        Self::with_bounds(lower, upper, true, true)
    }

    pub fn with_bounds(
        lower: impl Into<SingleValue>,
        upper: impl Into<SingleValue>,
        lower_inclusive: bool,
        upper_inclusive: bool,
    ) -> Self {
        Self {
            lower: lower.into(),
            upper: upper.into(),
            lower_inclusive,
            upper_inclusive,
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.upper)
    }
}

/// Comparison operators accepted by the query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOperator {
    #[serde(rename = "<")]
    Lower,
    #[serde(rename = "<=")]
    LowerOrEqual,
    #[serde(rename = "<>")]
    NotEqual,
    #[serde(rename = ">")]
    Higher,
    #[serde(rename = ">=")]
    HigherOrEqual,
}

impl CompareOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOperator::Lower => "<",
            CompareOperator::LowerOrEqual => "<=",
            CompareOperator::NotEqual => "<>",
            CompareOperator::Higher => ">",
            CompareOperator::HigherOrEqual => ">=",
        }
    }

    /// `>` or `>=`
    pub fn is_higher_family(&self) -> bool {
        matches!(self, CompareOperator::Higher | CompareOperator::HigherOrEqual)
    }

    /// `<` or `<=`
    pub fn is_lower_family(&self) -> bool {
        matches!(self, CompareOperator::Lower | CompareOperator::LowerOrEqual)
    }

    pub fn includes_value(&self) -> bool {
        matches!(
            self,
            CompareOperator::LowerOrEqual | CompareOperator::HigherOrEqual
        )
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Compare {
    pub operator: CompareOperator,
    pub value: SingleValue,
}

impl Compare {
    pub fn new(operator: CompareOperator, value: impl Into<SingleValue>) -> Self {
        Self {
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for Compare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.value)
    }
}

/// Kind of pattern match, plain or negated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternMatchType {
    Contains,
    StartsWith,
    EndsWith,
    Regex,
    NotContains,
    NotStartsWith,
    NotEndsWith,
    NotRegex,
}

impl PatternMatchType {
    pub fn is_negated(&self) -> bool {
        matches!(
            self,
            PatternMatchType::NotContains
                | PatternMatchType::NotStartsWith
                | PatternMatchType::NotEndsWith
                | PatternMatchType::NotRegex
        )
    }

    pub fn is_regex(&self) -> bool {
        matches!(self, PatternMatchType::Regex | PatternMatchType::NotRegex)
    }

    /// Negated counterpart of a plain type (and the reverse)
    pub fn negate(self) -> Self {
        match self {
            PatternMatchType::Contains => PatternMatchType::NotContains,
            PatternMatchType::StartsWith => PatternMatchType::NotStartsWith,
            PatternMatchType::EndsWith => PatternMatchType::NotEndsWith,
            PatternMatchType::Regex => PatternMatchType::NotRegex,
            PatternMatchType::NotContains => PatternMatchType::Contains,
            PatternMatchType::NotStartsWith => PatternMatchType::StartsWith,
            PatternMatchType::NotEndsWith => PatternMatchType::EndsWith,
            PatternMatchType::NotRegex => PatternMatchType::Regex,
        }
    }

    /// Operator characters as written after `~` (without the `i` flag)
    pub fn operator(&self) -> &'static str {
        match self {
            PatternMatchType::Contains => "*",
            PatternMatchType::StartsWith => ">",
            PatternMatchType::EndsWith => "<",
            PatternMatchType::Regex => "?",
            PatternMatchType::NotContains => "!*",
            PatternMatchType::NotStartsWith => "!>",
            PatternMatchType::NotEndsWith => "!<",
            PatternMatchType::NotRegex => "!?",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternMatch {
    pub value: String,
    #[serde(rename = "type")]
    pub match_type: PatternMatchType,
    pub case_insensitive: bool,
}

impl PatternMatch {
    pub fn new(value: impl Into<String>, match_type: PatternMatchType) -> Self {
        Self {
            value: value.into(),
            match_type,
            case_insensitive: false,
        }
    }

    pub fn case_insensitive(mut self, value: bool) -> Self {
        self.case_insensitive = value;
        self
    }
}

impl fmt::Display for PatternMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = if self.case_insensitive { "i" } else { "" };
        write!(f, "~{}{}\"{}\"", flag, self.match_type.operator(), self.value)
    }
}
