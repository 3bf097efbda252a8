use crate::value::{DecoratedValue, TypedValue, ValuesBag};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Ordering and equality of literals for one kind of field
pub trait ValueComparator: fmt::Debug + Send + Sync {
    fn is_higher(&self, a: &str, b: &str) -> bool;
    fn is_lower(&self, a: &str, b: &str) -> bool;
    fn is_equal(&self, a: &str, b: &str) -> bool;
}

/// Types whose values have an immediate successor
pub trait DiscreteValues: ValueComparator {
    /// The value directly following `value`, rendered as a literal
    fn next_value(&self, value: &str) -> Option<String>;
}

/// A field type: validation, ordering and the optional capabilities used by
/// the normalizer passes
pub trait FieldType: ValueComparator {
    fn name(&self) -> &str;

    /// Check a literal and convert it into its typed form
    ///
    /// The error is a short reason, e.g. `not a valid integer`.
    fn validate(&self, raw: &str) -> Result<TypedValue, String>;

    fn as_discrete(&self) -> Option<&dyn DiscreteValues> {
        None
    }

    /// True when the bag selects every possible value of this type, making
    /// the constraint a no-op
    fn covers_all(&self, _bag: &ValuesBag) -> bool {
        false
    }
}

fn ordering_of<T: PartialOrd>(a: Option<T>, b: Option<T>) -> Option<Ordering> {
    match (a, b) {
        (Some(a), Some(b)) => a.partial_cmp(&b),
        _ => None,
    }
}

/// Implements `ValueComparator` for a type exposing `fn parse(&self, &str) -> Option<T>`
macro_rules! parsed_comparator {
    ($ty:ty) => {
        impl ValueComparator for $ty {
            fn is_higher(&self, a: &str, b: &str) -> bool {
                ordering_of(self.parse(a), self.parse(b)) == Some(Ordering::Greater)
            }

            fn is_lower(&self, a: &str, b: &str) -> bool {
                ordering_of(self.parse(a), self.parse(b)) == Some(Ordering::Less)
            }

            fn is_equal(&self, a: &str, b: &str) -> bool {
                ordering_of(self.parse(a), self.parse(b)) == Some(Ordering::Equal)
            }
        }
    };
}

/// Free text; ordered lexicographically
#[derive(Debug, Clone, Default)]
pub struct TextType;

impl TextType {
    fn parse<'a>(&self, raw: &'a str) -> Option<&'a str> {
        Some(raw)
    }
}

parsed_comparator!(TextType);

impl FieldType for TextType {
    fn name(&self) -> &str {
        "text"
    }

    fn validate(&self, raw: &str) -> Result<TypedValue, String> {
        Ok(TypedValue::Text(raw.to_string()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct IntegerType;

impl IntegerType {
    fn parse(&self, raw: &str) -> Option<i64> {
        raw.trim().parse().ok()
    }
}

parsed_comparator!(IntegerType);

impl DiscreteValues for IntegerType {
    fn next_value(&self, value: &str) -> Option<String> {
        self.parse(value)?.checked_add(1).map(|next| next.to_string())
    }
}

impl FieldType for IntegerType {
    fn name(&self) -> &str {
        "integer"
    }

    fn validate(&self, raw: &str) -> Result<TypedValue, String> {
        self.parse(raw)
            .map(TypedValue::Integer)
            .ok_or_else(|| "not a valid integer".to_string())
    }

    fn as_discrete(&self) -> Option<&dyn DiscreteValues> {
        Some(self)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DecimalType;

impl DecimalType {
    fn parse(&self, raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

parsed_comparator!(DecimalType);

impl FieldType for DecimalType {
    fn name(&self) -> &str {
        "decimal"
    }

    fn validate(&self, raw: &str) -> Result<TypedValue, String> {
        self.parse(raw)
            .map(TypedValue::Decimal)
            .ok_or_else(|| "not a valid decimal number".to_string())
    }
}

const DATE_FORMATS: [&str; 2] = ["%d.%m.%Y", "%Y-%m-%d"];

/// Calendar date written as `dd.mm.yyyy` or `yyyy-mm-dd`
#[derive(Debug, Clone, Default)]
pub struct DateType;

impl DateType {
    fn parse_with_format(&self, raw: &str) -> Option<(NaiveDate, &'static str)> {
        let raw = raw.trim();
        DATE_FORMATS.iter().find_map(|format| {
            NaiveDate::parse_from_str(raw, format)
                .ok()
                .map(|date| (date, *format))
        })
    }

    fn parse(&self, raw: &str) -> Option<NaiveDate> {
        self.parse_with_format(raw).map(|(date, _)| date)
    }
}

parsed_comparator!(DateType);

impl DiscreteValues for DateType {
    fn next_value(&self, value: &str) -> Option<String> {
        let (date, format) = self.parse_with_format(value)?;
        date.succ_opt().map(|next| next.format(format).to_string())
    }
}

impl FieldType for DateType {
    fn name(&self) -> &str {
        "date"
    }

    fn validate(&self, raw: &str) -> Result<TypedValue, String> {
        self.parse(raw)
            .map(TypedValue::Date)
            .ok_or_else(|| "not a valid date (expected dd.mm.yyyy or yyyy-mm-dd)".to_string())
    }

    fn as_discrete(&self) -> Option<&dyn DiscreteValues> {
        Some(self)
    }
}

/// One value out of a fixed list, matched case-insensitively and ordered by
/// declaration position
#[derive(Debug, Clone)]
pub struct ChoiceType {
    choices: Vec<String>,
}

impl ChoiceType {
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    fn parse(&self, raw: &str) -> Option<usize> {
        let raw = raw.trim();
        self.choices
            .iter()
            .position(|choice| choice.eq_ignore_ascii_case(raw))
    }
}

parsed_comparator!(ChoiceType);

impl FieldType for ChoiceType {
    fn name(&self) -> &str {
        "choice"
    }

    fn validate(&self, raw: &str) -> Result<TypedValue, String> {
        self.parse(raw)
            .map(|idx| TypedValue::Choice(self.choices[idx].clone()))
            .ok_or_else(|| format!("not one of: {}", self.choices.join(", ")))
    }

    fn covers_all(&self, bag: &ValuesBag) -> bool {
        if self.choices.is_empty() || bag.count() != bag.single_values().len() {
            return false;
        }

        (0..self.choices.len()).all(|idx| {
            bag.single_values()
                .iter()
                .any(|value| self.parse(value.as_str()) == Some(idx))
        })
    }
}

/// Tries each member type in registration order; the first one accepting a
/// literal decorates it
#[derive(Debug, Clone)]
pub struct ChainType {
    types: Vec<Arc<dyn FieldType>>,
}

impl ChainType {
    pub fn new(types: Vec<Arc<dyn FieldType>>) -> Self {
        Self { types }
    }

    pub fn types(&self) -> &[Arc<dyn FieldType>] {
        &self.types
    }

    fn resolve(&self, raw: &str) -> Option<(usize, TypedValue)> {
        self.types
            .iter()
            .enumerate()
            .find_map(|(idx, ty)| ty.validate(raw).ok().map(|typed| (idx, typed)))
    }

    /// Member type shared by both literals, if any
    fn common_member(&self, a: &str, b: &str) -> Option<&dyn FieldType> {
        let (left, _) = self.resolve(a)?;
        let (right, _) = self.resolve(b)?;
        (left == right).then(|| self.types[left].as_ref())
    }
}

impl ValueComparator for ChainType {
    fn is_higher(&self, a: &str, b: &str) -> bool {
        self.common_member(a, b)
            .is_some_and(|member| member.is_higher(a, b))
    }

    fn is_lower(&self, a: &str, b: &str) -> bool {
        self.common_member(a, b)
            .is_some_and(|member| member.is_lower(a, b))
    }

    fn is_equal(&self, a: &str, b: &str) -> bool {
        self.common_member(a, b)
            .is_some_and(|member| member.is_equal(a, b))
    }
}

impl FieldType for ChainType {
    fn name(&self) -> &str {
        "chain"
    }

    fn validate(&self, raw: &str) -> Result<TypedValue, String> {
        let (idx, typed) = self.resolve(raw).ok_or_else(|| {
            let names: Vec<&str> = self.types.iter().map(|ty| ty.name()).collect();
            format!("not accepted by any of: {}", names.join(", "))
        })?;

        Ok(TypedValue::Decorated(Box::new(DecoratedValue {
            kind: self.types[idx].name().to_string(),
            raw: raw.to_string(),
            typed,
        })))
    }
}
