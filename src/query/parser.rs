use super::error::QueryError;
use super::lexer::{TokenStream, unexpected};
use super::token::{Token, TokenKind};
use crate::field::{FieldConfig, FieldRegistry, ValueKind};
use crate::value::{
    Compare, CompareOperator, Logical, PatternMatch, PatternMatchType, Range, SingleValue,
    ValuesBag, ValuesGroup,
};
use serde::{Deserialize, Serialize};

/// Limits guarding the parser against oversized or adversarial input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub max_nesting_level: usize,
    pub max_values_per_field: usize,
    pub max_groups_per_level: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_level: 100,
            max_values_per_field: 10_000,
            max_groups_per_level: 100,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_nesting_level(mut self, value: usize) -> Self {
        self.max_nesting_level = value;
        self
    }

    pub fn max_values_per_field(mut self, value: usize) -> Self {
        self.max_values_per_field = value;
        self
    }

    pub fn max_groups_per_level(mut self, value: usize) -> Self {
        self.max_groups_per_level = value;
        self
    }
}

/// Location of the group being parsed, carried into structural errors
#[derive(Debug, Clone, Copy)]
struct GroupPosition {
    index: usize,
    level: usize,
}

/// Recursive-descent parser producing a `ValuesGroup` tree
pub struct QueryParser<'r, R: FieldRegistry + ?Sized> {
    registry: &'r R,
    options: ParseOptions,
}

impl<'r, R: FieldRegistry + ?Sized> QueryParser<'r, R> {
    pub fn new(registry: &'r R) -> Self {
        Self {
            registry,
            options: ParseOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a condition; `Ok(None)` means the input holds no condition at all
    pub fn parse(&self, input: &str) -> Result<Option<ValuesGroup>, QueryError> {
        let mut stream = TokenStream::new(input);
        if stream.peek_kind(0)? == TokenKind::Eof {
            return Ok(None);
        }

        let mut root = ValuesGroup::new(Logical::And);
        let position = GroupPosition { index: 0, level: 0 };
        self.parse_pairs(&mut stream, &mut root, position)?;

        let token = stream.next_token()?;
        if !token.is(TokenKind::Eof) {
            return Err(unexpected(&token, "field name or group"));
        }

        log::debug!("parsed condition with {} values", root.count_values());
        Ok(Some(root))
    }

    fn parse_pairs(
        &self,
        stream: &mut TokenStream<'_>,
        group: &mut ValuesGroup,
        position: GroupPosition,
    ) -> Result<(), QueryError> {
        loop {
            match stream.peek_kind(0)? {
                TokenKind::Multiply | TokenKind::OpenParen => {
                    self.parse_group(stream, group, position)?;
                }
                TokenKind::Identifier => self.parse_field_values(stream, group, position)?,
                TokenKind::CloseParen | TokenKind::Eof => break,
                _ => {
                    let token = stream.next_token()?;
                    return Err(unexpected(&token, "field name or group"));
                }
            }
        }

        for field in self.registry.required_fields() {
            if !group.has_field(field.name()) {
                return Err(QueryError::RequiredField {
                    field: field.name().to_string(),
                    group_index: position.index,
                    nesting_level: position.level,
                });
            }
        }

        Ok(())
    }

    fn parse_group(
        &self,
        stream: &mut TokenStream<'_>,
        parent: &mut ValuesGroup,
        parent_position: GroupPosition,
    ) -> Result<(), QueryError> {
        let logical = if stream.skip_if(TokenKind::Multiply)? {
            Logical::Or
        } else {
            Logical::And
        };
        stream.expect(TokenKind::OpenParen)?;

        let position = GroupPosition {
            index: parent.groups().len(),
            level: parent_position.level + 1,
        };

        if position.level > self.options.max_nesting_level {
            return Err(QueryError::NestingLevelExceeded {
                max: self.options.max_nesting_level,
                group_index: position.index,
                nesting_level: position.level,
            });
        }

        if position.index >= self.options.max_groups_per_level {
            return Err(QueryError::GroupsOverflow {
                max: self.options.max_groups_per_level,
                group_index: position.index,
                nesting_level: position.level,
            });
        }

        log::debug!(
            "entering {} group {} at nesting level {}",
            logical,
            position.index + 1,
            position.level
        );

        let mut group = ValuesGroup::new(logical);
        self.parse_pairs(stream, &mut group, position)?;
        stream.expect(TokenKind::CloseParen)?;
        stream.skip_if(TokenKind::Semicolon)?;

        parent.add_group(group);
        Ok(())
    }

    fn parse_field_values(
        &self,
        stream: &mut TokenStream<'_>,
        group: &mut ValuesGroup,
        position: GroupPosition,
    ) -> Result<(), QueryError> {
        let name = stream.expect(TokenKind::Identifier)?;
        stream.expect(TokenKind::Colon)?;

        let field = self
            .registry
            .get(&name.value)
            .ok_or_else(|| QueryError::UnknownField {
                field: name.value.clone(),
                position: name.position,
            })?;

        let bag = group.field_entry(field.name());
        loop {
            self.parse_value_item(stream, field, bag, position)?;

            if bag.count() > self.options.max_values_per_field {
                return Err(QueryError::ValuesOverflow {
                    field: field.name().to_string(),
                    max: self.options.max_values_per_field,
                    group_index: position.index,
                    nesting_level: position.level,
                });
            }

            if !stream.skip_if(TokenKind::Comma)? {
                break;
            }
        }

        match stream.peek_kind(0)? {
            TokenKind::Semicolon => {
                stream.next_token()?;
            }
            TokenKind::CloseParen | TokenKind::Eof => {}
            _ => {
                let token = stream.next_token()?;
                return Err(unexpected(&token, "',' or ';'"));
            }
        }

        Ok(())
    }

    fn parse_value_item(
        &self,
        stream: &mut TokenStream<'_>,
        field: &FieldConfig,
        bag: &mut ValuesBag,
        position: GroupPosition,
    ) -> Result<(), QueryError> {
        match stream.peek_kind(0)? {
            TokenKind::LowerThan | TokenKind::GreaterThan => {
                let comparison = self.parse_comparison(stream, field, position)?;
                bag.add_comparison(comparison);
            }
            TokenKind::Tilde => {
                let pattern = self.parse_pattern_match(stream, field, position)?;
                bag.add_pattern_match(pattern);
            }
            TokenKind::Negate => {
                stream.next_token()?;
                match self.parse_value_or_range(stream, field, position)? {
                    Item::Single(value) => bag.add_excluded_value(value),
                    Item::Range(range) => bag.add_excluded_range(range),
                };
            }
            _ => {
                match self.parse_value_or_range(stream, field, position)? {
                    Item::Single(value) => bag.add_single_value(value),
                    Item::Range(range) => bag.add_range(range),
                };
            }
        }
        Ok(())
    }

    fn parse_value_or_range(
        &self,
        stream: &mut TokenStream<'_>,
        field: &FieldConfig,
        position: GroupPosition,
    ) -> Result<Item, QueryError> {
        // Interval notation: `[` opens inclusive, `]` opens exclusive
        let lower_inclusive = match stream.peek_kind(0)? {
            TokenKind::OpenBrace => Some(true),
            TokenKind::CloseBrace => Some(false),
            _ => None,
        };
        if lower_inclusive.is_some() {
            stream.next_token()?;
        }

        let lower = parse_string_value(stream)?;
        if lower_inclusive.is_none() && stream.peek_kind(0)? != TokenKind::Minus {
            return Ok(Item::Single(lower));
        }

        self.ensure_accepts(field, ValueKind::Range, position)?;
        stream.expect(TokenKind::Minus)?;
        let upper = parse_string_value(stream)?;

        // `]` closes inclusive, `[` closes exclusive
        let upper_inclusive = match stream.peek_kind(0)? {
            TokenKind::CloseBrace => {
                stream.next_token()?;
                true
            }
            TokenKind::OpenBrace => {
                stream.next_token()?;
                false
            }
            _ => true,
        };

        Ok(Item::Range(Range::with_bounds(
            lower,
            upper,
            lower_inclusive.unwrap_or(true),
            upper_inclusive,
        )))
    }

    fn parse_comparison(
        &self,
        stream: &mut TokenStream<'_>,
        field: &FieldConfig,
        position: GroupPosition,
    ) -> Result<Compare, QueryError> {
        let first = stream.next_token()?;
        self.ensure_accepts(field, ValueKind::Comparison, position)?;

        let operator = match first.kind {
            TokenKind::LowerThan => {
                if next_is_adjacent(stream, &first, TokenKind::Equals)? {
                    stream.next_token()?;
                    CompareOperator::LowerOrEqual
                } else if next_is_adjacent(stream, &first, TokenKind::GreaterThan)? {
                    stream.next_token()?;
                    CompareOperator::NotEqual
                } else {
                    CompareOperator::Lower
                }
            }
            _ => {
                if next_is_adjacent(stream, &first, TokenKind::Equals)? {
                    stream.next_token()?;
                    CompareOperator::HigherOrEqual
                } else {
                    CompareOperator::Higher
                }
            }
        };

        let value = parse_string_value(stream)?;
        Ok(Compare::new(operator, value))
    }

    fn parse_pattern_match(
        &self,
        stream: &mut TokenStream<'_>,
        field: &FieldConfig,
        position: GroupPosition,
    ) -> Result<PatternMatch, QueryError> {
        stream.expect(TokenKind::Tilde)?;
        self.ensure_accepts(field, ValueKind::PatternMatch, position)?;

        let case_insensitive = {
            let token = stream.peek(0)?;
            token.is(TokenKind::Identifier) && token.value.eq_ignore_ascii_case("i")
        };
        if case_insensitive {
            stream.next_token()?;
        }

        let negated = stream.skip_if(TokenKind::Negate)?;
        let operator = stream.next_token()?;
        let match_type = match operator.kind {
            TokenKind::Multiply => PatternMatchType::Contains,
            TokenKind::GreaterThan => PatternMatchType::StartsWith,
            TokenKind::LowerThan => PatternMatchType::EndsWith,
            TokenKind::QuestionMark => PatternMatchType::Regex,
            _ => return Err(unexpected(&operator, "pattern-match operator")),
        };
        let match_type = if negated {
            match_type.negate()
        } else {
            match_type
        };

        let value = parse_string_value(stream)?;
        Ok(PatternMatch::new(value.raw, match_type).case_insensitive(case_insensitive))
    }

    fn ensure_accepts(
        &self,
        field: &FieldConfig,
        kind: ValueKind,
        position: GroupPosition,
    ) -> Result<(), QueryError> {
        if field.accepts(kind) {
            Ok(())
        } else {
            Err(QueryError::UnsupportedValueType {
                field: field.name().to_string(),
                kind,
                group_index: position.index,
                nesting_level: position.level,
            })
        }
    }
}

enum Item {
    Single(SingleValue),
    Range(Range),
}

fn parse_string_value(stream: &mut TokenStream<'_>) -> Result<SingleValue, QueryError> {
    let token = stream.next_token()?;
    if token.kind.is_value() {
        Ok(SingleValue::new(token.value))
    } else {
        Err(unexpected(&token, "value"))
    }
}

fn next_is_adjacent(
    stream: &mut TokenStream<'_>,
    previous: &Token,
    kind: TokenKind,
) -> Result<bool, QueryError> {
    let next = stream.peek(0)?;
    Ok(next.is(kind) && next.position == previous.position + 1)
}

/// Parse with the default limits
pub fn parse_query<R: FieldRegistry + ?Sized>(
    input: &str,
    registry: &R,
) -> Result<Option<ValuesGroup>, QueryError> {
    QueryParser::new(registry).parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldSet, IntegerType, TextType};

    fn fields() -> FieldSet {
        FieldSet::new()
            .with(
                FieldConfig::new("id", IntegerType)
                    .accept_ranges(true)
                    .accept_compares(true),
            )
            .with(FieldConfig::new("name", TextType).accept_pattern_matchers(true))
    }

    #[test]
    fn test_empty_input_has_no_condition() {
        assert_eq!(parse_query("", &fields()).unwrap(), None);
        assert_eq!(parse_query("  \n\t ", &fields()).unwrap(), None);
    }

    #[test]
    fn test_field_names_resolve_to_canonical_name() {
        let group = parse_query("ID: 1", &fields()).unwrap().unwrap();
        assert!(group.has_field("id"));
    }

    #[test]
    fn test_comparison_operators_must_be_adjacent() {
        let group = parse_query("id: <=5, <>6, >=7, <8, >9", &fields())
            .unwrap()
            .unwrap();
        let operators: Vec<_> = group.field("id").unwrap().comparisons().iter().map(|c| c.operator).collect();
        assert_eq!(
            operators,
            vec![
                CompareOperator::LowerOrEqual,
                CompareOperator::NotEqual,
                CompareOperator::HigherOrEqual,
                CompareOperator::Lower,
                CompareOperator::Higher,
            ]
        );

        assert!(parse_query("id: < =5", &fields()).is_err());
    }

    #[test]
    fn test_missing_separator_is_syntax_error() {
        let err = parse_query("id: 1 name: foo", &fields()).unwrap_err();
        assert!(matches!(err, QueryError::Syntax { position: 6, .. }), "{err:?}");
    }

    #[test]
    fn test_pattern_match_case_flag() {
        let group = parse_query("name: ~i!>foo, ~?\"^a.*\"", &fields())
            .unwrap()
            .unwrap();
        let patterns = group.field("name").unwrap().pattern_matchers();
        assert_eq!(patterns[0].match_type, PatternMatchType::NotStartsWith);
        assert!(patterns[0].case_insensitive);
        assert_eq!(patterns[1].match_type, PatternMatchType::Regex);
        assert_eq!(patterns[1].value, "^a.*");
    }
}
