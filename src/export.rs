//! Render a condition tree back into query syntax
//!
//! The output parses into an equivalent tree: same fields, same values in
//! the same collections, same group structure. Empty field bags are skipped
//! since the grammar has no way to write them. Empty groups are kept as `()`
//! so sibling groups keep their numbers.

use crate::query::lexer::is_delimiter;
use crate::value::{Logical, PatternMatch, Range, SingleValue, ValuesBag, ValuesGroup};

/// Serialize a condition tree as a query string
pub fn to_query_string(group: &ValuesGroup) -> String {
    render_pairs(group).join("; ")
}

fn render_pairs(group: &ValuesGroup) -> Vec<String> {
    let mut pairs: Vec<String> = group
        .fields()
        .iter()
        .filter(|(_, bag)| !bag.is_empty())
        .map(|(name, bag)| format!("{}: {}", name, render_bag(bag).join(", ")))
        .collect();

    for subgroup in group.groups() {
        let prefix = match subgroup.logical() {
            Logical::And => "",
            Logical::Or => "*",
        };
        pairs.push(format!("{}({})", prefix, render_pairs(subgroup).join("; ")));
    }

    pairs
}

fn render_bag(bag: &ValuesBag) -> Vec<String> {
    let mut items = Vec::with_capacity(bag.count());

    items.extend(bag.single_values().iter().map(quote));
    items.extend(bag.excluded_values().iter().map(|v| format!("!{}", quote(v))));
    items.extend(bag.ranges().iter().map(render_range));
    items.extend(bag.excluded_ranges().iter().map(|r| format!("!{}", render_range(r))));
    items.extend(
        bag.comparisons()
            .iter()
            .map(|c| format!("{}{}", c.operator, quote(&c.value))),
    );
    items.extend(bag.pattern_matchers().iter().map(render_pattern));

    items
}

fn render_range(range: &Range) -> String {
    let body = format!("{}-{}", quote(&range.lower), quote(&range.upper));
    if range.lower_inclusive && range.upper_inclusive {
        return body;
    }

    let open = if range.lower_inclusive { '[' } else { ']' };
    let close = if range.upper_inclusive { ']' } else { '[' };
    format!("{open}{body}{close}")
}

fn render_pattern(pattern: &PatternMatch) -> String {
    format!(
        "~{}{}{}",
        if pattern.case_insensitive { "i" } else { "" },
        pattern.match_type.operator(),
        quote_str(&pattern.value)
    )
}

fn quote(value: &SingleValue) -> String {
    quote_str(value.as_str())
}

/// Bare when the lexer would read the whole text back as one value,
/// otherwise double-quoted with inner quotes doubled
fn quote_str(raw: &str) -> String {
    let bare = !raw.is_empty() && !raw.chars().any(|c| is_delimiter(c) || c.is_control());
    if bare {
        raw.to_string()
    } else {
        format!("\"{}\"", raw.replace('"', "\"\""))
    }
}
