use crate::condition::SearchCondition;
use crate::field::{FieldSet, ValueKind};
use crate::message::{MessageBag, Severity};
use crate::value::{Logical, Range, ValuesBag, ValuesGroup};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};
use std::fmt::Write as _;

pub fn create_styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.iter().map(|h| Cell::new(h)));
    table
}

/// Indented tree of groups and field values
pub fn format_condition(group: &ValuesGroup) -> String {
    let mut out = String::new();
    write_group(&mut out, group, 0, 0);
    out
}

fn write_group(out: &mut String, group: &ValuesGroup, index: usize, level: usize) {
    let indent = "  ".repeat(level);
    let logical = match group.logical() {
        Logical::And => "AND".bright_white().bold(),
        Logical::Or => "OR".yellow().bold(),
    };
    let _ = writeln!(
        out,
        "{indent}{logical} group {} {}",
        index + 1,
        format!("(nesting level {level})").bright_black()
    );

    for (name, bag) in group.fields() {
        if bag.is_empty() {
            let _ = writeln!(out, "{indent}  {}: {}", name.cyan(), "(any)".bright_black());
        } else {
            let _ = writeln!(out, "{indent}  {}: {}", name.cyan(), bag_items(bag).join(", "));
        }
    }

    for (idx, subgroup) in group.groups().iter().enumerate() {
        write_group(out, subgroup, idx, level + 1);
    }
}

fn range_label(range: &Range) -> String {
    format!(
        "{}{}{}",
        if range.lower_inclusive { "" } else { "]" },
        range,
        if range.upper_inclusive { "" } else { "[" }
    )
}

fn bag_items(bag: &ValuesBag) -> Vec<String> {
    let mut items = Vec::with_capacity(bag.count());
    items.extend(bag.single_values().iter().map(|v| v.to_string().green().to_string()));
    items.extend(
        bag.excluded_values()
            .iter()
            .map(|v| format!("!{v}").red().to_string()),
    );
    items.extend(bag.ranges().iter().map(|r| range_label(r).green().to_string()));
    items.extend(
        bag.excluded_ranges()
            .iter()
            .map(|r| format!("!{}", range_label(r)).red().to_string()),
    );
    items.extend(
        bag.comparisons()
            .iter()
            .map(|c| c.to_string().magenta().to_string()),
    );
    items.extend(
        bag.pattern_matchers()
            .iter()
            .map(|p| p.to_string().blue().to_string()),
    );
    items
}

/// One line per message, errors in red and notices in cyan
pub fn format_messages(messages: &MessageBag) -> String {
    let mut out = String::new();
    for message in messages {
        let tag = match message.severity {
            Severity::Info => "[info] ".cyan(),
            Severity::Error => "[error]".red().bold(),
        };
        let _ = writeln!(out, "{} {}", tag, message.text);
    }
    out
}

/// Tree followed by the messages and a one-line verdict
pub fn format_condition_report(condition: &SearchCondition) -> String {
    let mut out = format_condition(&condition.group);

    if !condition.messages.is_empty() {
        let _ = writeln!(out);
        out.push_str(&format_messages(&condition.messages));
    }

    let _ = writeln!(out);
    let errors = condition.messages.errors().len();
    if errors == 0 {
        let _ = writeln!(out, "{}", "Condition is valid.".green().bold());
    } else {
        let _ = writeln!(
            out,
            "{}",
            format!("Condition has {errors} error(s).").red().bold()
        );
    }
    out
}

pub fn format_condition_json(condition: &SearchCondition) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(condition)
}

pub fn format_messages_json(messages: &MessageBag) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&serde_json::json!({ "messages": messages }))
}

/// Table of configured fields and the value kinds they accept
pub fn format_fields_table(fields: &FieldSet) -> String {
    let mut table = create_styled_table(&[
        "Field",
        "Type",
        "Required",
        "Ranges",
        "Comparisons",
        "Pattern matchers",
    ]);

    let flag = |on: bool| if on { "yes" } else { "-" };
    for field in fields.iter() {
        table.add_row(vec![
            Cell::new(field.name()),
            Cell::new(field.field_type().name()),
            Cell::new(flag(field.is_required())),
            Cell::new(flag(field.accepts(ValueKind::Range))),
            Cell::new(flag(field.accepts(ValueKind::Comparison))),
            Cell::new(flag(field.accepts(ValueKind::PatternMatch))),
        ]);
    }

    table.to_string()
}
