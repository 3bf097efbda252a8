use crate::field::{
    ChainType, ChoiceType, DateType, DecimalType, FieldConfig, FieldRegistry, FieldSet, FieldType,
    IntegerType, TextType,
};
use crate::query::ParseOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error("Invalid definition of field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}

/// Top level of a TOML configuration file
///
/// ```toml
/// [limits]
/// max_nesting_level = 10
///
/// [[fields]]
/// name = "status"
/// type = "choice"
/// choices = ["active", "inactive"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SearchConfig {
    pub limits: ParseOptions,
    pub fields: Vec<FieldDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Date,
    Choice,
    Chain,
}

impl FieldKind {
    /// Ranges and comparisons make sense for ordered numeric-like types
    fn is_ordered(self) -> bool {
        matches!(self, FieldKind::Integer | FieldKind::Decimal | FieldKind::Date)
    }
}

/// One searchable field; unset `accept_*` switches default by type
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_ranges: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_compares: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept_pattern_matchers: Option<bool>,
    /// Allowed values of a `choice` field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
    /// Member types of a `chain` field, tried in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<FieldKind>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            accept_ranges: None,
            accept_compares: None,
            accept_pattern_matchers: None,
            choices: Vec::new(),
            types: Vec::new(),
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidField {
            field: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn build_type(&self, kind: FieldKind, nested: bool) -> Result<Arc<dyn FieldType>, ConfigError> {
        let ty: Arc<dyn FieldType> = match kind {
            FieldKind::Text => Arc::new(TextType),
            FieldKind::Integer => Arc::new(IntegerType),
            FieldKind::Decimal => Arc::new(DecimalType),
            FieldKind::Date => Arc::new(DateType),
            FieldKind::Choice => {
                if self.choices.is_empty() {
                    return Err(self.invalid("a choice field needs at least one choice"));
                }
                Arc::new(ChoiceType::new(self.choices.iter().cloned()))
            }
            FieldKind::Chain => {
                if nested {
                    return Err(self.invalid("chain types can't be nested"));
                }
                if self.types.is_empty() {
                    return Err(self.invalid("a chain field needs at least one member type"));
                }
                let members = self
                    .types
                    .iter()
                    .map(|member| self.build_type(*member, true))
                    .collect::<Result<Vec<_>, _>>()?;
                Arc::new(ChainType::new(members))
            }
        };
        Ok(ty)
    }

    pub fn to_field_config(&self) -> Result<FieldConfig, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(self.invalid("name must not be empty"));
        }

        let ordered = self.kind.is_ordered();
        Ok(FieldConfig::with_type(&self.name, self.build_type(self.kind, false)?)
            .required(self.required)
            .accept_ranges(self.accept_ranges.unwrap_or(ordered))
            .accept_compares(self.accept_compares.unwrap_or(ordered))
            .accept_pattern_matchers(self.accept_pattern_matchers.unwrap_or(!ordered)))
    }
}

impl SearchConfig {
    /// Build the registry used for parsing and normalization
    pub fn field_set(&self) -> Result<FieldSet, ConfigError> {
        let mut set = FieldSet::new();
        for definition in &self.fields {
            if set.has(&definition.name) {
                return Err(definition.invalid("defined more than once"));
            }
            set.add(definition.to_field_config()?);
        }
        Ok(set)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<SearchConfig, ConfigError> {
    if let Some(path) = path {
        load_config_from_path(path)
    } else {
        Ok(default_config().clone())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<SearchConfig, ConfigError> {
    let path_display = path.display().to_string();
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path_display.clone(),
        source,
    })?;

    let config = toml::from_str::<SearchConfig>(&raw).map_err(|source| ConfigError::Parse {
        path: path_display,
        source,
    })?;
    log::debug!(
        "loaded {} field definitions from {}",
        config.fields.len(),
        path.display()
    );
    Ok(config)
}

/// Built-in demo configuration used when no file is given
pub fn default_config() -> &'static SearchConfig {
    static DEFAULT_CONFIG: LazyLock<SearchConfig> = LazyLock::new(|| SearchConfig {
        limits: ParseOptions::default(),
        fields: vec![
            FieldDefinition::new("id", FieldKind::Integer),
            FieldDefinition::new("name", FieldKind::Text),
            FieldDefinition::new("price", FieldKind::Decimal),
            FieldDefinition::new("date", FieldKind::Date),
            FieldDefinition {
                choices: vec![
                    "active".to_string(),
                    "inactive".to_string(),
                    "pending".to_string(),
                ],
                ..FieldDefinition::new("status", FieldKind::Choice)
            },
        ],
    });
    &DEFAULT_CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::ValueKind;

    #[test]
    fn test_default_config_builds() {
        let set = default_config().field_set().unwrap();
        assert_eq!(set.len(), 5);

        let id = set.get("ID").unwrap();
        assert!(id.accepts(ValueKind::Range));
        assert!(id.accepts(ValueKind::Comparison));
        assert!(!id.accepts(ValueKind::PatternMatch));

        let name = set.get("name").unwrap();
        assert!(name.accepts(ValueKind::PatternMatch));
        assert!(!name.accepts(ValueKind::Range));
    }

    #[test]
    fn test_toml_with_overrides_and_chain() {
        let raw = r#"
            [limits]
            max_nesting_level = 3

            [[fields]]
            name = "ref"
            type = "chain"
            types = ["date", "integer"]
            accept_ranges = true
            required = true
        "#;
        let config: SearchConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.limits.max_nesting_level, 3);
        assert_eq!(config.limits.max_values_per_field, 10_000);

        let set = config.field_set().unwrap();
        let field = set.get("ref").unwrap();
        assert!(field.is_required());
        assert!(field.accepts(ValueKind::Range));
        assert!(field.accepts(ValueKind::PatternMatch));
        assert_eq!(field.field_type().name(), "chain");
    }

    #[test]
    fn test_invalid_definitions() {
        let choice = FieldDefinition::new("status", FieldKind::Choice);
        assert!(matches!(
            choice.to_field_config(),
            Err(ConfigError::InvalidField { .. })
        ));

        let nested = FieldDefinition {
            types: vec![FieldKind::Integer, FieldKind::Chain],
            ..FieldDefinition::new("ref", FieldKind::Chain)
        };
        let err = nested.to_field_config().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid definition of field 'ref': chain types can't be nested"
        );

        let duplicated = SearchConfig {
            limits: ParseOptions::default(),
            fields: vec![
                FieldDefinition::new("id", FieldKind::Integer),
                FieldDefinition::new("Id", FieldKind::Text),
            ],
        };
        assert!(duplicated.field_set().is_err());
    }

    #[test]
    fn test_unknown_type_is_a_parse_error() {
        let raw = "[[fields]]\nname = \"x\"\ntype = \"blob\"\n";
        assert!(toml::from_str::<SearchConfig>(raw).is_err());
    }
}
