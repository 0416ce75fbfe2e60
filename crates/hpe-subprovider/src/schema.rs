//! Schema types for providers, resources and data sources
//!
//! A [`Schema`] describes the attributes and nested blocks a configuration
//! object may carry. [`Schema::validate`] performs the static checks the host
//! would run before any `configure` or CRUD call: unknown keys, required
//! attributes, value types, block cardinality and the cross-attribute
//! [`Validator`]s.

use crate::diagnostics::Diagnostics;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Value type of an attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
    Bool,
    Int64,
    SetOfString,
    SetOfInt64,
}

impl AttributeType {
    fn accepts(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Bool => value.is_boolean(),
            AttributeType::Int64 => value.is_i64(),
            AttributeType::SetOfString => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            AttributeType::SetOfInt64 => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_i64)),
        }
    }
}

impl std::fmt::Display for AttributeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributeType::String => write!(f, "string"),
            AttributeType::Bool => write!(f, "bool"),
            AttributeType::Int64 => write!(f, "number"),
            AttributeType::SetOfString => write!(f, "set of string"),
            AttributeType::SetOfInt64 => write!(f, "set of number"),
        }
    }
}

/// Cross-attribute validators, evaluated against sibling attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "attributes", rename_all = "snake_case")]
pub enum Validator {
    /// Every named sibling must be set when this attribute is set
    AlsoRequires(Vec<String>),

    /// None of the named siblings may be set when this attribute is set
    ConflictsWith(Vec<String>),

    /// At least one of the nested validators must pass
    AnyOf(Vec<Validator>),
}

impl Validator {
    pub fn also_requires(name: impl Into<String>) -> Self {
        Validator::AlsoRequires(vec![name.into()])
    }

    pub fn conflicts_with(name: impl Into<String>) -> Self {
        Validator::ConflictsWith(vec![name.into()])
    }

    fn check(&self, attribute: &str, object: &Map<String, Value>) -> Result<(), String> {
        match self {
            Validator::AlsoRequires(names) => {
                for name in names {
                    if !is_set(object.get(name)) {
                        return Err(format!(
                            "Attribute \"{}\" must be specified when \"{}\" is specified",
                            name, attribute
                        ));
                    }
                }
                Ok(())
            }
            Validator::ConflictsWith(names) => {
                for name in names {
                    if is_set(object.get(name)) {
                        return Err(format!(
                            "Attribute \"{}\" cannot be specified when \"{}\" is specified",
                            name, attribute
                        ));
                    }
                }
                Ok(())
            }
            Validator::AnyOf(validators) => {
                let mut failures = Vec::new();
                for validator in validators {
                    match validator.check(attribute, object) {
                        Ok(()) => return Ok(()),
                        Err(e) => failures.push(e),
                    }
                }
                Err(format!(
                    "At least one of these validations must be satisfied: {}",
                    failures.join(", ")
                ))
            }
        }
    }
}

/// A single configuration attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attr_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub validators: Vec<Validator>,
}

impl Attribute {
    fn new(attr_type: AttributeType, required: bool, optional: bool, computed: bool) -> Self {
        Self {
            attr_type,
            required,
            optional,
            computed,
            sensitive: false,
            description: None,
            validators: Vec::new(),
        }
    }

    pub fn required(attr_type: AttributeType) -> Self {
        Self::new(attr_type, true, false, false)
    }

    pub fn optional(attr_type: AttributeType) -> Self {
        Self::new(attr_type, false, true, false)
    }

    pub fn computed(attr_type: AttributeType) -> Self {
        Self::new(attr_type, false, false, true)
    }

    /// Optional in configuration, filled in by the provider when omitted
    pub fn optional_computed(attr_type: AttributeType) -> Self {
        Self::new(attr_type, false, true, true)
    }

    pub fn required_string() -> Self {
        Self::required(AttributeType::String)
    }

    pub fn optional_string() -> Self {
        Self::optional(AttributeType::String)
    }

    pub fn optional_bool() -> Self {
        Self::optional(AttributeType::Bool)
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    fn is_read_only(&self) -> bool {
        self.computed && !self.optional && !self.required
    }
}

/// A nested block rendered as a list of objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Block {
    pub attributes: BTreeMap<String, Attribute>,
    pub min_items: usize,
    pub max_items: Option<usize>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Block {
    pub fn list_nested(attributes: BTreeMap<String, Attribute>) -> Self {
        Self {
            attributes,
            min_items: 0,
            max_items: None,
            description: None,
        }
    }

    pub fn size_between(mut self, min: usize, max: usize) -> Self {
        self.min_items = min;
        self.max_items = Some(max);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Schema for a provider, resource or data source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub attributes: BTreeMap<String, Attribute>,
    pub blocks: BTreeMap<String, Block>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_block(mut self, name: impl Into<String>, block: Block) -> Self {
        self.blocks.insert(name.into(), block);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validate a configuration object against this schema
    ///
    /// `null` is treated as an empty configuration.
    pub fn validate(&self, config: &Value) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let empty = Map::new();
        let object = match config {
            Value::Null => &empty,
            Value::Object(object) => object,
            other => {
                diags.add_error(
                    "Invalid configuration",
                    format!("expected an object, got: {}", other),
                );
                return diags;
            }
        };

        for key in object.keys() {
            if !self.attributes.contains_key(key) && !self.blocks.contains_key(key) {
                diags.add_attribute_error(
                    key.clone(),
                    "Unsupported argument",
                    format!("An argument named \"{}\" is not expected here.", key),
                );
            }
        }

        validate_attributes(&self.attributes, object, "", &mut diags);

        for (name, block) in &self.blocks {
            validate_block(name, block, object.get(name), &mut diags);
        }

        diags
    }
}

fn is_set(value: Option<&Value>) -> bool {
    value.is_some_and(|v| !v.is_null())
}

fn validate_attributes(
    attributes: &BTreeMap<String, Attribute>,
    object: &Map<String, Value>,
    prefix: &str,
    diags: &mut Diagnostics,
) {
    for (name, attribute) in attributes {
        let path = format!("{}{}", prefix, name);
        let value = object.get(name).filter(|v| !v.is_null());

        let Some(value) = value else {
            if attribute.required {
                diags.add_attribute_error(
                    path,
                    "Missing required argument",
                    format!(
                        "The argument \"{}\" is required, but no definition was found.",
                        name
                    ),
                );
            }
            continue;
        };

        if attribute.is_read_only() {
            diags.add_attribute_error(
                path,
                "Invalid Configuration for Read-Only Attribute",
                format!("Cannot set value for attribute \"{}\", it is read-only.", name),
            );
            continue;
        }

        if !attribute.attr_type.accepts(value) {
            diags.add_attribute_error(
                path,
                "Incorrect attribute value type",
                format!("Inappropriate value for attribute \"{}\": {} required.", name, attribute.attr_type),
            );
            continue;
        }

        for validator in &attribute.validators {
            if let Err(detail) = validator.check(name, object) {
                diags.add_attribute_error(path.clone(), "Invalid Attribute Combination", detail);
            }
        }
    }

    for key in object.keys() {
        if !prefix.is_empty() && !attributes.contains_key(key) {
            diags.add_attribute_error(
                format!("{}{}", prefix, key),
                "Unsupported argument",
                format!("An argument named \"{}\" is not expected here.", key),
            );
        }
    }
}

fn validate_block(name: &str, block: &Block, value: Option<&Value>, diags: &mut Diagnostics) {
    let items: &[Value] = match value {
        None | Some(Value::Null) => &[],
        Some(Value::Array(items)) => items,
        Some(_) => {
            diags.add_attribute_error(
                name,
                "Unsupported block type",
                format!("Blocks of type \"{}\" must be given as a list.", name),
            );
            return;
        }
    };

    let len = items.len();
    let too_few = len < block.min_items;
    let too_many = block.max_items.is_some_and(|max| len > max);
    if too_few || too_many {
        let max = block
            .max_items
            .map(|m| m.to_string())
            .unwrap_or_else(|| "unbounded".to_string());
        diags.add_attribute_error(
            name,
            "Invalid Attribute Value",
            format!(
                "Attribute {} list must contain at least {} elements and at most {} elements, got: {}",
                name, block.min_items, max, len
            ),
        );
    }

    for (i, item) in items.iter().enumerate() {
        let prefix = format!("{}[{}].", name, i);
        match item {
            Value::Object(object) => validate_attributes(&block.attributes, object, &prefix, diags),
            _ => diags.add_attribute_error(
                format!("{}[{}]", name, i),
                "Invalid block",
                "each block element must be an object",
            ),
        }
    }
}
