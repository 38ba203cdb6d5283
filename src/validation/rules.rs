/// A single constraint on an input field
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Must be present and non-empty on create
    Required,
    /// Must be present and non-empty on create, and non-empty whenever sent on update
    RequiredOnUpdate,
    String { max: Option<usize> },
    Integer,
    Numeric,
    Boolean,
    Email,
    Url,
    HexColor,
    /// IANA `Area/Location` or `UTC`
    Timezone,
    /// ISO date or timestamp
    Date,
    In(Vec<String>),
    /// Value is the `id` of a row in `table`
    Exists { table: String },
    /// No other row shares this value (and the values of `scope` fields)
    Unique { table: String, scope: Vec<String> },
    /// Date not before the named field's date
    AfterOrEqual(String),
    Min(f64),
    Max(f64),
}

/// The rule list for one field, built fluently
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRules {
    pub name: String,
    pub rules: Vec<Rule>,
}

impl FieldRules {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), rules: vec![] }
    }

    fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn required(self) -> Self { self.with(Rule::Required) }
    pub fn required_on_update(self) -> Self { self.with(Rule::RequiredOnUpdate) }
    pub fn string(self) -> Self { self.with(Rule::String { max: None }) }
    pub fn string_max(self, max: usize) -> Self { self.with(Rule::String { max: Some(max) }) }
    pub fn integer(self) -> Self { self.with(Rule::Integer) }
    pub fn numeric(self) -> Self { self.with(Rule::Numeric) }
    pub fn boolean(self) -> Self { self.with(Rule::Boolean) }
    pub fn email(self) -> Self { self.with(Rule::Email) }
    pub fn url(self) -> Self { self.with(Rule::Url) }
    pub fn hex_color(self) -> Self { self.with(Rule::HexColor) }
    pub fn timezone(self) -> Self { self.with(Rule::Timezone) }
    pub fn date(self) -> Self { self.with(Rule::Date) }
    pub fn min(self, n: f64) -> Self { self.with(Rule::Min(n)) }
    pub fn max(self, n: f64) -> Self { self.with(Rule::Max(n)) }

    pub fn one_of(self, values: &[&str]) -> Self {
        self.with(Rule::In(values.iter().map(|v| v.to_string()).collect()))
    }

    pub fn exists(self, table: impl Into<String>) -> Self {
        self.with(Rule::Exists { table: table.into() })
    }

    pub fn unique(self, table: impl Into<String>) -> Self {
        self.with(Rule::Unique { table: table.into(), scope: vec![] })
    }

    pub fn unique_within(self, table: impl Into<String>, scope: &[&str]) -> Self {
        self.with(Rule::Unique {
            table: table.into(),
            scope: scope.iter().map(|s| s.to_string()).collect(),
        })
    }

    pub fn after_or_equal(self, other: impl Into<String>) -> Self {
        self.with(Rule::AfterOrEqual(other.into()))
    }

    pub fn is_required(&self) -> bool {
        self.rules.iter().any(|r| matches!(r, Rule::Required | Rule::RequiredOnUpdate))
    }

    pub fn is_required_on_update(&self) -> bool {
        self.rules.contains(&Rule::RequiredOnUpdate)
    }

    /// Other fields whose value this field's rules read
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().flat_map(|r| match r {
            Rule::AfterOrEqual(other) => vec![other.as_str()],
            Rule::Unique { scope, .. } => scope.iter().map(String::as_str).collect(),
            _ => vec![],
        })
    }

    /// Referenced table when the field carries an `exists` rule
    pub fn foreign_table(&self) -> Option<&str> {
        self.rules.iter().find_map(|r| match r {
            Rule::Exists { table } => Some(table.as_str()),
            _ => None,
        })
    }

    /// Short rule names, e.g. `["required", "string:255"]`
    pub fn describe(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|r| match r {
                Rule::Required => "required".to_string(),
                Rule::RequiredOnUpdate => "required_always".to_string(),
                Rule::String { max: Some(n) } => format!("string:{}", n),
                Rule::String { max: None } => "string".to_string(),
                Rule::Integer => "integer".to_string(),
                Rule::Numeric => "numeric".to_string(),
                Rule::Boolean => "boolean".to_string(),
                Rule::Email => "email".to_string(),
                Rule::Url => "url".to_string(),
                Rule::HexColor => "hex_color".to_string(),
                Rule::Timezone => "timezone".to_string(),
                Rule::Date => "date".to_string(),
                Rule::In(values) => format!("in:{}", values.join(",")),
                Rule::Exists { table } => format!("exists:{}", table),
                Rule::Unique { table, scope } if scope.is_empty() => format!("unique:{}", table),
                Rule::Unique { table, scope } => format!("unique:{}({})", table, scope.join(",")),
                Rule::AfterOrEqual(other) => format!("after_or_equal:{}", other),
                Rule::Min(n) => format!("min:{}", n),
                Rule::Max(n) => format!("max:{}", n),
            })
            .collect()
    }
}

/// `"parent_id"` → `"parent id"`, as used in messages
pub fn display_name(field: &str) -> String {
    field.replace('_', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_collects_rules_in_order() {
        let rules = FieldRules::new("parent_id").integer().exists("categories");
        assert_eq!(rules.describe(), vec!["integer", "exists:categories"]);
        assert_eq!(rules.foreign_table(), Some("categories"));
        assert!(!rules.is_required());
    }

    #[test]
    fn required_flavours() {
        assert!(FieldRules::new("name").required().is_required());
        assert!(!FieldRules::new("name").required().is_required_on_update());
        assert!(FieldRules::new("name").required_on_update().is_required_on_update());
    }

    #[test]
    fn dependencies_cover_anchor_and_scope_fields() {
        let ends = FieldRules::new("ends_at").date().after_or_equal("starts_at");
        assert_eq!(ends.dependencies().collect::<Vec<_>>(), vec!["starts_at"]);
        let slug = FieldRules::new("slug").string().unique_within("cities", &["country_id"]);
        assert_eq!(slug.dependencies().collect::<Vec<_>>(), vec!["country_id"]);
        assert_eq!(FieldRules::new("name").required().dependencies().count(), 0);
    }
}
