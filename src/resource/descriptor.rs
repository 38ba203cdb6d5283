use std::collections::HashMap;

use serde::Serialize;

use crate::filter::{FilterKind, FilterOrder, FilterOrderInfo, FilterSpec};
use crate::validation::{FieldRules, Rule, ValidationErrors};

/// Set `timestamp_field` to now when `status_field` becomes `value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusTimestamp {
    pub status_field: String,
    pub value: String,
    pub timestamp_field: String,
}

/// Refuse deletion while rows in `table` reference this one through `foreign_key`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteGuard {
    pub table: String,
    pub foreign_key: String,
    pub message: String,
}

/// Eager-loaded parent summary, rendered under `name`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Relation {
    pub name: String,
    pub foreign_key: String,
    pub table: String,
    pub fields: Vec<String>,
}

/// Field derived at render time, never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComputedField {
    /// Number of rows in `table` whose `foreign_key` is this record's id
    Count { name: String, table: String, foreign_key: String },
    /// Whole minutes between two timestamp fields
    DurationMinutes { name: String, start: String, end: String },
}

impl ComputedField {
    pub fn name(&self) -> &str {
        match self {
            ComputedField::Count { name, .. } | ComputedField::DurationMinutes { name, .. } => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "effect", content = "field", rename_all = "snake_case")]
pub enum ActionEffect {
    /// Add one to a counter column
    Increment(String),
    /// Set a timestamp column to now
    Touch(String),
    /// Ownership check only
    Acknowledge,
}

/// `POST /{resource}/{id}/{name}`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NestedAction {
    pub name: String,
    pub effect: ActionEffect,
    pub message: String,
}

/// Static description of one resource. Built once at startup, never mutated.
#[derive(Debug, Clone)]
pub struct ResourceDescriptor {
    name: String,
    table: String,
    filter: FilterSpec,
    sortable: Vec<String>,
    default_order: Vec<FilterOrderInfo>,
    rules: Vec<FieldRules>,
    status_timestamps: Vec<StatusTimestamp>,
    delete_guards: Vec<DeleteGuard>,
    relations: Vec<Relation>,
    computed: Vec<ComputedField>,
    hidden: Vec<String>,
    actions: Vec<NestedAction>,
}

impl ResourceDescriptor {
    /// A resource whose table shares its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: name.clone(),
            name,
            filter: FilterSpec::new(),
            sortable: vec![],
            default_order: vec![FilterOrderInfo::desc("created_at")],
            rules: vec![],
            status_timestamps: vec![],
            delete_guards: vec![],
            relations: vec![],
            computed: vec![],
            hidden: vec![],
            actions: vec![],
        }
    }

    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn owned_by(mut self, field: impl Into<String>) -> Self {
        self.filter = self.filter.owned_by(field);
        self
    }

    pub fn filter(mut self, column: impl Into<String>, kind: FilterKind) -> Self {
        self.filter = self.filter.field(column, kind);
        self
    }

    pub fn search(mut self, columns: &[&str]) -> Self {
        self.filter = self.filter.search(columns);
        self
    }

    pub fn sortable(mut self, columns: &[&str]) -> Self {
        self.sortable = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Default ordering, e.g. `"sort_order asc, name asc"`
    pub fn order_by(mut self, spec: &str) -> Self {
        self.default_order = FilterOrder::parse(spec);
        self
    }

    pub fn field(mut self, rules: FieldRules) -> Self {
        self.rules.push(rules);
        self
    }

    pub fn status_timestamp(mut self, status_field: &str, value: &str, timestamp_field: &str) -> Self {
        self.status_timestamps.push(StatusTimestamp {
            status_field: status_field.to_string(),
            value: value.to_string(),
            timestamp_field: timestamp_field.to_string(),
        });
        self
    }

    pub fn guard_delete(mut self, table: &str, foreign_key: &str, message: &str) -> Self {
        self.delete_guards.push(DeleteGuard {
            table: table.to_string(),
            foreign_key: foreign_key.to_string(),
            message: message.to_string(),
        });
        self
    }

    pub fn belongs_to(mut self, name: &str, foreign_key: &str, table: &str, fields: &[&str]) -> Self {
        self.relations.push(Relation {
            name: name.to_string(),
            foreign_key: foreign_key.to_string(),
            table: table.to_string(),
            fields: fields.iter().map(|f| f.to_string()).collect(),
        });
        self
    }

    pub fn count(mut self, name: &str, table: &str, foreign_key: &str) -> Self {
        self.computed.push(ComputedField::Count {
            name: name.to_string(),
            table: table.to_string(),
            foreign_key: foreign_key.to_string(),
        });
        self
    }

    pub fn duration_minutes(mut self, name: &str, start: &str, end: &str) -> Self {
        self.computed.push(ComputedField::DurationMinutes {
            name: name.to_string(),
            start: start.to_string(),
            end: end.to_string(),
        });
        self
    }

    /// Stored columns never rendered
    pub fn hidden(mut self, fields: &[&str]) -> Self {
        self.hidden = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn action(mut self, name: &str, effect: ActionEffect, message: &str) -> Self {
        self.actions.push(NestedAction {
            name: name.to_string(),
            effect,
            message: message.to_string(),
        });
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn table_name(&self) -> &str { &self.table }
    pub fn filter_spec(&self) -> &FilterSpec { &self.filter }
    pub fn owner_field(&self) -> Option<&str> { self.filter.owner_field() }
    pub fn sortable_fields(&self) -> &[String] { &self.sortable }
    pub fn default_order(&self) -> &[FilterOrderInfo] { &self.default_order }
    pub fn rules(&self) -> &[FieldRules] { &self.rules }
    pub fn status_timestamps(&self) -> &[StatusTimestamp] { &self.status_timestamps }
    pub fn delete_guards(&self) -> &[DeleteGuard] { &self.delete_guards }
    pub fn relations(&self) -> &[Relation] { &self.relations }
    pub fn computed_fields(&self) -> &[ComputedField] { &self.computed }
    pub fn hidden_fields(&self) -> &[String] { &self.hidden }
    pub fn actions(&self) -> &[NestedAction] { &self.actions }

    pub fn action_named(&self, name: &str) -> Option<&NestedAction> {
        self.actions.iter().find(|a| a.name == name)
    }

    /// `(field, referenced table)` for every field with an `exists` rule
    pub fn foreign_keys(&self) -> Vec<(&str, &str)> {
        self.rules
            .iter()
            .filter_map(|f| f.foreign_table().map(|t| (f.name.as_str(), t)))
            .collect()
    }

    /// `(field, scope fields)` for every field with a `unique` rule
    pub fn unique_constraints(&self) -> Vec<(&str, &[String])> {
        self.rules
            .iter()
            .flat_map(|f| {
                f.rules.iter().filter_map(move |r| match r {
                    Rule::Unique { scope, .. } => Some((f.name.as_str(), scope.as_slice())),
                    _ => None,
                })
            })
            .collect()
    }

    /// Ordering for a list request: the `sort` parameter when given
    /// (`name`, `-created_at`, comma separated), else the default.
    pub fn list_order(&self, params: &HashMap<String, String>) -> Result<Vec<FilterOrderInfo>, ValidationErrors> {
        let Some(raw) = params.get("sort").map(|s| s.trim()).filter(|s| !s.is_empty()) else {
            return Ok(self.default_order.clone());
        };

        let mut order = Vec::new();
        for part in raw.split(',') {
            match FilterOrder::parse_param(part) {
                Some(info) if self.sortable.contains(&info.column) => order.push(info),
                _ => return Err(ValidationErrors::single("sort", "The selected sort is invalid.")),
            }
        }
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn categories() -> ResourceDescriptor {
        ResourceDescriptor::new("categories")
            .sortable(&["name", "sort_order"])
            .order_by("sort_order asc, name asc")
            .field(FieldRules::new("name").required().string_max(255))
            .field(FieldRules::new("parent_id").integer().exists("categories"))
            .field(FieldRules::new("slug").string().unique("categories"))
    }

    #[test]
    fn sort_parameter_is_restricted_to_sortable_fields() {
        let d = categories();
        assert_eq!(d.list_order(&params(&[])).unwrap(), FilterOrder::parse("sort_order asc, name asc"));
        assert_eq!(d.list_order(&params(&[("sort", "-name")])).unwrap(), vec![FilterOrderInfo::desc("name")]);
        assert!(d.list_order(&params(&[("sort", "password")])).unwrap_err().has("sort"));
    }

    #[test]
    fn derives_foreign_keys_and_unique_constraints() {
        let d = categories();
        assert_eq!(d.foreign_keys(), vec![("parent_id", "categories")]);
        let unique = d.unique_constraints();
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].0, "slug");
        assert!(unique[0].1.is_empty());
    }

    #[test]
    fn table_defaults_to_name() {
        assert_eq!(categories().table_name(), "categories");
        assert_eq!(ResourceDescriptor::new("user-achievements").table("user_achievements").table_name(), "user_achievements");
    }
}
