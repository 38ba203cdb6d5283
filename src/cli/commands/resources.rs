use serde_json::{json, Map, Value};

use crate::cli::utils::output_collection;
use crate::cli::OutputFormat;
use crate::resource::ResourceDescriptor;
use crate::resources;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let registry = resources::catalog();
    let rows: Vec<Value> = registry.iter().map(|d| describe(d)).collect();
    output_collection(&output_format, "resources", &rows, |row| {
        format!(
            "{:<22} filters: {}",
            row["name"].as_str().unwrap_or_default(),
            row["filters"]
                .as_array()
                .map(|f| f.iter().filter_map(Value::as_str).collect::<Vec<_>>().join(", "))
                .unwrap_or_default()
        )
    })
}

fn describe(descriptor: &ResourceDescriptor) -> Value {
    json!({
        "name": descriptor.name(),
        "table": descriptor.table_name(),
        "owner": descriptor.owner_field(),
        "filters": descriptor.filter_spec().parameter_names(),
        "sortable": descriptor.sortable_fields(),
        "fields": descriptor
            .rules()
            .iter()
            .map(|f| (f.name.clone(), json!(f.describe())))
            .collect::<Map<String, Value>>(),
        "actions": descriptor.actions(),
    })
}
