use super::error::FilterError;
use super::filter_where::quote;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parses `"sort_order asc, name"` style specs. Direction defaults to ascending.
    pub fn parse(spec: &str) -> Vec<FilterOrderInfo> {
        let mut out = Vec::new();
        for part in spec.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() { continue; }
            let mut it = trimmed.split_whitespace();
            if let Some(col) = it.next() {
                let dir = it.next().unwrap_or("asc");
                let sort = if dir.eq_ignore_ascii_case("desc") { SortDirection::Desc } else { SortDirection::Asc };
                out.push(FilterOrderInfo { column: col.to_string(), sort });
            }
        }
        out
    }

    /// Parses a client `sort` parameter: `name` ascending, `-name` descending.
    pub fn parse_param(param: &str) -> Option<FilterOrderInfo> {
        let trimmed = param.trim();
        match trimmed.strip_prefix('-') {
            Some("") => None,
            Some(col) => Some(FilterOrderInfo::desc(col)),
            None if trimmed.is_empty() => None,
            None => Some(FilterOrderInfo::asc(trimmed)),
        }
    }

    /// Appends `id ASC` unless the ordering already ends on the primary key.
    pub fn with_tiebreak(mut infos: Vec<FilterOrderInfo>) -> Vec<FilterOrderInfo> {
        if !infos.iter().any(|i| i.column == "id") {
            infos.push(FilterOrderInfo::asc("id"));
        }
        infos
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> Result<String, FilterError> {
        if infos.is_empty() { return Ok(String::new()); }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {}", quote(&i.column), i.sort.to_sql()))
            .collect();
        Ok(format!("ORDER BY {}", parts.join(", ")))
    }
}
