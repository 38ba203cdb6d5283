use std::collections::HashMap;

use serde::Serialize;

use crate::config;
use crate::validation::ValidationErrors;

/// Validated `page` / `per_page` pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub per_page: u64,
}

impl PageRequest {
    /// Reads pagination parameters using the configured default and maximum.
    pub fn from_params(params: &HashMap<String, String>) -> Result<Self, ValidationErrors> {
        let cfg = &config::config().pagination;
        Self::from_params_with(params, cfg.default_per_page, cfg.max_per_page)
    }

    /// Out-of-bounds values are rejected, never clamped. Both fields are
    /// checked before returning so every violation is reported.
    pub fn from_params_with(
        params: &HashMap<String, String>,
        default_per_page: u64,
        max_per_page: u64,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let page = match present(params, "page") {
            None => 1,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n >= 1 => n as u64,
                Ok(_) => {
                    errors.add("page", "The page field must be at least 1.");
                    1
                }
                Err(_) => {
                    errors.add("page", "The page field must be an integer.");
                    1
                }
            },
        };

        let per_page = match present(params, "per_page") {
            None => default_per_page,
            Some(raw) => match raw.parse::<i64>() {
                Ok(n) if n < 1 => {
                    errors.add("per_page", "The per page field must be at least 1.");
                    default_per_page
                }
                Ok(n) if n as u64 > max_per_page => {
                    errors.add("per_page", format!("The per page field must not be greater than {}.", max_per_page));
                    default_per_page
                }
                Ok(n) => n as u64,
                Err(_) => {
                    errors.add("per_page", "The per page field must be an integer.");
                    default_per_page
                }
            },
        };

        if errors.is_empty() {
            Ok(Self { page, per_page })
        } else {
            Err(errors)
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

fn present<'a>(params: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    params.get(key).map(|s| s.trim()).filter(|s| !s.is_empty())
}

/// Meta envelope returned next to `data` on list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    pub current_page: u64,
    pub last_page: u64,
    pub per_page: u64,
    pub total: u64,
}

impl PageMeta {
    pub fn new(request: &PageRequest, total: u64) -> Self {
        let last_page = if total == 0 { 1 } else { total.div_ceil(request.per_page) };
        Self {
            current_page: request.page,
            last_page,
            per_page: request.per_page,
            total,
        }
    }
}

/// One page of records plus its meta
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            records: self.records.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}
