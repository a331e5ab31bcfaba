//! Environment-driven configuration for the catalog.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pagination::DEFAULT_PAGE_SIZE;

pub const PAGE_SIZE_ENV: &str = "STOREFRONT_PAGE_SIZE";
pub const CATALOG_PATH_ENV: &str = "STOREFRONT_CATALOG_PATH";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a positive integer, got {value:?}")]
    InvalidPageSize { var: &'static str, value: String },

    #[error("{0} is not set")]
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub page_size: NonZeroUsize,
    pub catalog_path: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            catalog_path: None,
        }
    }
}

impl CatalogConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let page_size = match lookup(PAGE_SIZE_ENV) {
            None => DEFAULT_PAGE_SIZE,
            Some(raw) => raw
                .trim()
                .parse::<NonZeroUsize>()
                .map_err(|_| ConfigError::InvalidPageSize {
                    var: PAGE_SIZE_ENV,
                    value: raw.clone(),
                })?,
        };

        let catalog_path = lookup(CATALOG_PATH_ENV)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            page_size,
            catalog_path,
        })
    }

    pub fn catalog_path(&self) -> Result<&Path, ConfigError> {
        self.catalog_path
            .as_deref()
            .ok_or(ConfigError::Missing(CATALOG_PATH_ENV))
    }
}
