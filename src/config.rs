//! generator configuration
//!
//! build a [`CodeGenConfig`] with the builder methods, or load one from a
//! json file with [`CodeGenConfig::from_json`]. pass it to
//! [`crate::ClientGenerator::new`] for one generation run.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeSet;

/// configuration for one generation run
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CodeGenConfig {
    /// maximum nesting depth below a root projection; -1 means unlimited
    pub max_projection_depth: i32,

    /// shorten overlong projection class-name prefixes
    pub short_projection_names: bool,

    /// skip the federation entities projection even if key types exist
    pub skip_entity_queries: bool,

    /// root operation fields to generate; empty means all
    pub include_operations: BTreeSet<String>,

    /// field names excluded at every level; wins over the include list
    pub exclude_fields: BTreeSet<String>,

    /// package for generated query classes
    pub query_package: String,

    /// package for generated projection and fragment classes
    pub projection_package: String,

    /// package for generated data types
    pub types_package: String,

    /// package of the client runtime the generated classes extend
    pub runtime_package: String,
}

impl Default for CodeGenConfig {
    fn default() -> Self {
        Self {
            max_projection_depth: 10,
            short_projection_names: false,
            skip_entity_queries: false,
            include_operations: BTreeSet::new(),
            exclude_fields: BTreeSet::new(),
            query_package: "graphql.client".to_string(),
            projection_package: "graphql.client".to_string(),
            types_package: "graphql.types".to_string(),
            runtime_package: "querygen.client".to_string(),
        }
    }
}

impl CodeGenConfig {
    /// create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// load a configuration from a json document
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config)
    }

    /// set the maximum projection depth (-1 for unlimited)
    pub fn with_max_projection_depth(mut self, depth: i32) -> Self {
        self.max_projection_depth = depth;
        self
    }

    /// enable or disable short projection names
    pub fn with_short_projection_names(mut self, enabled: bool) -> Self {
        self.short_projection_names = enabled;
        self
    }

    /// enable or disable the federation entities projection
    pub fn with_skip_entity_queries(mut self, skip: bool) -> Self {
        self.skip_entity_queries = skip;
        self
    }

    /// restrict generation to the named root operation fields
    pub fn with_include_operations<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include_operations = names.into_iter().map(Into::into).collect();
        self
    }

    /// exclude the named fields at every level
    pub fn with_exclude_fields<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_fields = names.into_iter().map(Into::into).collect();
        self
    }

    /// set the package for generated query classes
    pub fn with_query_package(mut self, package: impl Into<String>) -> Self {
        self.query_package = package.into();
        self
    }

    /// set the package for generated projection classes
    pub fn with_projection_package(mut self, package: impl Into<String>) -> Self {
        self.projection_package = package.into();
        self
    }

    /// set the package for generated data types
    pub fn with_types_package(mut self, package: impl Into<String>) -> Self {
        self.types_package = package.into();
        self
    }

    /// set the package of the generated-client runtime
    pub fn with_runtime_package(mut self, package: impl Into<String>) -> Self {
        self.runtime_package = package.into();
        self
    }

    /// validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_projection_depth < -1 {
            return Err(Error::Config(format!(
                "invalid max projection depth: {} (use -1 for unlimited)",
                self.max_projection_depth
            )));
        }

        for (name, package) in [
            ("query package", &self.query_package),
            ("projection package", &self.projection_package),
            ("types package", &self.types_package),
            ("runtime package", &self.runtime_package),
        ] {
            if package.is_empty() {
                return Err(Error::Config(format!("{name} cannot be empty")));
            }
        }

        Ok(())
    }
}
