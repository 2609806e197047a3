//! Validated selectors built from command-line flags.
//!
//! All mutual-exclusion checks happen here, before a client is even built,
//! so a bad flag combination never costs a request.

use crate::error::{IncliError, Result};
use crate::settings::{CatalogGetArgs, IncidentGetArgs};

/// Catalog type qualifier narrowing a catalog query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    TypeId(String),
    TypeName(String),
}

/// What `catalog get` should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    /// A single entry by id. Never scoped.
    ById(String),
    /// Entries within an optional scope, optionally narrowed by exact name.
    Scoped {
        scope: Option<Scope>,
        name: Option<String>,
    },
}

/// What `incidents get` should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncidentQuery {
    ById(String),
    ByReference(u32),
    All,
    Watch,
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

impl CatalogQuery {
    pub fn from_args(args: &CatalogGetArgs) -> Result<Self> {
        let type_id = present(&args.type_id);
        let type_name = present(&args.type_name);
        let name = present(&args.name);
        let id = present(&args.id);

        if type_id.is_some() && type_name.is_some() {
            return Err(IncliError::invalid(
                "exactly one of --type-name or --type-id may be specified",
            ));
        }
        if name.is_some() && id.is_some() {
            return Err(IncliError::invalid(
                "exactly one of --name or --id may be specified",
            ));
        }

        if let Some(id) = id {
            if type_id.is_some() || type_name.is_some() {
                return Err(IncliError::invalid(
                    "--id is mutually exclusive with both --type-id and --type-name",
                ));
            }
            return Ok(CatalogQuery::ById(id));
        }

        let scope = match (type_id, type_name) {
            (Some(id), None) => Some(Scope::TypeId(id)),
            (None, Some(name)) => Some(Scope::TypeName(name)),
            _ => None,
        };

        Ok(CatalogQuery::Scoped { scope, name })
    }
}

impl IncidentQuery {
    pub fn from_args(args: &IncidentGetArgs) -> Result<Self> {
        let id = present(&args.id);

        if args.reference.is_some() && id.is_some() {
            return Err(IncliError::invalid("only one of --id or --ref may be specified"));
        }
        if args.watch && (args.reference.is_some() || id.is_some()) {
            return Err(IncliError::invalid(
                "--watch cannot be combined with --id or --ref",
            ));
        }

        if let Some(reference) = args.reference {
            return match u32::try_from(reference) {
                Ok(n) if n > 0 => Ok(IncidentQuery::ByReference(n)),
                _ => Err(IncliError::invalid(format!(
                    "incident --ref must be a positive integer: {reference}"
                ))),
            };
        }

        Ok(match id {
            Some(id) => IncidentQuery::ById(id),
            None if args.watch => IncidentQuery::Watch,
            None => IncidentQuery::All,
        })
    }
}
