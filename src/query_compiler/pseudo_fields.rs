//! Reserved GraphQL field names and column aliases.
//!
//! The generated schema exposes two pseudo-fields on every model type. They
//! carry computed-column requests through GraphQL's field protocol and never
//! name real model data, so the catalog refuses models that declare them.

/// `_aggregation(fn: String!, as: String, args: JSON)`: computed aggregate column
pub const AGGREGATION_FIELD: &str = "_aggregation";

/// `_col(name: String!, as: String!)`: single column read through an association
pub const RELATED_COLUMN_FIELD: &str = "_col";

/// Alias used for `COUNT(*)` projections
pub const COUNT_ALIAS: &str = "_count";

/// Alias used for `AVG(col)` projections that ask for the reserved alias
pub const AVG_ALIAS: &str = "_avg";

pub fn is_reserved(name: &str) -> bool {
    name == AGGREGATION_FIELD || name == RELATED_COLUMN_FIELD
}

/// Default alias for an `_aggregation` column without `as`
pub fn aggregation_alias(function: &str) -> String {
    format!("_{}", function)
}

/// Default alias for a `_col` column without `as`
pub fn related_column_alias(name: &str) -> String {
    format!("_{}", name)
}
