//! Query compiler: GraphQL arguments and selections → relational query descriptors.

pub mod aggregate;
pub mod assembler;
pub mod descriptor;
pub mod errors;
pub mod expression;
pub mod filter_args;
pub mod join_registry;
pub mod operators;
pub mod projection;
pub mod pseudo_fields;

pub use aggregate::{compile_aggregate, AggregateDescriptor, AggregateFunction};
pub use assembler::{compile, CompiledQuery, FieldSource, ModelAdapter};
pub use descriptor::{
    ColumnRef, Expr, FnCall, JoinEntry, OrderItem, Predicate, Projection, ProjectionItem,
    QueryDescriptor, SortDirection,
};
pub use errors::CompileError;
pub use expression::{compile_expression, CompiledExpression, ExpressionCompiler, Strictness};
pub use filter_args::{compile_filter, compile_filter_with};
pub use operators::{native_operator, translate_operators};
pub use projection::{normalize_group, normalize_projection};
