pub mod enums;
pub mod grouping;
pub mod inheritance;
pub mod models;
pub mod names;
pub mod operations;
pub mod schema_graph;
pub mod tree_shake;
pub mod types;

pub use grouping::{ClientGroup, GroupingOptions, group_operations};
pub use inheritance::InheritanceComposer;
pub use models::ModelAssembler;
pub use names::KeywordTable;
pub use operations::{MethodNames, OperationAssembler, apriori_method_name};
pub use schema_graph::SchemaGraph;
pub use tree_shake::shake;
pub use types::{Primitive, TypeRef, TypeResolver};
