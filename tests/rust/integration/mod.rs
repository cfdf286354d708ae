//! Integration tests - full requests from GraphQL text to query descriptors
//!
//! These tests drive the parser, catalog and compiler together against the
//! fixture schema in `fixtures.rs`.

mod catalog_services_tests;
mod end_to_end_tests;
mod fixtures;
