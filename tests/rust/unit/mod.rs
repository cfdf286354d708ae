//! Unit tests - public API edge cases that need no fixtures beyond literals

mod catalog_validation_tests;
mod selection_robustness_tests;
