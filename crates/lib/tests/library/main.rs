mod common;
mod lifecycle_tests;
mod merge_tests;
mod realize_tests;
