//! Compile hand-authored election records (bodies, offices, districts,
//! categories, languages and translated phrases) into a single validated,
//! cross-referenced data graph for the page renderer.

pub mod compile;
pub mod config;
pub mod error;
pub mod i18n;
pub mod metrics;
pub mod schema;
pub mod source;

pub use compile::{compile_all, Compilation, Compiler, DataGraph};
pub use error::{CompileError, Result};
