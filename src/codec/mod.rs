//! Interchange formats for bookmark trees.
//!
//! - [`csv`]: flat `title,page,level` rows, rebuilt into a tree with a level stack
//! - [`json`]: structural serialization, ids included
//!
//! Both codecs strip control characters from every imported title.

pub mod csv;
pub mod json;

pub use self::csv::CsvImport;
