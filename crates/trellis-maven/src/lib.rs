//! Bills of materials: POM parsing and the sources BOM version tables are
//! read from (inline manifest tables, a local Maven repository).

pub mod bom;
pub mod pom;
pub mod repository;
