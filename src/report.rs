pub mod assembler;
pub mod table;

pub use assembler::generate_document;
pub use table::{capitalize, ColumnPolicy, HeadingSet, VulnerabilityTable};
