mod parse;
mod records;
mod source;

pub use parse::DatasetError;
pub use records::{
    Dataset, EdgeDirection, EdgeKind, Health, PersonRecord, RelationshipRecord, Role,
};
pub use source::{GraphSource, JsonFileSource, StaticSource};
