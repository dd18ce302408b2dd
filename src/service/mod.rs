pub mod schema_generation;
pub mod translate;

pub use schema_generation::SchemaGenerator;
pub use translate::Translator;
