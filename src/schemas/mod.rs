pub mod schema;

pub use schema::{apply_doc_comments, CompletionSchema, SchemaHandle};
