//! Procedural macros for yatra.
//!
//! `#[completion_schema]` attaches a cached JSON schema to a response struct so
//! prompt templates can ask the model for output of exactly that shape.

mod completion_schema;
mod schema_extraction;

use proc_macro::TokenStream;

#[proc_macro_attribute]
pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    completion_schema::completion_schema(attr, item)
}
