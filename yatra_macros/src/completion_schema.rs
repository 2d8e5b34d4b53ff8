use proc_macro::TokenStream;
use proc_macro2::{Span, TokenStream as TokenStream2};
use quote::quote;
use syn::{spanned::Spanned, ItemStruct, LitStr};

use crate::schema_extraction::{
    collect_doc_comments, collect_field_docs, ensure_named_struct, infer_description,
    infer_schema_name, parse_completion_schema_args, serde_rename_all,
};

pub fn completion_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    expand(attr, item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(attr: TokenStream, item: TokenStream) -> syn::Result<TokenStream2> {
    let args = parse_completion_schema_args(attr)?;
    let item_struct: ItemStruct = syn::parse(item)?;

    ensure_named_struct(&item_struct)?;
    if !item_struct.generics.params.is_empty() {
        return Err(syn::Error::new(
            item_struct.generics.span(),
            "a model response type needs one fixed schema; remove the generic parameters",
        ));
    }

    let schema_name = infer_schema_name(&item_struct, args.name.as_ref());
    let description = infer_description(
        args.description.as_ref(),
        collect_doc_comments(&item_struct.attrs),
    );
    let field_docs = property_docs(&item_struct);
    let schema_impl = schema_impl(&item_struct, &schema_name, description.as_ref(), &field_docs);

    Ok(quote! {
        #item_struct
        #schema_impl
    })
}

/// `(property, doc)` pairs keyed by the name the field serializes under.
fn property_docs(item: &ItemStruct) -> Vec<TokenStream2> {
    let rename_all = serde_rename_all(&item.attrs);
    collect_field_docs(item, rename_all.as_deref())
        .iter()
        .map(|(property, doc)| {
            let property = LitStr::new(property, Span::call_site());
            let doc = LitStr::new(doc, Span::call_site());
            quote! { (#property, #doc) }
        })
        .collect()
}

fn schema_impl(
    item: &ItemStruct,
    schema_name: &LitStr,
    description: Option<&LitStr>,
    field_docs: &[TokenStream2],
) -> TokenStream2 {
    let ident = &item.ident;
    let rust_name = LitStr::new(&ident.to_string(), ident.span());
    let description = match description {
        Some(lit) => quote! { Some(#lit) },
        None => quote! { None },
    };

    quote! {
        impl yatra::schema::CompletionSchema for #ident {
            fn schema() -> &'static yatra::schema::SchemaHandle {
                static HANDLE: std::sync::OnceLock<yatra::schema::SchemaHandle> =
                    std::sync::OnceLock::new();
                HANDLE.get_or_init(|| {
                    let mut root = schemars::schema_for!(Self);
                    yatra::schema::apply_doc_comments(
                        &mut root,
                        #schema_name,
                        #description,
                        &[#(#field_docs),*],
                    );
                    yatra::schema::SchemaHandle::from_root_schema::<Self>(
                        #schema_name,
                        #rust_name,
                        root,
                    )
                })
            }
        }
    }
}
