use proc_macro2::Span;
use syn::{
    parse::Parser, punctuated::Punctuated, spanned::Spanned, Attribute, Expr, ExprLit, Fields,
    ItemStruct, Lit, LitStr, MetaNameValue, Token,
};

#[derive(Default)]
pub struct CompletionSchemaArgs {
    pub name: Option<LitStr>,
    pub description: Option<LitStr>,
}

pub fn parse_completion_schema_args(
    attr: proc_macro::TokenStream,
) -> syn::Result<CompletionSchemaArgs> {
    if attr.is_empty() {
        return Ok(CompletionSchemaArgs::default());
    }

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let args = parser.parse(attr)?;

    let mut result = CompletionSchemaArgs::default();

    for nested in args {
        let ident = nested
            .path
            .get_ident()
            .ok_or_else(|| syn::Error::new_spanned(&nested.path, "expected identifier"))?;

        let lit_str = match &nested.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(lit), ..
            }) => lit.clone(),
            other => {
                return Err(syn::Error::new_spanned(
                    other,
                    "expected string literal value",
                ));
            }
        };

        match ident.to_string().as_str() {
            "name" => {
                if result.name.is_some() {
                    return Err(syn::Error::new(ident.span(), "duplicate `name` argument"));
                }
                result.name = Some(lit_str);
            }
            "description" => {
                if result.description.is_some() {
                    return Err(syn::Error::new(
                        ident.span(),
                        "duplicate `description` argument",
                    ));
                }
                result.description = Some(lit_str);
            }
            other => {
                return Err(syn::Error::new(
                    ident.span(),
                    format!("unsupported argument `{other}`"),
                ));
            }
        }
    }

    Ok(result)
}

pub fn ensure_named_struct(item: &ItemStruct) -> syn::Result<()> {
    match &item.fields {
        Fields::Named(_) => Ok(()),
        _ => Err(syn::Error::new(
            item.struct_token.span(),
            "`#[completion_schema]` only supports structs with named fields",
        )),
    }
}

pub fn collect_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let mut docs = Vec::new();

    for attr in attrs {
        if attr.path().is_ident("doc") {
            if let syn::Meta::NameValue(MetaNameValue {
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(lit), ..
                    }),
                ..
            }) = &attr.meta
            {
                docs.push(lit.value().trim().to_string());
            }
        }
    }

    if docs.is_empty() {
        None
    } else {
        Some(docs.join("\n"))
    }
}

/// Returns `(serialized_name, doc)` for every documented field.
pub fn collect_field_docs(item: &ItemStruct, rename_all: Option<&str>) -> Vec<(String, String)> {
    let mut results = Vec::new();

    if let Fields::Named(fields) = &item.fields {
        for field in &fields.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let Some(doc) = collect_doc_comments(&field.attrs) else {
                continue;
            };

            let name = serde_string_arg(&field.attrs, "rename").unwrap_or_else(|| {
                let raw = ident.to_string();
                let raw = raw.strip_prefix("r#").unwrap_or(&raw).to_string();
                match rename_all {
                    Some(rule) => apply_rename_rule(&raw, rule),
                    None => raw,
                }
            });
            results.push((name, doc));
        }
    }

    results
}

pub fn serde_rename_all(attrs: &[Attribute]) -> Option<String> {
    serde_string_arg(attrs, "rename_all")
}

/// Finds `key = "value"` inside `#[serde(...)]`. Anything unparseable is ignored.
fn serde_string_arg(attrs: &[Attribute], key: &str) -> Option<String> {
    let mut found = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        let Ok(pairs) =
            attr.parse_args_with(Punctuated::<syn::Meta, Token![,]>::parse_terminated)
        else {
            continue;
        };

        for meta in pairs {
            if let syn::Meta::NameValue(MetaNameValue {
                path,
                value:
                    Expr::Lit(ExprLit {
                        lit: Lit::Str(lit), ..
                    }),
                ..
            }) = meta
            {
                if path.is_ident(key) {
                    found = Some(lit.value());
                }
            }
        }
    }

    found
}

fn apply_rename_rule(field: &str, rule: &str) -> String {
    match rule {
        "camelCase" => {
            let pascal = to_pascal(field);
            let mut chars = pascal.chars();
            match chars.next() {
                Some(first) => first.to_lowercase().chain(chars).collect(),
                None => String::new(),
            }
        }
        "PascalCase" => to_pascal(field),
        "kebab-case" => field.replace('_', "-"),
        "SCREAMING_SNAKE_CASE" | "UPPERCASE" => field.to_uppercase(),
        "SCREAMING-KEBAB-CASE" => field.replace('_', "-").to_uppercase(),
        "lowercase" => field.to_lowercase(),
        _ => field.to_string(),
    }
}

fn to_pascal(field: &str) -> String {
    field
        .split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

pub fn infer_schema_name(item: &ItemStruct, explicit: Option<&LitStr>) -> LitStr {
    if let Some(explicit) = explicit {
        return explicit.clone();
    }

    LitStr::new(&item.ident.to_string(), Span::call_site())
}

pub fn infer_description(explicit: Option<&LitStr>, doc: Option<String>) -> Option<LitStr> {
    if let Some(explicit) = explicit {
        return Some(explicit.clone());
    }

    doc.map(|text| LitStr::new(&text, Span::call_site()))
}
