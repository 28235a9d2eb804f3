use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta, Type};

/// Derive macro describing the CSV columns a record struct deserializes from.
///
/// For each named field it records:
/// - the column name (honours `#[serde(rename = "...")]`)
/// - whether the column is required (not `Option<T>` and no `#[serde(default)]`)
/// - the value kind (`number`, `boolean` or `text`) inferred from the field type
/// - a description taken from the field's doc comments
///
/// Generates `csv_schema() -> &'static [CsvField]` and `csv_header() -> String`.
/// A `CsvField` type must be in scope where the derive is used.
#[proc_macro_derive(CsvSchema, attributes(serde))]
pub fn derive_csv_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("CsvSchema only supports structs with named fields"),
        },
        _ => panic!("CsvSchema only supports structs"),
    };

    let columns: Vec<_> = fields
        .iter()
        .map(|field| {
            let ident = field.ident.as_ref().expect("named field").to_string();
            let column = serde_rename(&field.attrs).unwrap_or(ident);
            let required = !is_option(&field.ty) && !has_serde_default(&field.attrs);
            let kind = value_kind(&field.ty);
            let doc = doc_comment(&field.attrs);
            (column, required, kind, doc)
        })
        .collect();

    let header = columns
        .iter()
        .map(|(column, ..)| column.as_str())
        .collect::<Vec<_>>()
        .join(",");

    let entries = columns.iter().map(|(column, required, kind, doc)| {
        quote! {
            CsvField {
                name: #column,
                required: #required,
                kind: #kind,
                description: #doc,
            }
        }
    });

    let expanded = quote! {
        impl #name {
            pub fn csv_schema() -> &'static [CsvField] {
                static SCHEMA: &[CsvField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }

            pub fn csv_header() -> String {
                #header.to_string()
            }
        }
    };

    TokenStream::from(expanded)
}

fn serde_args(attrs: &[syn::Attribute]) -> impl Iterator<Item = String> + '_ {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("serde"))
        .filter_map(|attr| match &attr.meta {
            Meta::List(list) => Some(list.tokens.to_string()),
            _ => None,
        })
}

fn serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    serde_args(attrs).find_map(|tokens| {
        let rest = &tokens[tokens.find("rename")?..];
        let after_eq = rest[rest.find('=')? + 1..].trim();
        let quoted = after_eq.strip_prefix('"')?;
        let end = quoted.find('"')?;
        Some(quoted[..end].to_string())
    })
}

fn has_serde_default(attrs: &[syn::Attribute]) -> bool {
    serde_args(attrs).any(|tokens| {
        tokens
            .split(',')
            .any(|arg| arg.trim().starts_with("default"))
    })
}

fn doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(meta) => match &meta.value {
                syn::Expr::Lit(expr) => match &expr.lit {
                    Lit::Str(s) => Some(s.value().trim().to_string()),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn last_segment(ty: &Type) -> Option<&syn::PathSegment> {
    match ty {
        Type::Path(path) => path.path.segments.last(),
        _ => None,
    }
}

fn is_option(ty: &Type) -> bool {
    last_segment(ty).is_some_and(|segment| segment.ident == "Option")
}

fn value_kind(ty: &Type) -> &'static str {
    let Some(segment) = last_segment(ty) else {
        return "text";
    };
    if segment.ident == "Option" {
        if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
            if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                return value_kind(inner);
            }
        }
        return "text";
    }
    match segment.ident.to_string().as_str() {
        "bool" => "boolean",
        "Decimal" | "f64" | "f32" | "u64" | "u32" | "i64" | "i32" | "usize" => "number",
        _ => "text",
    }
}
