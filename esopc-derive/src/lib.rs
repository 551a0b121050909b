use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, LitStr, Meta};

/// Derive macro that generates a field listing for an input form.
///
/// For each field, extracts:
/// - Field name (respects #[serde(rename = "...")])
/// - Kind, from #[form(kind = "number" | "percent" | "strike_list")], default number
/// - Description (from doc comments)
///
/// Generates a `form_schema() -> &'static [FormField]` method. `FormField`
/// and `FieldKind` must be in scope where the derive is used.
#[proc_macro_derive(FormSchema, attributes(form, serde))]
pub fn derive_form_schema(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => panic!("FormSchema only supports structs with named fields"),
        },
        _ => panic!("FormSchema only supports structs"),
    };

    let mut entries = Vec::new();
    for field in fields {
        let field_name = field.ident.as_ref().unwrap().to_string();
        let form_name = get_serde_rename(&field.attrs).unwrap_or(field_name);
        let doc = get_doc_comment(&field.attrs);

        let kind = match get_form_kind(&field.attrs) {
            Ok(kind) => kind,
            Err(err) => return err.to_compile_error().into(),
        };

        entries.push(quote! {
            FormField {
                name: #form_name,
                kind: FieldKind::#kind,
                description: #doc,
            }
        });
    }

    let expanded = quote! {
        impl #name {
            pub fn form_schema() -> &'static [FormField] {
                static SCHEMA: &[FormField] = &[
                    #(#entries),*
                ];
                SCHEMA
            }
        }
    };

    TokenStream::from(expanded)
}

fn get_form_kind(attrs: &[syn::Attribute]) -> syn::Result<proc_macro2::Ident> {
    let mut kind = None;
    for attr in attrs {
        if !attr.path().is_ident("form") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if !meta.path.is_ident("kind") {
                return Err(meta.error("expected `kind = \"...\"`"));
            }
            let value: LitStr = meta.value()?.parse()?;
            let variant = match value.value().as_str() {
                "number" => "Number",
                "percent" => "Percent",
                "strike_list" => "StrikeList",
                other => {
                    return Err(syn::Error::new(
                        value.span(),
                        format!("unknown form field kind `{other}`"),
                    ))
                }
            };
            kind = Some(proc_macro2::Ident::new(variant, value.span()));
            Ok(())
        })?;
    }
    Ok(kind.unwrap_or_else(|| proc_macro2::Ident::new("Number", proc_macro2::Span::call_site())))
}

fn get_serde_rename(attrs: &[syn::Attribute]) -> Option<String> {
    for attr in attrs {
        if !attr.path().is_ident("serde") {
            continue;
        }

        if let Meta::List(meta_list) = &attr.meta {
            let tokens = meta_list.tokens.to_string();
            // Simple parsing: look for rename = "..."
            if let Some(start) = tokens.find("rename") {
                let rest = &tokens[start..];
                if let Some(eq_pos) = rest.find('=') {
                    let after_eq = rest[eq_pos + 1..].trim();
                    if let Some(stripped) = after_eq.strip_prefix('"') {
                        if let Some(end_quote) = stripped.find('"') {
                            return Some(stripped[..end_quote].to_string());
                        }
                    }
                }
            }
        }
    }
    None
}

fn get_doc_comment(attrs: &[syn::Attribute]) -> String {
    attrs
        .iter()
        .filter_map(|attr| {
            if !attr.path().is_ident("doc") {
                return None;
            }
            if let Meta::NameValue(meta) = &attr.meta {
                if let syn::Expr::Lit(expr_lit) = &meta.value {
                    if let Lit::Str(lit_str) = &expr_lit.lit {
                        return Some(lit_str.value().trim().to_string());
                    }
                }
            }
            None
        })
        .collect::<Vec<_>>()
        .join(" ")
}
