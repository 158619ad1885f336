//! Implementation of `#[derive(Record)]`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::parse::ParseStream;
use syn::{parse_quote, Attribute, Data, DeriveInput, Field, Fields, Ident, LitStr, Token};

/// What a field contributes, collected from `#[record]` and `#[serde]`.
#[derive(Default)]
struct FieldAttrs {
    /// Annotation from `#[record("...")]`.
    tag: Option<String>,
    /// `#[record(skip)]`.
    skip: bool,
    /// `#[record(opaque)]`: rules apply, but the type is not described.
    opaque: bool,
    /// Deserialization name from `#[serde(rename ...)]`.
    serde_name: Option<String>,
    /// `#[serde(skip)]` or `#[serde(skip_deserializing)]`.
    serde_skip: bool,
}

/// Arguments of one `#[record(...)]` attribute.
#[derive(Default)]
struct RecordArgs {
    tag: Option<LitStr>,
    skip: bool,
    opaque: bool,
}

/// What one `#[serde(...)]` attribute says about deserialization.
#[derive(Default)]
struct SerdeField {
    name: Option<String>,
    skip: bool,
}

impl FieldAttrs {
    fn from_field(field: &Field) -> syn::Result<Self> {
        let mut result = FieldAttrs::default();
        let mut seen_record = false;

        for attr in &field.attrs {
            if attr.path().is_ident("record") {
                if seen_record {
                    return Err(syn::Error::new_spanned(attr, "duplicate #[record] attribute"));
                }
                seen_record = true;
                let args = attr.parse_args_with(parse_record_args)?;
                result.tag = args.tag.map(|lit| lit.value());
                result.skip = args.skip;
                result.opaque = args.opaque;
            } else if attr.path().is_ident("serde") {
                // serde owns this attribute and reports its errors; an
                // attribute we cannot read contributes nothing.
                if let Ok(serde) = read_serde_attr(attr) {
                    if serde.name.is_some() {
                        result.serde_name = serde.name;
                    }
                    result.serde_skip |= serde.skip;
                }
            }
        }

        Ok(result)
    }

    fn skipped(&self) -> bool {
        self.skip || (self.tag.is_none() && self.serde_skip)
    }

    /// The annotation handed to the schema builder.
    fn annotation(&self) -> Option<String> {
        match (&self.tag, &self.serde_name) {
            (Some(tag), Some(name)) if tag.is_empty() || tag.starts_with(',') => {
                Some(format!("{name}{tag}"))
            }
            (Some(tag), _) => Some(tag.clone()),
            (None, Some(name)) => Some(name.clone()),
            (None, None) => None,
        }
    }
}

/// Parses `"tag"`, `skip`, `opaque` or `"tag", opaque`.
fn parse_record_args(input: ParseStream) -> syn::Result<RecordArgs> {
    let mut args = RecordArgs::default();
    if input.peek(LitStr) {
        args.tag = Some(input.parse()?);
        if input.is_empty() {
            return Ok(args);
        }
        input.parse::<Token![,]>()?;
    }

    loop {
        let ident: Ident = input.parse().map_err(|e| {
            syn::Error::new(e.span(), "expected an annotation string, `skip` or `opaque`")
        })?;
        if ident == "skip" {
            args.skip = true;
        } else if ident == "opaque" {
            args.opaque = true;
        } else {
            return Err(syn::Error::new(
                ident.span(),
                "expected an annotation string, `skip` or `opaque`",
            ));
        }
        if input.is_empty() {
            return Ok(args);
        }
        input.parse::<Token![,]>()?;
    }
}

fn read_serde_attr(attr: &Attribute) -> syn::Result<SerdeField> {
    let mut out = SerdeField::default();
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("rename") {
            if meta.input.peek(Token![=]) {
                let name: LitStr = meta.value()?.parse()?;
                out.name = Some(name.value());
            } else {
                meta.parse_nested_meta(|inner| {
                    let name: LitStr = inner.value()?.parse()?;
                    if inner.path.is_ident("deserialize") {
                        out.name = Some(name.value());
                    }
                    Ok(())
                })?;
            }
        } else if meta.path.is_ident("skip") || meta.path.is_ident("skip_deserializing") {
            out.skip = true;
        } else if meta.input.peek(Token![=]) {
            let _: syn::Expr = meta.value()?.parse()?;
        } else if meta.input.peek(syn::token::Paren) {
            let content;
            syn::parenthesized!(content in meta.input);
            let _: TokenStream = content.parse()?;
        }
        Ok(())
    })?;
    Ok(out)
}

/// Expand `#[derive(Record)]` for `input`.
pub(crate) fn derive(input: &DeriveInput) -> syn::Result<TokenStream> {
    let fields: Vec<&Field> = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "`Record` cannot be derived for tuple structs; fields need names",
                ))
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "`Record` can only be derived for structs with named fields",
            ))
        }
    };

    let mut decls = Vec::with_capacity(fields.len());
    for field in fields {
        let attrs = FieldAttrs::from_field(field)?;
        if attrs.skipped() {
            continue;
        }
        let Some(ident) = &field.ident else {
            continue;
        };
        let ident = ident.unraw().to_string();
        let annotation = match attrs.annotation() {
            Some(tag) => quote!(::core::option::Option::Some(#tag)),
            None => quote!(::core::option::Option::None),
        };
        let ty = &field.ty;
        let handle = if attrs.opaque {
            quote!(::jsonrules_schema::TypeHandle::opaque())
        } else {
            quote!(::jsonrules_schema::TypeHandle::of::<#ty>())
        };
        decls.push(quote! {
            ::jsonrules_schema::FieldDecl::new(#ident, #annotation, #handle)
        });
    }

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(parse_quote!(::jsonrules_schema::Described));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let name = &input.ident;
    let name_str = name.unraw().to_string();
    let type_params: Vec<&Ident> = input.generics.type_params().map(|p| &p.ident).collect();
    let type_name = if type_params.is_empty() {
        quote!(::std::string::String::from(#name_str))
    } else {
        quote! {
            ::std::format!(
                "{}<{}>",
                #name_str,
                [#(<#type_params as ::jsonrules_schema::Described>::type_name()),*].join(", "),
            )
        }
    };

    Ok(quote! {
        impl #impl_generics ::jsonrules_schema::Described for #name #ty_generics #where_clause {
            fn type_name() -> ::std::string::String {
                #type_name
            }

            fn shape() -> ::jsonrules_schema::Shape {
                ::jsonrules_schema::Shape::Record(::jsonrules_schema::RecordShape::new(
                    #name_str,
                    ::std::vec![#(#decls),*],
                ))
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: DeriveInput) -> String {
        derive(&input).unwrap().to_string()
    }

    fn expand_err(input: DeriveInput) -> String {
        derive(&input).unwrap_err().to_string()
    }

    #[test]
    fn test_emits_field_declarations() {
        let out = expand(parse_quote! {
            struct Payload {
                #[record("required_id,required")]
                required_id: i64,
                plain: String,
            }
        });
        assert!(out.contains("impl :: jsonrules_schema :: Described for Payload"));
        assert!(out.contains("\"required_id,required\""));
        assert!(out.contains("\"plain\" , :: core :: option :: Option :: None"));
        assert!(out.contains("TypeHandle :: of :: < i64 >"));
    }

    #[test]
    fn test_opaque_field_keeps_rules() {
        let out = expand(parse_quote! {
            struct Job {
                #[record("path,required,not_zero", opaque)]
                path: std::path::PathBuf,
                #[record(opaque)]
                started: Instant,
            }
        });
        assert!(out.contains("\"path,required,not_zero\""));
        assert!(out.contains("\"started\" , :: core :: option :: Option :: None"));
        assert_eq!(out.matches("TypeHandle :: opaque ()").count(), 2);
        assert!(!out.contains("PathBuf >"));
    }

    #[test]
    fn test_unreadable_serde_attribute_is_ignored() {
        // `rename = 3` fails to parse after nothing was recorded; the
        // earlier rename stays in effect.
        let out = expand(parse_quote! {
            struct Payload {
                #[serde(rename = "first")]
                #[serde(skip, rename = 3)]
                value: u64,
            }
        });
        assert!(out.contains("\"first\""));
    }

    #[test]
    fn test_skip_omits_field() {
        let out = expand(parse_quote! {
            struct Payload {
                #[record(skip)]
                cache: Vec<u8>,
                #[serde(skip)]
                scratch: u8,
                kept: u8,
            }
        });
        assert!(!out.contains("\"cache\""));
        assert!(!out.contains("\"scratch\""));
        assert!(out.contains("\"kept\""));
    }

    #[test]
    fn test_serde_rename_supplies_name() {
        let out = expand(parse_quote! {
            struct Payload {
                #[serde(rename = "userId", default)]
                user_id: u64,
                #[serde(rename(serialize = "out", deserialize = "in"))]
                #[record(",not_null")]
                value: u64,
                #[serde(rename = "ignored")]
                #[record("explicit,required")]
                other: u64,
            }
        });
        assert!(out.contains("\"userId\""));
        assert!(out.contains("\"in,not_null\""));
        assert!(out.contains("\"explicit,required\""));
        assert!(!out.contains("\"ignored\""));
    }

    #[test]
    fn test_raw_identifiers_unrawed() {
        let out = expand(parse_quote! {
            struct r#Payload {
                r#type: String,
            }
        });
        assert!(out.contains("\"type\""));
        assert!(out.contains("String :: from (\"Payload\")"));
    }

    #[test]
    fn test_generic_params_bounded() {
        let out = expand(parse_quote! {
            struct Wrapper<'a, T> {
                inner: T,
                label: &'a str,
            }
        });
        assert!(out.contains("T : :: jsonrules_schema :: Described"));
        assert!(out.contains("for Wrapper < 'a , T >"));
        assert!(out.contains("< T as :: jsonrules_schema :: Described > :: type_name ()"));
    }

    #[test]
    fn test_plain_record_name_is_literal() {
        let out = expand(parse_quote! { struct Plain { a: u8 } });
        assert!(out.contains("String :: from (\"Plain\")"));
        assert!(!out.contains("format !"));
    }

    #[test]
    fn test_unit_struct_is_empty_record() {
        let out = expand(parse_quote! { struct Marker; });
        assert!(out.contains(":: std :: vec ! []"));
    }

    #[test]
    fn test_rejects_enums_and_tuple_structs() {
        assert!(expand_err(parse_quote! { enum E { A } }).contains("named fields"));
        assert!(expand_err(parse_quote! { struct T(u8); }).contains("tuple structs"));
    }

    #[test]
    fn test_rejects_bad_record_attribute() {
        let err = expand_err(parse_quote! {
            struct P {
                #[record(required)]
                a: u8,
            }
        });
        assert!(err.contains("annotation string"));

        let err = expand_err(parse_quote! {
            struct P {
                #[record("a", hidden)]
                a: u8,
            }
        });
        assert!(err.contains("`opaque`"));

        let err = expand_err(parse_quote! {
            struct P {
                #[record("a")]
                #[record("b")]
                a: u8,
            }
        });
        assert!(err.contains("duplicate"));
    }
}
