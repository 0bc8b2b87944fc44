use std::collections::{HashMap, HashSet};

use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Data, DeriveInput, Error, ExprClosure, Field, Fields, GenericArgument, Ident, LitStr, Pat,
    PathArguments, Result, Token, Type,
    parse::{Parse, ParseStream},
    spanned::Spanned,
};

pub(crate) fn expand_from_record(input: &DeriveInput) -> Result<TokenStream> {
    let Data::Struct(data) = &input.data else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs.",
        ))?
    };

    let Fields::Named(fields) = &data.fields else {
        Err(Error::new(
            input.span(),
            "`FromRecord` may only be derived on structs with named fields.",
        ))?
    };

    let fields = fields
        .named
        .iter()
        .map(FieldMetadata::parse)
        .map(Result::transpose)
        .flatten() // Skip fields without an attribute.
        .collect::<Result<Vec<_>>>()?;

    type Case = (LitStr, Ident, Option<(Type, ExprClosure)>);
    let mut field_methods: HashMap<&'static str, (Type, Vec<Case>)> = HashMap::new();
    let mut seen = HashSet::new();

    for field in fields {
        if !seen.insert(field.identifier.value()) {
            Err(Error::new(
                field.identifier.span(),
                "Field identifiers must be unique.",
            ))?
        }

        field_methods
            .entry(field.method)
            .or_insert_with(|| (field.primitive, Vec::new()))
            .1
            .push((field.identifier, field.name, field.handler));
    }

    let field_methods = field_methods.into_iter().map(|(method, (primitive, cases))| {
        let cases = cases.into_iter().map(|(identifier, name, handler)| {
            let assignment = if let Some((field_type, handler)) = handler {
                let body = handler.body;
                let acc = handler.inputs.iter().nth(0).unwrap();
                let val = handler.inputs.iter().nth(1).unwrap();

                quote! {
                    (|#acc: &mut #field_type, #val| {#body})(&mut self.#name, value)
                }
            } else {
                quote! {
                    self.#name = Some(value)
                }
            };

            quote! { #identifier => { #assignment } }
        });

        let method = format_ident!("{}", method);

        quote! {
            fn #method(&mut self, field: &'static str, value: #primitive) {
                match field {
                    #(#cases)*
                    _ => {}
                };
            }
        }
    });

    let name = &input.ident;

    let expanded = quote! {
        impl FromRecord for #name {
            #(#field_methods)*
        }
    };

    Ok(expanded.into())
}

#[derive(Debug)]
struct FieldMetadata {
    name: Ident,
    primitive: Type,
    method: &'static str,
    identifier: LitStr,
    handler: Option<(Type, ExprClosure)>,
}

impl FieldMetadata {
    fn parse(field: &Field) -> Result<Option<Self>> {
        let name = field.ident.clone().unwrap();

        let Some(attr) = field.attrs.iter().find(|a| a.path().is_ident("field")) else {
            return Ok(None);
        };

        let FieldAttribute {
            identifier,
            handler,
        } = attr.meta.require_list()?.parse_args()?;

        let primitive = if let Some(handler) = &handler {
            let Some(parameter) = handler.inputs.iter().nth(1) else {
                Err(Error::new_spanned(
                    handler,
                    "Handler closure must have two parameters.",
                ))?
            };

            let Pat::Type(pat_type) = parameter else {
                Err(Error::new_spanned(
                    parameter,
                    "Handler closure's second parameter must be annotated with the expected value type.",
                ))?
            };

            (*pat_type.ty).clone()
        } else {
            let Type::Path(path) = &field.ty else {
                Err(Error::new_spanned(
                    &field.ty,
                    "Field must have a type annotation.",
                ))?
            };

            let Some(segment) = path.path.segments.first() else {
                Err(Error::new_spanned(
                    &path.path.segments,
                    "Field must have a type annotation.",
                ))?
            };

            if segment.ident != "Option" {
                Err(Error::new_spanned(
                    &segment.ident,
                    "Field without a handler must have type `Option<T>`.",
                ))?
            }

            let PathArguments::AngleBracketed(arguments) = &segment.arguments else {
                Err(Error::new_spanned(
                    &segment.arguments,
                    "Field of type `Option<T>` must have a generic parameter.",
                ))?
            };

            let Some(argument) = arguments.args.first() else {
                Err(Error::new_spanned(
                    &arguments.args,
                    "Field of type `Option<T>` must have a generic parameter.",
                ))?
            };

            let GenericArgument::Type(inner_type) = argument else {
                Err(Error::new_spanned(
                    argument,
                    "Generic argument of a field of type `Option<T>` must be a type.",
                ))?
            };

            inner_type.clone()
        };

        let method = receiver_method(&primitive)?;
        let handler = handler.map(|h| (field.ty.clone(), h));

        Ok(Some(Self {
            name,
            primitive,
            method,
            identifier,
            handler,
        }))
    }
}

/// Select the `FromRecord` method receiving values of a type.
fn receiver_method(primitive: &Type) -> Result<&'static str> {
    let ident = match primitive {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.to_string()),
        _ => None,
    };

    match ident.as_deref() {
        Some("u64") => Ok("add_unsigned"),
        Some("f64") => Ok("add_duration"),
        Some("NaiveDateTime") => Ok("add_timestamp"),
        _ => Err(Error::new_spanned(
            primitive,
            "Value type must be `u64`, `f64` or `NaiveDateTime`.",
        )),
    }
}

#[derive(Debug)]
struct FieldAttribute {
    identifier: LitStr,
    handler: Option<ExprClosure>,
}

impl Parse for FieldAttribute {
    fn parse(input: ParseStream) -> Result<Self> {
        let identifier = input.parse::<LitStr>()?;

        let handler = if !input.is_empty() {
            input.parse::<Token![,]>()?;
            Some(input.parse::<ExprClosure>()?)
        } else {
            None
        };

        Ok(Self {
            identifier,
            handler,
        })
    }
}
