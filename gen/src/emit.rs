//! Rendering a binding declaration into Rust source text.
//!
//! Assembly goes through a token stream that is re-parsed as a `syn::File`
//! before printing, so the emitter can never produce output that does not
//! parse. Printing always goes through `prettyplease`, which makes emission
//! deterministic and formatting idempotent: formatting emitted source again
//! is a no-op.

use std::collections::BTreeSet;

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use serde_json::Value;

use crate::binding::{self, BindingDeclaration, FieldDescriptor};
use crate::errors::GeneratorError;
use crate::mapper::TypeDescriptor;

/// Renders a binding declaration as formatted Rust source.
pub fn emit(declaration: &BindingDeclaration) -> Result<String, GeneratorError> {
    let tokens = assemble(declaration);
    let file: syn::File =
        syn::parse2(tokens).map_err(|e| GeneratorError::InvalidCode(e.to_string()))?;
    Ok(prettyplease::unparse(&file))
}

/// Re-formats existing Rust source text.
///
/// Applied to emitted files this is the identity, which is what makes
/// regeneration diffs trustworthy.
pub fn format_source(source: &str) -> Result<String, GeneratorError> {
    let file = syn::parse_file(source).map_err(|e| GeneratorError::InvalidCode(e.to_string()))?;
    Ok(prettyplease::unparse(&file))
}

fn assemble(declaration: &BindingDeclaration) -> TokenStream {
    let mut assembler = Assembler {
        aux: Vec::new(),
        used_names: BTreeSet::from([
            declaration.name.clone(),
            format!("{}Input", declaration.name),
            format!("{}Output", declaration.name),
        ]),
    };

    let name = format_ident!("{}", declaration.name);
    let input_name = format_ident!("{}Input", declaration.name);
    let marker_docs = doc_attrs(declaration.doc.as_deref());

    let constants = match (&declaration.model_id, &declaration.version_id) {
        (Some(model_id), Some(version_id)) => quote! {
            impl #name {
                /// The `owner/name` identifier of the model this binding was
                /// generated from.
                pub const MODEL_ID: &'static str = #model_id;
                /// The model version the schema was read from.
                pub const VERSION_ID: &'static str = #version_id;
            }

            impl replicate_client::Predictable for #name {
                type Input = #input_name;
                const MODEL_ID: &'static str = #name::MODEL_ID;
                const VERSION_ID: &'static str = #name::VERSION_ID;
            }
        },
        _ => TokenStream::new(),
    };

    let input_fields: Vec<TokenStream> = declaration
        .input
        .iter()
        .map(|field| assembler.field_tokens(&declaration.name, field))
        .collect();

    let default_impl = default_impl(&input_name, &declaration.input);

    let output = declaration.output.as_ref().map(|ty| {
        let output_name = format_ident!("{}Output", declaration.name);
        match ty {
            TypeDescriptor::Record(fields) => {
                let tokens: Vec<TokenStream> = fields
                    .iter()
                    .map(|field| assembler.field_tokens(&output_name.to_string(), field))
                    .collect();
                quote! {
                    #[derive(Debug, Clone, Serialize, Deserialize)]
                    pub struct #output_name {
                        #(#tokens,)*
                    }
                }
            }
            other => {
                let ty_tokens = assembler.type_tokens(other, &declaration.name, "Output");
                quote! {
                    pub type #output_name = #ty_tokens;
                }
            }
        }
    });

    let aux = &assembler.aux;

    quote! {
        use serde::{Deserialize, Serialize};

        #(#marker_docs)*
        pub struct #name;

        #constants

        #[derive(Debug, Clone, Serialize, Deserialize)]
        pub struct #input_name {
            #(#input_fields,)*
        }

        #default_impl

        #(#aux)*

        #output
    }
}

/// Collects auxiliary structs hoisted out of inline object schemas.
struct Assembler {
    aux: Vec<TokenStream>,
    /// Struct names already taken, including the top-level members.
    used_names: BTreeSet<String>,
}

impl Assembler {
    fn field_tokens(&mut self, owner: &str, field: &FieldDescriptor) -> TokenStream {
        let ident = format_ident!("{}", field.identifier);
        let docs = doc_attrs(field.doc.as_deref());

        let pascal = binding::pascal_case(&field.identifier);
        let base = self.type_tokens(&field.ty, owner, &pascal);
        let ty = if field.optional && !field.ty.is_optional() {
            quote!(Option<#base>)
        } else {
            base
        };

        let mut serde_parts = Vec::new();
        if field.identifier != field.source_name {
            let source = &field.source_name;
            serde_parts.push(quote!(rename = #source));
        }
        if field.optional {
            serde_parts.push(quote!(default));
            serde_parts.push(quote!(skip_serializing_if = "Option::is_none"));
        }
        let serde_attr = if serde_parts.is_empty() {
            TokenStream::new()
        } else {
            quote!(#[serde(#(#serde_parts),*)])
        };

        quote! {
            #(#docs)*
            #serde_attr
            pub #ident: #ty
        }
    }

    /// Renders a type, hoisting inline records into named auxiliary structs.
    fn type_tokens(&mut self, ty: &TypeDescriptor, owner: &str, slot: &str) -> TokenStream {
        match ty {
            TypeDescriptor::Bool => quote!(bool),
            TypeDescriptor::Float => quote!(f64),
            TypeDescriptor::Integer => quote!(i64),
            TypeDescriptor::String => quote!(String),
            TypeDescriptor::Placeholder => quote!(serde_json::Value),
            TypeDescriptor::Sequence(element) => {
                let inner = self.type_tokens(element, owner, slot);
                quote!(Vec<#inner>)
            }
            TypeDescriptor::Optional(inner) => {
                let inner = self.type_tokens(inner, owner, slot);
                quote!(Option<#inner>)
            }
            TypeDescriptor::Record(fields) => {
                // Distinct source paths can flatten to the same
                // concatenated name; suffix until unique.
                let base = format!("{owner}{slot}");
                let mut unique = base.clone();
                let mut counter = 2;
                while !self.used_names.insert(unique.clone()) {
                    unique = format!("{base}{counter}");
                    counter += 1;
                }
                let struct_name = format_ident!("{unique}");
                let tokens: Vec<TokenStream> = fields
                    .iter()
                    .map(|field| self.field_tokens(&struct_name.to_string(), field))
                    .collect();
                self.aux.push(quote! {
                    #[derive(Debug, Clone, Serialize, Deserialize)]
                    pub struct #struct_name {
                        #(#tokens,)*
                    }
                });
                quote!(#struct_name)
            }
        }
    }
}

/// Hand-written `Default` when any field declares a schema default; derived
/// defaults would zero those out.
fn default_impl(input_name: &syn::Ident, fields: &[FieldDescriptor]) -> TokenStream {
    if fields.iter().all(|field| field.default.is_none()) {
        return TokenStream::new();
    }

    let assignments: Vec<TokenStream> = fields
        .iter()
        .map(|field| {
            let ident = format_ident!("{}", field.identifier);
            let value = match &field.default {
                Some(literal) => {
                    let expr = literal_expr(literal, &field.ty);
                    if field.ty.is_optional() || (field.optional && !field.ty.is_optional()) {
                        if literal.is_null() {
                            quote!(None)
                        } else {
                            quote!(Some(#expr))
                        }
                    } else {
                        expr
                    }
                }
                None => {
                    if field.ty.is_optional() || field.optional {
                        quote!(None)
                    } else {
                        quote!(Default::default())
                    }
                }
            };
            quote!(#ident: #value)
        })
        .collect();

    quote! {
        impl Default for #input_name {
            fn default() -> Self {
                Self {
                    #(#assignments,)*
                }
            }
        }
    }
}

fn literal_expr(literal: &Value, ty: &TypeDescriptor) -> TokenStream {
    let element_ty = match ty {
        TypeDescriptor::Optional(inner) => inner.as_ref(),
        other => other,
    };

    match (literal, element_ty) {
        (Value::Bool(b), _) => {
            let lit = syn::LitBool::new(*b, proc_macro2::Span::call_site());
            quote!(#lit)
        }
        (Value::Number(n), TypeDescriptor::Integer) => {
            let lit = proc_macro2::Literal::i64_unsuffixed(n.as_i64().unwrap_or_default());
            quote!(#lit)
        }
        (Value::Number(n), _) => {
            let lit = proc_macro2::Literal::f64_unsuffixed(n.as_f64().unwrap_or_default());
            quote!(#lit)
        }
        (Value::String(s), _) => quote!(#s.to_string()),
        (Value::Array(items), TypeDescriptor::Sequence(element)) => {
            let exprs: Vec<TokenStream> =
                items.iter().map(|item| literal_expr(item, element)).collect();
            quote!(vec![#(#exprs),*])
        }
        // literal_matches has already filtered everything else out.
        _ => quote!(Default::default()),
    }
}

/// Splits doc text into one `#[doc]` attribute per line.
fn doc_attrs(doc: Option<&str>) -> Vec<TokenStream> {
    let Some(doc) = doc else {
        return Vec::new();
    };

    doc.lines()
        .map(|line| {
            let text = if line.is_empty() {
                String::new()
            } else {
                format!(" {line}")
            };
            quote!(#[doc = #text])
        })
        .collect()
}
