//! Codegen for specialisation output unions.

use alloc::vec::Vec;
use proc_macro2::TokenStream;
use quote::quote;

use syn::{Data, DeriveInput, Fields};

pub fn expand(ast: &DeriveInput) -> TokenStream {
    let body = if let Data::Enum(body) = &ast.data {
        body
    } else {
        panic!("#[derive(FrameUnion)] is only defined for enums.");
    };

    let ident = &ast.ident;
    let variants: Vec<_> = body
        .variants
        .iter()
        .map(|variant| {
            let fields = if let Fields::Unnamed(fields) = &variant.fields {
                fields
            } else {
                panic!(
                    "#[derive(FrameUnion)] variant `{}` must hold exactly one unnamed field",
                    variant.ident
                );
            };
            if fields.unnamed.len() != 1 {
                panic!(
                    "#[derive(FrameUnion)] variant `{}` must hold exactly one unnamed field",
                    variant.ident
                );
            }
            (&variant.ident, &fields.unnamed.first().expect("one field; qed").ty)
        })
        .collect();

    let encode_arms = variants.iter().map(|(variant, _)| {
        quote! { Self::#variant(inner) => bitframe::Encodable::encode(inner, out), }
    });
    let render_arms = variants.iter().map(|(variant, _)| {
        quote! { Self::#variant(inner) => bitframe::Describable::describe_into(inner, out, depth), }
    });
    let from_impls = variants.iter().map(|(variant, ty)| {
        quote! {
            impl ::core::convert::From<#ty> for #ident {
                fn from(value: #ty) -> Self {
                    Self::#variant(value)
                }
            }
        }
    });

    quote! {
        const _: () = {
            extern crate bitframe;

            impl bitframe::Encodable for #ident {
                fn encode(
                    &self,
                    out: &mut bitframe::Writer,
                ) -> ::core::result::Result<(), bitframe::Error> {
                    match self {
                        #(#encode_arms)*
                    }
                }
            }

            impl bitframe::Describable for #ident {
                fn describe_into(&self, out: &mut ::std::string::String, depth: usize) {
                    match self {
                        #(#render_arms)*
                    }
                }
            }

            #(#from_impls)*
        };
    }
}
