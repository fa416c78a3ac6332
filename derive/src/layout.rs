//! Assembly of the generated block: the `StructSpec` constant, the render
//! functions, and the trait impls, all wrapped in an anonymous const.

use alloc::{string::ToString, vec::Vec};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::{
    attr::{Directive, Field, Model},
    de, en,
};

pub fn expand(model: &Model) -> TokenStream {
    let read_fns: Vec<_> = model
        .fields
        .iter()
        .map(|field| de::read_fn(model, field))
        .collect();
    let write_fns: Vec<_> = model
        .fields
        .iter()
        .map(|field| en::write_fn(model, field))
        .collect();
    let render_fns: Vec<_> = model
        .fields
        .iter()
        .map(|field| render_fn(model, field))
        .collect();

    let layout = impl_layout(model);
    let encodable = en::impl_encodable(model);
    let decodable = de::impl_decodable(model);
    let describable = impl_describable(model);

    quote! {
        const _: () = {
            extern crate bitframe;

            #(#read_fns)*
            #(#write_fns)*
            #(#render_fns)*

            #layout
            #encodable
            #decodable
            #describable
        };
    }
}

fn impl_layout(model: &Model) -> TokenStream {
    let ident = &model.ident;
    let struct_name = ident.to_string();
    let specialise = match &model.specialise {
        Some(specialise) => {
            let method = specialise.method.to_string();
            quote! { ::core::option::Option::Some(#method) }
        }
        None => quote! { ::core::option::Option::None },
    };
    let fields: Vec<_> = model.fields.iter().map(field_spec).collect();

    quote! {
        impl bitframe::Layout for #ident {
            const SPEC: bitframe::StructSpec<Self> = bitframe::StructSpec {
                name: #struct_name,
                specialise_with: #specialise,
                fields: &[#(#fields),*],
            };
        }
    }
}

fn field_spec(field: &Field) -> TokenStream {
    let name = field.ident.to_string();
    let order = field.order;
    let read = format_ident!("read_{}", field.ident);
    let write = format_ident!("write_{}", field.ident);
    let render = format_ident!("render_{}", field.ident);

    let directive = match &field.directive {
        Directive::UintBe { bytes } => quote! { bitframe::Directive::UintBe { bytes: #bytes } },
        Directive::UintLe { bytes } => quote! { bitframe::Directive::UintLe { bytes: #bytes } },
        Directive::Bits { bits } => quote! { bitframe::Directive::Bits { bits: #bits } },
        Directive::Bytes { len } => quote! { bitframe::Directive::Bytes { len: #len } },
        Directive::Ascii { len } => quote! { bitframe::Directive::Ascii { len: #len } },
        Directive::BytesVar { source } => {
            let source = source.to_string();
            quote! { bitframe::Directive::BytesVar { source: #source } }
        }
        Directive::Terminated { stop } => {
            quote! { bitframe::Directive::Terminated { stop: #stop } }
        }
        Directive::Tail => quote! { bitframe::Directive::Tail },
        Directive::Child { .. } => quote! { bitframe::Directive::Child },
        Directive::Repeat { count, .. } => {
            quote! { bitframe::Directive::Repeat { count: #count } }
        }
        Directive::RepeatVar { source, .. } => {
            let source = source.to_string();
            quote! { bitframe::Directive::RepeatVar { source: #source } }
        }
    };

    let fixed = match &field.fixed {
        Some(bytes) => quote! { ::core::option::Option::Some(&[#(#bytes),*]) },
        None => quote! { ::core::option::Option::None },
    };

    quote! {
        bitframe::FieldSpec {
            name: #name,
            order: #order,
            directive: #directive,
            fixed: #fixed,
            read: #read,
            write: #write,
            render: #render,
        }
    }
}

/// A `fn render_<field>(value, out, depth)` item for one field.
fn render_fn(model: &Model, field: &Field) -> TokenStream {
    let strukt = &model.ident;
    let name = format_ident!("render_{}", field.ident);
    let f = &field.ident;
    let ty = &field.ty;
    let field_name = field.ident.to_string();

    let body = match &field.directive {
        Directive::UintBe { .. } | Directive::UintLe { .. } | Directive::Bits { .. } => quote! {
            bitframe::describe::uint(
                out,
                depth,
                #field_name,
                <#ty as bitframe::WireUint>::to_wire(value.#f),
                <#ty as bitframe::WireUint>::HEX_DIGITS,
            );
        },
        Directive::Bytes { .. }
        | Directive::BytesVar { .. }
        | Directive::Terminated { .. }
        | Directive::Tail => quote! {
            bitframe::describe::bytes(
                out,
                depth,
                #field_name,
                <#ty as bitframe::WireBytes>::as_wire(&value.#f),
            );
        },
        Directive::Ascii { .. } => quote! {
            bitframe::describe::text(out, depth, #field_name, &value.#f);
        },
        Directive::Child { .. } => quote! {
            bitframe::describe::child(out, depth, #field_name, &value.#f);
        },
        Directive::Repeat { .. } | Directive::RepeatVar { .. } => quote! {
            bitframe::describe::children(out, depth, #field_name, &value.#f);
        },
    };

    quote! {
        fn #name(value: &#strukt, out: &mut ::std::string::String, depth: usize) {
            #body
        }
    }
}

fn impl_describable(model: &Model) -> TokenStream {
    let ident = &model.ident;
    quote! {
        impl bitframe::Describable for #ident {
            fn describe_into(&self, out: &mut ::std::string::String, depth: usize) {
                bitframe::describe::render_fields(self, out, depth);
            }
        }
    }
}
