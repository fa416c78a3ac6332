//! Decode codegen: per-field read functions and the `Decodable` impl.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::attr::{vec_elem, Directive, Field, Model};

/// A `fn read_<field>(value, input)` item for one field, in layout order.
pub fn read_fn(model: &Model, field: &Field) -> TokenStream {
    let strukt = &model.ident;
    let name = format_ident!("read_{}", field.ident);
    let f = &field.ident;
    let ty = &field.ty;

    let body = match &field.directive {
        Directive::UintBe { bytes } => quote! {
            value.#f = <#ty as bitframe::WireUint>::from_wire(
                bitframe::de::read_uint_be(input, #bytes),
            );
        },
        Directive::UintLe { bytes } => quote! {
            value.#f = <#ty as bitframe::WireUint>::from_wire(
                bitframe::de::read_uint_le(input, #bytes),
            );
        },
        Directive::Bits { bits } => quote! {
            value.#f = <#ty as bitframe::WireUint>::from_wire(
                bitframe::de::read_bits(input, #bits),
            );
        },
        Directive::Bytes { len } => quote! {
            value.#f = <#ty as bitframe::WireBytes>::from_wire(
                bitframe::de::read_bytes(input, #len),
            )?;
        },
        Directive::Ascii { len } => quote! {
            value.#f = bitframe::de::read_ascii(input, #len);
        },
        Directive::BytesVar { source } => quote! {
            let declared = value.#source();
            value.#f = <#ty as bitframe::WireBytes>::from_wire(
                bitframe::de::read_bytes_var(input, declared),
            )?;
        },
        Directive::Terminated { stop } => quote! {
            value.#f = <#ty as bitframe::WireBytes>::from_wire(
                bitframe::de::read_terminated(input, #stop),
            )?;
        },
        Directive::Tail => quote! {
            value.#f = <#ty as bitframe::WireBytes>::from_wire(
                bitframe::de::read_tail(input),
            )?;
        },
        Directive::Child { base } => {
            let base = base.clone().unwrap_or_else(|| ty.clone());
            quote! {
                value.#f = <#base as bitframe::Decodable>::decode(input)?;
            }
        }
        Directive::Repeat { count, base } => {
            let elem = base
                .clone()
                .unwrap_or_else(|| vec_elem(&field.ident, ty));
            quote! {
                value.#f = bitframe::de::read_children::<#elem>(input, #count)?;
            }
        }
        Directive::RepeatVar { source, base } => {
            let elem = base
                .clone()
                .unwrap_or_else(|| vec_elem(&field.ident, ty));
            quote! {
                let declared = value.#source();
                value.#f = bitframe::de::read_children::<#elem>(input, declared)?;
            }
        }
    };

    quote! {
        fn #name(
            value: &mut #strukt,
            input: &mut bitframe::Reader<'_>,
        ) -> ::core::result::Result<(), bitframe::Error> {
            #body
            ::core::result::Result::Ok(())
        }
    }
}

pub fn impl_decodable(model: &Model) -> TokenStream {
    let ident = &model.ident;

    if let Some(specialise) = &model.specialise {
        let method = &specialise.method;
        let output = &specialise.output;
        quote! {
            impl bitframe::Decodable for #ident {
                type Output = #output;

                fn decode(
                    input: &mut bitframe::Reader<'_>,
                ) -> ::core::result::Result<Self::Output, bitframe::Error> {
                    let mark = input.position();
                    let base: #ident = bitframe::de::decode_fields(input)?;
                    match base.#method() {
                        ::core::option::Option::Some(chosen) => {
                            bitframe::de::redecode(input, mark, chosen)
                        }
                        ::core::option::Option::None => ::core::result::Result::Ok(
                            <#output as ::core::convert::From<#ident>>::from(base),
                        ),
                    }
                }
            }
        }
    } else {
        quote! {
            impl bitframe::Decodable for #ident {
                type Output = #ident;

                fn decode(
                    input: &mut bitframe::Reader<'_>,
                ) -> ::core::result::Result<Self::Output, bitframe::Error> {
                    bitframe::de::decode_fields(input)
                }
            }
        }
    }
}
