//! Encode codegen: per-field write functions and the `Encodable` impl.

use alloc::string::ToString;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::attr::{Directive, Field, Model};

/// A `fn write_<field>(value, out)` item for one field, in layout order.
pub fn write_fn(model: &Model, field: &Field) -> TokenStream {
    let strukt = &model.ident;
    let name = format_ident!("write_{}", field.ident);
    let f = &field.ident;
    let ty = &field.ty;
    let field_name = field.ident.to_string();

    let body = match (&field.directive, &field.fixed) {
        // fixed values substitute the in-memory value: declared order for
        // big-endian and raw bytes, reversed for little-endian
        (Directive::UintBe { .. } | Directive::Bytes { .. }, Some(fixed)) => quote! {
            bitframe::en::write_fixed(out, &[#(#fixed),*]);
            ::core::result::Result::Ok(())
        },
        (Directive::UintLe { .. }, Some(fixed)) => quote! {
            bitframe::en::write_fixed_le(out, &[#(#fixed),*]);
            ::core::result::Result::Ok(())
        },
        (Directive::UintBe { bytes }, None) => quote! {
            out.write_uint_be(<#ty as bitframe::WireUint>::to_wire(value.#f), #bytes);
            ::core::result::Result::Ok(())
        },
        (Directive::UintLe { bytes }, None) => quote! {
            out.write_uint_le(<#ty as bitframe::WireUint>::to_wire(value.#f), #bytes);
            ::core::result::Result::Ok(())
        },
        (Directive::Bits { bits }, _) => quote! {
            out.write_bits(<#ty as bitframe::WireUint>::to_wire(value.#f), #bits);
            ::core::result::Result::Ok(())
        },
        (Directive::Bytes { len }, None) => quote! {
            bitframe::en::write_padded(
                out,
                <#ty as bitframe::WireBytes>::as_wire(&value.#f),
                #len,
            );
            ::core::result::Result::Ok(())
        },
        (Directive::Ascii { len }, _) => quote! {
            bitframe::en::write_ascii(out, &value.#f, #len);
            ::core::result::Result::Ok(())
        },
        (Directive::BytesVar { source }, _) => quote! {
            bitframe::en::write_var(
                out,
                #field_name,
                <#ty as bitframe::WireBytes>::as_wire(&value.#f),
                value.#source(),
            )
        },
        (Directive::Terminated { stop }, _) => quote! {
            bitframe::en::write_terminated(
                out,
                <#ty as bitframe::WireBytes>::as_wire(&value.#f),
                #stop,
            );
            ::core::result::Result::Ok(())
        },
        (Directive::Tail, _) => quote! {
            bitframe::en::write_tail(out, <#ty as bitframe::WireBytes>::as_wire(&value.#f));
            ::core::result::Result::Ok(())
        },
        (Directive::Child { .. }, _) => quote! {
            bitframe::Encodable::encode(&value.#f, out)
        },
        (Directive::Repeat { count, .. }, _) => quote! {
            bitframe::en::write_children(out, #field_name, &value.#f, #count)
        },
        (Directive::RepeatVar { source, .. }, _) => quote! {
            bitframe::en::write_children(out, #field_name, &value.#f, value.#source())
        },
    };

    quote! {
        fn #name(
            value: &#strukt,
            out: &mut bitframe::Writer,
        ) -> ::core::result::Result<(), bitframe::Error> {
            #body
        }
    }
}

pub fn impl_encodable(model: &Model) -> TokenStream {
    let ident = &model.ident;
    quote! {
        impl bitframe::Encodable for #ident {
            fn encode(
                &self,
                out: &mut bitframe::Writer,
            ) -> ::core::result::Result<(), bitframe::Error> {
                bitframe::en::encode_fields(self, out)
            }
        }
    }
}
