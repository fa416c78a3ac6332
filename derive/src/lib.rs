//! Derive macros for `#[derive(Frame)]` and `#[derive(FrameUnion)]`.

#![no_std]

extern crate alloc;
extern crate proc_macro;

mod attr;
mod de;
mod en;
mod layout;
mod union;

use proc_macro::TokenStream;

/// Layout-annotated struct: validates the `#[frame(...)]` annotations and
/// generates `Layout`, `Encodable`, `Decodable` and `Describable`.
#[proc_macro_derive(Frame, attributes(frame))]
pub fn frame(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();
    let model = attr::parse(&ast);
    let gen = layout::expand(&model);
    gen.into()
}

/// Specialisation output union: delegating `Encodable` and `Describable`
/// impls plus a `From` conversion for every single-field variant.
#[proc_macro_derive(FrameUnion)]
pub fn frame_union(input: TokenStream) -> TokenStream {
    let ast = syn::parse(input).unwrap();
    let gen = union::expand(&ast);
    gen.into()
}
