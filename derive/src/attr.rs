//! Parsing and validation of `#[frame(...)]` annotations.
//!
//! Layout problems are reported here, at macro expansion: duplicate or
//! missing order, missing or conflicting directives, fixed-value length
//! mismatches, partial-bit runs that do not fill whole bytes, and a tail
//! that is not the final field.

use alloc::{string::ToString, vec::Vec};

use syn::{Data, DeriveInput, Fields, Ident, Type};

pub struct Model {
    pub ident: Ident,
    pub specialise: Option<Specialise>,
    /// Ascending by order.
    pub fields: Vec<Field>,
}

pub struct Specialise {
    pub method: Ident,
    pub output: Type,
}

pub struct Field {
    pub ident: Ident,
    pub ty: Type,
    pub order: u32,
    pub directive: Directive,
    pub fixed: Option<Vec<u8>>,
}

pub enum Directive {
    UintBe { bytes: usize },
    UintLe { bytes: usize },
    Bits { bits: usize },
    Bytes { len: usize },
    Ascii { len: usize },
    BytesVar { source: Ident },
    Terminated { stop: u8 },
    Tail,
    Child { base: Option<Type> },
    Repeat { count: usize, base: Option<Type> },
    RepeatVar { source: Ident, base: Option<Type> },
}

#[derive(Default)]
struct RawField {
    order: Option<u32>,
    be: Option<usize>,
    le: Option<usize>,
    bits: Option<usize>,
    bytes: Option<usize>,
    ascii: Option<usize>,
    bytes_with: Option<Ident>,
    until: Option<u8>,
    tail: bool,
    child: bool,
    child_ty: Option<Type>,
    repeat: Option<usize>,
    repeat_with: Option<Ident>,
    fixed: Option<Vec<u8>>,
}

pub fn parse(ast: &DeriveInput) -> Model {
    if !ast.generics.params.is_empty() {
        panic!("#[derive(Frame)] does not support generic structs.");
    }

    let body = if let Data::Struct(s) = &ast.data {
        s
    } else {
        panic!("#[derive(Frame)] is only defined for structs.");
    };

    let named = if let Fields::Named(named) = &body.fields {
        named
    } else {
        panic!("#[derive(Frame)] is only defined for structs with named fields.");
    };

    let specialise = parse_struct_attrs(ast);

    let mut fields: Vec<Field> = named
        .named
        .iter()
        .map(|field| {
            let ident = field.ident.clone().expect("named field; qed");
            let raw = parse_field_attrs(field, &ident);
            assemble(ident, field.ty.clone(), raw)
        })
        .collect();

    fields.sort_by_key(|field| field.order);
    validate(&ast.ident, &fields);

    Model {
        ident: ast.ident.clone(),
        specialise,
        fields,
    }
}

fn parse_struct_attrs(ast: &DeriveInput) -> Option<Specialise> {
    let mut method: Option<Ident> = None;
    let mut output: Option<Type> = None;

    for attr in &ast.attrs {
        if !attr.path().is_ident("frame") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("specialise_with") {
                let lit: syn::LitStr = meta.value()?.parse()?;
                method = Some(Ident::new(&lit.value(), lit.span()));
            } else if meta.path.is_ident("output") {
                output = Some(meta.value()?.parse()?);
            } else {
                panic!(
                    "unknown struct-level frame key `{}`",
                    path_name(&meta.path)
                );
            }
            Ok(())
        })
        .unwrap();
    }

    match (method, output) {
        (Some(method), Some(output)) => Some(Specialise { method, output }),
        (None, None) => None,
        _ => panic!("`specialise_with` and `output` must be declared together."),
    }
}

fn parse_field_attrs(field: &syn::Field, ident: &Ident) -> RawField {
    let mut raw = RawField::default();
    let mut annotated = false;

    for attr in &field.attrs {
        if !attr.path().is_ident("frame") {
            continue;
        }
        annotated = true;
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("order") {
                raw.order = Some(int(&meta)?);
            } else if meta.path.is_ident("be") {
                raw.be = Some(int(&meta)?);
            } else if meta.path.is_ident("le") {
                raw.le = Some(int(&meta)?);
            } else if meta.path.is_ident("bits") {
                raw.bits = Some(int(&meta)?);
            } else if meta.path.is_ident("bytes") {
                raw.bytes = Some(int(&meta)?);
            } else if meta.path.is_ident("ascii") {
                raw.ascii = Some(int(&meta)?);
            } else if meta.path.is_ident("bytes_with") {
                raw.bytes_with = Some(callback(&meta)?);
            } else if meta.path.is_ident("until") {
                raw.until = Some(int(&meta)?);
            } else if meta.path.is_ident("tail") {
                raw.tail = true;
            } else if meta.path.is_ident("child") {
                if meta.input.peek(syn::Token![=]) {
                    raw.child_ty = Some(meta.value()?.parse()?);
                } else {
                    raw.child = true;
                }
            } else if meta.path.is_ident("repeat") {
                raw.repeat = Some(int(&meta)?);
            } else if meta.path.is_ident("repeat_with") {
                raw.repeat_with = Some(callback(&meta)?);
            } else if meta.path.is_ident("fixed") {
                raw.fixed = Some(byte_list(&meta)?);
            } else {
                panic!(
                    "unknown frame key `{}` on field `{ident}`",
                    path_name(&meta.path)
                );
            }
            Ok(())
        })
        .unwrap();
    }

    if !annotated {
        panic!("field `{ident}` has no #[frame(...)] directive");
    }
    raw
}

fn int<T>(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<T>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    meta.value()?.parse::<syn::LitInt>()?.base10_parse()
}

fn callback(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Ident> {
    let lit: syn::LitStr = meta.value()?.parse()?;
    Ok(Ident::new(&lit.value(), lit.span()))
}

fn byte_list(meta: &syn::meta::ParseNestedMeta<'_>) -> syn::Result<Vec<u8>> {
    let array: syn::ExprArray = meta.value()?.parse()?;
    Ok(array
        .elems
        .iter()
        .map(|elem| {
            if let syn::Expr::Lit(syn::ExprLit {
                lit: syn::Lit::Int(lit),
                ..
            }) = elem
            {
                lit.base10_parse().unwrap()
            } else {
                panic!("`fixed` expects an array of byte literals");
            }
        })
        .collect())
}

fn path_name(path: &syn::Path) -> alloc::string::String {
    path.segments
        .last()
        .map(|segment| segment.ident.to_string())
        .unwrap_or_default()
}

fn assemble(ident: Ident, ty: Type, raw: RawField) -> Field {
    let order = raw
        .order
        .unwrap_or_else(|| panic!("field `{ident}` is missing `order`"));

    let mut keys = 0;
    for set in [
        raw.be.is_some(),
        raw.le.is_some(),
        raw.bits.is_some(),
        raw.bytes.is_some(),
        raw.ascii.is_some(),
        raw.bytes_with.is_some(),
        raw.until.is_some(),
        raw.tail,
        raw.repeat.is_some(),
        raw.repeat_with.is_some(),
        // `child = T` also names the element type of a repeater
        (raw.child || raw.child_ty.is_some())
            && raw.repeat.is_none()
            && raw.repeat_with.is_none(),
    ] {
        keys += usize::from(set);
    }
    if keys != 1 {
        panic!("field `{ident}` needs exactly one directive, found {keys}");
    }

    let directive = if let Some(bytes) = raw.be {
        range_check(&ident, bytes, 1..=8, "be");
        Directive::UintBe { bytes }
    } else if let Some(bytes) = raw.le {
        range_check(&ident, bytes, 1..=8, "le");
        Directive::UintLe { bytes }
    } else if let Some(bits) = raw.bits {
        range_check(&ident, bits, 1..=64, "bits");
        Directive::Bits { bits }
    } else if let Some(len) = raw.bytes {
        if len == 0 {
            panic!("field `{ident}`: `bytes` must be at least 1");
        }
        Directive::Bytes { len }
    } else if let Some(len) = raw.ascii {
        if len == 0 {
            panic!("field `{ident}`: `ascii` must be at least 1");
        }
        Directive::Ascii { len }
    } else if let Some(source) = raw.bytes_with {
        Directive::BytesVar { source }
    } else if let Some(stop) = raw.until {
        Directive::Terminated { stop }
    } else if raw.tail {
        Directive::Tail
    } else if let Some(count) = raw.repeat {
        Directive::Repeat {
            count,
            base: raw.child_ty,
        }
    } else if let Some(source) = raw.repeat_with {
        Directive::RepeatVar {
            source,
            base: raw.child_ty,
        }
    } else {
        Directive::Child { base: raw.child_ty }
    };

    if let Some(fixed) = &raw.fixed {
        let declared = match &directive {
            Directive::UintBe { bytes } | Directive::UintLe { bytes } => *bytes,
            Directive::Bytes { len } => *len,
            _ => panic!("field `{ident}`: `fixed` applies only to `be`, `le` and `bytes`"),
        };
        if fixed.len() != declared {
            panic!(
                "field `{ident}`: fixed value is {} bytes but the directive declares {declared}",
                fixed.len()
            );
        }
    }

    Field {
        ident,
        ty,
        order,
        directive,
        fixed: raw.fixed,
    }
}

fn range_check(
    ident: &Ident,
    value: usize,
    range: core::ops::RangeInclusive<usize>,
    key: &str,
) {
    if !range.contains(&value) {
        panic!(
            "field `{ident}`: `{key} = {value}` is outside {}..={}",
            range.start(),
            range.end()
        );
    }
}

fn validate(struct_ident: &Ident, fields: &[Field]) {
    for pair in fields.windows(2) {
        if pair[0].order == pair[1].order {
            panic!(
                "{struct_ident}: fields `{}` and `{}` share order {}",
                pair[0].ident, pair[1].ident, pair[0].order
            );
        }
    }

    // runs of partial bits must fill whole bytes before anything byte-aligned
    let mut run_bits = 0usize;
    for field in fields {
        if let Directive::Bits { bits } = field.directive {
            run_bits += bits;
        } else if run_bits % 8 != 0 {
            panic!(
                "{struct_ident}: partial-bit run before `{}` covers {run_bits} bits; runs must fill whole bytes",
                field.ident
            );
        } else {
            run_bits = 0;
        }
    }
    if run_bits % 8 != 0 {
        panic!("{struct_ident}: trailing partial-bit run covers {run_bits} bits; runs must fill whole bytes");
    }

    for (index, field) in fields.iter().enumerate() {
        if matches!(field.directive, Directive::Tail) && index + 1 != fields.len() {
            panic!(
                "{struct_ident}: `tail` field `{}` must be the highest-ordered field",
                field.ident
            );
        }
    }
}

/// Element type of a `Vec<T>` field, for repeaters without a `child = T`
/// override.
pub fn vec_elem(ident: &Ident, ty: &Type) -> Type {
    if let Type::Path(path) = ty {
        if let Some(segment) = path.path.segments.last() {
            if segment.ident == "Vec" {
                if let syn::PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(syn::GenericArgument::Type(inner)) = args.args.first() {
                        return inner.clone();
                    }
                }
            }
        }
    }
    panic!("repeater field `{ident}` must be a Vec<_> or name its element with `child = ...`");
}
