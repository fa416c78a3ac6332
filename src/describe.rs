//! Human-readable rendering of decoded values.
//!
//! Integers print as hex plus decimal, byte arrays as `0x[..]`, strings
//! quoted; nesting indents two spaces per level and stops at
//! [`MAX_RENDER_DEPTH`].

use std::fmt::Write as _;

use crate::{Describable, Layout};

/// Nesting bound for the rendered tree.
pub const MAX_RENDER_DEPTH: usize = 10;

/// Renders `value` as an indented tree.
pub fn describe<T>(value: &T) -> String
where
    T: Describable,
{
    let mut out = String::new();
    value.describe_into(&mut out, 0);
    out
}

/// Walks the layout in order, one rendered line (or subtree) per field.
pub fn render_fields<T>(value: &T, out: &mut String, depth: usize)
where
    T: Layout,
{
    if depth > MAX_RENDER_DEPTH {
        return;
    }
    for field in T::SPEC.fields {
        (field.render)(value, out, depth);
    }
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

/// `name: 0xHH..H (decimal)`, hex width fixed by the declared integer width.
pub fn uint(out: &mut String, depth: usize, name: &str, value: u64, hex_digits: usize) {
    indent(out, depth);
    let _ = writeln!(out, "{name}: {value:#0width$X} ({value})", width = hex_digits + 2);
}

/// `name: 0x[HH..]`
pub fn bytes(out: &mut String, depth: usize, name: &str, data: &[u8]) {
    indent(out, depth);
    out.push_str(name);
    out.push_str(": 0x[");
    for b in data {
        let _ = write!(out, "{b:02X}");
    }
    out.push_str("]\n");
}

/// `name: "text"`
pub fn text(out: &mut String, depth: usize, name: &str, value: &str) {
    indent(out, depth);
    let _ = writeln!(out, "{name}: {value:?}");
}

/// `name:` followed by the child's fields, one level deeper.
pub fn child<T>(out: &mut String, depth: usize, name: &str, value: &T)
where
    T: Describable,
{
    indent(out, depth);
    out.push_str(name);
    out.push_str(":\n");
    value.describe_into(out, depth + 1);
}

/// `name[i]:` subtrees, one per element.
pub fn children<T>(out: &mut String, depth: usize, name: &str, items: &[T])
where
    T: Describable,
{
    for (index, item) in items.iter().enumerate() {
        indent(out, depth);
        let _ = writeln!(out, "{name}[{index}]:");
        item.describe_into(out, depth + 1);
    }
}
