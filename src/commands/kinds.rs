//! `schoolcode kinds` command.

use std::fmt::Write;

use crate::code::EntityKind;

/// Lists every kind with its length, scope, shape, and required attributes.
#[must_use]
pub fn run() -> String {
    let mut out = String::new();
    for kind in EntityKind::ALL {
        let template = kind.template();
        let scope = if kind.is_tenant_scoped() { "tenant" } else { "global" };
        let _ = writeln!(
            out,
            "{:<13} {:>2}  {scope:<6}  {}",
            kind.as_str(),
            template.code_len(),
            template.shape()
        );
        let required = template.required_attributes();
        if !required.is_empty() {
            let _ = writeln!(out, "{:24}requires: {}", "", required.join(", "));
        }
    }
    out
}
