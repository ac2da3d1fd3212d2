//! RFC 4515 string form of a decoded search filter

use berdissect_utils::ber::{Node, Value};

/// Render a `Filter` node, e.g. `(&(cn=a*b)(!(uid=x)))`
pub fn filter_to_string(filter: &Node<'_>) -> String {
    let mut out = String::new();
    render(filter, &mut out);
    out
}

fn render(node: &Node<'_>, out: &mut String) {
    let node = match &node.value {
        Value::Choice(inner) => &**inner,
        _ => node,
    };
    match node.name {
        "and" | "or" => {
            out.push('(');
            out.push(if node.name == "and" { '&' } else { '|' });
            for child in node.children() {
                render(child, out);
            }
            out.push(')');
        }
        "not" => {
            out.push_str("(!");
            if let Value::Explicit(inner) = &node.value {
                render(inner, out);
            }
            out.push(')');
        }
        "equalityMatch" => assertion(node, "=", out),
        "greaterOrEqual" => assertion(node, ">=", out),
        "lessOrEqual" => assertion(node, "<=", out),
        "approxMatch" => assertion(node, "~=", out),
        "present" => {
            out.push('(');
            out.push_str(node.as_str().unwrap_or_default());
            out.push_str("=*)");
        }
        "substrings" => substrings(node, out),
        "extensibleMatch" => extensible(node, out),
        _ => out.push_str("(?)"),
    }
}

fn text<'n>(node: &'n Node<'_>, name: &str) -> &'n str {
    node.child(name).and_then(|n| n.as_str()).unwrap_or_default()
}

fn assertion(node: &Node<'_>, op: &str, out: &mut String) {
    out.push('(');
    out.push_str(text(node, "attributeDesc"));
    out.push_str(op);
    out.push_str(text(node, "assertionValue"));
    out.push(')');
}

fn substrings(node: &Node<'_>, out: &mut String) {
    out.push('(');
    out.push_str(text(node, "type"));
    out.push('=');
    let parts = node.child("substrings").map(|n| n.children()).unwrap_or_default();
    let mut last = None;
    for part in parts {
        let value = part.as_str().unwrap_or_default();
        match part.name {
            "initial" => out.push_str(value),
            "any" => {
                out.push('*');
                out.push_str(value);
            }
            _ => last = Some(value),
        }
    }
    out.push('*');
    if let Some(value) = last {
        out.push_str(value);
    }
    out.push(')');
}

/// `(type:dn:rule:=value)`
fn extensible(node: &Node<'_>, out: &mut String) {
    out.push('(');
    out.push_str(text(node, "type"));
    if let Some(Value::Bool(true)) = node.child("dnAttributes").map(|n| &n.value) {
        out.push_str(":dn");
    }
    if let Some(rule) = node.child("matchingRule").and_then(|n| n.as_str()) {
        out.push(':');
        out.push_str(rule);
    }
    out.push_str(":=");
    out.push_str(text(node, "matchValue"));
    out.push(')');
}
