//! Rendering host types as TypeScript
use crate::graphql::ir::Type;

fn with_null(rendered: String, nullable: bool) -> String {
    if nullable {
        format!("{rendered} | null")
    } else {
        rendered
    }
}

/// Renders a host type at the given indent depth. `optional_fields` turns a
/// nullable object field into `name?: T | null`; it is set for variables
/// objects and input object bodies only.
pub fn render(host_type: &Type, indent: usize, optional_fields: bool) -> String {
    match host_type {
        Type::Named { name, nullable } => with_null(name.clone(), *nullable),
        Type::Array { element, nullable } => with_null(
            format!("Array<{}>", render(element, indent, optional_fields)),
            *nullable,
        ),
        Type::Object { fields, nullable } => {
            if fields.is_empty() {
                return with_null("{}".to_string(), *nullable);
            }
            let field_indent = "  ".repeat(indent + 1);
            let mut lines = Vec::with_capacity(fields.len());
            for (name, field_type) in fields {
                let marker = if optional_fields && is_nullable(field_type) {
                    "?"
                } else {
                    ""
                };
                lines.push(format!(
                    "{field_indent}{name}{marker}: {};",
                    render(field_type, indent + 1, optional_fields)
                ));
            }
            let closing_indent = "  ".repeat(indent);
            with_null(
                format!("{{\n{}\n{closing_indent}}}", lines.join("\n")),
                *nullable,
            )
        }
        Type::Intersection { members, nullable } => {
            let joined = members
                .iter()
                .map(|member| render(member, indent, optional_fields))
                .collect::<Vec<_>>()
                .join(" & ");
            if *nullable {
                format!("({joined}) | null")
            } else {
                joined
            }
        }
    }
}

fn is_nullable(host_type: &Type) -> bool {
    match host_type {
        Type::Named { nullable, .. }
        | Type::Object { nullable, .. }
        | Type::Array { nullable, .. }
        | Type::Intersection { nullable, .. } => *nullable,
    }
}

/// Declaration head rule: literal object bodies declare an interface,
/// anything else declares a type alias.
pub fn declaration(name: &str, host_type: &Type, optional_fields: bool) -> String {
    let rendered = render(host_type, 0, optional_fields);
    if rendered.starts_with('{') {
        format!("export interface {name} {rendered}")
    } else {
        format!("export type {name} = {rendered};")
    }
}
