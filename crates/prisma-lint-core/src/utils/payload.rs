//! Inspection of Prisma write payloads (`data`, `create`, `update`).

use crate::ast::{CallExpr, Expr, ObjectExpr, Property, Span};

/// How a payload treats a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldState {
    /// The field is not written (missing or `undefined`).
    Absent,
    /// The field is explicitly set to `null`.
    Null,
    /// The field is set to some other value.
    Set,
}

impl FieldState {
    /// Returns true if the payload writes the field at all.
    #[must_use]
    pub fn is_present(self) -> bool {
        self != Self::Absent
    }
}

/// An inspectable write payload.
#[derive(Debug, Clone)]
pub enum Payload<'ast> {
    /// `data: { ... }`
    Single(&'ast ObjectExpr),
    /// `data: [{ ... }, { ... }]`; non-literal elements are skipped.
    Bulk {
        /// Object literal elements.
        objects: Vec<&'ast ObjectExpr>,
        /// Range of the array literal.
        span: Span,
    },
}

impl<'ast> Payload<'ast> {
    /// Object literals making up this payload.
    #[must_use]
    pub fn objects(&self) -> &[&'ast ObjectExpr] {
        match self {
            Self::Single(object) => std::slice::from_ref(object),
            Self::Bulk { objects, .. } => objects,
        }
    }

    /// Source range of the payload literal.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Single(object) => object.span,
            Self::Bulk { span, .. } => *span,
        }
    }

    /// Combined state of `field` across all objects: `Set` wins over `Null`,
    /// which wins over `Absent`.
    #[must_use]
    pub fn field_state(&self, field: &str) -> FieldState {
        self.objects()
            .iter()
            .map(|object| field_state(object, field))
            .fold(FieldState::Absent, |acc, state| match (acc, state) {
                (FieldState::Set, _) | (_, FieldState::Set) => FieldState::Set,
                (FieldState::Null, _) | (_, FieldState::Null) => FieldState::Null,
                _ => FieldState::Absent,
            })
    }

    /// Span of the first property writing `field`.
    #[must_use]
    pub fn field_span(&self, field: &str) -> Option<Span> {
        self.objects().iter().find_map(|object| {
            object
                .props
                .iter()
                .find(|prop| prop.key_name().is_some_and(|key| matches_field(key, field)))
                .map(Property::span)
        })
    }
}

/// Extracts the payload under `key` of the call's options object.
///
/// Returns `None` when there is no options object literal or the payload is
/// not an object/array literal (e.g. `data: dto`).
#[must_use]
pub fn write_payload<'ast>(call: &'ast CallExpr, key: &str) -> Option<Payload<'ast>> {
    match call.object_arg()?.get(key)? {
        Expr::Object(object) => Some(Payload::Single(object)),
        Expr::Array(array) => Some(Payload::Bulk {
            objects: array.elements.iter().filter_map(Expr::as_object).collect(),
            span: array.span,
        }),
        _ => None,
    }
}

/// State of `field` in a single object literal.
///
/// Both the configured spelling and its `snake_case` form are recognised.
/// Spread elements are opaque and never count.
#[must_use]
pub fn field_state(object: &ObjectExpr, field: &str) -> FieldState {
    let prop = object
        .props
        .iter()
        .rev()
        .find(|prop| prop.key_name().is_some_and(|key| matches_field(key, field)));

    match prop {
        None => FieldState::Absent,
        Some(Property::KeyValue { value, .. }) if value.is_undefined() => FieldState::Absent,
        Some(Property::KeyValue { value, .. }) if value.is_null() => FieldState::Null,
        Some(Property::Shorthand(ident)) if ident.name == "undefined" => FieldState::Absent,
        Some(_) => FieldState::Set,
    }
}

fn matches_field(key: &str, field: &str) -> bool {
    key == field || key == to_snake_case(field)
}

fn to_snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if !out.is_empty() {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ArrayExpr, Ident, Literal, LiteralKind, PropKey};

    fn lit(kind: LiteralKind) -> Expr {
        Expr::Literal(Literal {
            kind,
            span: Span::default(),
        })
    }

    fn prop(key: &str, value: Expr) -> Property {
        Property::KeyValue {
            key: PropKey::Ident(key.into()),
            value,
            span: Span::new(0, key.len(), 1, 1),
        }
    }

    fn object(props: Vec<Property>) -> ObjectExpr {
        ObjectExpr {
            props,
            span: Span::default(),
        }
    }

    fn call_with(key: &str, payload: Expr) -> CallExpr {
        CallExpr {
            callee: Expr::Ident(Ident::new("f", Span::default())),
            args: vec![Expr::Object(object(vec![prop(key, payload)]))],
            optional: false,
            span: Span::default(),
        }
    }

    #[test]
    fn snake_case_conversion() {
        assert_eq!(to_snake_case("deletedAt"), "deleted_at");
        assert_eq!(to_snake_case("suspendedAt"), "suspended_at");
        assert_eq!(to_snake_case("status"), "status");
    }

    #[test]
    fn classifies_field_states() {
        let o = object(vec![
            prop("deletedAt", lit(LiteralKind::Null)),
            prop("suspended_at", Expr::Ident(Ident::new("now", Span::default()))),
            prop("archivedAt", lit(LiteralKind::Undefined)),
        ]);
        assert_eq!(field_state(&o, "deletedAt"), FieldState::Null);
        assert_eq!(field_state(&o, "suspendedAt"), FieldState::Set);
        assert_eq!(field_state(&o, "archivedAt"), FieldState::Absent);
        assert_eq!(field_state(&o, "status"), FieldState::Absent);
    }

    #[test]
    fn shorthand_is_set() {
        let o = object(vec![Property::Shorthand(Ident::new("deletedAt", Span::default()))]);
        assert_eq!(field_state(&o, "deletedAt"), FieldState::Set);
    }

    #[test]
    fn object_payload_is_single() {
        let c = call_with("data", Expr::Object(object(vec![prop("name", lit(LiteralKind::Null))])));
        let payload = write_payload(&c, "data").unwrap();
        assert_eq!(payload.objects().len(), 1);
        assert!(write_payload(&c, "create").is_none());
    }

    #[test]
    fn array_payload_is_bulk_and_aggregates() {
        let array = Expr::Array(ArrayExpr {
            elements: vec![
                Expr::Object(object(vec![prop("name", lit(LiteralKind::String("a".into())))])),
                Expr::Ident(Ident::new("row", Span::default())),
                Expr::Object(object(vec![prop("deletedAt", lit(LiteralKind::Null))])),
            ],
            span: Span::default(),
        });
        let c = call_with("data", array);
        let payload = write_payload(&c, "data").unwrap();
        assert_eq!(payload.objects().len(), 2);
        assert_eq!(payload.field_state("deletedAt"), FieldState::Null);
        assert!(payload.field_span("deletedAt").is_some());
        assert!(payload.field_span("status").is_none());
    }

    #[test]
    fn opaque_payload_is_none() {
        let c = call_with("data", Expr::Ident(Ident::new("dto", Span::default())));
        assert!(write_payload(&c, "data").is_none());
    }
}
