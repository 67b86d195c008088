//! Syntax tree traversal.
//!
//! Mirrors `syn::visit`: every trait method defaults to the free function of
//! the same name, which walks the node's children. Override a method to
//! intercept a node kind and call the free function to keep descending.
//!
//! ```ignore
//! struct CallCounter(usize);
//!
//! impl<'ast> Visit<'ast> for CallCounter {
//!     fn visit_call(&mut self, node: &'ast CallExpr) {
//!         self.0 += 1;
//!         visit::visit_call(self, node);
//!     }
//! }
//! ```

use super::{
    ArrayExpr, CallExpr, Class, Expr, Function, Ident, Literal, MemberExpr, MemberProp,
    ObjectExpr, Program, Property, PropKey,
};

/// Syntax tree visitor.
pub trait Visit<'ast> {
    /// Visits a whole program.
    fn visit_program(&mut self, node: &'ast Program) {
        visit_program(self, node);
    }

    /// Visits any expression node.
    fn visit_expr(&mut self, node: &'ast Expr) {
        visit_expr(self, node);
    }

    /// Visits a call expression.
    fn visit_call(&mut self, node: &'ast CallExpr) {
        visit_call(self, node);
    }

    /// Visits a member expression.
    fn visit_member(&mut self, node: &'ast MemberExpr) {
        visit_member(self, node);
    }

    /// Visits an object literal.
    fn visit_object(&mut self, node: &'ast ObjectExpr) {
        visit_object(self, node);
    }

    /// Visits an array literal.
    fn visit_array(&mut self, node: &'ast ArrayExpr) {
        visit_array(self, node);
    }

    /// Visits a function-like node.
    fn visit_function(&mut self, node: &'ast Function) {
        visit_function(self, node);
    }

    /// Visits a class.
    fn visit_class(&mut self, node: &'ast Class) {
        visit_class(self, node);
    }

    /// Visits an identifier.
    fn visit_ident(&mut self, _node: &'ast Ident) {}

    /// Visits a literal.
    fn visit_literal(&mut self, _node: &'ast Literal) {}
}

/// Walks every top-level item.
pub fn visit_program<'ast, V>(v: &mut V, node: &'ast Program)
where
    V: Visit<'ast> + ?Sized,
{
    for item in &node.items {
        v.visit_expr(item);
    }
}

/// Dispatches to the variant-specific visit method.
pub fn visit_expr<'ast, V>(v: &mut V, node: &'ast Expr)
where
    V: Visit<'ast> + ?Sized,
{
    match node {
        Expr::Ident(ident) => v.visit_ident(ident),
        Expr::This(_) => {}
        Expr::Literal(lit) => v.visit_literal(lit),
        Expr::Member(member) => v.visit_member(member),
        Expr::Call(call) => v.visit_call(call),
        Expr::Object(object) => v.visit_object(object),
        Expr::Array(array) => v.visit_array(array),
        Expr::Function(function) => v.visit_function(function),
        Expr::Class(class) => v.visit_class(class),
        Expr::Other { children, .. } => {
            for child in children {
                v.visit_expr(child);
            }
        }
    }
}

/// Walks the callee, then the arguments.
pub fn visit_call<'ast, V>(v: &mut V, node: &'ast CallExpr)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_expr(&node.callee);
    for arg in &node.args {
        v.visit_expr(arg);
    }
}

/// Walks the object, then a computed property.
pub fn visit_member<'ast, V>(v: &mut V, node: &'ast MemberExpr)
where
    V: Visit<'ast> + ?Sized,
{
    v.visit_expr(&node.object);
    match &node.property {
        MemberProp::Ident(ident) | MemberProp::Private(ident) => v.visit_ident(ident),
        MemberProp::Computed(expr) => v.visit_expr(expr),
    }
}

/// Walks property keys and values.
pub fn visit_object<'ast, V>(v: &mut V, node: &'ast ObjectExpr)
where
    V: Visit<'ast> + ?Sized,
{
    for prop in &node.props {
        match prop {
            Property::KeyValue { key, value, .. } => {
                if let PropKey::Computed(expr) = key {
                    v.visit_expr(expr);
                }
                v.visit_expr(value);
            }
            Property::Shorthand(ident) => v.visit_ident(ident),
            Property::Spread(expr) => v.visit_expr(expr),
            Property::Method(function) => v.visit_function(function),
        }
    }
}

/// Walks array elements.
pub fn visit_array<'ast, V>(v: &mut V, node: &'ast ArrayExpr)
where
    V: Visit<'ast> + ?Sized,
{
    for element in &node.elements {
        v.visit_expr(element);
    }
}

/// Walks the function body.
pub fn visit_function<'ast, V>(v: &mut V, node: &'ast Function)
where
    V: Visit<'ast> + ?Sized,
{
    for item in &node.body {
        v.visit_expr(item);
    }
}

/// Walks the class body.
pub fn visit_class<'ast, V>(v: &mut V, node: &'ast Class)
where
    V: Visit<'ast> + ?Sized,
{
    for item in &node.body {
        v.visit_expr(item);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionKind, Span};

    struct CallCounter {
        calls: usize,
        functions: Vec<Option<String>>,
    }

    impl<'ast> Visit<'ast> for CallCounter {
        fn visit_call(&mut self, node: &'ast CallExpr) {
            self.calls += 1;
            visit_call(self, node);
        }

        fn visit_function(&mut self, node: &'ast Function) {
            self.functions.push(node.name.clone());
            visit_function(self, node);
        }
    }

    fn call(callee: &str, args: Vec<Expr>) -> Expr {
        Expr::Call(Box::new(CallExpr {
            callee: Expr::Ident(Ident::new(callee, Span::default())),
            args,
            optional: false,
            span: Span::default(),
        }))
    }

    #[test]
    fn reaches_calls_nested_in_other_and_functions() {
        let program = Program {
            items: vec![Expr::Other {
                kind: "expression_statement".into(),
                span: Span::default(),
                children: vec![Expr::Function(Box::new(Function {
                    name: Some("outer".into()),
                    kind: FunctionKind::Declaration,
                    is_async: false,
                    body: vec![call("a", vec![call("b", vec![])])],
                    span: Span::default(),
                }))],
            }],
        };

        let mut counter = CallCounter {
            calls: 0,
            functions: Vec::new(),
        };
        counter.visit_program(&program);

        assert_eq!(counter.calls, 2);
        assert_eq!(counter.functions, vec![Some("outer".to_string())]);
    }
}
