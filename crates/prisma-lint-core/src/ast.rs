//! Syntax tree for the JavaScript/TypeScript subset inspected by rules.
//!
//! Front ends (see the `prisma-lint-ts` crate) lower a concrete syntax tree
//! into this representation. Only the constructs rules pattern-match on get a
//! dedicated variant; everything else becomes [`Expr::Other`], which keeps its
//! children so nested calls and functions stay reachable.

use serde::Serialize;

pub mod visit;

/// Source range of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Start byte offset.
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    /// Length of the span in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    /// Top-level statements and declarations.
    pub items: Vec<Expr>,
}

/// An identifier with its location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Ident {
    /// Identifier text.
    pub name: String,
    /// Source range.
    pub span: Span,
}

impl Ident {
    /// Creates a new identifier.
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

/// Expression and statement node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Expr {
    /// `foo`
    Ident(Ident),
    /// `this`
    This(Span),
    /// `null`, `42`, `'text'`, ...
    Literal(Literal),
    /// `object.property`, `object[expr]`
    Member(Box<MemberExpr>),
    /// `callee(args)`
    Call(Box<CallExpr>),
    /// `{ key: value }`
    Object(ObjectExpr),
    /// `[a, b]`
    Array(ArrayExpr),
    /// Function declarations, expressions, arrows and methods.
    Function(Box<Function>),
    /// Class declarations and expressions.
    Class(Box<Class>),
    /// Any construct rules do not inspect directly.
    Other {
        /// Grammar kind of the original node.
        kind: String,
        /// Source range.
        span: Span,
        /// Lowered child nodes.
        children: Vec<Expr>,
    },
}

impl Expr {
    /// Returns the source range of this node.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Ident(ident) => ident.span,
            Self::This(span) | Self::Other { span, .. } => *span,
            Self::Literal(lit) => lit.span,
            Self::Member(member) => member.span,
            Self::Call(call) => call.span,
            Self::Object(object) => object.span,
            Self::Array(array) => array.span,
            Self::Function(function) => function.span,
            Self::Class(class) => class.span,
        }
    }

    /// Returns the identifier name if this is a plain identifier.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }

    /// Returns the object literal if this is one.
    #[must_use]
    pub fn as_object(&self) -> Option<&ObjectExpr> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Returns true for the `null` literal.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Self::Literal(Literal {
                kind: LiteralKind::Null,
                ..
            })
        )
    }

    /// Returns true for `undefined` (literal or identifier).
    #[must_use]
    pub fn is_undefined(&self) -> bool {
        match self {
            Self::Literal(lit) => lit.kind == LiteralKind::Undefined,
            Self::Ident(ident) => ident.name == "undefined",
            _ => false,
        }
    }
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    /// Literal kind and value.
    pub kind: LiteralKind,
    /// Source range.
    pub span: Span,
}

/// Kind of literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum LiteralKind {
    /// `null`
    Null,
    /// `undefined`
    Undefined,
    /// `true` / `false`
    Bool(bool),
    /// Numeric literal, raw text.
    Number(String),
    /// String literal, quotes stripped.
    String(String),
    /// Template literal, raw text including backticks.
    Template(String),
    /// Regular expression literal, raw text.
    Regex(String),
}

/// Property access.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberExpr {
    /// Accessed object.
    pub object: Expr,
    /// Accessed property.
    pub property: MemberProp,
    /// `?.` access.
    pub optional: bool,
    /// Source range.
    pub span: Span,
}

impl MemberExpr {
    /// Returns the property name for non-computed access.
    ///
    /// String-literal computed access (`obj['name']`) also yields a name.
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        match &self.property {
            MemberProp::Ident(ident) | MemberProp::Private(ident) => Some(&ident.name),
            MemberProp::Computed(Expr::Literal(Literal {
                kind: LiteralKind::String(value),
                ..
            })) => Some(value),
            MemberProp::Computed(_) => None,
        }
    }
}

/// Property side of a member expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum MemberProp {
    /// `.name`
    Ident(Ident),
    /// `.#name`
    Private(Ident),
    /// `[expr]`
    Computed(Expr),
}

/// Function or method invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallExpr {
    /// Invoked expression.
    pub callee: Expr,
    /// Arguments in order. A tagged template passes the template as its
    /// only argument.
    pub args: Vec<Expr>,
    /// `?.()` invocation.
    pub optional: bool,
    /// Source range.
    pub span: Span,
}

impl CallExpr {
    /// Returns the callee as a member expression, if it is one.
    #[must_use]
    pub fn callee_member(&self) -> Option<&MemberExpr> {
        match &self.callee {
            Expr::Member(member) => Some(member),
            _ => None,
        }
    }

    /// Returns the first argument if it is an object literal.
    #[must_use]
    pub fn object_arg(&self) -> Option<&ObjectExpr> {
        self.args.first().and_then(Expr::as_object)
    }
}

/// Object literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectExpr {
    /// Properties in source order.
    pub props: Vec<Property>,
    /// Source range.
    pub span: Span,
}

impl ObjectExpr {
    /// Returns the value of the last `key: value` property with the given
    /// static key. Shorthand properties have no value expression; use
    /// [`ObjectExpr::property`] to see them.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Expr> {
        self.props.iter().rev().find_map(|prop| match prop {
            Property::KeyValue { key: k, value, .. } if k.name() == Some(key) => Some(value),
            _ => None,
        })
    }

    /// Returns true if a property with the given static key exists.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.props.iter().any(|prop| prop.key_name() == Some(key))
    }

    /// Returns the property with the given static key.
    #[must_use]
    pub fn property(&self, key: &str) -> Option<&Property> {
        self.props
            .iter()
            .rev()
            .find(|prop| prop.key_name() == Some(key))
    }
}

/// Object literal member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind")]
pub enum Property {
    /// `key: value`
    KeyValue {
        /// Property key.
        key: PropKey,
        /// Property value.
        value: Expr,
        /// Source range.
        span: Span,
    },
    /// `{ name }`
    Shorthand(Ident),
    /// `{ ...expr }`
    Spread(Expr),
    /// `{ name() {} }`, getters and setters.
    Method(Box<Function>),
}

impl Property {
    /// Returns the static key name, if known.
    #[must_use]
    pub fn key_name(&self) -> Option<&str> {
        match self {
            Self::KeyValue { key, .. } => key.name(),
            Self::Shorthand(ident) => Some(&ident.name),
            Self::Method(function) => function.name.as_deref(),
            Self::Spread(_) => None,
        }
    }

    /// Returns the source range of this property.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::KeyValue { span, .. } => *span,
            Self::Shorthand(ident) => ident.span,
            Self::Spread(expr) => expr.span(),
            Self::Method(function) => function.span,
        }
    }
}

/// Object literal key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum PropKey {
    /// `name: ...`
    Ident(String),
    /// `'name': ...`
    String(String),
    /// `1: ...`
    Number(String),
    /// `[expr]: ...`
    Computed(Box<Expr>),
}

impl PropKey {
    /// Returns the static key name. Computed keys have none unless they are
    /// string literals.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Ident(name) | Self::String(name) | Self::Number(name) => Some(name),
            Self::Computed(expr) => match expr.as_ref() {
                Expr::Literal(Literal {
                    kind: LiteralKind::String(value),
                    ..
                }) => Some(value),
                _ => None,
            },
        }
    }
}

/// Array literal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayExpr {
    /// Elements in order. Holes are omitted.
    pub elements: Vec<Expr>,
    /// Source range.
    pub span: Span,
}

/// Syntactic form of a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    /// `function name() {}`
    Declaration,
    /// `function () {}` in expression position.
    Expression,
    /// `() => {}`
    Arrow,
    /// Class or object method.
    Method,
    /// `get name() {}`
    Getter,
    /// `set name(v) {}`
    Setter,
}

/// A function-like node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    /// Declared or inferred name.
    pub name: Option<String>,
    /// Syntactic form.
    pub kind: FunctionKind,
    /// `async` modifier.
    pub is_async: bool,
    /// Parameter default values and body statements.
    pub body: Vec<Expr>,
    /// Source range.
    pub span: Span,
}

/// A class declaration or expression.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Class {
    /// Declared or inferred name.
    pub name: Option<String>,
    /// Heritage clauses, decorators and members.
    pub body: Vec<Expr>,
    /// Source range.
    pub span: Span,
}
