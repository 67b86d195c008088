//! TypeScript and JavaScript front end using Tree-sitter.

use prisma_lint_core::ast::{
    ArrayExpr, CallExpr, Class, Expr, Function, FunctionKind, Ident, Literal, LiteralKind,
    MemberExpr, MemberProp, ObjectExpr, Program, PropKey, Property, Span,
};
use prisma_lint_core::{ParseError, SourceParser};
use tree_sitter::{Language, Node, Parser};

const TS_EXTENSIONS: &[&str] = &[".ts", ".mts", ".cts"];
const EXTENSIONS: &[&str] = &[".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs"];

/// Grammar nodes that carry only type information.
const SKIPPED: &[&str] = &[
    "comment",
    "hash_bang_line",
    "type_annotation",
    "type_arguments",
    "type_parameters",
    "interface_declaration",
    "type_alias_declaration",
];

/// Wrappers lowered to their inner expression.
const TRANSPARENT: &[&str] = &[
    "await_expression",
    "parenthesized_expression",
    "as_expression",
    "satisfies_expression",
    "non_null_expression",
];

/// Parses `.ts`, `.tsx`, `.js` and friends into the core syntax tree.
pub struct TypeScriptParser {
    lenient: bool,
}

impl TypeScriptParser {
    /// Creates a parser that rejects sources with syntax errors.
    #[must_use]
    pub fn new() -> Self {
        Self { lenient: false }
    }

    /// Lowers whatever Tree-sitter recovered instead of failing on syntax
    /// errors.
    #[must_use]
    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    fn language(extension: &str) -> Language {
        if extension == ".tsx" {
            tree_sitter_typescript::LANGUAGE_TSX.into()
        } else if TS_EXTENSIONS.contains(&extension) {
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into()
        } else {
            tree_sitter_javascript::LANGUAGE.into()
        }
    }
}

impl Default for TypeScriptParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceParser for TypeScriptParser {
    fn language_id(&self) -> &'static str {
        "typescript"
    }

    fn extensions(&self) -> &'static [&'static str] {
        EXTENSIONS
    }

    fn parse(&self, source: &str, extension: &str) -> Result<Program, ParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&Self::language(extension))
            .map_err(|e| ParseError::new(1, 1, format!("failed to load grammar: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::new(1, 1, "parser returned no tree"))?;
        let root = tree.root_node();

        if root.has_error() && !self.lenient {
            let node = first_error(root).unwrap_or(root);
            let pos = node.start_position();
            let message = if node.is_missing() {
                format!("missing `{}`", node.kind())
            } else {
                let text = node.utf8_text(source.as_bytes()).unwrap_or("");
                let snippet: String = text.chars().take(20).collect();
                format!("unexpected `{snippet}`")
            };
            return Err(ParseError::new(pos.row + 1, pos.column + 1, message));
        }

        tracing::trace!(extension, nodes = root.descendant_count(), "lowering syntax tree");

        let lowerer = Lowerer {
            src: source.as_bytes(),
        };
        Ok(Program {
            items: lowerer.children(root),
        })
    }
}

fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}

fn span(node: Node<'_>) -> Span {
    let pos = node.start_position();
    Span::new(node.start_byte(), node.end_byte(), pos.row + 1, pos.column + 1)
}

/// Gives an anonymous function or class the name of the binding holding it.
fn with_inferred_name(expr: Expr, name: Option<&str>) -> Expr {
    let Some(name) = name else {
        return expr;
    };
    match expr {
        Expr::Function(mut function) if function.name.is_none() => {
            function.name = Some(name.to_string());
            Expr::Function(function)
        }
        Expr::Class(mut class) if class.name.is_none() => {
            class.name = Some(name.to_string());
            Expr::Class(class)
        }
        other => other,
    }
}

struct Lowerer<'s> {
    src: &'s [u8],
}

impl<'s> Lowerer<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        std::str::from_utf8(&self.src[node.start_byte()..node.end_byte()]).unwrap_or("")
    }

    fn unquote(&self, node: Node<'_>) -> String {
        let text = self.text(node);
        text.get(1..text.len().saturating_sub(1))
            .unwrap_or("")
            .to_string()
    }

    fn children(&self, node: Node<'_>) -> Vec<Expr> {
        let mut cursor = node.walk();
        let lowered = node
            .named_children(&mut cursor)
            .filter_map(|child| self.lower(child))
            .collect();
        lowered
    }

    fn field(&self, node: Node<'_>, name: &str) -> Option<Expr> {
        node.child_by_field_name(name)
            .and_then(|child| self.lower(child))
    }

    fn other(&self, node: Node<'_>, children: Vec<Expr>) -> Expr {
        Expr::Other {
            kind: node.kind().to_string(),
            span: span(node),
            children,
        }
    }

    fn literal(node: Node<'_>, kind: LiteralKind) -> Expr {
        Expr::Literal(Literal {
            kind,
            span: span(node),
        })
    }

    fn lower(&self, node: Node<'_>) -> Option<Expr> {
        let kind = node.kind();
        if SKIPPED.contains(&kind) {
            return None;
        }
        if TRANSPARENT.contains(&kind) {
            return node.named_child(0).and_then(|inner| self.lower(inner));
        }

        let expr = match kind {
            "identifier" | "property_identifier" | "shorthand_property_identifier" => {
                Expr::Ident(Ident::new(self.text(node), span(node)))
            }
            "this" => Expr::This(span(node)),
            "null" => Self::literal(node, LiteralKind::Null),
            "undefined" => Self::literal(node, LiteralKind::Undefined),
            "true" => Self::literal(node, LiteralKind::Bool(true)),
            "false" => Self::literal(node, LiteralKind::Bool(false)),
            "number" => Self::literal(node, LiteralKind::Number(self.text(node).to_string())),
            "string" => Self::literal(node, LiteralKind::String(self.unquote(node))),
            "regex" => Self::literal(node, LiteralKind::Regex(self.text(node).to_string())),
            "template_string" => self.template(node),
            // `<T>expr`: the operand follows the type.
            "type_assertion" => {
                let count = u32::try_from(node.named_child_count()).unwrap_or(u32::MAX);
                return node
                    .named_child(count.saturating_sub(1))
                    .and_then(|inner| self.lower(inner));
            }
            "member_expression" => self.member(node)
                .unwrap_or_else(|| self.other(node, self.children(node))),
            "subscript_expression" => self.subscript(node)
                .unwrap_or_else(|| self.other(node, self.children(node))),
            "call_expression" => self.call(node)
                .unwrap_or_else(|| self.other(node, self.children(node))),
            "object" => Expr::Object(self.object(node)),
            "array" => Expr::Array(ArrayExpr {
                elements: self.children(node),
                span: span(node),
            }),
            "function_declaration" | "generator_function_declaration" => {
                self.function(node, FunctionKind::Declaration)
            }
            "function_expression" | "function" | "generator_function" => {
                self.function(node, FunctionKind::Expression)
            }
            "arrow_function" => self.function(node, FunctionKind::Arrow),
            "method_definition" => self.method(node),
            "class_declaration" | "class" | "abstract_class_declaration" => self.class(node),
            "public_field_definition" | "field_definition" => self.field_definition(node),
            "variable_declarator" => self.variable_declarator(node),
            "assignment_expression" => self.assignment(node),
            _ => self.other(node, self.children(node)),
        };
        Some(expr)
    }

    fn template(&self, node: Node<'_>) -> Expr {
        let mut cursor = node.walk();
        let substitutions: Vec<Expr> = node
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "template_substitution")
            .filter_map(|child| self.lower(child))
            .collect();
        if substitutions.is_empty() {
            Self::literal(node, LiteralKind::Template(self.text(node).to_string()))
        } else {
            self.other(node, substitutions)
        }
    }

    fn is_optional(node: Node<'_>) -> bool {
        node.child_by_field_name("optional_chain").is_some()
    }

    fn member(&self, node: Node<'_>) -> Option<Expr> {
        let object = self.field(node, "object")?;
        let prop = node.child_by_field_name("property")?;
        let ident = Ident::new(self.text(prop), span(prop));
        let property = if prop.kind() == "private_property_identifier" {
            MemberProp::Private(ident)
        } else {
            MemberProp::Ident(ident)
        };
        Some(Expr::Member(Box::new(MemberExpr {
            object,
            property,
            optional: Self::is_optional(node),
            span: span(node),
        })))
    }

    fn subscript(&self, node: Node<'_>) -> Option<Expr> {
        let object = self.field(node, "object")?;
        let index = self.field(node, "index")?;
        Some(Expr::Member(Box::new(MemberExpr {
            object,
            property: MemberProp::Computed(index),
            optional: Self::is_optional(node),
            span: span(node),
        })))
    }

    fn call(&self, node: Node<'_>) -> Option<Expr> {
        let callee = self.field(node, "function")?;
        let args = match node.child_by_field_name("arguments") {
            Some(arguments) if arguments.kind() == "template_string" => {
                vec![self.template(arguments)]
            }
            Some(arguments) => self.children(arguments),
            None => Vec::new(),
        };
        Some(Expr::Call(Box::new(CallExpr {
            callee,
            args,
            optional: Self::is_optional(node),
            span: span(node),
        })))
    }

    fn prop_key(&self, node: Node<'_>) -> PropKey {
        match node.kind() {
            "string" => PropKey::String(self.unquote(node)),
            "number" => PropKey::Number(self.text(node).to_string()),
            "computed_property_name" => {
                let inner = node
                    .named_child(0)
                    .and_then(|inner| self.lower(inner))
                    .unwrap_or_else(|| self.other(node, Vec::new()));
                PropKey::Computed(Box::new(inner))
            }
            _ => PropKey::Ident(self.text(node).to_string()),
        }
    }

    fn object(&self, node: Node<'_>) -> ObjectExpr {
        let mut props = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            match child.kind() {
                "pair" => {
                    let (Some(key_node), Some(value)) = (
                        child.child_by_field_name("key"),
                        child.child_by_field_name("value"),
                    ) else {
                        continue;
                    };
                    let key = self.prop_key(key_node);
                    let Some(value) = self.lower(value) else {
                        continue;
                    };
                    let value = with_inferred_name(value, key.name());
                    props.push(Property::KeyValue {
                        key,
                        value,
                        span: span(child),
                    });
                }
                "shorthand_property_identifier" => {
                    props.push(Property::Shorthand(Ident::new(self.text(child), span(child))));
                }
                "spread_element" => {
                    if let Some(inner) = child.named_child(0).and_then(|inner| self.lower(inner)) {
                        props.push(Property::Spread(inner));
                    }
                }
                "method_definition" => {
                    if let Expr::Function(function) = self.method(child) {
                        props.push(Property::Method(function));
                    }
                }
                _ => {}
            }
        }
        ObjectExpr {
            props,
            span: span(node),
        }
    }

    fn has_token(node: Node<'_>, token: &str) -> bool {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .any(|child| !child.is_named() && child.kind() == token);
        found
    }

    fn function_body(&self, node: Node<'_>) -> Vec<Expr> {
        let mut body = node
            .child_by_field_name("parameters")
            .map(|params| self.children(params))
            .unwrap_or_default();
        if let Some(param) = node.child_by_field_name("parameter") {
            body.extend(self.lower(param));
        }
        match node.child_by_field_name("body") {
            Some(block) if block.kind() == "statement_block" => body.extend(self.children(block)),
            Some(expr) => body.extend(self.lower(expr)),
            None => {}
        }
        body
    }

    fn function(&self, node: Node<'_>, kind: FunctionKind) -> Expr {
        let name = node
            .child_by_field_name("name")
            .map(|name| self.text(name).to_string());
        Expr::Function(Box::new(Function {
            name,
            kind,
            is_async: Self::has_token(node, "async"),
            body: self.function_body(node),
            span: span(node),
        }))
    }

    fn method(&self, node: Node<'_>) -> Expr {
        let kind = if Self::has_token(node, "get") {
            FunctionKind::Getter
        } else if Self::has_token(node, "set") {
            FunctionKind::Setter
        } else {
            FunctionKind::Method
        };
        let name = node
            .child_by_field_name("name")
            .and_then(|name| self.prop_key(name).name().map(str::to_string));
        Expr::Function(Box::new(Function {
            name,
            kind,
            is_async: Self::has_token(node, "async"),
            body: self.function_body(node),
            span: span(node),
        }))
    }

    fn class(&self, node: Node<'_>) -> Expr {
        let name = node
            .child_by_field_name("name")
            .map(|name| self.text(name).to_string());

        let mut body = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "class_body" {
                body.extend(self.children(child));
            } else if Some(child) != node.child_by_field_name("name") {
                body.extend(self.lower(child));
            }
        }

        Expr::Class(Box::new(Class {
            name,
            body,
            span: span(node),
        }))
    }

    fn field_definition(&self, node: Node<'_>) -> Expr {
        let name_node = node
            .child_by_field_name("name")
            .or_else(|| node.child_by_field_name("property"));
        let key = name_node.map(|name| self.prop_key(name));
        let value = self
            .field(node, "value")
            .map(|value| with_inferred_name(value, key.as_ref().and_then(PropKey::name)));

        let mut children = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "decorator" {
                children.extend(self.lower(child));
            }
        }
        children.extend(value);
        self.other(node, children)
    }

    fn variable_declarator(&self, node: Node<'_>) -> Expr {
        let binding = node.child_by_field_name("name");
        let mut children = Vec::new();

        let name = match binding {
            Some(b) if b.kind() == "identifier" => Some(self.text(b)),
            Some(pattern) => {
                children.extend(self.lower(pattern));
                None
            }
            None => None,
        };
        if let Some(value) = self.field(node, "value") {
            children.push(with_inferred_name(value, name));
        }
        self.other(node, children)
    }

    fn assignment(&self, node: Node<'_>) -> Expr {
        let left = node.child_by_field_name("left");
        let name = left.and_then(|left| match left.kind() {
            "identifier" => Some(self.text(left)),
            "member_expression" => left
                .child_by_field_name("property")
                .map(|prop| self.text(prop)),
            _ => None,
        });

        let mut children = Vec::new();
        children.extend(left.and_then(|left| self.lower(left)));
        if let Some(right) = self.field(node, "right") {
            children.push(with_inferred_name(right, name));
        }
        self.other(node, children)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prisma_lint_core::utils::{collect_prisma_calls, Operation};

    const CLIENTS: &[&str] = &["prisma", "tx"];

    fn parse(src: &str) -> Program {
        TypeScriptParser::new().parse(src, ".ts").unwrap()
    }

    fn sites(src: &str) -> Vec<(Option<String>, Option<String>, Operation)> {
        let program = parse(src);
        collect_prisma_calls(&program, CLIENTS)
            .into_iter()
            .map(|site| {
                (
                    site.function.map(str::to_string),
                    site.class.map(str::to_string),
                    site.call.operation,
                )
            })
            .collect()
    }

    #[test]
    fn class_methods_are_named_functions() {
        let found = sites(
            r"
@Injectable()
export class UserRepository {
  constructor(private readonly prisma: PrismaService) {}

  async softDeleteUser(id: string): Promise<void> {
    await this.prisma.user.update({ where: { id }, data: { deletedAt: new Date() } });
  }
}
",
        );
        assert_eq!(
            found,
            vec![(
                Some("softDeleteUser".to_string()),
                Some("UserRepository".to_string()),
                Operation::Update
            )]
        );
    }

    #[test]
    fn arrow_functions_take_binding_names() {
        let found = sites(
            r"
export const findUsers = async () => prisma.user.findMany();
const handlers = { removeUser: async (id: string) => prisma.user.delete({ where: { id } }) };
module.exports.countUsers = function () { return prisma.user.count(); };
",
        );
        let names: Vec<_> = found.iter().map(|(f, _, _)| f.as_deref()).collect();
        assert_eq!(
            names,
            vec![Some("findUsers"), Some("removeUser"), Some("countUsers")]
        );
    }

    #[test]
    fn anonymous_callbacks_are_transparent() {
        let found = sites(
            r"
async function restoreUser(id: string) {
  return prisma.$transaction(async (tx) => {
    return tx.user.update({ where: { id }, data: { deletedAt: null } });
  });
}
",
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0.as_deref(), Some("restoreUser"));
    }

    #[test]
    fn type_wrappers_are_unwrapped() {
        let program = parse("const x = (await prisma.user.findFirst()) as User;\nconst y = prisma!.user.count();");
        let found = collect_prisma_calls(&program, CLIENTS);
        assert_eq!(found.len(), 2);
    }

    #[test]
    fn object_literals_keep_keys_and_values() {
        let program = parse(
            "update({ data: { 'deletedAt': null, suspendedAt, ...rest, [key]: 1, status: `x` } });",
        );
        let Expr::Other { children, .. } = &program.items[0] else {
            panic!("expected expression statement");
        };
        let Expr::Call(call) = &children[0] else {
            panic!("expected call");
        };
        let data = call.object_arg().unwrap().get("data").unwrap().as_object().unwrap();
        assert!(data.get("deletedAt").unwrap().is_null());
        assert!(matches!(data.property("suspendedAt"), Some(Property::Shorthand(_))));
        assert!(data.props.iter().any(|p| matches!(p, Property::Spread(_))));
        assert!(matches!(
            data.get("status"),
            Some(Expr::Literal(Literal {
                kind: LiteralKind::Template(_),
                ..
            }))
        ));
        assert_eq!(data.props.len(), 5);
    }

    #[test]
    fn positions_are_one_based() {
        let program = parse("\n  prisma.user.create({ data: {} });");
        let found = collect_prisma_calls(&program, CLIENTS);
        let span = found[0].call.span();
        assert_eq!((span.line, span.column), (2, 3));
    }

    #[test]
    fn syntax_errors_fail_unless_lenient() {
        let src = "function broken( {\n  prisma.user.create({ data: {} });\n";
        let err = TypeScriptParser::new().parse(src, ".ts").unwrap_err();
        assert!(err.line >= 1);

        let program = TypeScriptParser::new().lenient(true).parse(src, ".ts");
        assert!(program.is_ok());
    }

    #[test]
    fn parses_tsx_and_javascript() {
        let tsx = "export function UserList() { const users = prisma.user.findMany(); return <ul />; }";
        let program = TypeScriptParser::new().parse(tsx, ".tsx").unwrap();
        assert_eq!(collect_prisma_calls(&program, CLIENTS).len(), 1);

        let js = "class UserRepository { async findById(id) { return this.prisma.user.findUnique({ where: { id } }); } }";
        let program = TypeScriptParser::new().parse(js, ".js").unwrap();
        let found = collect_prisma_calls(&program, CLIENTS);
        assert_eq!(found[0].function, Some("findById"));
        assert_eq!(found[0].class, Some("UserRepository"));
    }

    #[test]
    fn tagged_template_raw_queries() {
        let found = sites("async function listUsers() { return prisma.$queryRaw`SELECT * FROM users`; }");
        assert_eq!(
            found,
            vec![(Some("listUsers".to_string()), None, Operation::QueryRaw)]
        );
    }

    #[test]
    fn handles_every_supported_extension() {
        let parser = TypeScriptParser::new();
        for ext in [".ts", ".tsx", ".mts", ".cts", ".js", ".jsx", ".mjs", ".cjs"] {
            assert!(parser.handles(ext), "{ext}");
        }
        assert!(!parser.handles(".prisma"));
    }
}
