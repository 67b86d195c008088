//! Recognition of Prisma client data-access calls.
//!
//! A Prisma call has the shape `<client>.<model>.<operation>(args)` or
//! `<client>.$<raw>(args)`, where `<client>` ends in a configured client name
//! (`this.prisma`, `tx`, `this.prismaService`, ...).

use crate::ast::visit::{self, Visit};
use crate::ast::{CallExpr, Class, Expr, Function, ObjectExpr, Program, Span};
use crate::utils::naming::FunctionScope;

/// A Prisma client operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `create`
    Create,
    /// `createMany`
    CreateMany,
    /// `createManyAndReturn`
    CreateManyAndReturn,
    /// `upsert`
    Upsert,
    /// `update`
    Update,
    /// `updateMany`
    UpdateMany,
    /// `updateManyAndReturn`
    UpdateManyAndReturn,
    /// `delete`
    Delete,
    /// `deleteMany`
    DeleteMany,
    /// `findUnique`
    FindUnique,
    /// `findUniqueOrThrow`
    FindUniqueOrThrow,
    /// `findFirst`
    FindFirst,
    /// `findFirstOrThrow`
    FindFirstOrThrow,
    /// `findMany`
    FindMany,
    /// `count`
    Count,
    /// `aggregate`
    Aggregate,
    /// `groupBy`
    GroupBy,
    /// `$queryRaw`
    QueryRaw,
    /// `$queryRawUnsafe`
    QueryRawUnsafe,
    /// `$executeRaw`
    ExecuteRaw,
    /// `$executeRawUnsafe`
    ExecuteRawUnsafe,
}

/// Broad category of an [`Operation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    /// Inserts rows.
    Create,
    /// Inserts or updates one row.
    Upsert,
    /// Updates rows.
    Update,
    /// Physically removes rows.
    Delete,
    /// Reads rows.
    Find,
    /// Counts and aggregates.
    Aggregate,
    /// Raw SQL.
    Raw,
}

const OPERATIONS: &[(&str, Operation)] = &[
    ("create", Operation::Create),
    ("createMany", Operation::CreateMany),
    ("createManyAndReturn", Operation::CreateManyAndReturn),
    ("upsert", Operation::Upsert),
    ("update", Operation::Update),
    ("updateMany", Operation::UpdateMany),
    ("updateManyAndReturn", Operation::UpdateManyAndReturn),
    ("delete", Operation::Delete),
    ("deleteMany", Operation::DeleteMany),
    ("findUnique", Operation::FindUnique),
    ("findUniqueOrThrow", Operation::FindUniqueOrThrow),
    ("findFirst", Operation::FindFirst),
    ("findFirstOrThrow", Operation::FindFirstOrThrow),
    ("findMany", Operation::FindMany),
    ("count", Operation::Count),
    ("aggregate", Operation::Aggregate),
    ("groupBy", Operation::GroupBy),
    ("$queryRaw", Operation::QueryRaw),
    ("$queryRawUnsafe", Operation::QueryRawUnsafe),
    ("$executeRaw", Operation::ExecuteRaw),
    ("$executeRawUnsafe", Operation::ExecuteRawUnsafe),
];

impl Operation {
    /// Looks up an operation by its client method name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        OPERATIONS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, op)| *op)
    }

    /// Client method name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        OPERATIONS
            .iter()
            .find(|(_, op)| *op == self)
            .map_or("", |(n, _)| n)
    }

    /// Broad category.
    #[must_use]
    pub fn kind(self) -> OperationKind {
        match self {
            Self::Create | Self::CreateMany | Self::CreateManyAndReturn => OperationKind::Create,
            Self::Upsert => OperationKind::Upsert,
            Self::Update | Self::UpdateMany | Self::UpdateManyAndReturn => OperationKind::Update,
            Self::Delete | Self::DeleteMany => OperationKind::Delete,
            Self::FindUnique
            | Self::FindUniqueOrThrow
            | Self::FindFirst
            | Self::FindFirstOrThrow
            | Self::FindMany => OperationKind::Find,
            Self::Count | Self::Aggregate | Self::GroupBy => OperationKind::Aggregate,
            Self::QueryRaw | Self::QueryRawUnsafe | Self::ExecuteRaw | Self::ExecuteRawUnsafe => {
                OperationKind::Raw
            }
        }
    }

    /// Raw operations are called on the client itself, not on a model.
    #[must_use]
    pub fn is_raw(self) -> bool {
        self.kind() == OperationKind::Raw
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A call recognised as Prisma client data access.
#[derive(Debug, Clone, Copy)]
pub struct PrismaCall<'ast> {
    /// The call node.
    pub call: &'ast CallExpr,
    /// Client receiver name (`prisma`, `tx`, ...).
    pub client: &'ast str,
    /// Model delegate (`user`), `None` for raw operations.
    pub model: Option<&'ast str>,
    /// Invoked operation.
    pub operation: Operation,
}

impl<'ast> PrismaCall<'ast> {
    /// Matches `call` against the Prisma call shape.
    #[must_use]
    pub fn match_call<S: AsRef<str>>(call: &'ast CallExpr, clients: &[S]) -> Option<Self> {
        let callee = call.callee_member()?;
        let operation = Operation::from_name(callee.property_name()?)?;

        if operation.is_raw() {
            let client = receiver_name(&callee.object)?;
            return is_client(client, clients).then_some(Self {
                call,
                client,
                model: None,
                operation,
            });
        }

        let Expr::Member(delegate) = &callee.object else {
            return None;
        };
        let model = delegate.property_name()?;
        if model.starts_with('$') {
            return None;
        }
        let client = receiver_name(&delegate.object)?;

        is_client(client, clients).then_some(Self {
            call,
            client,
            model: Some(model),
            operation,
        })
    }

    /// Source range of the whole call.
    #[must_use]
    pub fn span(&self) -> Span {
        self.call.span
    }

    /// Model name, or `$client` for raw operations.
    #[must_use]
    pub fn model_name(&self) -> &'ast str {
        self.model.unwrap_or("$client")
    }

    /// Dotted call target, e.g. `prisma.user.update`.
    #[must_use]
    pub fn target(&self) -> String {
        match self.model {
            Some(model) => format!("{}.{model}.{}", self.client, self.operation),
            None => format!("{}.{}", self.client, self.operation),
        }
    }

    /// The options object passed as first argument.
    #[must_use]
    pub fn args(&self) -> Option<&'ast ObjectExpr> {
        self.call.object_arg()
    }
}

/// A Prisma call together with its enclosing named function and class.
#[derive(Debug, Clone, Copy)]
pub struct PrismaCallSite<'ast> {
    /// The recognised call.
    pub call: PrismaCall<'ast>,
    /// Nearest enclosing named function or method.
    pub function: Option<&'ast str>,
    /// Nearest enclosing named class.
    pub class: Option<&'ast str>,
}

/// Collects every Prisma call in `program`, in source order.
#[must_use]
pub fn collect_prisma_calls<'ast, S: AsRef<str>>(
    program: &'ast Program,
    clients: &[S],
) -> Vec<PrismaCallSite<'ast>> {
    let mut collector = CallCollector {
        clients,
        scope: FunctionScope::new(),
        sites: Vec::new(),
    };
    collector.visit_program(program);
    collector.sites
}

struct CallCollector<'ast, 'c, S> {
    clients: &'c [S],
    scope: FunctionScope<'ast>,
    sites: Vec<PrismaCallSite<'ast>>,
}

impl<'ast, S: AsRef<str>> Visit<'ast> for CallCollector<'ast, '_, S> {
    fn visit_function(&mut self, node: &'ast Function) {
        self.scope.enter_function(node.name.as_deref());
        visit::visit_function(self, node);
        self.scope.exit_function();
    }

    fn visit_class(&mut self, node: &'ast Class) {
        self.scope.enter_class(node.name.as_deref());
        visit::visit_class(self, node);
        self.scope.exit_class();
    }

    fn visit_call(&mut self, node: &'ast CallExpr) {
        if let Some(call) = PrismaCall::match_call(node, self.clients) {
            self.sites.push(PrismaCallSite {
                call,
                function: self.scope.nearest_named(),
                class: self.scope.nearest_class(),
            });
        }
        visit::visit_call(self, node);
    }
}

/// Last name in a receiver chain: `this.prisma` → `prisma`, `tx` → `tx`.
fn receiver_name(expr: &Expr) -> Option<&str> {
    match expr {
        Expr::Ident(ident) => Some(&ident.name),
        Expr::Member(member) => member.property_name(),
        _ => None,
    }
}

/// `name` is a client if it equals a configured name or extends one in
/// camelCase (`prismaService`).
fn is_client<S: AsRef<str>>(name: &str, clients: &[S]) -> bool {
    clients.iter().map(AsRef::as_ref).any(|client| {
        name.strip_prefix(client)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with(|c: char| c.is_ascii_uppercase()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{FunctionKind, Ident, MemberExpr, MemberProp};

    const CLIENTS: &[&str] = &["prisma", "tx"];

    fn ident(name: &str) -> Expr {
        Expr::Ident(Ident::new(name, Span::default()))
    }

    fn member(object: Expr, property: &str) -> Expr {
        Expr::Member(Box::new(MemberExpr {
            object,
            property: MemberProp::Ident(Ident::new(property, Span::default())),
            optional: false,
            span: Span::default(),
        }))
    }

    fn call(callee: Expr) -> CallExpr {
        CallExpr {
            callee,
            args: Vec::new(),
            optional: false,
            span: Span::default(),
        }
    }

    #[test]
    fn operation_names_round_trip() {
        for (name, op) in OPERATIONS {
            assert_eq!(Operation::from_name(name), Some(*op));
            assert_eq!(op.as_str(), *name);
        }
        assert_eq!(Operation::from_name("save"), None);
    }

    #[test]
    fn matches_this_prisma_model_operation() {
        let node = call(member(
            member(member(Expr::This(Span::default()), "prisma"), "user"),
            "update",
        ));
        let matched = PrismaCall::match_call(&node, CLIENTS).unwrap();
        assert_eq!(matched.client, "prisma");
        assert_eq!(matched.model, Some("user"));
        assert_eq!(matched.operation, Operation::Update);
        assert_eq!(matched.target(), "prisma.user.update");
    }

    #[test]
    fn matches_camel_case_client_extension() {
        let node = call(member(
            member(member(Expr::This(Span::default()), "prismaService"), "user"),
            "findMany",
        ));
        assert!(PrismaCall::match_call(&node, CLIENTS).is_some());

        let node = call(member(member(ident("prismatic"), "user"), "findMany"));
        assert!(PrismaCall::match_call(&node, CLIENTS).is_none());
    }

    #[test]
    fn matches_raw_operations_on_client() {
        let node = call(member(ident("tx"), "$executeRaw"));
        let matched = PrismaCall::match_call(&node, CLIENTS).unwrap();
        assert_eq!(matched.model, None);
        assert_eq!(matched.model_name(), "$client");
        assert_eq!(matched.target(), "tx.$executeRaw");
        assert_eq!(matched.operation.kind(), OperationKind::Raw);
    }

    #[test]
    fn ignores_non_client_receivers_and_client_methods() {
        let node = call(member(member(ident("repo"), "user"), "create"));
        assert!(PrismaCall::match_call(&node, CLIENTS).is_none());

        let node = call(member(member(ident("prisma"), "$extends"), "create"));
        assert!(PrismaCall::match_call(&node, CLIENTS).is_none());

        let node = call(member(ident("prisma"), "create"));
        assert!(PrismaCall::match_call(&node, CLIENTS).is_none());
    }

    #[test]
    fn collects_with_nearest_named_function() {
        let inner = Expr::Call(Box::new(call(member(member(ident("tx"), "user"), "delete"))));
        let arrow = Expr::Function(Box::new(Function {
            name: None,
            kind: FunctionKind::Arrow,
            is_async: true,
            body: vec![inner],
            span: Span::default(),
        }));
        let method = Expr::Function(Box::new(Function {
            name: Some("hardDeleteUser".into()),
            kind: FunctionKind::Method,
            is_async: true,
            body: vec![arrow],
            span: Span::default(),
        }));
        let class = Expr::Class(Box::new(Class {
            name: Some("UserRepository".into()),
            body: vec![method],
            span: Span::default(),
        }));
        let program = Program { items: vec![class] };

        let sites = collect_prisma_calls(&program, CLIENTS);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].function, Some("hardDeleteUser"));
        assert_eq!(sites[0].class, Some("UserRepository"));
        assert_eq!(sites[0].call.operation, Operation::Delete);
    }
}
