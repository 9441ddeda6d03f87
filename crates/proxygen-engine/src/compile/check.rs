//! In-process structural checker
//!
//! Reports the errors a C# compiler would raise for the shapes a proxy unit
//! can take: clashing member names, unresolved identifiers and malformed
//! returns. It does not resolve external types, so it produces no image.

use rustc_hash::{FxHashMap, FxHashSet};

use super::{BackendOutput, CompileRequest, CompilerBackend};
use crate::error::ProxyGenResult;
use crate::types::TypeRef;
use crate::unit::{Argument, Constructor, Expr, Member, Method, Param, ProxyUnit, Stmt};

/// Checks a unit without invoking an external compiler
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckBackend;

impl CompilerBackend for CheckBackend {
    fn name(&self) -> &str {
        "check"
    }

    fn build(&self, request: &CompileRequest<'_>) -> ProxyGenResult<BackendOutput> {
        let errors = check_unit(request.unit);
        tracing::debug!(class = %request.unit.class_name, errors = errors.len(), "unit checked");
        Ok(BackendOutput {
            errors,
            image: None,
        })
    }
}

/// Run every check over `unit`, returning formatted error lines
pub fn check_unit(unit: &ProxyUnit) -> Vec<String> {
    let mut checker = Checker::new(unit);
    checker.check_members();
    for member in &unit.members {
        match member {
            Member::Method(method) => checker.check_method(method),
            Member::Constructor(ctor) => checker.check_constructor(ctor),
            Member::Field(_) | Member::Event(_) => {}
        }
    }
    checker.errors
}

/// Kind of a class-level name, for clash detection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameKind {
    Field,
    Method,
    Event,
}

struct Checker<'u> {
    unit: &'u ProxyUnit,
    fields: FxHashSet<&'u str>,
    methods: FxHashSet<&'u str>,
    events: FxHashSet<&'u str>,
    errors: Vec<String>,
}

/// Names visible inside one body
#[derive(Default)]
struct Scope<'u> {
    params: FxHashSet<&'u str>,
    locals: FxHashSet<&'u str>,
}

impl<'u> Checker<'u> {
    fn new(unit: &'u ProxyUnit) -> Self {
        Self {
            unit,
            fields: unit.fields().map(|f| f.name.as_str()).collect(),
            methods: unit.methods().map(|m| m.name.as_str()).collect(),
            events: unit.events().map(|e| e.name.as_str()).collect(),
            errors: Vec::new(),
        }
    }

    fn error(&mut self, code: &str, message: String) {
        self.errors
            .push(format!("{}.cs: error {}: {}", self.unit.class_name, code, message));
    }

    fn check_members(&mut self) {
        let unit = self.unit;
        let class = unit.class_name.as_str();
        let mut seen: FxHashMap<&str, NameKind> = FxHashMap::default();
        let mut signatures: FxHashSet<(&str, Vec<&TypeRef>)> = FxHashSet::default();

        if unit.constructors().count() > 1 {
            self.error(
                "CS0111",
                format!(
                    "Type '{}' already defines a member called '{}' with the same parameter types",
                    class, class
                ),
            );
        }

        for member in &unit.members {
            let (name, kind) = match member {
                Member::Field(f) => (f.name.as_str(), NameKind::Field),
                Member::Method(m) => (m.name.as_str(), NameKind::Method),
                Member::Event(e) => (e.name.as_str(), NameKind::Event),
                Member::Constructor(_) => continue,
            };

            if name == class {
                self.error(
                    "CS0542",
                    format!("'{}': member names cannot be the same as their enclosing type", name),
                );
            }

            match seen.get(name).copied() {
                None => {
                    seen.insert(name, kind);
                }
                Some(NameKind::Method) if kind == NameKind::Method => {}
                Some(_) => {
                    self.error(
                        "CS0102",
                        format!("The type '{}' already contains a definition for '{}'", class, name),
                    );
                    continue;
                }
            }

            if let Member::Method(method) = member {
                let key = (name, method.params.iter().map(|p| &p.ty).collect());
                if !signatures.insert(key) {
                    self.error(
                        "CS0111",
                        format!(
                            "Type '{}' already defines a member called '{}' with the same parameter types",
                            class, name
                        ),
                    );
                }
            }
        }
    }

    fn check_constructor(&mut self, ctor: &'u Constructor) {
        let mut scope = self.declare_params(&ctor.params);
        for stmt in &ctor.body {
            if let Stmt::Return(Some(_)) = stmt {
                self.error(
                    "CS0127",
                    "Since the constructor returns void, a return keyword must not be followed by an object expression"
                        .to_string(),
                );
            }
            self.check_stmt(stmt, &mut scope);
        }
    }

    fn check_method(&mut self, method: &'u Method) {
        let mut scope = self.declare_params(&method.params);
        let returns_void = method.return_type.is_void();

        for stmt in &method.body {
            if let Stmt::Return(value) = stmt {
                match (returns_void, value.is_some()) {
                    (true, true) => self.error(
                        "CS0127",
                        format!(
                            "Since '{}.{}' returns void, a return keyword must not be followed by an object expression",
                            self.unit.class_name, method.name
                        ),
                    ),
                    (false, false) => self.error(
                        "CS0126",
                        format!(
                            "An object of a type convertible to '{}' is required",
                            method.return_type
                        ),
                    ),
                    _ => {}
                }
            }
            self.check_stmt(stmt, &mut scope);
        }

        if !returns_void && !matches!(method.body.last(), Some(Stmt::Return(_))) {
            self.error(
                "CS0161",
                format!(
                    "'{}.{}': not all code paths return a value",
                    self.unit.class_name, method.name
                ),
            );
        }
    }

    fn declare_params(&mut self, params: &'u [Param]) -> Scope<'u> {
        let mut scope = Scope::default();
        for param in params {
            if !scope.params.insert(param.name.as_str()) {
                self.error(
                    "CS0100",
                    format!("The parameter name '{}' is a duplicate", param.name),
                );
            }
        }
        scope
    }

    fn check_stmt(&mut self, stmt: &'u Stmt, scope: &mut Scope<'u>) {
        match stmt {
            Stmt::Declare { name, init, .. } => {
                // Initializer is checked before the local comes into scope
                if let Some(init) = init {
                    self.check_expr(init, scope);
                }
                if scope.params.contains(name.as_str()) {
                    self.error(
                        "CS0136",
                        format!(
                            "A local named '{}' cannot be declared in this scope because it conflicts with a parameter",
                            name
                        ),
                    );
                } else if !scope.locals.insert(name.as_str()) {
                    self.error(
                        "CS0128",
                        format!("A local variable named '{}' is already defined in this scope", name),
                    );
                }
            }
            Stmt::Assign { target, value } => {
                self.check_expr(target, scope);
                self.check_expr(value, scope);
            }
            Stmt::Return(value) => {
                if let Some(value) = value {
                    self.check_expr(value, scope);
                }
            }
            Stmt::Expr(expr) => self.check_expr(expr, scope),
            Stmt::Attach {
                target, handler, ..
            } => {
                self.check_expr(target, scope);
                self.check_expr(handler, scope);
            }
            Stmt::Raise { event, args } => {
                if !self.events.contains(event.as_str()) {
                    self.missing_member(event);
                }
                for arg in args {
                    self.check_expr(arg, scope);
                }
            }
        }
    }

    fn check_expr(&mut self, expr: &'u Expr, scope: &Scope<'u>) {
        match expr {
            Expr::Null | Expr::Path(_) => {}
            Expr::Field(name) => {
                if !self.fields.contains(name.as_str()) {
                    self.missing_member(name);
                }
            }
            Expr::MethodRef(name) => {
                if !self.methods.contains(name.as_str()) {
                    self.missing_member(name);
                }
            }
            Expr::Arg(name) => {
                if !scope.params.contains(name.as_str()) {
                    self.undeclared(name);
                }
            }
            Expr::Local(name) => {
                if !scope.locals.contains(name.as_str()) {
                    self.undeclared(name);
                }
            }
            Expr::Property { target, .. } => self.check_expr(target, scope),
            Expr::Index { target, keys } => {
                self.check_expr(target, scope);
                for key in keys {
                    self.check_expr(key, scope);
                }
            }
            Expr::Invoke { target, args, .. } => {
                self.check_expr(target, scope);
                for arg in args {
                    if let Argument::Value(value) = arg {
                        self.check_expr(value, scope);
                    }
                }
            }
            Expr::New { args, .. } => {
                for arg in args {
                    self.check_expr(arg, scope);
                }
            }
        }
    }

    fn undeclared(&mut self, name: &str) {
        self.error(
            "CS0103",
            format!("The name '{}' does not exist in the current context", name),
        );
    }

    fn missing_member(&mut self, name: &str) {
        let unit = self.unit;
        let class = unit.class_name.as_str();
        self.error(
            "CS1061",
            format!("'{}' does not contain a definition for '{}'", class, name),
        );
    }
}
