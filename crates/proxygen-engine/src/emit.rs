//! C# source rendering
//!
//! Deterministic: the output depends only on the unit. Members are grouped by
//! kind (fields, constructor, events, methods) and keep their insertion order
//! within a group.

use std::fmt::Write;

use crate::types::TypeRef;
use crate::unit::{
    Argument, Constructor, Event, Expr, Field, FieldInit, Member, Method, Param, ProxyUnit, Stmt,
};

const HEADER: &str = "\
//------------------------------------------------------------------------------
// <auto-generated>
//     This code was generated by proxygen.
//
//     Changes to this file may cause incorrect behavior and will be lost if
//     the code is regenerated.
// </auto-generated>
//------------------------------------------------------------------------------
";

/// Render a finished unit to C# source text
pub fn emit(unit: &ProxyUnit) -> String {
    let mut w = SourceWriter::default();
    w.raw(HEADER);
    w.blank();
    w.line(&format!("namespace {}", unit.namespace));
    w.open();
    w.line(&format!("public class {}", unit.class_name));
    w.open();

    let mut first = true;
    let mut section = |w: &mut SourceWriter| {
        if !first {
            w.blank();
        }
        first = false;
    };

    let fields: Vec<&Field> = unit.fields().collect();
    if !fields.is_empty() {
        section(&mut w);
        for field in fields {
            emit_field(&mut w, field);
        }
    }

    for member in &unit.members {
        if let Member::Constructor(ctor) = member {
            section(&mut w);
            emit_constructor(&mut w, &unit.class_name, ctor);
        }
    }

    let events: Vec<&Event> = unit.events().collect();
    if !events.is_empty() {
        section(&mut w);
        for event in events {
            w.line(&format!(
                "public event {} {};",
                type_name(&event.handler_type),
                event.name
            ));
        }
    }

    for method in unit.methods() {
        section(&mut w);
        emit_method(&mut w, method);
    }

    w.close();
    w.close();
    w.finish()
}

/// C# spelling of a type, with keyword aliases for CLR primitives
pub fn type_name(ty: &TypeRef) -> String {
    let mut out = String::new();
    let base = if ty.is_generic() {
        ty.name()
    } else {
        keyword(ty.name()).unwrap_or(ty.name())
    };
    out.push_str(base);
    if ty.is_generic() {
        out.push('<');
        let args: Vec<String> = ty.args().iter().map(type_name).collect();
        out.push_str(&args.join(", "));
        out.push('>');
    }
    for _ in 0..ty.array_rank() {
        out.push_str("[]");
    }
    out
}

fn keyword(name: &str) -> Option<&'static str> {
    Some(match name {
        "System.Void" => "void",
        "System.Object" => "object",
        "System.String" => "string",
        "System.Boolean" => "bool",
        "System.Char" => "char",
        "System.Byte" => "byte",
        "System.SByte" => "sbyte",
        "System.Int16" => "short",
        "System.UInt16" => "ushort",
        "System.Int32" => "int",
        "System.UInt32" => "uint",
        "System.Int64" => "long",
        "System.UInt64" => "ulong",
        "System.Single" => "float",
        "System.Double" => "double",
        "System.Decimal" => "decimal",
        _ => return None,
    })
}

fn emit_field(w: &mut SourceWriter, field: &Field) {
    match &field.init {
        FieldInit::Fixed(path) => w.line(&format!(
            "private {} {} = {};",
            type_name(&field.ty),
            field.name,
            path
        )),
        FieldInit::ConstructorParam(_) => {
            w.line(&format!("private {} {};", type_name(&field.ty), field.name))
        }
    }
}

fn emit_constructor(w: &mut SourceWriter, class_name: &str, ctor: &Constructor) {
    w.line(&format!("public {}({})", class_name, params(&ctor.params)));
    emit_body(w, &ctor.body);
}

fn emit_method(w: &mut SourceWriter, method: &Method) {
    w.line(&format!(
        "public {} {}({})",
        type_name(&method.return_type),
        method.name,
        params(&method.params)
    ));
    emit_body(w, &method.body);
}

fn emit_body(w: &mut SourceWriter, body: &[Stmt]) {
    w.open();
    for stmt in body {
        w.line(&stmt_text(stmt));
    }
    w.close();
}

fn params(params: &[Param]) -> String {
    params
        .iter()
        .map(|p| format!("{} {}", type_name(&p.ty), p.name))
        .collect::<Vec<_>>()
        .join(", ")
}

fn stmt_text(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Declare { ty, name, init } => match init {
            Some(init) => format!("{} {} = {};", type_name(ty), name, expr_text(init)),
            None => format!("{} {};", type_name(ty), name),
        },
        Stmt::Assign { target, value } => {
            format!("{} = {};", expr_text(target), expr_text(value))
        }
        Stmt::Return(Some(value)) => format!("return {};", expr_text(value)),
        Stmt::Return(None) => "return;".to_string(),
        Stmt::Expr(expr) => format!("{};", expr_text(expr)),
        Stmt::Attach {
            target,
            event,
            handler,
        } => format!("{}.{} += {};", expr_text(target), event, expr_text(handler)),
        Stmt::Raise { event, args } => format!("this.{}?.Invoke({});", event, exprs(args)),
    }
}

fn exprs(args: &[Expr]) -> String {
    args.iter().map(expr_text).collect::<Vec<_>>().join(", ")
}

fn expr_text(expr: &Expr) -> String {
    match expr {
        Expr::Null => "null".to_string(),
        Expr::Field(name) | Expr::MethodRef(name) => format!("this.{}", name),
        Expr::Arg(name) | Expr::Local(name) => name.clone(),
        Expr::Property { target, name } => format!("{}.{}", expr_text(target), name),
        Expr::Index { target, keys } => format!("{}[{}]", expr_text(target), exprs(keys)),
        Expr::Invoke {
            target,
            method,
            args,
        } => {
            let args: Vec<String> = args
                .iter()
                .map(|a| match a {
                    Argument::Value(value) => expr_text(value),
                    Argument::DiscardOut => "out _".to_string(),
                })
                .collect();
            format!("{}.{}({})", expr_text(target), method, args.join(", "))
        }
        Expr::New { ty, args } => format!("new {}({})", type_name(ty), exprs(args)),
        Expr::Path(path) => path.clone(),
    }
}

#[derive(Default)]
struct SourceWriter {
    out: String,
    indent: usize,
}

impl SourceWriter {
    fn raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push_str("    ");
        }
        // Writing to a String cannot fail
        let _ = writeln!(self.out, "{}", text);
    }

    fn blank(&mut self) {
        self.out.push('\n');
    }

    fn open(&mut self) {
        self.line("{");
        self.indent += 1;
    }

    fn close(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unit::UnitAssembler;

    #[test]
    fn test_type_names_use_keywords() {
        assert_eq!(type_name(&TypeRef::int()), "int");
        assert_eq!(type_name(&TypeRef::void()), "void");
        assert_eq!(
            type_name(&TypeRef::sequence_of(TypeRef::new("System.String"))),
            "System.Collections.Generic.IEnumerable<string>"
        );
        assert_eq!(type_name(&TypeRef::new("System.Byte").array()), "byte[]");
        assert_eq!(type_name(&TypeRef::new("Ns.IElement")), "Ns.IElement");
    }

    #[test]
    fn test_emit_small_unit() {
        let mut unit = UnitAssembler::new("IThingNamespace", "IThingSvc", "var");
        let field = unit.constructor_field(&TypeRef::new("Ns.IThing"));
        let mut method = Method::new("GetId", TypeRef::int());
        method
            .body
            .push(Stmt::Return(Some(field.expr().property("Id"))));
        unit.push_method(method);
        let source = emit(&unit.finish());

        let expected = "\
namespace IThingNamespace
{
    public class IThingSvc
    {
        private Ns.IThing var1;

        public IThingSvc(Ns.IThing var0)
        {
            this.var1 = var0;
        }

        public int GetId()
        {
            return this.var1.Id;
        }
    }
}
";
        assert!(source.starts_with("//----"));
        assert!(source.ends_with(expected), "unexpected source:\n{}", source);
    }

    #[test]
    fn test_emit_is_repeatable() {
        let mut unit = UnitAssembler::new("N", "C", "var");
        unit.fixed_field(&TypeRef::new("Ns.IReg"), "Host.Registry.Element");
        let unit = unit.finish();
        let first = emit(&unit);
        let second = emit(&unit);
        assert_eq!(first, second);
        assert_eq!(first.matches("public C(").count(), 1);
        assert!(first.contains("private Ns.IReg var0 = Host.Registry.Element;"));
    }

    #[test]
    fn test_statement_forms() {
        let attach = Stmt::Attach {
            target: Expr::Field("var1".to_string()),
            event: "Changed".to_string(),
            handler: Expr::New {
                ty: TypeRef::generic("Host.ActionProxy", vec![TypeRef::new("Ns.Args")]),
                args: vec![Expr::MethodRef("RaiseChanged".to_string())],
            },
        };
        assert_eq!(
            stmt_text(&attach),
            "this.var1.Changed += new Host.ActionProxy<Ns.Args>(this.RaiseChanged);"
        );

        let raise = Stmt::Raise {
            event: "Changed".to_string(),
            args: vec![Expr::Null, Expr::Arg("var2".to_string())],
        };
        assert_eq!(stmt_text(&raise), "this.Changed?.Invoke(null, var2);");

        let call = Expr::Field("var1".to_string()).invoke(
            "TryGet",
            vec![Argument::Value(Expr::Arg("var2".to_string())), Argument::DiscardOut],
        );
        assert_eq!(expr_text(&call), "this.var1.TryGet(var2, out _)");
    }
}
