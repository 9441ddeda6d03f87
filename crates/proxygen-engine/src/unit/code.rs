//! Expressions and statements of generated member bodies

use crate::types::TypeRef;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Null,
    /// `this.name`
    Field(String),
    /// Method parameter
    Arg(String),
    /// Local variable
    Local(String),
    /// `target.name`
    Property { target: Box<Expr>, name: String },
    /// `target[key, ...]`
    Index { target: Box<Expr>, keys: Vec<Expr> },
    /// `target.method(args)`
    Invoke {
        target: Box<Expr>,
        method: String,
        args: Vec<Argument>,
    },
    /// `this.method` as a delegate target
    MethodRef(String),
    /// `new ty(args)`
    New { ty: TypeRef, args: Vec<Expr> },
    /// Dotted path emitted verbatim (service-locator initializers)
    Path(String),
}

impl Expr {
    pub fn property(self, name: impl Into<String>) -> Expr {
        Expr::Property {
            target: Box::new(self),
            name: name.into(),
        }
    }

    pub fn index(self, key: Expr) -> Expr {
        self.index_by(vec![key])
    }

    pub fn index_by(self, keys: Vec<Expr>) -> Expr {
        Expr::Index {
            target: Box::new(self),
            keys,
        }
    }

    pub fn invoke(self, method: impl Into<String>, args: Vec<Argument>) -> Expr {
        Expr::Invoke {
            target: Box::new(self),
            method: method.into(),
            args,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    Value(Expr),
    /// `out _`
    DiscardOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// `ty name = init;`
    Declare {
        ty: TypeRef,
        name: String,
        init: Option<Expr>,
    },
    Assign { target: Expr, value: Expr },
    Return(Option<Expr>),
    Expr(Expr),
    /// `target.event += handler;`
    Attach {
        target: Expr,
        event: String,
        handler: Expr,
    },
    /// `this.event?.Invoke(args);`
    Raise { event: String, args: Vec<Expr> },
}
