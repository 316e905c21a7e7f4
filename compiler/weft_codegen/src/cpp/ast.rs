//! C++ syntax tree for generated glue.
//!
//! Only the handful of constructs the glue needs. Expressions render on a
//! single line through `Display`; items and statements are laid out by
//! [`super::CppWriter`].

use std::fmt;

/// A C++ expression.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Expr {
    /// Identifier, literal or any other atom rendered verbatim.
    Ident(String),
    /// `func(args)`; also used for `assert`, `dynamic_cast<T*>` and friends.
    Call { func: String, args: Vec<Expr> },
    /// `recv->method(args)`
    MethodCall {
        receiver: Box<Expr>,
        method: String,
        args: Vec<Expr>,
    },
    /// `((T)expr)`
    Cast { ty: String, expr: Box<Expr> },
    /// `base->field`
    Arrow { base: Box<Expr>, field: String },
    /// `object->fields[index].ptr`
    Slot { object: Box<Expr>, index: usize },
    Deref(Box<Expr>),
    AddrOf(Box<Expr>),
    /// `new T(args)`
    New { ty: String, args: Vec<Expr> },
    /// `lhs op rhs`, parenthesised when nested.
    Binary {
        op: &'static str,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// `[=](params) { [return ]body; }`
    Lambda {
        params: Vec<Param>,
        body: Box<Expr>,
        returns: bool,
    },
}

impl Expr {
    pub const NULL: &'static str = "NULL";

    pub fn ident(name: impl Into<String>) -> Self {
        Expr::Ident(name.into())
    }

    pub fn null() -> Self {
        Expr::ident(Self::NULL)
    }

    pub fn call(func: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: func.into(),
            args,
        }
    }

    /// Single-argument call, the shape of every value conversion.
    pub fn call1(func: impl Into<String>, arg: Expr) -> Self {
        Expr::call(func, vec![arg])
    }

    pub fn method_call(self, method: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall {
            receiver: Box::new(self),
            method: method.into(),
            args,
        }
    }

    pub fn cast(ty: impl Into<String>, expr: Expr) -> Self {
        Expr::Cast {
            ty: ty.into(),
            expr: Box::new(expr),
        }
    }

    pub fn arrow(self, field: impl Into<String>) -> Self {
        Expr::Arrow {
            base: Box::new(self),
            field: field.into(),
        }
    }

    pub fn slot(self, index: usize) -> Self {
        Expr::Slot {
            object: Box::new(self),
            index,
        }
    }

    pub fn deref(self) -> Self {
        Expr::Deref(Box::new(self))
    }

    pub fn addr_of(self) -> Self {
        Expr::AddrOf(Box::new(self))
    }

    pub fn new_object(ty: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::New {
            ty: ty.into(),
            args,
        }
    }

    pub fn binary(op: &'static str, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `(void*)&symbol`, the form every table entry takes.
    pub fn void_ptr_to(symbol: impl Into<String>) -> Self {
        Expr::cast("void*", Expr::ident(symbol).addr_of())
    }

    /// Whether the expression needs parentheses as the operand of `op`.
    fn needs_parens(&self, op: Precedence) -> bool {
        match self {
            Expr::Binary { .. } | Expr::Lambda { .. } => true,
            Expr::Deref(_) | Expr::AddrOf(_) | Expr::New { .. } => op == Precedence::Postfix,
            _ => false,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Precedence {
    /// `->`, calls, subscripts.
    Postfix,
    /// Casts, `*`, `&`.
    Unary,
}

/// Render an expression as the operand of an operator.
struct Operand<'a>(&'a Expr, Precedence);

impl fmt::Display for Operand<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.needs_parens(self.1) {
            write!(f, "({})", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[impl fmt::Display]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "{name}"),
            Expr::Call { func, args } => {
                write!(f, "{func}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::MethodCall {
                receiver,
                method,
                args,
            } => {
                write!(f, "{}->{method}(", Operand(receiver, Precedence::Postfix))?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::Cast { ty, expr } => write!(f, "(({ty}){})", Operand(expr, Precedence::Unary)),
            Expr::Arrow { base, field } => {
                write!(f, "{}->{field}", Operand(base, Precedence::Postfix))
            }
            Expr::Slot { object, index } => {
                write!(f, "{}->fields[{index}].ptr", Operand(object, Precedence::Postfix))
            }
            Expr::Deref(inner) => write!(f, "*{}", Operand(inner, Precedence::Unary)),
            Expr::AddrOf(inner) => write!(f, "&{}", Operand(inner, Precedence::Unary)),
            Expr::New { ty, args } => {
                write!(f, "new {ty}(")?;
                write_list(f, args)?;
                write!(f, ")")
            }
            Expr::Binary { op, lhs, rhs } => {
                write!(
                    f,
                    "{} {op} {}",
                    Operand(lhs, Precedence::Unary),
                    Operand(rhs, Precedence::Unary)
                )
            }
            Expr::Lambda {
                params,
                body,
                returns,
            } => {
                write!(f, "[=](")?;
                write_list(f, params)?;
                if *returns {
                    write!(f, ") {{ return {body}; }}")
                } else {
                    write!(f, ") {{ {body}; }}")
                }
            }
        }
    }
}

/// A typed parameter or field: `ty name`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Param {
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Param {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// A statement inside a function body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Stmt {
    Expr(Expr),
    /// `ty name[ = init];`
    Local { decl: Param, init: Option<Expr> },
    /// `target = value;`
    Assign { target: Expr, value: Expr },
    Return(Option<Expr>),
}

impl Stmt {
    pub fn local(ty: impl Into<String>, name: impl Into<String>, init: Expr) -> Self {
        Stmt::Local {
            decl: Param::new(ty, name),
            init: Some(init),
        }
    }

    pub fn assign(target: Expr, value: Expr) -> Self {
        Stmt::Assign { target, value }
    }

    pub fn ret(value: Expr) -> Self {
        Stmt::Return(Some(value))
    }

    /// `assert(cond);`
    pub fn assert(cond: Expr) -> Self {
        Stmt::Expr(Expr::call1("assert", cond))
    }
}

impl fmt::Display for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expr(expr) => write!(f, "{expr};"),
            Stmt::Local { decl, init: None } => write!(f, "{decl};"),
            Stmt::Local {
                decl,
                init: Some(init),
            } => write!(f, "{decl} = {init};"),
            Stmt::Assign { target, value } => write!(f, "{target} = {value};"),
            Stmt::Return(None) => write!(f, "return;"),
            Stmt::Return(Some(value)) => write!(f, "return {value};"),
        }
    }
}

/// A function signature: `ret name(params)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature {
    pub ret: String,
    /// May be qualified, e.g. `WeftButton::draw`.
    pub name: String,
    pub params: Vec<Param>,
}

impl Signature {
    pub fn new(ret: impl Into<String>, name: impl Into<String>, params: Vec<Param>) -> Self {
        Signature {
            ret: ret.into(),
            name: name.into(),
            params,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.ret.is_empty() {
            write!(f, "{}(", self.name)?;
        } else {
            write!(f, "{} {}(", self.ret, self.name)?;
        }
        write_list(f, &self.params)?;
        write!(f, ")")
    }
}

/// A function definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Function {
    pub sig: Signature,
    /// Constructor member initialisers, e.g. `Button(arg0)`.
    pub init_list: Vec<Expr>,
    pub body: Vec<Stmt>,
}

impl Function {
    pub fn new(sig: Signature, body: Vec<Stmt>) -> Self {
        Function {
            sig,
            init_list: Vec::new(),
            body,
        }
    }
}

/// A static initialiser.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Init {
    Expr(Expr),
    /// `{ a, b }`
    List(Vec<Init>),
    /// `{ .name = init, ... }`
    Designated(Vec<(String, Init)>),
}

impl Init {
    pub fn list(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Init::List(exprs.into_iter().map(Init::Expr).collect())
    }
}

impl fmt::Display for Init {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Init::Expr(expr) => write!(f, "{expr}"),
            Init::List(items) if items.is_empty() => write!(f, "{{}}"),
            Init::List(items) => {
                write!(f, "{{ ")?;
                write_list(f, items)?;
                write!(f, " }}")
            }
            Init::Designated(fields) => {
                write!(f, "{{ ")?;
                for (i, (name, init)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, ".{name} = {init}")?;
                }
                write!(f, " }}")
            }
        }
    }
}

/// A global variable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Global {
    /// Emit `__attribute__((__aligned__(8)))`; runtime tagging needs the low
    /// bits of every exported pointer clear.
    pub aligned: bool,
    pub is_extern: bool,
    pub decl: Param,
    pub init: Option<Init>,
}

impl Global {
    /// An 8-byte aligned global with an initialiser.
    pub fn aligned(ty: impl Into<String>, name: impl Into<String>, init: Init) -> Self {
        Global {
            aligned: true,
            is_extern: false,
            decl: Param::new(ty, name),
            init: Some(init),
        }
    }

    pub fn plain(ty: impl Into<String>, name: impl Into<String>, init: Init) -> Self {
        Global {
            aligned: false,
            ..Global::aligned(ty, name, init)
        }
    }

    /// `extern ty name;`
    pub fn extern_decl(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Global {
            aligned: false,
            is_extern: true,
            decl: Param::new(ty, name),
            init: None,
        }
    }
}

impl fmt::Display for Global {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_extern {
            write!(f, "extern ")?;
        }
        if self.aligned {
            write!(f, "__attribute__((__aligned__(8))) ")?;
        }
        write!(f, "{}", self.decl)?;
        if let Some(init) = &self.init {
            write!(f, " = {init}")?;
        }
        write!(f, ";")
    }
}

/// A class definition with private fields and public member declarations.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClassDef {
    pub name: String,
    pub base: String,
    pub fields: Vec<Param>,
    pub members: Vec<MemberDecl>,
}

/// A member function declaration inside a class body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemberDecl {
    pub is_virtual: bool,
    pub sig: Signature,
}

/// A top-level item of the generated source.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Item {
    /// Verbatim line(s): preprocessor directives, comments, inline glue.
    Raw(String),
    Blank,
    /// `class Name;`
    ForwardClass(String),
    Prototype(Signature),
    Function(Function),
    Global(Global),
    /// `extern "C" { ... }`
    ExternC(Vec<Global>),
    Class(ClassDef),
}
