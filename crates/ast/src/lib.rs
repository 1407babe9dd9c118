//! The syntax tree for the supported grammar subset.
//!
//! Nodes are stored in flat arenas indexed by typed ids. The parser is the
//! producer of this tree; the resolution pass and later passes only read it.

use common::{id::KeyedVec, interner::StringId, key, span::Span};

key!(pub struct StmtId(u32));
key!(pub struct ExprId(u32));
key!(pub struct FunctionId(u32));
key!(pub struct SymbolId(u32));
key!(pub struct ThisId(u32));
key!(pub struct DeclaratorId(u32));
key!(pub struct ImportId(u32));
key!(pub struct ExportId(u32));
key!(pub struct SpecifierId(u32));

/// A single occurrence of an identifier in the source.
///
/// Every occurrence gets its own node so that the resolution pass can map
/// each one to exactly one reference.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct Symbol {
    pub name: StringId,
    pub span: Span,
}

/// A single occurrence of a `this` expression.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ThisExpr {
    pub span: Span,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum VariableKind {
    Const,
    Var,
    Let,
}

/// A declaration target.
///
/// Destructuring patterns are kept only as an opaque span so the resolution
/// pass can reject them with a proper source location.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum IdentOrPattern {
    Ident(SymbolId),
    Pattern(Span),
}

#[derive(Clone, Debug)]
pub struct Declarator {
    pub decl: IdentOrPattern,
    pub initializer: Option<ExprId>,
    pub span: Span,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum FunctionKind {
    Declaration,
    Expression,
    Arrow,
}

#[derive(Clone, Debug)]
pub enum FunctionBody {
    Block(Vec<StmtId>),
    Expr(ExprId),
}

#[derive(Clone, Debug)]
pub struct Function {
    pub kind: FunctionKind,
    /// The declared name. Present for declarations and named function
    /// expressions, absent for arrows and anonymous expressions.
    pub name: Option<SymbolId>,
    pub params: Vec<IdentOrPattern>,
    pub body: FunctionBody,
    pub span: Span,
}

/// The initializer clause of a c-style for loop.
#[derive(Clone, Debug)]
pub enum CstyleDecl {
    Empty,
    Expr(ExprId),
    Decl {
        kind: VariableKind,
        decl: Vec<DeclaratorId>,
    },
}

#[derive(Clone, Debug)]
pub enum Stmt {
    Block {
        list: Vec<StmtId>,
        span: Span,
    },
    VariableDecl {
        kind: VariableKind,
        decl: Vec<DeclaratorId>,
        span: Span,
    },
    Empty,
    Expr {
        expr: ExprId,
    },
    If {
        cond: ExprId,
        body: StmtId,
        r#else: Option<StmtId>,
    },
    While {
        cond: ExprId,
        body: StmtId,
    },
    For {
        init: CstyleDecl,
        cond: Option<ExprId>,
        update: Option<ExprId>,
        body: StmtId,
        span: Span,
    },
    Return {
        expr: Option<ExprId>,
        span: Span,
    },
    Function {
        func: FunctionId,
    },
    Import {
        decl: ImportId,
    },
    Export {
        decl: ExportId,
    },
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Literal {
    Number(f64),
    String(StringId),
    Boolean(bool),
    Null,
    Undefined,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Eq,
    NotEq,
    And,
    Or,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum UnaryOp {
    Neg,
    Pos,
    Not,
    TypeOf,
    Void,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum UpdateOp {
    Increment,
    Decrement,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Debug)]
pub enum Expr {
    Ident(SymbolId),
    This(ThisId),
    Literal(Literal),
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },
    Unary {
        op: UnaryOp,
        expr: ExprId,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        target: ExprId,
    },
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Member {
        object: ExprId,
        property: StringId,
    },
    Function(FunctionId),
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ImportedName {
    /// `import { a } from "m"` or `import { a as b } from "m"`.
    Named(StringId),
    /// `import a from "m"`.
    Default,
    /// `import * as a from "m"`.
    Namespace,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ImportSpecifier {
    pub local: SymbolId,
    pub imported: ImportedName,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ImportDecl {
    pub specifiers: Vec<SpecifierId>,
    /// The module source text, e.g. `"m"` in `import { a } from "m"`.
    pub source: StringId,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ExportDecl {
    /// `export const x = ..`, `export var x`, `export function f(){}`.
    Decl { stmt: StmtId, span: Span },
    /// `export { x, y }`; unsupported, kept so the pass can reject it.
    Specifiers { span: Span },
    /// `export .. from "m"`; unsupported, kept so the pass can reject it.
    ReExport { span: Span },
}

/// The root of a parsed module.
#[derive(Clone, Debug)]
pub struct Module {
    pub stmts: Vec<StmtId>,
    pub span: Span,
}

macro_rules! ast_arena {
    ($(pub $field:ident: KeyedVec<$id:ty, $node:ty>,)*) => {
        /// The node arenas of a parsed module.
        #[derive(Default)]
        pub struct Ast {
            $(pub $field: KeyedVec<$id, $node>,)*
        }

        $(
            impl std::ops::Index<$id> for Ast {
                type Output = $node;

                fn index(&self, index: $id) -> &Self::Output {
                    &self.$field[index]
                }
            }

            impl std::ops::IndexMut<$id> for Ast {
                fn index_mut(&mut self, index: $id) -> &mut Self::Output {
                    &mut self.$field[index]
                }
            }
        )*
    };
}

ast_arena! {
    pub stmts: KeyedVec<StmtId, Stmt>,
    pub exprs: KeyedVec<ExprId, Expr>,
    pub functions: KeyedVec<FunctionId, Function>,
    pub symbols: KeyedVec<SymbolId, Symbol>,
    pub this_exprs: KeyedVec<ThisId, ThisExpr>,
    pub declarators: KeyedVec<DeclaratorId, Declarator>,
    pub imports: KeyedVec<ImportId, ImportDecl>,
    pub exports: KeyedVec<ExportId, ExportDecl>,
    pub specifiers: KeyedVec<SpecifierId, ImportSpecifier>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn push_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.push(stmt)
    }

    pub fn push_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.push(expr)
    }

    pub fn push_function(&mut self, func: Function) -> FunctionId {
        self.functions.push(func)
    }

    pub fn push_symbol(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol)
    }

    pub fn push_this(&mut self, this: ThisExpr) -> ThisId {
        self.this_exprs.push(this)
    }

    pub fn push_declarator(&mut self, decl: Declarator) -> DeclaratorId {
        self.declarators.push(decl)
    }

    pub fn push_import(&mut self, import: ImportDecl) -> ImportId {
        self.imports.push(import)
    }

    pub fn push_export(&mut self, export: ExportDecl) -> ExportId {
        self.exports.push(export)
    }

    pub fn push_specifier(&mut self, specifier: ImportSpecifier) -> SpecifierId {
        self.specifiers.push(specifier)
    }
}
