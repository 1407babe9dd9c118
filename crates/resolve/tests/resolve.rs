//! Integration tests driving the resolver over hand-built syntax trees.

use ast::{
    AssignOp, Ast, BinaryOp, CstyleDecl, DeclaratorId, Declarator, ExportDecl, Expr, ExprId,
    Function, FunctionBody, FunctionKind, IdentOrPattern, ImportDecl, ImportSpecifier,
    ImportedName, Literal, Module, Stmt, StmtId, Symbol, SymbolId, UpdateOp, VariableKind,
};
use common::{
    interner::Interner,
    span::Span,
};
use microjs_resolve::{
    resolve_module, Analysis, BindingId, BindingKind, Error, ReferenceTarget, ScopeId, ScopeKind,
    Unsupported,
};

/// Builds a syntax tree node by node, handing out distinct spans so errors
/// can be told apart.
struct Build {
    ast: Ast,
    interner: Interner,
    offset: usize,
}

impl Build {
    fn new() -> Build {
        Build {
            ast: Ast::new(),
            interner: Interner::new(),
            offset: 0,
        }
    }

    fn span(&mut self) -> Span {
        let offset = self.offset;
        self.offset += 1;
        Span::new(offset, 1)
    }

    fn sym(&mut self, name: &str) -> SymbolId {
        let name = self.interner.intern(name);
        let span = self.span();
        self.ast.push_symbol(Symbol { name, span })
    }

    fn ident(&mut self, name: &str) -> ExprId {
        let sym = self.sym(name);
        self.ast.push_expr(Expr::Ident(sym))
    }

    fn this(&mut self) -> ExprId {
        let span = self.span();
        let this = self.ast.push_this(ast::ThisExpr { span });
        self.ast.push_expr(Expr::This(this))
    }

    fn num(&mut self, value: f64) -> ExprId {
        self.ast.push_expr(Expr::Literal(Literal::Number(value)))
    }

    fn assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.ast.push_expr(Expr::Assign {
            op: AssignOp::Assign,
            target,
            value,
        })
    }

    fn add_assign(&mut self, target: ExprId, value: ExprId) -> ExprId {
        self.ast.push_expr(Expr::Assign {
            op: AssignOp::Add,
            target,
            value,
        })
    }

    fn increment(&mut self, target: ExprId) -> ExprId {
        self.ast.push_expr(Expr::Update {
            op: UpdateOp::Increment,
            prefix: false,
            target,
        })
    }

    fn binary(&mut self, op: BinaryOp, left: ExprId, right: ExprId) -> ExprId {
        self.ast.push_expr(Expr::Binary { op, left, right })
    }

    fn call(&mut self, callee: ExprId, args: Vec<ExprId>) -> ExprId {
        self.ast.push_expr(Expr::Call { callee, args })
    }

    fn expr_stmt(&mut self, expr: ExprId) -> StmtId {
        self.ast.push_stmt(Stmt::Expr { expr })
    }

    fn declarator(&mut self, name: &str, initializer: Option<ExprId>) -> DeclaratorId {
        let sym = self.sym(name);
        let span = self.span();
        self.ast.push_declarator(Declarator {
            decl: IdentOrPattern::Ident(sym),
            initializer,
            span,
        })
    }

    fn decl(&mut self, kind: VariableKind, name: &str, initializer: Option<ExprId>) -> StmtId {
        let decl = vec![self.declarator(name, initializer)];
        let span = self.span();
        self.ast.push_stmt(Stmt::VariableDecl { kind, decl, span })
    }

    fn block(&mut self, list: Vec<StmtId>) -> StmtId {
        let span = self.span();
        self.ast.push_stmt(Stmt::Block { list, span })
    }

    fn ret(&mut self, expr: Option<ExprId>) -> StmtId {
        let span = self.span();
        self.ast.push_stmt(Stmt::Return { expr, span })
    }

    fn params(&mut self, names: &[&str]) -> Vec<IdentOrPattern> {
        names
            .iter()
            .map(|name| IdentOrPattern::Ident(self.sym(name)))
            .collect()
    }

    fn function_decl(&mut self, name: &str, params: &[&str], body: Vec<StmtId>) -> StmtId {
        let name = Some(self.sym(name));
        let params = self.params(params);
        let span = self.span();
        let func = self.ast.push_function(Function {
            kind: FunctionKind::Declaration,
            name,
            params,
            body: FunctionBody::Block(body),
            span,
        });
        self.ast.push_stmt(Stmt::Function { func })
    }

    fn function_expr(&mut self, params: &[&str], body: Vec<StmtId>) -> ExprId {
        let params = self.params(params);
        let span = self.span();
        let func = self.ast.push_function(Function {
            kind: FunctionKind::Expression,
            name: None,
            params,
            body: FunctionBody::Block(body),
            span,
        });
        self.ast.push_expr(Expr::Function(func))
    }

    fn arrow(&mut self, params: &[&str], body: ExprId) -> ExprId {
        let params = self.params(params);
        let span = self.span();
        let func = self.ast.push_function(Function {
            kind: FunctionKind::Arrow,
            name: None,
            params,
            body: FunctionBody::Expr(body),
            span,
        });
        self.ast.push_expr(Expr::Function(func))
    }

    fn import(&mut self, names: &[&str], source: &str) -> StmtId {
        let specifiers = names
            .iter()
            .map(|name| {
                let local = self.sym(name);
                let imported = ImportedName::Named(self.ast[local].name);
                let span = self.span();
                self.ast.push_specifier(ImportSpecifier {
                    local,
                    imported,
                    span,
                })
            })
            .collect();
        let source = self.interner.intern(source);
        let span = self.span();
        let decl = self.ast.push_import(ImportDecl {
            specifiers,
            source,
            span,
        });
        self.ast.push_stmt(Stmt::Import { decl })
    }

    fn export(&mut self, stmt: StmtId) -> StmtId {
        let span = self.span();
        let decl = self.ast.push_export(ExportDecl::Decl { stmt, span });
        self.ast.push_stmt(Stmt::Export { decl })
    }

    fn resolve(&mut self, stmts: Vec<StmtId>) -> microjs_resolve::Result<Analysis> {
        let span = self.span();
        let module = Module { stmts, span };
        resolve_module(&self.ast, &module, &mut self.interner)
    }

    fn binding(&mut self, analysis: &Analysis, scope: ScopeId, name: &str) -> BindingId {
        let name = self.interner.intern(name);
        analysis.scopes[scope]
            .binding(name)
            .expect("binding not found in scope")
    }
}

fn function_scope(analysis: &Analysis, parent: ScopeId, index: usize) -> ScopeId {
    *analysis.scopes[parent]
        .children
        .iter()
        .filter(|&&child| analysis.scopes[child].is_function())
        .nth(index)
        .expect("function scope not found")
}

fn body_scope(analysis: &Analysis, function: ScopeId) -> ScopeId {
    analysis.scopes[function].children[0]
}

#[test]
fn resolves_module_local() {
    let mut b = Build::new();
    let init = b.num(1.0);
    let decl = b.decl(VariableKind::Let, "x", Some(init));
    let use_x = b.ident("x");
    let use_stmt = b.expr_stmt(use_x);
    let analysis = b.resolve(vec![decl, use_stmt]).unwrap();

    let x = b.binding(&analysis, analysis.module_scope, "x");
    let binding = &analysis.bindings[x];
    assert_eq!(binding.kind, BindingKind::Let);
    assert!(!binding.readonly);
    assert!(!binding.written_to);
    assert!(!binding.accessed_by_nested_function);

    let refs = &analysis.scopes[analysis.module_scope].references;
    assert_eq!(refs.len(), 1);
    let reference = &analysis.references[refs[0]];
    assert_eq!(reference.target, ReferenceTarget::Binding(x));
    assert!(reference.in_local_function);
    assert!(analysis.free_variables.is_empty());
}

#[test]
fn free_variables_dedupe_in_first_use_order() {
    let mut b = Build::new();
    let print1 = b.ident("print");
    let a1 = b.ident("a");
    let call1 = b.call(print1, vec![a1]);
    let stmt1 = b.expr_stmt(call1);
    let print2 = b.ident("print");
    let a2 = b.ident("a");
    let call2 = b.call(print2, vec![a2]);
    let stmt2 = b.expr_stmt(call2);
    let analysis = b.resolve(vec![stmt1, stmt2]).unwrap();

    let names: Vec<&str> = analysis
        .free_variables
        .iter()
        .map(|&name| b.interner.lookup(name))
        .collect();
    assert_eq!(names, ["print", "a"]);
    // Four references were still created, one per identifier occurrence.
    assert_eq!(analysis.scopes[analysis.module_scope].references.len(), 4);
}

#[test]
fn var_use_before_declaration_resolves() {
    let mut b = Build::new();
    let target = b.ident("x");
    let one = b.num(1.0);
    let assign = b.assign(target, one);
    let assign_stmt = b.expr_stmt(assign);
    let decl = b.decl(VariableKind::Var, "x", None);
    let analysis = b.resolve(vec![assign_stmt, decl]).unwrap();

    let x = b.binding(&analysis, analysis.module_scope, "x");
    assert_eq!(analysis.bindings[x].kind, BindingKind::Var);
    assert!(analysis.bindings[x].written_to);
    assert!(analysis.free_variables.is_empty());
}

#[test]
fn var_declarations_aggregate() {
    let mut b = Build::new();
    let first = b.decl(VariableKind::Var, "x", None);
    let second = b.decl(VariableKind::Var, "x", None);
    let inner = b.block(vec![second]);
    let analysis = b.resolve(vec![first, inner]).unwrap();

    assert_eq!(analysis.bindings.len(), 1);
    match analysis.scopes[analysis.module_scope].kind {
        ScopeKind::Module {
            ref var_declarations,
            ..
        } => assert_eq!(var_declarations.len(), 1),
        _ => unreachable!(),
    }
}

#[test]
fn var_aggregates_onto_parameter() {
    let mut b = Build::new();
    let decl = b.decl(VariableKind::Var, "a", None);
    let func = b.function_decl("f", &["a"], vec![decl]);
    let analysis = b.resolve(vec![func]).unwrap();

    let f = function_scope(&analysis, analysis.module_scope, 0);
    let a = b.binding(&analysis, f, "a");
    assert_eq!(analysis.bindings[a].kind, BindingKind::Param);
    match analysis.scopes[f].kind {
        ScopeKind::Function {
            ref parameters,
            ref var_declarations,
            ..
        } => {
            assert_eq!(parameters, &[a]);
            assert!(var_declarations.is_empty());
        }
        _ => unreachable!(),
    }
}

#[test]
fn let_redeclaration_is_an_error() {
    let mut b = Build::new();
    let first = b.decl(VariableKind::Let, "x", None);
    let second = b.decl(VariableKind::Let, "x", None);
    let err = b.resolve(vec![first, second]).unwrap_err();
    match err {
        Error::Redeclared {
            name,
            first_declared,
            ..
        } => {
            assert_eq!(name, "x");
            assert!(first_declared.is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn var_conflicts_with_lexical() {
    let mut b = Build::new();
    let var = b.decl(VariableKind::Var, "x", None);
    let lexical = b.decl(VariableKind::Let, "x", None);
    let err = b.resolve(vec![var, lexical]).unwrap_err();
    assert!(matches!(err, Error::Redeclared { .. }));
}

#[test]
fn duplicate_parameter_is_an_error() {
    let mut b = Build::new();
    let func = b.function_decl("f", &["a", "a"], vec![]);
    let err = b.resolve(vec![func]).unwrap_err();
    assert!(matches!(err, Error::Redeclared { .. }));
}

#[test]
fn assignment_to_const_is_an_error() {
    let mut b = Build::new();
    let init = b.num(1.0);
    let decl = b.decl(VariableKind::Const, "x", Some(init));
    let target = b.ident("x");
    let two = b.num(2.0);
    let assign = b.assign(target, two);
    let stmt = b.expr_stmt(assign);
    let err = b.resolve(vec![decl, stmt]).unwrap_err();
    match err {
        Error::AssignToReadonly { name, .. } => assert_eq!(name, "x"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn compound_assignment_to_const_is_an_error() {
    let mut b = Build::new();
    let init = b.num(1.0);
    let decl = b.decl(VariableKind::Const, "x", Some(init));
    let target = b.ident("x");
    let two = b.num(2.0);
    let assign = b.add_assign(target, two);
    let stmt = b.expr_stmt(assign);
    let err = b.resolve(vec![decl, stmt]).unwrap_err();
    assert!(matches!(err, Error::AssignToReadonly { .. }));
}

#[test]
fn update_of_const_is_an_error() {
    let mut b = Build::new();
    let init = b.num(1.0);
    let decl = b.decl(VariableKind::Const, "x", Some(init));
    let target = b.ident("x");
    let update = b.increment(target);
    let stmt = b.expr_stmt(update);
    let err = b.resolve(vec![decl, stmt]).unwrap_err();
    assert!(matches!(err, Error::AssignToReadonly { .. }));
}

#[test]
fn nested_function_captures_local() {
    let mut b = Build::new();
    let use_x = b.ident("x");
    let ret = b.ret(Some(use_x));
    let inner = b.function_decl("inner", &[], vec![ret]);
    let decl = b.decl(VariableKind::Let, "x", None);
    let outer = b.function_decl("outer", &[], vec![decl, inner]);
    let analysis = b.resolve(vec![outer]).unwrap();

    let outer = function_scope(&analysis, analysis.module_scope, 0);
    let outer_body = body_scope(&analysis, outer);
    let inner = function_scope(&analysis, outer_body, 0);

    let x = b.binding(&analysis, outer_body, "x");
    assert!(analysis.bindings[x].accessed_by_nested_function);
    assert!(analysis.scopes[inner].is_closure());
    assert!(!analysis.scopes[outer].is_closure());
}

#[test]
fn closure_chain_marks_intermediate_functions() {
    let mut b = Build::new();
    let use_x = b.ident("x");
    let ret = b.ret(Some(use_x));
    let innermost = b.function_decl("innermost", &[], vec![ret]);
    let middle = b.function_decl("middle", &[], vec![innermost]);
    let decl = b.decl(VariableKind::Let, "x", None);
    let outer = b.function_decl("outer", &[], vec![decl, middle]);
    let analysis = b.resolve(vec![outer]).unwrap();

    let outer = function_scope(&analysis, analysis.module_scope, 0);
    let middle = function_scope(&analysis, body_scope(&analysis, outer), 0);
    let innermost = function_scope(&analysis, body_scope(&analysis, middle), 0);

    // The intermediate function never touches `x` itself but must still
    // carry the environment chain.
    assert!(analysis.scopes[innermost].is_closure());
    assert!(analysis.scopes[middle].is_closure());
    assert!(!analysis.scopes[outer].is_closure());
}

#[test]
fn module_bindings_do_not_force_closures() {
    let mut b = Build::new();
    let decl = b.decl(VariableKind::Let, "x", None);
    let use_x = b.ident("x");
    let ret = b.ret(Some(use_x));
    let func = b.function_decl("f", &[], vec![ret]);
    let analysis = b.resolve(vec![decl, func]).unwrap();

    let f = function_scope(&analysis, analysis.module_scope, 0);
    let x = b.binding(&analysis, analysis.module_scope, "x");
    assert!(analysis.bindings[x].accessed_by_nested_function);
    assert!(!analysis.scopes[f].is_closure());
}

#[test]
fn root_level_block_bindings_force_closures() {
    let mut b = Build::new();
    let decl = b.decl(VariableKind::Let, "x", None);
    let use_x = b.ident("x");
    let ret = b.ret(Some(use_x));
    let func = b.function_decl("f", &[], vec![ret]);
    let outer = b.block(vec![decl, func]);
    let analysis = b.resolve(vec![outer]).unwrap();

    let block = analysis.scopes[analysis.module_scope].children[0];
    let f = function_scope(&analysis, block, 0);
    assert!(analysis.scopes[f].is_closure());
}

#[test]
fn for_scopes_have_fresh_lifetimes() {
    let mut b = Build::new();
    let zero = b.num(0.0);
    let init_decl = vec![b.declarator("i", Some(zero))];
    let i1 = b.ident("i");
    let n = b.ident("n");
    let cond = b.binary(BinaryOp::Less, i1, n);
    let i2 = b.ident("i");
    let update = b.increment(i2);
    let body_decl = b.decl(VariableKind::Let, "y", None);
    let body = b.block(vec![body_decl]);
    let span = b.span();
    let stmt = b.ast.push_stmt(Stmt::For {
        init: CstyleDecl::Decl {
            kind: VariableKind::Let,
            decl: init_decl,
        },
        cond: Some(cond),
        update: Some(update),
        body,
        span,
    });
    let analysis = b.resolve(vec![stmt]).unwrap();

    let head = analysis.scopes[analysis.module_scope].children[0];
    let body = analysis.scopes[head].children[0];
    for scope in [head, body] {
        match analysis.scopes[scope].kind {
            ScopeKind::Block {
                same_lifetime_as_parent,
            } => assert!(!same_lifetime_as_parent),
            _ => unreachable!(),
        }
    }
    let i = b.binding(&analysis, head, "i");
    assert!(analysis.bindings[i].written_to);
    assert!(b.binding(&analysis, body, "y") != i);
}

#[test]
fn module_level_this_is_undefined() {
    let mut b = Build::new();
    let this = b.this();
    let stmt = b.expr_stmt(this);
    let analysis = b.resolve(vec![stmt]).unwrap();

    let refs = &analysis.scopes[analysis.module_scope].references;
    assert_eq!(refs.len(), 1);
    assert_eq!(
        analysis.references[refs[0]].target,
        ReferenceTarget::RootLevelThis
    );
}

#[test]
fn function_this_resolves_to_own_binding() {
    let mut b = Build::new();
    let this = b.this();
    let ret = b.ret(Some(this));
    let func = b.function_decl("f", &[], vec![ret]);
    let analysis = b.resolve(vec![func]).unwrap();

    let f = function_scope(&analysis, analysis.module_scope, 0);
    let this_binding = match analysis.scopes[f].kind {
        ScopeKind::Function { this_binding, .. } => this_binding.unwrap(),
        _ => unreachable!(),
    };
    assert_eq!(analysis.bindings[this_binding].kind, BindingKind::This);
    assert!(!analysis.bindings[this_binding].readonly);
    assert!(!analysis.bindings[this_binding].accessed_by_nested_function);
}

#[test]
fn arrow_this_is_lexical_and_marks_closure() {
    let mut b = Build::new();
    let this = b.this();
    let arrow = b.arrow(&[], this);
    let decl = b.decl(VariableKind::Const, "g", Some(arrow));
    let func = b.function_decl("f", &[], vec![decl]);
    let analysis = b.resolve(vec![func]).unwrap();

    let f = function_scope(&analysis, analysis.module_scope, 0);
    let arrow = function_scope(&analysis, body_scope(&analysis, f), 0);
    let this_binding = match analysis.scopes[f].kind {
        ScopeKind::Function { this_binding, .. } => this_binding.unwrap(),
        _ => unreachable!(),
    };
    // The arrow has no binding of its own.
    match analysis.scopes[arrow].kind {
        ScopeKind::Function { this_binding, .. } => assert!(this_binding.is_none()),
        _ => unreachable!(),
    }
    assert!(analysis.bindings[this_binding].accessed_by_nested_function);
    assert!(analysis.scopes[arrow].is_closure());
    assert!(!analysis.scopes[f].is_closure());
}

#[test]
fn imports_and_exports_resolve() {
    let mut b = Build::new();
    let import = b.import(&["a"], "m");
    let use_a = b.ident("a");
    let decl = b.decl(VariableKind::Const, "x", Some(use_a));
    let export_x = b.export(decl);
    let func = b.function_decl("f", &[], vec![]);
    let export_f = b.export(func);
    let analysis = b.resolve(vec![import, export_x, export_f]).unwrap();

    let a = b.binding(&analysis, analysis.module_scope, "a");
    assert_eq!(analysis.bindings[a].kind, BindingKind::Import);
    assert!(!analysis.bindings[a].readonly);
    assert!(!analysis.bindings[a].exported);
    let entry = analysis.imports[&a];
    assert_eq!(b.interner.lookup(entry.source), "m");

    let x = b.binding(&analysis, analysis.module_scope, "x");
    let f = b.binding(&analysis, analysis.module_scope, "f");
    assert_eq!(analysis.bindings[x].kind, BindingKind::Const);
    assert_eq!(analysis.bindings[f].kind, BindingKind::Function);
    assert_eq!(analysis.exports(), &[x, f]);

    // The initializer reference resolved to the import binding.
    let refs = &analysis.scopes[analysis.module_scope].references;
    assert_eq!(refs.len(), 1);
    assert_eq!(analysis.references[refs[0]].target, ReferenceTarget::Binding(a));
}

#[test]
fn imports_are_writable() {
    let mut b = Build::new();
    let import = b.import(&["a"], "m");
    let target = b.ident("a");
    let one = b.num(1.0);
    let assign = b.assign(target, one);
    let stmt = b.expr_stmt(assign);
    let analysis = b.resolve(vec![import, stmt]).unwrap();

    let a = b.binding(&analysis, analysis.module_scope, "a");
    assert!(analysis.bindings[a].written_to);
}

#[test]
fn export_specifier_list_is_rejected() {
    let mut b = Build::new();
    let span = b.span();
    let decl = b.ast.push_export(ExportDecl::Specifiers { span });
    let stmt = b.ast.push_stmt(Stmt::Export { decl });
    let err = b.resolve(vec![stmt]).unwrap_err();
    assert!(matches!(
        err,
        Error::NotSupported {
            what: Unsupported::ExportForm,
            ..
        }
    ));
}

#[test]
fn pattern_parameter_is_rejected() {
    let mut b = Build::new();
    let name = Some(b.sym("f"));
    let span = b.span();
    let func = b.ast.push_function(Function {
        kind: FunctionKind::Declaration,
        name,
        params: vec![IdentOrPattern::Pattern(span)],
        body: FunctionBody::Block(vec![]),
        span,
    });
    let stmt = b.ast.push_stmt(Stmt::Function { func });
    let err = b.resolve(vec![stmt]).unwrap_err();
    assert!(matches!(
        err,
        Error::NotSupported {
            what: Unsupported::PatternParameter,
            ..
        }
    ));
}

#[test]
fn pattern_declaration_is_rejected() {
    let mut b = Build::new();
    let span = b.span();
    let decl = b.ast.push_declarator(Declarator {
        decl: IdentOrPattern::Pattern(span),
        initializer: None,
        span,
    });
    let stmt = b.ast.push_stmt(Stmt::VariableDecl {
        kind: VariableKind::Let,
        decl: vec![decl],
        span,
    });
    let err = b.resolve(vec![stmt]).unwrap_err();
    assert!(matches!(
        err,
        Error::NotSupported {
            what: Unsupported::PatternDeclaration,
            ..
        }
    ));
}

#[test]
fn named_function_expression_is_rejected() {
    let mut b = Build::new();
    let name = Some(b.sym("f"));
    let span = b.span();
    let func = b.ast.push_function(Function {
        kind: FunctionKind::Expression,
        name,
        params: vec![],
        body: FunctionBody::Block(vec![]),
        span,
    });
    let expr = b.ast.push_expr(Expr::Function(func));
    let stmt = b.expr_stmt(expr);
    let err = b.resolve(vec![stmt]).unwrap_err();
    assert!(matches!(
        err,
        Error::NotSupported {
            what: Unsupported::NamedFunctionExpression,
            ..
        }
    ));
}

#[test]
fn reserved_word_declaration_is_rejected() {
    let mut b = Build::new();
    let decl = b.decl(VariableKind::Let, "function", None);
    let err = b.resolve(vec![decl]).unwrap_err();
    match err {
        Error::InvalidIdentifier { name, .. } => assert_eq!(name, "function"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn function_names_are_unique() {
    let mut b = Build::new();
    // A declaration colliding with the generated module entry name.
    let entry_clash = b.function_decl("moduleEntry", &[], vec![]);
    let anon1 = b.function_expr(&[], vec![]);
    let stmt1 = b.expr_stmt(anon1);
    let anon2 = b.function_expr(&[], vec![]);
    let stmt2 = b.expr_stmt(anon2);
    let analysis = b.resolve(vec![entry_clash, stmt1, stmt2]).unwrap();

    let names: Vec<&str> = analysis
        .functions
        .iter()
        .map(|&scope| match analysis.scopes[scope].kind {
            ScopeKind::Function { function_name, .. } => b.interner.lookup(function_name),
            _ => unreachable!(),
        })
        .collect();
    assert_eq!(names, ["moduleEntry2", "anonymous", "anonymous2"]);
}

#[test]
fn every_identifier_gets_a_reference() {
    let mut b = Build::new();
    let use_x = b.ident("x");
    let free = b.ident("free");
    let sum = b.binary(BinaryOp::Add, use_x, free);
    let ret = b.ret(Some(sum));
    let func = b.function_decl("f", &["x"], vec![ret]);
    let decl = b.decl(VariableKind::Let, "y", None);
    let analysis = b.resolve(vec![func, decl]).unwrap();

    for sym in b.ast.symbols.keys() {
        assert!(
            analysis.reference_of(sym).is_some(),
            "identifier {:?} has no reference",
            b.interner.lookup(b.ast[sym].name),
        );
    }
}

#[test]
fn declarations_create_self_references_only() {
    let mut b = Build::new();
    let decl = b.decl(VariableKind::Let, "x", None);
    let analysis = b.resolve(vec![decl]).unwrap();

    let x = b.binding(&analysis, analysis.module_scope, "x");
    let self_ref = analysis.bindings[x].self_reference.unwrap();
    assert_eq!(
        analysis.references[self_ref].target,
        ReferenceTarget::Binding(x)
    );
    // The declaring identifier is not a use of the variable.
    assert!(analysis.scopes[analysis.module_scope].references.is_empty());
}

#[test]
fn render_lists_scopes_and_bindings() {
    let mut b = Build::new();
    let decl = b.decl(VariableKind::Const, "x", None);
    let export = b.export(decl);
    let use_x = b.ident("x");
    let ret = b.ret(Some(use_x));
    let func = b.function_decl("f", &[], vec![ret]);
    let analysis = b.resolve(vec![export, func]).unwrap();

    let rendered = analysis.render(&b.interner).to_string();
    assert!(rendered.contains("> MODULE moduleEntry"));
    assert!(rendered.contains("- x KIND: Const [readonly] [captured] [exported]"));
    assert!(rendered.contains("> FUNCTION f"));
    assert!(rendered.contains("* x -> Const x [outer]"));
    assert!(rendered.contains("EXPORT x"));
}
