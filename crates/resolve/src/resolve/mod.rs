//! The scope and binding resolution pass.
//!
//! A single recursive traversal drives everything. Entering a scope runs the
//! declaration scans first (module-wide `var` hoisting, shallow block
//! declarations), then descends into the statements, so every declaration in
//! a scope is registered before any reference in it or below it is resolved.

use ast::{Ast, CstyleDecl, Expr, FunctionBody, FunctionKind, IdentOrPattern, Module, Stmt, StmtId};
use common::{
    hashmap::{HashMap, HashSet},
    id::KeyedVec,
    interner::{Interner, StringId},
};

use crate::{
    model::{Analysis, Scope, ScopeId, ScopeKind, ScopeNode},
    Error, Result,
};

mod declare;
mod r#use;

/// Allocator for the generated unique function names handed to the code
/// generator. A small context value rather than global state.
#[derive(Default)]
struct FunctionNames {
    used: HashSet<String>,
}

impl FunctionNames {
    fn allocate(&mut self, base: &str) -> String {
        if !self.used.contains(base) {
            self.used.insert(base.to_string());
            return base.to_string();
        }
        let mut counter = 2u32;
        loop {
            let candidate = format!("{base}{counter}");
            if !self.used.contains(&candidate) {
                self.used.insert(candidate.clone());
                return candidate;
            }
            counter += 1;
        }
    }
}

/// Resolve all names in a parsed module, producing the analysis model
/// consumed by the slot assignment and bytecode generation passes.
pub fn resolve_module(ast: &Ast, module: &Module, interner: &mut Interner) -> Result<Analysis> {
    let mut function_names = FunctionNames::default();
    let entry = function_names.allocate("moduleEntry");
    let entry_name = interner.intern(&entry);

    let mut scopes = KeyedVec::new();
    let module_scope = scopes.push(Scope {
        node: ScopeNode::Module,
        parent: None,
        children: Vec::new(),
        bindings: HashMap::new(),
        references: Vec::new(),
        lexical_declarations: Vec::new(),
        function_declarations: Vec::new(),
        kind: ScopeKind::Module {
            entry_name,
            var_declarations: Vec::new(),
            exports: Vec::new(),
        },
    });

    let atom_this = interner.intern("#this");
    let mut pass = ResolvePass {
        ast,
        interner,
        res: Analysis {
            scopes,
            bindings: KeyedVec::new(),
            references: KeyedVec::new(),
            module_scope,
            functions: Vec::new(),
            symbol_refs: KeyedVec::new(),
            this_refs: KeyedVec::new(),
            free_variables: Vec::new(),
            imports: HashMap::new(),
        },
        scope_stack: vec![module_scope],
        free_seen: HashSet::new(),
        function_names,
        atom_this,
    };

    pass.find_imports_and_exports(&module.stmts)?;
    pass.hoist_vars(&module.stmts)?;
    pass.hoist_block_decls(&module.stmts)?;
    for &stmt in &module.stmts {
        pass.resolve_stmt(stmt)?;
    }
    pass.pop_scope(module_scope)?;

    if !pass.scope_stack.is_empty() {
        return Err(Error::Internal {
            reason: "scope stack not empty after resolving the module",
        });
    }
    Ok(pass.res)
}

pub(crate) struct ResolvePass<'a> {
    ast: &'a Ast,
    interner: &'a mut Interner,
    res: Analysis,
    scope_stack: Vec<ScopeId>,
    free_seen: HashSet<StringId>,
    function_names: FunctionNames,
    atom_this: StringId,
}

impl<'a> ResolvePass<'a> {
    fn current_scope(&self) -> Result<ScopeId> {
        self.scope_stack.last().copied().ok_or(Error::Internal {
            reason: "scope stack is empty",
        })
    }

    fn push_scope(&mut self, node: ScopeNode, kind: ScopeKind) -> ScopeId {
        let parent = self.scope_stack.last().copied();
        let is_function = matches!(kind, ScopeKind::Function { .. });
        let id = self.res.scopes.push(Scope {
            node,
            parent,
            children: Vec::new(),
            bindings: HashMap::new(),
            references: Vec::new(),
            lexical_declarations: Vec::new(),
            function_declarations: Vec::new(),
            kind,
        });
        if let Some(parent) = parent {
            self.res.scopes[parent].children.push(id);
        }
        if is_function {
            self.res.functions.push(id);
        }
        self.scope_stack.push(id);
        id
    }

    fn pop_scope(&mut self, expected: ScopeId) -> Result<()> {
        match self.scope_stack.pop() {
            Some(top) if top == expected => Ok(()),
            _ => Err(Error::Internal {
                reason: "scope stack mismatch on pop",
            }),
        }
    }

    fn allocate_function_name(&mut self, declared: Option<StringId>) -> StringId {
        let base = match declared {
            Some(name) => self.interner.lookup(name).to_string(),
            None => "anonymous".to_string(),
        };
        let unique = self.function_names.allocate(&base);
        self.interner.intern(&unique)
    }

    fn resolve_stmt(&mut self, stmt: StmtId) -> Result<()> {
        let ast = self.ast;
        match &ast[stmt] {
            Stmt::Block { list, .. } => {
                let scope = self.push_scope(
                    ScopeNode::Block(stmt),
                    ScopeKind::Block {
                        same_lifetime_as_parent: true,
                    },
                );
                self.hoist_block_decls(list)?;
                for &s in list {
                    self.resolve_stmt(s)?;
                }
                self.pop_scope(scope)
            }
            Stmt::VariableDecl { decl, .. } => {
                // Bindings were created by the hoisting scans; only the
                // initializers remain to be resolved.
                for &d in decl {
                    if let Some(init) = ast[d].initializer {
                        self.resolve_expr(init)?;
                    }
                }
                Ok(())
            }
            Stmt::Empty => Ok(()),
            Stmt::Expr { expr } => self.resolve_expr(*expr),
            Stmt::If { cond, body, r#else } => {
                self.resolve_expr(*cond)?;
                self.resolve_stmt(*body)?;
                if let Some(r#else) = r#else {
                    self.resolve_stmt(*r#else)?;
                }
                Ok(())
            }
            Stmt::While { cond, body } => {
                self.resolve_expr(*cond)?;
                self.resolve_stmt(*body)
            }
            Stmt::For {
                init,
                cond,
                update,
                body,
                ..
            } => self.resolve_for(stmt, init, *cond, *update, *body),
            Stmt::Return { expr, .. } => {
                if let Some(expr) = expr {
                    self.resolve_expr(*expr)?;
                }
                Ok(())
            }
            Stmt::Function { func } => self.resolve_function(*func),
            // Import bindings were created during import/export discovery.
            Stmt::Import { .. } => Ok(()),
            Stmt::Export { decl } => {
                match ast[*decl] {
                    ast::ExportDecl::Decl { stmt, .. } => self.resolve_stmt(stmt),
                    // Rejected during import/export discovery, so these are
                    // unreachable once the pass gets here.
                    ast::ExportDecl::Specifiers { .. } | ast::ExportDecl::ReExport { .. } => {
                        Ok(())
                    }
                }
            }
        }
    }

    /// The for-statement head gets its own scope which must behave as if
    /// freshly instantiated per iteration: a closure created in the body has
    /// to observe the loop variable's value of its own iteration. The body
    /// block is marked independently so its own locals start fresh each
    /// iteration as well.
    fn resolve_for(
        &mut self,
        stmt: StmtId,
        init: &CstyleDecl,
        cond: Option<ast::ExprId>,
        update: Option<ast::ExprId>,
        body: StmtId,
    ) -> Result<()> {
        let ast = self.ast;
        let scope = self.push_scope(
            ScopeNode::For(stmt),
            ScopeKind::Block {
                same_lifetime_as_parent: false,
            },
        );

        match init {
            CstyleDecl::Empty => {}
            CstyleDecl::Expr(expr) => self.resolve_expr(*expr)?,
            CstyleDecl::Decl { kind, decl } => {
                // `var` names were already hoisted to the enclosing function.
                if !matches!(kind, ast::VariableKind::Var) {
                    self.bind_variable_declaration(*kind, decl, false)?;
                }
                for &d in decl {
                    if let Some(init) = ast[d].initializer {
                        self.resolve_expr(init)?;
                    }
                }
            }
        }
        if let Some(cond) = cond {
            self.resolve_expr(cond)?;
        }
        if let Some(update) = update {
            self.resolve_expr(update)?;
        }

        match &ast[body] {
            Stmt::Block { list, .. } => {
                let body_scope = self.push_scope(
                    ScopeNode::Block(body),
                    ScopeKind::Block {
                        same_lifetime_as_parent: false,
                    },
                );
                self.hoist_block_decls(list)?;
                for &s in list {
                    self.resolve_stmt(s)?;
                }
                self.pop_scope(body_scope)?;
            }
            _ => self.resolve_stmt(body)?,
        }

        self.pop_scope(scope)
    }

    fn resolve_function(&mut self, func: ast::FunctionId) -> Result<()> {
        let ast = self.ast;
        let function = &ast[func];

        let declared_name = match function.kind {
            FunctionKind::Declaration => function.name.map(|sym| ast[sym].name),
            FunctionKind::Expression => {
                // A binding for the expression's own name would introduce
                // recursion semantics this resolver does not model.
                if let Some(sym) = function.name {
                    return Err(Error::NotSupported {
                        what: crate::error::Unsupported::NamedFunctionExpression,
                        span: ast[sym].span,
                    });
                }
                None
            }
            FunctionKind::Arrow => None,
        };

        let function_name = self.allocate_function_name(declared_name);
        let scope = self.push_scope(
            ScopeNode::Function(func),
            ScopeKind::Function {
                function_name,
                declared_name,
                this_binding: None,
                parameters: Vec::new(),
                var_declarations: Vec::new(),
                is_closure: false,
            },
        );

        // Arrows use lexical `this`, resolved through the parent chain.
        if !matches!(function.kind, FunctionKind::Arrow) {
            self.bind_this(scope)?;
        }

        for &param in &function.params {
            match param {
                IdentOrPattern::Ident(sym) => self.bind_parameter(scope, sym)?,
                IdentOrPattern::Pattern(span) => {
                    return Err(Error::NotSupported {
                        what: crate::error::Unsupported::PatternParameter,
                        span,
                    })
                }
            }
        }

        match &function.body {
            FunctionBody::Block(stmts) => {
                self.hoist_vars(stmts)?;
                // The body is its own block scope; lexical declarations in it
                // belong to the block, not the function scope.
                let body_scope = self.push_scope(
                    ScopeNode::FunctionBody(func),
                    ScopeKind::Block {
                        same_lifetime_as_parent: true,
                    },
                );
                self.hoist_block_decls(stmts)?;
                for &s in stmts {
                    self.resolve_stmt(s)?;
                }
                self.pop_scope(body_scope)?;
            }
            // Arrow expression bodies hoist nothing.
            FunctionBody::Expr(expr) => self.resolve_expr(*expr)?,
        }

        self.pop_scope(scope)
    }

    fn resolve_expr(&mut self, expr: ast::ExprId) -> Result<()> {
        let ast = self.ast;
        match &ast[expr] {
            Expr::Ident(sym) => self.reference_symbol(*sym),
            Expr::This(this) => self.reference_this(*this),
            Expr::Literal(_) => Ok(()),
            Expr::Binary { left, right, .. } => {
                self.resolve_expr(*left)?;
                self.resolve_expr(*right)
            }
            Expr::Unary { expr, .. } => self.resolve_expr(*expr),
            Expr::Update { target, .. } => {
                self.resolve_expr(*target)?;
                self.mark_mutation(*target)
            }
            Expr::Assign { target, value, .. } => {
                self.resolve_expr(*target)?;
                self.resolve_expr(*value)?;
                self.mark_mutation(*target)
            }
            Expr::Call { callee, args } => {
                self.resolve_expr(*callee)?;
                for &arg in args {
                    self.resolve_expr(arg)?;
                }
                Ok(())
            }
            // The property is not an identifier reference.
            Expr::Member { object, .. } => self.resolve_expr(*object),
            Expr::Function(func) => self.resolve_function(*func),
        }
    }
}
