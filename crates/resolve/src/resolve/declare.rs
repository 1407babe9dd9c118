//! Binding creation.
//!
//! All bindings in a scope are created before traversal descends into the
//! scope's statements, in three phases: import and export discovery at module
//! level, the function-wide `var` scan, and the shallow lexical scan run for
//! every block.

use ast::{ExportDecl, FunctionId, IdentOrPattern, SpecifierId, Stmt, StmtId, SymbolId, VariableKind};
use common::{interner::StringId, span::Span};

use super::ResolvePass;
use crate::{
    error::Unsupported,
    model::{
        Binding, BindingId, BindingKind, DeclNode, FunctionDeclaration, ImportEntry, Reference,
        ReferenceTarget, ScopeKind,
    },
    Error, Result,
};

impl<'a> ResolvePass<'a> {
    /// Scan the module's top-level statements for import and export
    /// declarations and create their bindings. Runs before the hoisting
    /// scans, which skip these statements entirely.
    pub(super) fn find_imports_and_exports(&mut self, stmts: &[StmtId]) -> Result<()> {
        let ast = self.ast;
        for &stmt in stmts {
            match ast[stmt] {
                Stmt::Import { decl } => {
                    let import = &ast[decl];
                    for &spec in &import.specifiers {
                        self.bind_import(spec, import.source)?;
                    }
                }
                Stmt::Export { decl } => match ast[decl] {
                    ExportDecl::Decl { stmt, span } => self.bind_export(stmt, span)?,
                    ExportDecl::Specifiers { span } | ExportDecl::ReExport { span } => {
                        return Err(Error::NotSupported {
                            what: Unsupported::ExportForm,
                            span,
                        })
                    }
                },
                _ => {}
            }
        }
        Ok(())
    }

    fn bind_import(&mut self, spec: SpecifierId, source: StringId) -> Result<()> {
        let specifier = self.ast[spec];
        let binding = self.create_binding_and_self_reference(
            BindingKind::Import,
            specifier.local,
            Some(DeclNode::ImportSpecifier(spec)),
            false,
        )?;
        self.res.imports.insert(binding, ImportEntry { source, specifier: spec });
        Ok(())
    }

    /// Bind an exported declaration with its declared kind and record it in
    /// the module's export list.
    fn bind_export(&mut self, stmt: StmtId, span: Span) -> Result<()> {
        let ast = self.ast;
        match &ast[stmt] {
            Stmt::VariableDecl { kind, decl, .. } => {
                self.bind_variable_declaration(*kind, decl, true)
            }
            Stmt::Function { func } => {
                self.bind_function_declaration(*func, true)?;
                Ok(())
            }
            _ => Err(Error::NotSupported {
                what: Unsupported::ExportForm,
                span,
            }),
        }
    }

    /// The function-wide `var` scan. Collects every `var` declared anywhere
    /// inside the current function into the current scope, without entering
    /// nested functions. Must run before the scope's body scope is pushed.
    pub(super) fn hoist_vars(&mut self, stmts: &[StmtId]) -> Result<()> {
        for &stmt in stmts {
            self.hoist_vars_stmt(stmt)?;
        }
        Ok(())
    }

    fn hoist_vars_stmt(&mut self, stmt: StmtId) -> Result<()> {
        let ast = self.ast;
        match &ast[stmt] {
            Stmt::VariableDecl { kind, decl, .. } => {
                if matches!(kind, VariableKind::Var) {
                    self.bind_variable_declaration(VariableKind::Var, decl, false)?;
                }
                Ok(())
            }
            Stmt::Block { list, .. } => self.hoist_vars(list),
            Stmt::If { body, r#else, .. } => {
                self.hoist_vars_stmt(*body)?;
                if let Some(r#else) = r#else {
                    self.hoist_vars_stmt(*r#else)?;
                }
                Ok(())
            }
            Stmt::While { body, .. } => self.hoist_vars_stmt(*body),
            Stmt::For { init, body, .. } => {
                if let ast::CstyleDecl::Decl {
                    kind: VariableKind::Var,
                    decl,
                } = init
                {
                    self.bind_variable_declaration(VariableKind::Var, decl, false)?;
                }
                self.hoist_vars_stmt(*body)
            }
            // Nested functions hoist their own vars; imports and exports were
            // bound during discovery.
            Stmt::Function { .. }
            | Stmt::Import { .. }
            | Stmt::Export { .. }
            | Stmt::Empty
            | Stmt::Expr { .. }
            | Stmt::Return { .. } => Ok(()),
        }
    }

    /// The shallow lexical scan run on entering a block: binds the block's
    /// direct `let`, `const` and function declarations so that forward
    /// references within the block resolve.
    pub(super) fn hoist_block_decls(&mut self, stmts: &[StmtId]) -> Result<()> {
        let ast = self.ast;
        for &stmt in stmts {
            match &ast[stmt] {
                Stmt::VariableDecl { kind, decl, .. } => {
                    if !matches!(kind, VariableKind::Var) {
                        self.bind_variable_declaration(*kind, decl, false)?;
                    }
                }
                Stmt::Function { func } => {
                    self.bind_function_declaration(*func, false)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    pub(super) fn bind_variable_declaration(
        &mut self,
        kind: VariableKind,
        decl: &[ast::DeclaratorId],
        exported: bool,
    ) -> Result<()> {
        let ast = self.ast;
        let kind = match kind {
            VariableKind::Const => BindingKind::Const,
            VariableKind::Let => BindingKind::Let,
            VariableKind::Var => BindingKind::Var,
        };
        for &d in decl {
            match ast[d].decl {
                IdentOrPattern::Ident(sym) => {
                    self.create_binding_and_self_reference(
                        kind,
                        sym,
                        Some(DeclNode::Declarator(d)),
                        exported,
                    )?;
                }
                IdentOrPattern::Pattern(span) => {
                    return Err(Error::NotSupported {
                        what: Unsupported::PatternDeclaration,
                        span,
                    })
                }
            }
        }
        Ok(())
    }

    pub(super) fn bind_function_declaration(
        &mut self,
        func: FunctionId,
        exported: bool,
    ) -> Result<BindingId> {
        let sym = self.ast[func].name.ok_or(Error::Internal {
            reason: "function declaration without a name",
        })?;
        let binding = self.create_binding_and_self_reference(
            BindingKind::Function,
            sym,
            Some(DeclNode::Function(func)),
            exported,
        )?;
        let scope = self.current_scope()?;
        self.res.scopes[scope]
            .function_declarations
            .push(FunctionDeclaration { func, binding });
        Ok(binding)
    }

    pub(super) fn bind_parameter(
        &mut self,
        scope: crate::model::ScopeId,
        sym: SymbolId,
    ) -> Result<()> {
        let binding = self.create_binding_and_self_reference(
            BindingKind::Param,
            sym,
            Some(DeclNode::Param(sym)),
            false,
        )?;
        match self.res.scopes[scope].kind {
            ScopeKind::Function {
                ref mut parameters, ..
            } => parameters.push(binding),
            _ => {
                return Err(Error::Internal {
                    reason: "parameter bound outside a function scope",
                })
            }
        }
        Ok(())
    }

    /// Create the `#this` binding of an ordinary function. Bypasses the
    /// identifier check since the name is a synthetic sentinel no source
    /// identifier can collide with.
    pub(super) fn bind_this(&mut self, scope: crate::model::ScopeId) -> Result<()> {
        let binding = self.res.bindings.push(Binding {
            kind: BindingKind::This,
            name: self.atom_this,
            scope,
            readonly: false,
            written_to: false,
            accessed_by_nested_function: false,
            exported: false,
            self_reference: None,
            declaration: None,
        });
        self.res.scopes[scope].bindings.insert(self.atom_this, binding);
        match self.res.scopes[scope].kind {
            ScopeKind::Function {
                ref mut this_binding,
                ..
            } => *this_binding = Some(binding),
            _ => {
                return Err(Error::Internal {
                    reason: "this bound outside a function scope",
                })
            }
        }
        Ok(())
    }

    /// Create a binding in the current scope, checking name validity and
    /// same-scope conflicts. A `var` meeting an existing `var` or parameter
    /// of the same name aggregates onto it instead of erroring.
    pub(super) fn create_binding(
        &mut self,
        kind: BindingKind,
        name: StringId,
        span: Span,
        declaration: Option<DeclNode>,
        exported: bool,
    ) -> Result<BindingId> {
        self.check_identifier(name, span)?;
        let scope = self.current_scope()?;

        if let Some(existing) = self.res.scopes[scope].binding(name) {
            let existing_kind = self.res.bindings[existing].kind;
            if kind == BindingKind::Var
                && matches!(existing_kind, BindingKind::Var | BindingKind::Param)
            {
                if exported {
                    self.mark_exported(existing);
                }
                return Ok(existing);
            }
            return Err(Error::Redeclared {
                name: self.interner.lookup(name).to_string(),
                span,
                first_declared: self.declaration_span(existing),
            });
        }

        let binding = self.res.bindings.push(Binding {
            kind,
            name,
            scope,
            readonly: matches!(kind, BindingKind::Const),
            written_to: false,
            accessed_by_nested_function: false,
            exported: false,
            self_reference: None,
            declaration,
        });
        self.res.scopes[scope].bindings.insert(name, binding);
        match kind {
            BindingKind::Let | BindingKind::Const | BindingKind::Function => {
                self.res.scopes[scope].lexical_declarations.push(binding);
            }
            BindingKind::Var => self.push_var_declaration(scope, binding)?,
            BindingKind::Param | BindingKind::Import | BindingKind::This => {}
        }
        if exported {
            self.mark_exported(binding);
        }
        Ok(binding)
    }

    /// Create a binding together with the synthetic reference for its own
    /// declaring identifier. The reference is recorded on the binding and in
    /// the per-node table, not in the scope's reference list.
    pub(super) fn create_binding_and_self_reference(
        &mut self,
        kind: BindingKind,
        sym: SymbolId,
        declaration: Option<DeclNode>,
        exported: bool,
    ) -> Result<BindingId> {
        let symbol = self.ast[sym];
        let binding = self.create_binding(kind, symbol.name, symbol.span, declaration, exported)?;
        let scope = self.current_scope()?;
        let reference = self.res.references.push(Reference {
            name: symbol.name,
            target: ReferenceTarget::Binding(binding),
            in_local_function: true,
            scope,
        });
        // A `var` aggregating onto an earlier binding keeps the first
        // declaration's self reference.
        if self.res.bindings[binding].self_reference.is_none() {
            self.res.bindings[binding].self_reference = Some(reference);
        }
        self.res.symbol_refs.insert_grow_default(sym, Some(reference));
        Ok(binding)
    }

    fn check_identifier(&self, name: StringId, span: Span) -> Result<()> {
        let text = self.interner.lookup(name);
        if common::ident::is_identifier(text) {
            Ok(())
        } else {
            Err(Error::InvalidIdentifier {
                name: text.to_string(),
                span,
            })
        }
    }

    fn push_var_declaration(&mut self, scope: crate::model::ScopeId, binding: BindingId) -> Result<()> {
        match self.res.scopes[scope].kind {
            ScopeKind::Module {
                ref mut var_declarations,
                ..
            }
            | ScopeKind::Function {
                ref mut var_declarations,
                ..
            } => {
                var_declarations.push(binding);
                Ok(())
            }
            ScopeKind::Block { .. } => Err(Error::Internal {
                reason: "var bound in a block scope",
            }),
        }
    }

    fn mark_exported(&mut self, binding: BindingId) {
        if self.res.bindings[binding].exported {
            return;
        }
        self.res.bindings[binding].exported = true;
        if let ScopeKind::Module {
            ref mut exports, ..
        } = self.res.scopes[self.res.module_scope].kind
        {
            exports.push(binding);
        }
    }

    /// Best-effort span of a binding's declaring identifier, for the second
    /// half of redeclaration errors.
    fn declaration_span(&self, binding: BindingId) -> Option<Span> {
        let ast = self.ast;
        match self.res.bindings[binding].declaration? {
            DeclNode::Function(func) => {
                let sym = ast[func].name?;
                Some(ast[sym].span)
            }
            DeclNode::Declarator(d) => Some(ast[d].span),
            DeclNode::Param(sym) => Some(ast[sym].span),
            DeclNode::ImportSpecifier(spec) => Some(ast[spec].span),
        }
    }
}
