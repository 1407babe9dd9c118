//! Reference resolution and closure marking.
//!
//! Every identifier and `this` expression resolves to exactly one reference.
//! Resolution walks the scope chain from the use site outwards; a miss
//! produces a free-variable reference rather than an error, since the name
//! may still exist as a global at runtime.

use ast::{Expr, ExprId, SymbolId, ThisId};

use super::ResolvePass;
use crate::{
    model::{BindingId, Reference, ReferenceId, ReferenceTarget, ScopeId, ScopeKind},
    Error, Result,
};

impl<'a> ResolvePass<'a> {
    /// Resolve an identifier expression to a binding or a free variable.
    pub(super) fn reference_symbol(&mut self, sym: SymbolId) -> Result<()> {
        let name = self.ast[sym].name;
        let scope = self.current_scope()?;

        let reference = match self.res.lookup(scope, name) {
            Some(binding) => self.make_binding_reference(scope, binding)?,
            None => {
                if self.free_seen.insert(name) {
                    self.res.free_variables.push(name);
                }
                self.res.references.push(Reference {
                    name,
                    target: ReferenceTarget::FreeVariable(name),
                    in_local_function: false,
                    scope,
                })
            }
        };
        self.res.scopes[scope].references.push(reference);
        self.res.symbol_refs.insert_grow_default(sym, Some(reference));
        Ok(())
    }

    /// Resolve a `this` expression. Arrow functions have no `this` binding of
    /// their own, so the lookup skips them and lands on the innermost
    /// ordinary function. At module level `this` is undefined.
    pub(super) fn reference_this(&mut self, this: ThisId) -> Result<()> {
        let scope = self.current_scope()?;

        let reference = match self.find_this_binding(scope) {
            Some(binding) => self.make_binding_reference(scope, binding)?,
            None => self.res.references.push(Reference {
                name: self.atom_this,
                target: ReferenceTarget::RootLevelThis,
                in_local_function: false,
                scope,
            }),
        };
        self.res.scopes[scope].references.push(reference);
        self.res.this_refs.insert_grow_default(this, Some(reference));
        Ok(())
    }

    /// Build a reference to a resolved binding and apply closure marking when
    /// the use site sits in a function nested below the binding's owner.
    fn make_binding_reference(
        &mut self,
        scope: ScopeId,
        binding: BindingId,
    ) -> Result<ReferenceId> {
        let binding_scope = self.res.bindings[binding].scope;
        let referencing_function = self.res.function_of(scope);
        let owning_function = self.res.function_of(binding_scope);
        let in_local_function = referencing_function == owning_function;

        if !in_local_function {
            self.res.bindings[binding].accessed_by_nested_function = true;
            // Module-level bindings live in module slots reachable without a
            // closure environment. Anything below the module scope, including
            // bindings in root-level blocks, forces the chain of functions
            // between use site and owner into closures.
            if binding_scope != self.res.module_scope {
                self.mark_closure_chain(referencing_function, owning_function)?;
            }
        }

        Ok(self.res.references.push(Reference {
            name: self.res.bindings[binding].name,
            target: ReferenceTarget::Binding(binding),
            in_local_function,
            scope,
        }))
    }

    /// Mark every function from the referencing one (inclusive) up to the
    /// binding's owning function (exclusive) as a closure.
    fn mark_closure_chain(
        &mut self,
        referencing_function: Option<ScopeId>,
        owning_function: Option<ScopeId>,
    ) -> Result<()> {
        let mut current = referencing_function;
        while current != owning_function {
            let function = current.ok_or(Error::Internal {
                reason: "binding owner not on the referencing function's scope chain",
            })?;
            match self.res.scopes[function].kind {
                ScopeKind::Function {
                    ref mut is_closure, ..
                } => *is_closure = true,
                _ => {
                    return Err(Error::Internal {
                        reason: "function list contains a non-function scope",
                    })
                }
            }
            current = self.res.scopes[function]
                .parent
                .and_then(|parent| self.res.function_of(parent));
        }
        Ok(())
    }

    /// The `#this` binding visible from a scope, if any.
    fn find_this_binding(&self, scope: ScopeId) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let ScopeKind::Function { this_binding, .. } = self.res.scopes[s].kind {
                // An arrow's scope has no binding; keep walking outwards.
                if this_binding.is_some() {
                    return this_binding;
                }
            }
            current = self.res.scopes[s].parent;
        }
        None
    }

    /// Record a write through an assignment or update target. Only identifier
    /// targets touch bindings; member targets mutate objects, not variables.
    pub(super) fn mark_mutation(&mut self, target: ExprId) -> Result<()> {
        let sym = match self.ast[target] {
            Expr::Ident(sym) => sym,
            _ => return Ok(()),
        };
        let reference = self.res.reference_of(sym).ok_or(Error::Internal {
            reason: "assignment target was not resolved",
        })?;
        let binding = match self.res.references[reference].target {
            ReferenceTarget::Binding(binding) => binding,
            // Writing a free variable creates or updates a global.
            ReferenceTarget::FreeVariable(_) | ReferenceTarget::RootLevelThis => return Ok(()),
        };
        if self.res.bindings[binding].readonly {
            return Err(Error::AssignToReadonly {
                name: self.interner.lookup(self.ast[sym].name).to_string(),
                span: self.ast[sym].span,
            });
        }
        self.res.bindings[binding].written_to = true;
        Ok(())
    }
}
