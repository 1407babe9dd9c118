//! The analysis model produced by the resolution pass.
//!
//! Scopes, bindings and references are stored in flat arenas addressed by
//! stable ids. Later passes (slot assignment, bytecode generation) traverse
//! these records; nothing in here is mutated once the pass has returned.

use ast::{DeclaratorId, FunctionId, SpecifierId, StmtId, SymbolId, ThisId};
use common::{hashmap::HashMap, id::KeyedVec, interner::StringId, key};

key!(pub struct ScopeId(u32));
key!(pub struct BindingId(u32));
key!(pub struct ReferenceId(u32));

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Param,
    Import,
    This,
}

impl BindingKind {
    /// Lexical kinds may not be redeclared within one scope.
    pub fn is_lexical(self) -> bool {
        matches!(
            self,
            BindingKind::Let | BindingKind::Const | BindingKind::Function
        )
    }
}

/// The syntax construct a scope originates from.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ScopeNode {
    Module,
    Function(FunctionId),
    /// The body block of a function, which has no statement node of its own.
    FunctionBody(FunctionId),
    Block(StmtId),
    For(StmtId),
}

/// The syntax construct which declared a binding.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum DeclNode {
    Function(FunctionId),
    Declarator(DeclaratorId),
    Param(SymbolId),
    ImportSpecifier(SpecifierId),
}

#[derive(Debug)]
pub struct Binding {
    pub kind: BindingKind,
    pub name: StringId,
    /// The scope owning this binding.
    pub scope: ScopeId,
    /// True iff declared with `const`.
    pub readonly: bool,
    /// Set when an assignment or update expression targets this binding.
    pub written_to: bool,
    /// Set when the binding is referenced from a function nested inside the
    /// owning function. Such bindings need closure-cell storage.
    pub accessed_by_nested_function: bool,
    pub exported: bool,
    /// The synthetic reference for the binding's own declaring identifier.
    pub self_reference: Option<ReferenceId>,
    pub declaration: Option<DeclNode>,
}

#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum ReferenceTarget {
    Binding(BindingId),
    /// Unresolved name, assumed to refer to a global.
    FreeVariable(StringId),
    /// `this` at module level, which evaluates to undefined.
    RootLevelThis,
}

#[derive(Debug)]
pub struct Reference {
    pub name: StringId,
    pub target: ReferenceTarget,
    /// Whether the use site and the binding live in the same function.
    pub in_local_function: bool,
    /// The scope the use site appears in.
    pub scope: ScopeId,
}

/// A function declaration nested directly in a scope, paired with the binding
/// it introduced.
#[derive(Clone, Copy, Debug)]
pub struct FunctionDeclaration {
    pub func: FunctionId,
    pub binding: BindingId,
}

#[derive(Debug)]
pub enum ScopeKind {
    Module {
        /// Generated name for the module entry function.
        entry_name: StringId,
        var_declarations: Vec<BindingId>,
        /// Exported bindings in declaration order.
        exports: Vec<BindingId>,
    },
    Function {
        /// Generated unique name used by the code generator.
        function_name: StringId,
        /// The declared name, for function declarations.
        declared_name: Option<StringId>,
        /// Present for ordinary functions, absent for arrows.
        this_binding: Option<BindingId>,
        parameters: Vec<BindingId>,
        var_declarations: Vec<BindingId>,
        /// Monotonic: set once some reference inside this function reaches a
        /// binding owned by an enclosing, non-module function.
        is_closure: bool,
    },
    Block {
        /// False for for-statement head and body scopes, which behave as if
        /// freshly instantiated on every iteration.
        same_lifetime_as_parent: bool,
    },
}

#[derive(Debug)]
pub struct Scope {
    pub node: ScopeNode,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Name to binding, unique per scope.
    pub bindings: HashMap<StringId, BindingId>,
    /// References originating directly in this scope, in resolution order.
    pub references: Vec<ReferenceId>,
    /// `let`/`const` bindings declared directly in this scope.
    pub lexical_declarations: Vec<BindingId>,
    /// Function declarations nested directly in this scope.
    pub function_declarations: Vec<FunctionDeclaration>,
    pub kind: ScopeKind,
}

impl Scope {
    pub fn is_function(&self) -> bool {
        matches!(self.kind, ScopeKind::Function { .. })
    }

    pub fn is_closure(&self) -> bool {
        matches!(self.kind, ScopeKind::Function { is_closure: true, .. })
    }

    pub fn binding(&self, name: StringId) -> Option<BindingId> {
        self.bindings.get(&name).copied()
    }
}

/// The side table entry recorded for every import binding, used later to link
/// the module against its dependencies.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub struct ImportEntry {
    /// The module source text, e.g. `"m"` in `import { a } from "m"`.
    pub source: StringId,
    pub specifier: SpecifierId,
}

/// The output of the resolution pass.
#[derive(Debug)]
pub struct Analysis {
    pub scopes: KeyedVec<ScopeId, Scope>,
    pub bindings: KeyedVec<BindingId, Binding>,
    pub references: KeyedVec<ReferenceId, Reference>,
    pub module_scope: ScopeId,
    /// Every function scope, in the order traversal entered them.
    pub functions: Vec<ScopeId>,
    /// Identifier node to the reference it resolved to.
    pub symbol_refs: KeyedVec<SymbolId, Option<ReferenceId>>,
    /// `this` node to the reference it resolved to.
    pub this_refs: KeyedVec<ThisId, Option<ReferenceId>>,
    /// Names which resolved to no binding, deduplicated in first-use order.
    /// Whether they exist as globals is a later concern.
    pub free_variables: Vec<StringId>,
    pub imports: HashMap<BindingId, ImportEntry>,
}

impl Analysis {
    /// The innermost function scope containing or equal to the given scope.
    /// Returns `None` for scopes at module level; the module scope is not a
    /// function scope.
    pub fn function_of(&self, scope: ScopeId) -> Option<ScopeId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if self.scopes[s].is_function() {
                return Some(s);
            }
            current = self.scopes[s].parent;
        }
        None
    }

    /// Search for a binding by name from the given scope outwards.
    pub fn lookup(&self, scope: ScopeId, name: StringId) -> Option<BindingId> {
        let mut current = Some(scope);
        while let Some(s) = current {
            if let Some(binding) = self.scopes[s].binding(name) {
                return Some(binding);
            }
            current = self.scopes[s].parent;
        }
        None
    }

    /// The module's exported bindings in declaration order.
    pub fn exports(&self) -> &[BindingId] {
        match self.scopes[self.module_scope].kind {
            ScopeKind::Module { ref exports, .. } => exports,
            _ => &[],
        }
    }

    /// The reference created for an identifier node.
    pub fn reference_of(&self, symbol: SymbolId) -> Option<ReferenceId> {
        self.symbol_refs.get(symbol).copied().flatten()
    }

    /// The reference created for a `this` node.
    pub fn reference_of_this(&self, this: ThisId) -> Option<ReferenceId> {
        self.this_refs.get(this).copied().flatten()
    }
}
