//! A human readable dump of the analysis, for debugging and tests.

use std::fmt::{self, Write};

use common::{format::IndentFormatter, interner::Interner};

use crate::model::{Analysis, BindingId, ReferenceId, ReferenceTarget, ScopeId, ScopeKind};

pub struct RenderAnalysis<'a> {
    analysis: &'a Analysis,
    interner: &'a Interner,
}

impl RenderAnalysis<'_> {
    fn fmt_scope<W: fmt::Write>(
        &self,
        scope: ScopeId,
        f: &mut IndentFormatter<W>,
    ) -> fmt::Result {
        match self.analysis.scopes[scope].kind {
            ScopeKind::Module { entry_name, .. } => {
                writeln!(f, "> MODULE {}", &self.interner[entry_name])?;
            }
            ScopeKind::Function {
                function_name,
                is_closure,
                ..
            } => {
                write!(f, "> FUNCTION {}", &self.interner[function_name])?;
                if is_closure {
                    write!(f, " [closure]")?;
                }
                writeln!(f)?;
            }
            ScopeKind::Block {
                same_lifetime_as_parent,
            } => {
                write!(f, "> BLOCK")?;
                if !same_lifetime_as_parent {
                    write!(f, " [fresh lifetime]")?;
                }
                writeln!(f)?;
            }
        }
        f.indent(|f| {
            // Bindings in creation order; the per-scope map is unordered.
            for binding in self.analysis.bindings.keys() {
                if self.analysis.bindings[binding].scope == scope {
                    self.fmt_binding(binding, f)?;
                }
            }
            for &reference in &self.analysis.scopes[scope].references {
                self.fmt_reference(reference, f)?;
            }
            for &child in &self.analysis.scopes[scope].children {
                self.fmt_scope(child, f)?;
            }
            Ok(())
        })
    }

    fn fmt_reference<W: fmt::Write>(
        &self,
        reference: ReferenceId,
        f: &mut IndentFormatter<W>,
    ) -> fmt::Result {
        let reference = &self.analysis.references[reference];
        write!(f, "* {} -> ", &self.interner[reference.name])?;
        match reference.target {
            ReferenceTarget::Binding(binding) => {
                let binding = &self.analysis.bindings[binding];
                write!(f, "{:?} {}", binding.kind, &self.interner[binding.name])?;
                if !reference.in_local_function {
                    write!(f, " [outer]")?;
                }
            }
            ReferenceTarget::FreeVariable(_) => write!(f, "free")?,
            ReferenceTarget::RootLevelThis => write!(f, "undefined this")?,
        }
        writeln!(f)
    }

    fn fmt_binding<W: fmt::Write>(
        &self,
        binding: BindingId,
        f: &mut IndentFormatter<W>,
    ) -> fmt::Result {
        let binding = &self.analysis.bindings[binding];
        write!(
            f,
            "- {} KIND: {:?}",
            &self.interner[binding.name], binding.kind
        )?;
        if binding.readonly {
            write!(f, " [readonly]")?;
        }
        if binding.written_to {
            write!(f, " [written]")?;
        }
        if binding.accessed_by_nested_function {
            write!(f, " [captured]")?;
        }
        if binding.exported {
            write!(f, " [exported]")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for RenderAnalysis<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = IndentFormatter::new(f, 2);
        self.fmt_scope(self.analysis.module_scope, &mut f)?;
        for &name in &self.analysis.free_variables {
            writeln!(f, "FREE {}", &self.interner[name])?;
        }
        for &binding in self.analysis.exports() {
            let name = self.analysis.bindings[binding].name;
            writeln!(f, "EXPORT {}", &self.interner[name])?;
        }
        Ok(())
    }
}

impl Analysis {
    pub fn render<'a>(&'a self, interner: &'a Interner) -> RenderAnalysis<'a> {
        RenderAnalysis {
            analysis: self,
            interner,
        }
    }
}
