use core::fmt;
use std::error::Error;

/// A trait for errors which need additional context to display, like a source
/// file for resolving spans to line numbers.
pub trait ContextError<Ctx> {
    fn display(&self, f: &mut fmt::Formatter, ctx: &Ctx) -> fmt::Result;

    fn supply_context(self, ctx: &Ctx) -> SuppliedError<Ctx, Self>
    where
        Self: Sized,
    {
        SuppliedError {
            error: self,
            context: ctx,
        }
    }
}

/// An error bundled with the context it needs to display.
#[derive(Clone, Copy)]
pub struct SuppliedError<'a, C, E> {
    error: E,
    context: &'a C,
}

impl<C, E: fmt::Debug> fmt::Debug for SuppliedError<'_, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.fmt(f)
    }
}

impl<C, E: ContextError<C>> fmt::Display for SuppliedError<'_, C, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.error.display(f, self.context)
    }
}

impl<C, E: ContextError<C> + fmt::Debug> Error for SuppliedError<'_, C, E> {}

/// Trait for supplying context to the error of a result.
pub trait ContextResultExt<'a, Ctx> {
    type Output;

    fn supply_context(self, c: &'a Ctx) -> Self::Output;
}

impl<'a, C: 'a, T, E: ContextError<C>> ContextResultExt<'a, C> for Result<T, E> {
    type Output = Result<T, SuppliedError<'a, C, E>>;

    fn supply_context(self, c: &'a C) -> Self::Output {
        self.map_err(|error| SuppliedError { error, context: c })
    }
}
