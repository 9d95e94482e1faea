use super::FoldingContext;
use crate::{Error, Evaluate, Expr, RuleName, Status};

impl<'s, 'a, E: Evaluate<'s>> FoldingContext<'s, 'a, E> {
    /// Replace the references to `target` in all its parents by `constant`.
    ///
    /// Parents that are avoided keep their references.
    pub(super) fn substitute(&mut self, target: RuleName<'s>, constant: &Expr<'s>) -> Result<(), Error> {
        for parent in self.index.parents(target) {
            if self.graph.get(parent).map_or(true, |r| self.opts.avoids(r)) {
                trace!("keep references to {} in {}", target, parent);
                continue;
            }
            let rule = match self.graph.get_mut(parent) {
                Some(rule) => rule,
                None => continue,
            };

            let mut replaced = 0;
            for e in rule.exprs_mut() {
                replaced += e.replace(target, constant)?;
            }
            if replaced > 0 && rule.status == Status::Unset {
                rule.status = Status::Partially
            }
            trace!("replaced {} references to {} in {}", replaced, target, parent);

            // contextual overrides of the target remain
            if !rule.exprs().any(|e| e.depends_on(target)) {
                self.index.unlink(parent, target)
            }
        }
        Ok(())
    }
}
