use super::FoldingContext;
use crate::{Evaluate, RuleName};
use alloc::vec::Vec;

impl<'s, 'a, E: Evaluate<'s>> FoldingContext<'s, 'a, E> {
    /// Forget the references of a folded rule to its former children,
    /// deleting children that are no longer referred to.
    pub(super) fn prune(&mut self, parent: RuleName<'s>, children: Vec<RuleName<'s>>) {
        for child in children {
            self.index.unlink(parent, child);
            if !self.index.has_parents(child) && self.delete(child) {
                debug!("pruned {} after folding {}", child, parent)
            }
        }
    }
}
