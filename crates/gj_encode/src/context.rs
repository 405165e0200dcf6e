use foldhash::fast::RandomState;
use gj_reflect::Identity;
use hashbrown::HashSet;

/// Per-call traversal state: current depth and the identities of the
/// containers on the active path.
///
/// Identities are removed on the way back up, so a value shared by two
/// siblings is encoded twice instead of being mistaken for a cycle.
#[derive(Debug)]
pub(crate) struct TraversalContext {
    depth: usize,
    max_depth: usize,
    visited: HashSet<Identity, RandomState>,
}

impl TraversalContext {
    pub fn new(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
            visited: HashSet::with_hasher(RandomState::default()),
        }
    }

    /// Enters one nesting level and returns whether it is within bounds.
    #[inline]
    pub fn descend(&mut self) -> bool {
        self.depth += 1;
        self.depth <= self.max_depth
    }

    #[inline]
    pub fn ascend(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
    }

    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Marks `id` as on the active path. Returns `false` if it already was.
    #[inline]
    pub fn visit(&mut self, id: Identity) -> bool {
        self.visited.insert(id)
    }

    #[inline]
    pub fn leave(&mut self, id: Identity) {
        self.visited.remove(&id);
    }

    #[cfg(test)]
    pub fn is_clean(&self) -> bool {
        self.depth == 0 && self.visited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_bounds() {
        let mut ctx = TraversalContext::new(2);
        assert!(ctx.descend());
        assert!(ctx.descend());
        assert!(!ctx.descend());
        ctx.ascend();
        ctx.ascend();
        ctx.ascend();
        assert!(ctx.is_clean());
    }

    #[test]
    fn visit_and_leave() {
        let value = 7_u32;
        let id = Identity::of(&value).unwrap();
        let mut ctx = TraversalContext::new(4);

        assert!(ctx.visit(id));
        assert!(!ctx.visit(id));
        ctx.leave(id);
        assert!(ctx.is_clean());
        assert!(ctx.visit(id));
    }
}
