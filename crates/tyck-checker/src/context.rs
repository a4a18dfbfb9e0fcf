//! Diagnostic contexts.
//!
//! A context receives failure frames from checkers during recursive
//! descent. Two behaviors exist behind one sum type:
//! - `Noop` tracks a single failure bit and records nothing; it backs the
//!   fast `test` path and the compile-time "does this accept Undefined?"
//!   probe.
//! - `Detail` records frames `(key, message, score)` leaf-first, adopts
//!   completed forks as parallel failure groups, and resolves union
//!   branches to the most informative one.
//!
//! Frames are pushed leaf-first: the innermost failure lands first and
//! ancestors append their path keys afterwards, so rendering walks the
//! frame stack from the end to assemble `root.a.b[3]` and reports the
//! innermost message.

use std::sync::Arc;

use smallvec::SmallVec;
use tyck_common::{ErrorDetail, ValidationError};

/// One path component of a failure frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// No path contribution; the frame only carries a message or score.
    None,
    Prop(Arc<str>),
    Index(usize),
}

#[derive(Debug, Clone)]
struct Frame {
    key: Key,
    message: Option<Arc<str>>,
    score: i32,
}

/// A diagnostic context, one per top-level validation call.
#[derive(Debug)]
pub enum Ctx {
    Noop(NoopCtx),
    Detail(DetailCtx),
}

/// Records only whether anything failed.
#[derive(Debug, Default)]
pub struct NoopCtx {
    failed: bool,
}

/// Records frames and completed fork groups for error rendering.
#[derive(Debug, Default)]
pub struct DetailCtx {
    frames: SmallVec<[Frame; 4]>,
    /// Completed forks that failed: parallel failure groups, each a
    /// self-contained sub-context (sibling properties, intersection
    /// conjuncts, surviving union branches).
    groups: Vec<DetailCtx>,
}

/// Collects failing union branches for later resolution.
pub enum UnionResolver {
    Noop,
    Detail(Vec<DetailCtx>),
}

impl Ctx {
    pub fn noop() -> Ctx {
        Ctx::Noop(NoopCtx::default())
    }

    pub fn detail() -> Ctx {
        Ctx::Detail(DetailCtx::default())
    }

    /// Record a failure frame. Always returns `false` so checkers can
    /// `return ctx.fail(..)`.
    pub fn fail(&mut self, key: Key, message: Option<&Arc<str>>, score: i32) -> bool {
        match self {
            Ctx::Noop(c) => c.failed = true,
            Ctx::Detail(c) => c.frames.push(Frame {
                key,
                message: message.cloned(),
                score,
            }),
        }
        false
    }

    /// Whether any failure has been recorded.
    pub fn failed(&self) -> bool {
        match self {
            Ctx::Noop(c) => c.failed,
            Ctx::Detail(c) => c.failed(),
        }
    }

    /// An isolated child context for one conjunct, property or element.
    pub fn fork(&self) -> Ctx {
        match self {
            Ctx::Noop(_) => Ctx::noop(),
            Ctx::Detail(_) => Ctx::detail(),
        }
    }

    /// Fold a completed fork back in. Returns whether checking should
    /// keep gathering: a Detail context always continues so every
    /// sibling failure is reported; a Noop context short-circuits as
    /// soon as a fork has failed.
    pub fn complete_fork(&mut self, fork: Ctx) -> bool {
        match (self, fork) {
            (Ctx::Noop(c), Ctx::Noop(f)) => {
                c.failed |= f.failed;
                !f.failed
            }
            (Ctx::Detail(c), Ctx::Detail(f)) => {
                if f.failed() {
                    c.groups.push(f);
                }
                true
            }
            // forks never change variant
            _ => true,
        }
    }

    /// Start resolving a union: branches are evaluated in child contexts
    /// obtained from the resolver.
    pub fn union_resolver(&self) -> UnionResolver {
        match self {
            Ctx::Noop(_) => UnionResolver::Noop,
            Ctx::Detail(_) => UnionResolver::Detail(Vec::new()),
        }
    }

    /// All branches failed: promote the most informative one(s) into
    /// this context.
    pub fn resolve_union(&mut self, resolver: UnionResolver) {
        if let (Ctx::Detail(c), UnionResolver::Detail(branches)) = (self, resolver) {
            c.resolve_union(branches);
        }
    }

    /// Render the single best diagnostic, rooted at `root`.
    pub fn error(&self, root: &str) -> ValidationError {
        match self {
            Ctx::Detail(c) => c.error(root),
            Ctx::Noop(_) => ValidationError {
                path: root.to_string(),
                message: "is invalid".to_string(),
                details: Vec::new(),
            },
        }
    }

    /// Render every reported failure location, rooted at `root`.
    pub fn error_details(&self, root: &str) -> Vec<ErrorDetail> {
        match self {
            Ctx::Detail(c) => c.error_details(root),
            Ctx::Noop(_) => Vec::new(),
        }
    }
}

impl UnionResolver {
    /// A fresh child context for the next branch.
    pub fn branch(&self) -> Ctx {
        match self {
            UnionResolver::Noop => Ctx::noop(),
            UnionResolver::Detail(_) => Ctx::detail(),
        }
    }

    /// Keep a failed branch for resolution.
    pub fn commit(&mut self, branch: Ctx) {
        if let (UnionResolver::Detail(branches), Ctx::Detail(c)) = (self, branch) {
            branches.push(c);
        }
    }
}

impl DetailCtx {
    fn failed(&self) -> bool {
        !self.frames.is_empty() || !self.groups.is_empty()
    }

    /// The deepest failure chain: its depth, then its score. Own frames
    /// prefix every chain; among child groups the deepest (score-tied)
    /// chain wins. This ranks a branch by how far its best attempt got,
    /// so a sibling failure elsewhere in a losing branch cannot cancel a
    /// literal-mismatch penalty on its discriminant.
    fn chain_key(&self) -> (usize, i32) {
        let own_depth = self.frames.len();
        let own_score: i32 = self.frames.iter().map(|f| f.score).sum();
        match self.groups.iter().map(DetailCtx::chain_key).max() {
            Some((depth, score)) => (own_depth + depth, own_score + score),
            None => (own_depth, own_score),
        }
    }

    /// Pick the branch whose deepest chain ranks highest (later branches
    /// win exact ties) and promote it. A single winner is merged inline
    /// so ancestor annotations extend its path; several exact ties
    /// become parallel groups, one `validate` entry each. A winner with
    /// a non-positive chain score is dropped: the union's own summary
    /// message is more informative than a pile of generic mismatches.
    fn resolve_union(&mut self, branches: Vec<DetailCtx>) {
        let mut best: Option<(usize, i32)> = None;
        for b in &branches {
            let key = b.chain_key();
            if best.is_none_or(|k| key >= k) {
                best = Some(key);
            }
        }
        let Some(best) = best else { return };
        if best.1 <= 0 {
            return;
        }
        let mut survivors: Vec<DetailCtx> = branches
            .into_iter()
            .filter(|b| b.chain_key() == best)
            .collect();
        if survivors.len() == 1 {
            let b = survivors.remove(0);
            self.frames.extend(b.frames);
            self.groups.extend(b.groups);
        } else {
            self.groups.extend(survivors);
        }
    }

    /// Path through this context's own frames, outermost key first.
    fn path_from(&self, root: &str) -> String {
        let mut path = root.to_string();
        for frame in self.frames.iter().rev() {
            match &frame.key {
                Key::None => {}
                Key::Prop(name) => {
                    path.push('.');
                    path.push_str(name);
                }
                Key::Index(i) => {
                    path.push('[');
                    path.push_str(&i.to_string());
                    path.push(']');
                }
            }
        }
        path
    }

    /// Innermost recorded message.
    fn message(&self) -> Option<&Arc<str>> {
        self.frames.iter().find_map(|f| f.message.as_ref())
    }

    fn collect_details(&self, root: &str, out: &mut Vec<ErrorDetail>) {
        let path = self.path_from(root);
        if self.groups.is_empty() {
            let message = self
                .message()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            out.push(ErrorDetail::new(path, message));
        } else {
            // own frames are path glue; the leaf messages live in the groups
            for group in &self.groups {
                group.collect_details(&path, out);
            }
        }
    }

    fn error_details(&self, root: &str) -> Vec<ErrorDetail> {
        let mut out = Vec::new();
        if self.failed() {
            self.collect_details(root, &mut out);
        }
        out
    }

    fn error(&self, root: &str) -> ValidationError {
        let details = self.error_details(root);
        let (path, message) = details
            .first()
            .map(|d| (d.path.clone(), d.message.clone()))
            .unwrap_or_else(|| (root.to_string(), "is invalid".to_string()));
        ValidationError {
            path,
            message,
            details,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(s: &str) -> Arc<str> {
        Arc::from(s)
    }

    #[test]
    fn test_noop_records_nothing_but_tracks_failure() {
        let mut ctx = Ctx::noop();
        assert!(!ctx.failed());
        assert!(!ctx.fail(Key::None, Some(&msg("is not a number")), 0));
        assert!(ctx.failed());
        assert!(ctx.error_details("value").is_empty());
    }

    #[test]
    fn test_noop_fork_short_circuits() {
        let mut ctx = Ctx::noop();
        let mut f = ctx.fork();
        f.fail(Key::None, None, 0);
        assert!(!ctx.complete_fork(f), "noop stops gathering after a failed fork");
        assert!(ctx.failed());

        let clean = ctx.fork();
        assert!(ctx.complete_fork(clean), "clean forks keep going");
    }

    #[test]
    fn test_detail_renders_leaf_first_path() {
        // simulate value.children[0].value failing a number check
        let mut ctx = Ctx::detail();
        let mut prop_fork = ctx.fork();
        {
            let mut idx_fork = prop_fork.fork();
            {
                let mut leaf = idx_fork.fork();
                leaf.fail(Key::None, Some(&msg("is not a number")), 0);
                leaf.fail(Key::Prop(Arc::from("value")), None, 1);
                idx_fork.complete_fork(leaf);
            }
            idx_fork.fail(Key::Index(0), None, 1);
            prop_fork.complete_fork(idx_fork);
        }
        prop_fork.fail(Key::Prop(Arc::from("children")), None, 1);
        ctx.complete_fork(prop_fork);

        let details = ctx.error_details("value");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].path, "value.children[0].value");
        assert_eq!(details[0].message, "is not a number");

        let err = ctx.error("value");
        assert_eq!(err.to_string(), "value.children[0].value is not a number");
    }

    #[test]
    fn test_detail_gathers_sibling_failures() {
        let mut ctx = Ctx::detail();
        for (name, message) in [("age", "is missing"), ("name", "is not a string")] {
            let mut f = ctx.fork();
            f.fail(Key::Prop(Arc::from(name)), Some(&msg(message)), 1);
            assert!(ctx.complete_fork(f), "detail keeps gathering");
        }
        let details = ctx.error_details("value");
        let paths: Vec<&str> = details.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["value.age", "value.name"]);
    }

    #[test]
    fn test_union_resolver_picks_deepest_branch() {
        let mut ctx = Ctx::detail();
        let mut resolver = ctx.union_resolver();

        // branch 1: shallow failure, "is not a string" at the top
        let mut b1 = resolver.branch();
        b1.fail(Key::None, Some(&msg("is not a string")), 0);
        resolver.commit(b1);

        // branch 2: reached into a property before failing
        let mut b2 = resolver.branch();
        {
            let mut f = b2.fork();
            f.fail(Key::None, Some(&msg("is not a number")), 0);
            f.fail(Key::Prop(Arc::from("x")), None, 1);
            b2.complete_fork(f);
        }
        resolver.commit(b2);

        ctx.resolve_union(resolver);
        ctx.fail(Key::None, Some(&msg("is none of A, B")), 0);

        let details = ctx.error_details("value");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].path, "value.x");
        assert_eq!(details[0].message, "is not a number");
    }

    #[test]
    fn test_union_resolver_keeps_summary_for_generic_branches() {
        let mut ctx = Ctx::detail();
        let mut resolver = ctx.union_resolver();
        for message in ["is not a number", "is not a string"] {
            let mut b = resolver.branch();
            b.fail(Key::None, Some(&msg(message)), 0);
            resolver.commit(b);
        }
        ctx.resolve_union(resolver);
        ctx.fail(Key::None, Some(&msg("is none of number, string")), 0);

        let details = ctx.error_details("value");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].path, "value");
        assert_eq!(details[0].message, "is none of number, string");
    }

    #[test]
    fn test_union_resolver_discriminant_mismatch_ranks_low() {
        let mut ctx = Ctx::detail();
        let mut resolver = ctx.union_resolver();

        // wrong-discriminant branch: literal mismatch on kind (score -1)
        // plus a missing sibling property; its best chain scores 0
        let mut wrong = resolver.branch();
        {
            let mut f = wrong.fork();
            f.fail(Key::None, Some(&msg("is not \"b\"")), -1);
            f.fail(Key::Prop(Arc::from("kind")), None, 1);
            wrong.complete_fork(f);
            let mut f2 = wrong.fork();
            f2.fail(Key::Prop(Arc::from("y")), Some(&msg("is missing")), 1);
            wrong.complete_fork(f2);
        }
        resolver.commit(wrong);

        // matching branch: discriminant fine, one property failed deeper
        let mut close = resolver.branch();
        {
            let mut f = close.fork();
            f.fail(Key::None, Some(&msg("is not a number")), 0);
            f.fail(Key::Prop(Arc::from("x")), None, 1);
            close.complete_fork(f);
        }
        resolver.commit(close);

        ctx.resolve_union(resolver);
        ctx.fail(Key::None, Some(&msg("is none of A, B")), 0);

        let details = ctx.error_details("value");
        assert_eq!(details.len(), 1, "only the matching branch survives");
        assert_eq!(details[0].path, "value.x");
        assert_eq!(details[0].message, "is not a number");
    }

    #[test]
    fn test_union_resolver_ties_become_parallel_entries() {
        let mut ctx = Ctx::detail();
        let mut resolver = ctx.union_resolver();
        for name in ["x", "y"] {
            let mut b = resolver.branch();
            let mut f = b.fork();
            f.fail(Key::Prop(Arc::from(name)), Some(&msg("is missing")), 1);
            b.complete_fork(f);
            resolver.commit(b);
        }
        ctx.resolve_union(resolver);
        ctx.fail(Key::None, Some(&msg("is none of A, B")), 0);

        let details = ctx.error_details("value");
        let paths: Vec<&str> = details.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["value.x", "value.y"]);
    }
}
