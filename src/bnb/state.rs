//! Search states and the trail that stores their chosen sets.
//!
//! A [`SearchState`] is never modified once created; branching produces new
//! states. The chosen set of a state is a chain of [`Trail`] links (one link
//! per included item, pointing at the parent's link). Each state records the
//! trail length at its creation, and the explicit stack truncates the trail
//! back to that mark when the state is popped. Every state still on the
//! stack was created earlier, so its chain lies below the mark.

use crate::num::Value;

/// Node of the include/exclude decision tree.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SearchState<V> {
    /// Number of decided items (position in ratio order).
    pub depth: usize,
    pub remaining: V,
    pub profit: V,
    /// Last trail link of the chosen set.
    pub chosen: Option<usize>,
    /// Trail length when this state was created.
    pub mark: usize,
}

impl<V: Value> SearchState<V> {
    pub fn root(capacity: V) -> Self {
        Self {
            depth: 0,
            remaining: capacity,
            profit: V::ZERO,
            chosen: None,
            mark: 0,
        }
    }

    /// Child that takes the item at `self.depth`.
    ///
    /// `remaining` is the capacity left after packing it.
    pub fn include(&self, remaining: V, profit: V, trail: &mut Trail) -> Self {
        let link = trail.push(self.depth, self.chosen);
        Self {
            depth: self.depth + 1,
            remaining,
            profit: self.profit.plus(profit),
            chosen: Some(link),
            mark: trail.len(),
        }
    }

    /// Child that skips the item at `self.depth`.
    pub fn exclude(&self, trail: &Trail) -> Self {
        Self {
            depth: self.depth + 1,
            mark: trail.len(),
            ..*self
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Link {
    position: usize,
    parent: Option<usize>,
}

/// Arena of chosen-set links.
#[derive(Debug, Default)]
pub(crate) struct Trail {
    links: Vec<Link>,
}

impl Trail {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            links: Vec::with_capacity(n),
        }
    }

    /// Builds a trail holding one chain of the given sorted positions and
    /// returns it with the head of that chain.
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    pub fn from_positions(positions: &[usize]) -> (Self, Option<usize>) {
        let mut trail = Self::with_capacity(positions.len());
        let mut head = None;
        for &p in positions {
            head = Some(trail.push(p, head));
        }
        (trail, head)
    }

    #[inline]
    pub fn push(&mut self, position: usize, parent: Option<usize>) -> usize {
        self.links.push(Link { position, parent });
        self.links.len() - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.links.len()
    }

    #[inline]
    pub fn truncate(&mut self, mark: usize) {
        self.links.truncate(mark);
    }

    /// Positions of a chain, ascending.
    pub fn positions(&self, head: Option<usize>) -> Vec<usize> {
        let mut out = Vec::new();
        let mut cursor = head;
        while let Some(i) = cursor {
            let link = self.links[i];
            out.push(link.position);
            cursor = link.parent;
        }
        out.reverse();
        out
    }
}
