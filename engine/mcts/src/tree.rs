//! MCTS tree structure with arena allocation.
//!
//! The tree uses arena allocation for efficient node storage and
//! cache-friendly traversal. Nodes are stored in a contiguous Vec
//! and referenced by NodeId indices. Ownership runs strictly parent to
//! child; re-rooting for tree reuse copies the kept subtree into a fresh
//! arena.

use engine_core::{ActionId, Player};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use thiserror::Error;

use crate::node::{ucb_score, MctsNode, NodeId};

/// Errors from tree operations invoked in the wrong node state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("node {0:?} has not been expanded")]
    NotExpanded(NodeId),

    #[error("node {0:?} is already expanded")]
    AlreadyExpanded(NodeId),

    #[error("node {0:?} has no children")]
    NoChildren(NodeId),
}

/// MCTS tree with arena-based node storage.
#[derive(Debug, Clone)]
pub struct MctsTree<S> {
    /// Arena storing all nodes
    nodes: Vec<MctsNode<S>>,

    /// Root node index (always 0)
    root: NodeId,
}

impl<S> MctsTree<S> {
    /// Create a tree holding a single unexpanded root for `player`.
    pub fn new(player: Player) -> Self {
        Self {
            nodes: vec![MctsNode::new(player, 1.0)],
            root: NodeId(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a reference to a node by ID.
    #[inline]
    pub fn get(&self, id: NodeId) -> &MctsNode<S> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable reference to a node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MctsNode<S> {
        &mut self.nodes[id.0 as usize]
    }

    /// Get the total number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty (never true after construction).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn allocate(&mut self, node: MctsNode<S>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Expand `id`: store its state and add one child per action with a
    /// positive prior, owned by the opponent.
    ///
    /// `priors` must be in ascending action order. `winning_action` is a child
    /// action that ends the game in the mover's favour, if any.
    pub fn expand(
        &mut self,
        id: NodeId,
        state: S,
        priors: &[(ActionId, f32)],
        winning_action: Option<ActionId>,
    ) -> Result<(), TreeError> {
        if self.get(id).is_expanded() {
            return Err(TreeError::AlreadyExpanded(id));
        }
        debug_assert!(priors.windows(2).all(|w| w[0].0 < w[1].0));

        let child_player = self.get(id).player.opponent();
        let mut children = Vec::with_capacity(priors.len());
        for &(action, prior) in priors {
            if prior > 0.0 {
                let child = self.allocate(MctsNode::new(child_player, prior));
                children.push((action, child));
            }
        }

        let node = self.get_mut(id);
        node.winning_action =
            winning_action.filter(|a| children.iter().any(|(action, _)| action == a));
        node.children = children;
        node.state = Some(state);
        Ok(())
    }

    /// Expand `id` as a finished game: no children, fixed `value` for its player.
    pub fn mark_terminal(&mut self, id: NodeId, state: S, value: f32) -> Result<(), TreeError> {
        if self.get(id).is_expanded() {
            return Err(TreeError::AlreadyExpanded(id));
        }
        let node = self.get_mut(id);
        node.state = Some(state);
        node.terminal_value = Some(value);
        Ok(())
    }

    /// Child to descend into from `id`.
    ///
    /// An immediately winning child is taken outright; otherwise the child
    /// with the highest UCB score, ties going to the lowest action id.
    pub fn select_child(&self, id: NodeId, c_puct: f32) -> Option<(ActionId, NodeId)> {
        let node = self.get(id);
        if let Some(action) = node.winning_action {
            return node.child(action).map(|child| (action, child));
        }

        let mut best: Option<((ActionId, NodeId), f32)> = None;
        for &(action, child_id) in &node.children {
            let child = self.get(child_id);
            let score = ucb_score(
                c_puct,
                child.prior,
                node.visit_count,
                child.visit_count,
                child.value(),
            );
            if best.map_or(true, |(_, top)| score > top) {
                best = Some(((action, child_id), score));
            }
        }
        best.map(|(choice, _)| choice)
    }

    /// Record one rollout's result along `path`.
    ///
    /// `value` is from the perspective of the player to move at the leaf, so
    /// nodes owned by `mover` (the leaf's parent player) receive `-value`.
    /// Every node's visit count goes up by one.
    pub fn backpropagate(&mut self, path: &[NodeId], value: f32, mover: Player) {
        for &id in path {
            let node = self.get_mut(id);
            node.visit_count += 1;
            node.value_sum += if node.player != mover { value } else { -value };
        }
    }

    /// Choose a move at `id` from visit counts.
    ///
    /// * `temperature == 0`: most visited child, lowest action id on ties
    /// * `temperature == inf`: uniform over children
    /// * otherwise: sample proportionally to `visits^(1 / temperature)`
    pub fn select_action<R: Rng + ?Sized>(
        &self,
        id: NodeId,
        temperature: f32,
        rng: &mut R,
    ) -> Result<ActionId, TreeError> {
        let node = self.get(id);
        if !node.is_expanded() {
            return Err(TreeError::NotExpanded(id));
        }
        if node.children.is_empty() {
            return Err(TreeError::NoChildren(id));
        }

        if temperature <= 0.0 {
            let mut best = node.children[0];
            for &(action, child) in &node.children[1..] {
                if self.get(child).visit_count > self.get(best.1).visit_count {
                    best = (action, child);
                }
            }
            return Ok(best.0);
        }

        let uniform = |rng: &mut R| node.children[rng.gen_range(0..node.children.len())].0;
        if temperature.is_infinite() {
            return Ok(uniform(rng));
        }

        // Scale by the top count so small temperatures don't overflow
        let top = node
            .children
            .iter()
            .map(|&(_, child)| self.get(child).visit_count)
            .max()
            .unwrap_or(0);
        if top == 0 {
            return Ok(uniform(rng));
        }
        let weights: Vec<f64> = node
            .children
            .iter()
            .map(|&(_, child)| {
                (self.get(child).visit_count as f64 / top as f64).powf(1.0 / temperature as f64)
            })
            .collect();

        match WeightedIndex::new(&weights) {
            Ok(dist) => Ok(node.children[dist.sample(rng)].0),
            Err(_) => Ok(uniform(rng)),
        }
    }

    /// Normalised root visit counts over the full action space.
    pub fn visit_policy(&self, num_actions: usize) -> Vec<f32> {
        let root = self.get(self.root);
        let mut policy = vec![0.0; num_actions];

        let total: u32 = root
            .children
            .iter()
            .map(|&(_, child)| self.get(child).visit_count)
            .sum();
        if total == 0 {
            return policy;
        }

        for &(action, child) in &root.children {
            if let Some(slot) = policy.get_mut(action) {
                *slot = self.get(child).visit_count as f32 / total as f32;
            }
        }
        policy
    }

    /// Re-root on the child reached by `action` from the root, dropping
    /// everything else. `None` if the root has no such child.
    pub fn into_subtree(self, action: ActionId) -> Option<Self> {
        let new_root = self.get(self.root).child(action)?;

        // Breadth-first order of the kept nodes gives their new indices
        let mut order = vec![new_root];
        let mut remap = vec![u32::MAX; self.nodes.len()];
        remap[new_root.0 as usize] = 0;
        let mut next = 0;
        while next < order.len() {
            for &(_, child) in &self.nodes[order[next].0 as usize].children {
                remap[child.0 as usize] = order.len() as u32;
                order.push(child);
            }
            next += 1;
        }

        let mut slots: Vec<Option<MctsNode<S>>> = self.nodes.into_iter().map(Some).collect();
        let nodes = order
            .iter()
            .filter_map(|id| slots[id.0 as usize].take())
            .map(|mut node| {
                for (_, child) in &mut node.children {
                    *child = NodeId(remap[child.0 as usize]);
                }
                node
            })
            .collect();

        Some(Self {
            nodes,
            root: NodeId(0),
        })
    }

    /// Get statistics about the tree for debugging.
    pub fn stats(&self) -> TreeStats {
        let root = self.get(self.root);
        TreeStats {
            total_nodes: self.nodes.len(),
            root_visits: root.visit_count,
            root_value: root.value(),
            max_depth: self.max_depth(),
        }
    }

    fn max_depth(&self) -> u32 {
        let mut deepest = 0;
        let mut stack = vec![(self.root, 0u32)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            for &(_, child) in &self.get(id).children {
                stack.push((child, depth + 1));
            }
        }
        deepest
    }
}

/// Statistics about an MCTS tree.
#[derive(Debug, Clone)]
pub struct TreeStats {
    pub total_nodes: usize,
    pub root_visits: u32,
    pub root_value: f32,
    pub max_depth: u32,
}
