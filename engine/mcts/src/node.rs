//! MCTS tree node representation.
//!
//! A node is a decision point for `player`. It stores visit statistics from
//! that player's perspective and, once expanded, the state it was reached in.
//! Nodes hold no parent link; the search records each rollout's path instead.

use engine_core::{ActionId, Player};

/// Index into the node arena. Using a newtype for type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A node in the MCTS tree.
#[derive(Debug, Clone)]
pub struct MctsNode<S> {
    /// Player to move at this node
    pub player: Player,

    /// Prior probability assigned by the parent's expansion
    pub prior: f32,

    /// Number of rollouts through this node
    pub visit_count: u32,

    /// Sum of backed-up values, from `player`'s perspective
    pub value_sum: f32,

    /// Children in ascending action order; empty until expanded
    pub children: Vec<(ActionId, NodeId)>,

    /// Snapshot of the position; `Some` once expanded
    pub state: Option<S>,

    /// Value from `player`'s perspective if the game is over here
    pub terminal_value: Option<f32>,

    /// A child action that wins on the spot for `player`, found at expansion
    pub winning_action: Option<ActionId>,
}

impl<S> MctsNode<S> {
    /// Create an unexpanded node.
    pub fn new(player: Player, prior: f32) -> Self {
        Self {
            player,
            prior,
            visit_count: 0,
            value_sum: 0.0,
            children: Vec::new(),
            state: None,
            terminal_value: None,
            winning_action: None,
        }
    }

    /// Mean value `value_sum / visit_count`, 0 if never visited.
    #[inline]
    pub fn value(&self) -> f32 {
        if self.visit_count == 0 {
            0.0
        } else {
            self.value_sum / self.visit_count as f32
        }
    }

    #[inline]
    pub fn is_expanded(&self) -> bool {
        self.state.is_some()
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.terminal_value.is_some()
    }

    /// Child reached by `action`, if expanded with it.
    pub fn child(&self, action: ActionId) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&action, |&(a, _)| a)
            .ok()
            .map(|i| self.children[i].1)
    }
}

/// UCB score of a child as seen from its parent.
///
/// `c * prior * sqrt(parent_visits) / (1 + child_visits)`, plus `-child_value`
/// once the child has been visited. The child's value is negated because it is
/// recorded for the opponent.
#[inline]
pub fn ucb_score(
    c_puct: f32,
    prior: f32,
    parent_visits: u32,
    child_visits: u32,
    child_value: f32,
) -> f32 {
    let exploration = c_puct * prior * (parent_visits as f32).sqrt() / (1.0 + child_visits as f32);
    let exploitation = if child_visits == 0 { 0.0 } else { -child_value };
    exploration + exploitation
}
