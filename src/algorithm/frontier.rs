use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use crate::common::Cell;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontierNode {
    pub position: Cell,
    pub f_cost: usize,
    pub g_cost: usize,
    // insertion order, breaks ties between equal f costs
    seq: u64,
}

// BinaryHeap is a max-heap: lower f cost first, then earlier insertion.
impl Ord for FrontierNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering policy for discovered but not yet expanded cells.
pub trait Frontier: Default {
    fn push(&mut self, position: Cell, f_cost: usize, g_cost: usize);

    fn pop(&mut self) -> Option<FrontierNode>;

    fn len(&self) -> usize;
}

/// First in, first out. The f cost is carried but never consulted.
#[derive(Debug, Default)]
pub struct FifoFrontier {
    queue: VecDeque<FrontierNode>,
    next_seq: u64,
}

impl Frontier for FifoFrontier {
    fn push(&mut self, position: Cell, f_cost: usize, g_cost: usize) {
        self.queue.push_back(FrontierNode {
            position,
            f_cost,
            g_cost,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<FrontierNode> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Lowest f cost first, FIFO among equal f costs.
#[derive(Debug, Default)]
pub struct PriorityFrontier {
    heap: BinaryHeap<FrontierNode>,
    next_seq: u64,
}

impl Frontier for PriorityFrontier {
    fn push(&mut self, position: Cell, f_cost: usize, g_cost: usize) {
        self.heap.push(FrontierNode {
            position,
            f_cost,
            g_cost,
            seq: self.next_seq,
        });
        self.next_seq += 1;
    }

    fn pop(&mut self) -> Option<FrontierNode> {
        self.heap.pop()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<F: Frontier>(mut frontier: F) -> Vec<Cell> {
        let mut order = Vec::new();
        while let Some(node) = frontier.pop() {
            order.push(node.position);
        }
        order
    }

    #[test]
    fn test_fifo_ignores_priority() {
        let mut frontier = FifoFrontier::default();
        frontier.push((0, 0), 5, 5);
        frontier.push((0, 1), 1, 1);
        frontier.push((0, 2), 3, 3);
        assert_eq!(frontier.len(), 3);
        assert_eq!(drain(frontier), vec![(0, 0), (0, 1), (0, 2)]);
    }

    #[test]
    fn test_priority_orders_by_f_then_insertion() {
        let mut frontier = PriorityFrontier::default();
        frontier.push((2, 2), 4, 1);
        frontier.push((0, 1), 2, 2);
        frontier.push((1, 0), 2, 0);
        frontier.push((0, 0), 1, 1);
        frontier.push((3, 3), 2, 2);
        assert_eq!(frontier.len(), 5);
        assert_eq!(
            drain(frontier),
            vec![(0, 0), (0, 1), (1, 0), (3, 3), (2, 2)]
        );
    }
}
