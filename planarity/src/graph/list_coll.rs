// Copyright (c) The planarity Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A collection of circular doubly linked lists over a shared index arena.
//!
//! Each node index can belong to at most one list at a time; a list is
//! identified by its head node. The empty list is `NIL`. This backs the
//! pertinent-bicomp-root lists and the sorted DFS child lists, where the
//! node universe is the vertex range and links must be O(1) with no
//! per-node allocation.

use crate::graph::NIL;

#[derive(Clone, Copy, Debug)]
struct LcNode {
    prev: usize,
    next: usize,
}

#[derive(Clone, Debug)]
pub(crate) struct ListColl {
    nodes: Vec<LcNode>,
}

impl ListColl {
    pub fn new(n: usize) -> Self {
        ListColl {
            nodes: vec![LcNode { prev: NIL, next: NIL }; n],
        }
    }

    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.prev = NIL;
            node.next = NIL;
        }
    }

    // Returns `node`'s successor, unless the successor is the list head.
    pub fn get_next(&self, head: usize, node: usize) -> usize {
        if self.nodes[node].next == head {
            NIL
        } else {
            self.nodes[node].next
        }
    }

    // Returns `node`'s predecessor unless `node` is the head. Passing NIL
    // for `node` returns the head's predecessor, i.e. the last node.
    pub fn get_prev(&self, head: usize, node: usize) -> usize {
        if node == NIL {
            self.nodes[head].prev
        } else if node == head {
            NIL
        } else {
            self.nodes[node].prev
        }
    }

    // Appends `node` at the tail; returns the (possibly new) head.
    pub fn append(&mut self, head: usize, node: usize) -> usize {
        if head == NIL {
            self.nodes[node].prev = node;
            self.nodes[node].next = node;
            node
        } else {
            let tail = self.nodes[head].prev;
            self.nodes[node].next = head;
            self.nodes[node].prev = tail;
            self.nodes[tail].next = node;
            self.nodes[head].prev = node;
            head
        }
    }

    // Prepends `node`; returns the new head (always `node`).
    pub fn prepend(&mut self, head: usize, node: usize) -> usize {
        let head = self.append(head, node);
        self.nodes[head].prev
    }

    // Deletes `node` from the list with the given head; returns the new
    // head (NIL when the list becomes empty).
    pub fn delete(&mut self, head: usize, node: usize) -> usize {
        if self.nodes[head].next == head {
            self.nodes[head].prev = NIL;
            self.nodes[head].next = NIL;
            NIL
        } else {
            let prev = self.nodes[node].prev;
            let next = self.nodes[node].next;
            self.nodes[prev].next = next;
            self.nodes[next].prev = prev;
            if head == node {
                next
            } else {
                head
            }
        }
    }
}
