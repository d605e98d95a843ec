//! Graph algorithms (§4.6): impact radius, shortest path, cycle detection.
//! Pure functions over an adjacency view the [`super::GraphStore`] builds
//! from the database, so traversal logic stays independent of SQL.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::types::NodeId;

/// One hop discovered during impact-radius traversal.
#[derive(Debug, Clone)]
pub struct ImpactHit {
    pub node_id: NodeId,
    pub distance: u32,
}

/// `adjacency` maps a node to the neighbors reachable by one traversal step,
/// already filtered to the edge kinds the caller cares about and ordered by
/// neighbor id for deterministic output.
pub fn impact_radius(
    start: &NodeId,
    max_depth: u32,
    reverse_neighbors: impl Fn(&NodeId) -> Vec<NodeId>,
) -> Vec<ImpactHit> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(start.clone());

    let mut frontier = vec![start.clone()];
    let mut hits = Vec::new();
    let mut distance = 0;

    while distance < max_depth && !frontier.is_empty() {
        distance += 1;
        let mut next_frontier = Vec::new();
        for node in &frontier {
            for neighbor in reverse_neighbors(node) {
                if visited.insert(neighbor.clone()) {
                    hits.push(ImpactHit {
                        node_id: neighbor.clone(),
                        distance,
                    });
                    next_frontier.push(neighbor);
                }
            }
        }
        frontier = next_frontier;
    }

    hits
}

/// Plain BFS over the undirected union of edges, returning the node sequence
/// from `from` to `to` inclusive, or `None` if unreachable within `max_depth`.
pub fn find_path(
    from: &NodeId,
    to: &NodeId,
    max_depth: u32,
    undirected_neighbors: impl Fn(&NodeId) -> Vec<NodeId>,
) -> Option<Vec<NodeId>> {
    if from == to {
        return Some(vec![from.clone()]);
    }

    let mut parents: HashMap<NodeId, NodeId> = HashMap::new();
    let mut visited: HashSet<NodeId> = HashSet::new();
    visited.insert(from.clone());

    let mut queue = VecDeque::new();
    queue.push_back((from.clone(), 0u32));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for neighbor in undirected_neighbors(&current) {
            if visited.insert(neighbor.clone()) {
                parents.insert(neighbor.clone(), current.clone());
                if &neighbor == to {
                    return Some(reconstruct(&parents, from, to));
                }
                queue.push_back((neighbor, depth + 1));
            }
        }
    }

    None
}

fn reconstruct(parents: &HashMap<NodeId, NodeId>, from: &NodeId, to: &NodeId) -> Vec<NodeId> {
    let mut path = vec![to.clone()];
    let mut current = to.clone();
    while &current != from {
        let parent = parents.get(&current).expect("path reconstruction broke parent chain");
        path.push(parent.clone());
        current = parent.clone();
    }
    path.reverse();
    path
}

const MAX_REPORTED_CYCLES: usize = 20;

#[derive(Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// Three-color DFS cycle detection over edges already filtered to the cycle
/// kind set, neighbors ordered by target id.
pub fn find_circular_deps(
    all_nodes: &[NodeId],
    directed_neighbors: impl Fn(&NodeId) -> Vec<NodeId>,
) -> Vec<Vec<NodeId>> {
    let mut colors: HashMap<NodeId, Color> = all_nodes.iter().map(|n| (n.clone(), Color::White)).collect();
    let mut parent: HashMap<NodeId, NodeId> = HashMap::new();
    let mut cycles = Vec::new();

    for start in all_nodes {
        if cycles.len() >= MAX_REPORTED_CYCLES {
            break;
        }
        if colors.get(start) != Some(&Color::White) {
            continue;
        }
        visit(
            start,
            &directed_neighbors,
            &mut colors,
            &mut parent,
            &mut cycles,
        );
    }

    cycles
}

fn visit(
    node: &NodeId,
    neighbors: &impl Fn(&NodeId) -> Vec<NodeId>,
    colors: &mut HashMap<NodeId, Color>,
    parent: &mut HashMap<NodeId, NodeId>,
    cycles: &mut Vec<Vec<NodeId>>,
) {
    if cycles.len() >= MAX_REPORTED_CYCLES {
        return;
    }
    colors.insert(node.clone(), Color::Gray);

    for next in neighbors(node) {
        if cycles.len() >= MAX_REPORTED_CYCLES {
            return;
        }
        match colors.get(&next).copied().unwrap_or(Color::White) {
            Color::White => {
                parent.insert(next.clone(), node.clone());
                visit(&next, neighbors, colors, parent, cycles);
            }
            Color::Gray => {
                cycles.push(reconstruct_cycle(parent, node, &next));
            }
            Color::Black => {}
        }
    }

    colors.insert(node.clone(), Color::Black);
}

/// Walk the parent chain from `current` back to `target`, then close the
/// cycle by appending `target` again.
fn reconstruct_cycle(
    parent: &HashMap<NodeId, NodeId>,
    current: &NodeId,
    target: &NodeId,
) -> Vec<NodeId> {
    let mut chain = vec![current.clone()];
    let mut cursor = current.clone();
    while &cursor != target {
        match parent.get(&cursor) {
            Some(p) => {
                cursor = p.clone();
                chain.push(cursor.clone());
            }
            None => break,
        }
    }
    chain.reverse();
    chain.push(target.clone());
    chain
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> NodeId {
        NodeId::from(s.to_string())
    }

    #[test]
    fn impact_radius_excludes_start_and_respects_depth() {
        let graph: HashMap<&str, Vec<&str>> =
            [("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["d"])].into_iter().collect();
        let hits = impact_radius(&id("a"), 2, |n| {
            graph
                .get(n.as_str())
                .into_iter()
                .flatten()
                .map(|s| id(s))
                .collect()
        });
        let ids: Vec<&str> = hits.iter().map(|h| h.node_id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
        assert_eq!(hits[0].distance, 1);
        assert_eq!(hits[1].distance, 2);
    }

    #[test]
    fn find_path_returns_shortest_sequence() {
        let graph: HashMap<&str, Vec<&str>> =
            [("a", vec!["b", "c"]), ("b", vec!["d"]), ("c", vec!["d"])].into_iter().collect();
        let path = find_path(&id("a"), &id("d"), 5, |n| {
            graph
                .get(n.as_str())
                .into_iter()
                .flatten()
                .map(|s| id(s))
                .collect()
        });
        assert_eq!(path.unwrap().len(), 3);
    }

    #[test]
    fn find_path_same_node_is_trivial() {
        let path = find_path(&id("a"), &id("a"), 5, |_| vec![]);
        assert_eq!(path.unwrap(), vec![id("a")]);
    }

    #[test]
    fn find_path_unreachable_is_none() {
        let path = find_path(&id("a"), &id("z"), 5, |_| vec![]);
        assert!(path.is_none());
    }

    #[test]
    fn detects_a_simple_cycle() {
        let graph: HashMap<&str, Vec<&str>> =
            [("a", vec!["b"]), ("b", vec!["c"]), ("c", vec!["a"])].into_iter().collect();
        let nodes = vec![id("a"), id("b"), id("c")];
        let cycles = find_circular_deps(&nodes, |n| {
            graph
                .get(n.as_str())
                .into_iter()
                .flatten()
                .map(|s| id(s))
                .collect()
        });
        assert_eq!(cycles.len(), 1);
        let cycle = &cycles[0];
        assert_eq!(cycle.first(), cycle.last());
        assert!(cycle.len() >= 3);
    }

    #[test]
    fn acyclic_graph_reports_no_cycles() {
        let graph: HashMap<&str, Vec<&str>> = [("a", vec!["b"]), ("b", vec!["c"])].into_iter().collect();
        let nodes = vec![id("a"), id("b"), id("c")];
        let cycles = find_circular_deps(&nodes, |n| {
            graph
                .get(n.as_str())
                .into_iter()
                .flatten()
                .map(|s| id(s))
                .collect()
        });
        assert!(cycles.is_empty());
    }
}
