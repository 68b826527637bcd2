use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet},
    time::{Duration, Instant},
};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    board::{expand, Board},
    heuristic::Algorithm,
};

/// Uniform-cost search on a hard scramble can run for a very long time.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(300);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Wall-clock budget; the search gives up once this much time has passed.
    pub time_limit: Duration,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }
}

impl SearchConfig {
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }
}

/// Index of a node in the arena owned by a single search.
pub type NodeId = usize;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    board: Board,
    g: u32,
    h: u32,
    parent: Option<NodeId>,
}

impl Node {
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves taken from the initial board.
    pub fn g(&self) -> u32 {
        self.g
    }

    /// Estimated moves remaining.
    pub fn h(&self) -> u32 {
        self.h
    }

    pub fn f(&self) -> u32 {
        self.g + self.h
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }
}

/// Min-queue of arena nodes keyed by `(f, h)`.
///
/// Exact ties come out in insertion order: arena ids only grow, so the id
/// doubles as an insertion sequence number.
#[derive(Default)]
struct Frontier {
    heap: BinaryHeap<Reverse<(u32, u32, NodeId)>>,
}

impl Frontier {
    fn push(&mut self, id: NodeId, node: &Node) {
        self.heap.push(Reverse((node.f(), node.h, id)));
    }

    fn pop(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|Reverse((_, _, id))| id)
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes whose successors were generated.
    pub expanded: usize,
    /// Largest frontier seen just before a pop.
    pub max_frontier: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SearchFailure {
    #[error("no solution: every reachable board was expanded")]
    Exhausted,

    #[error("no solution found within the {limit:?} time limit")]
    TimedOut { limit: Duration },
}

/// A goal node together with every node the search created, so the path
/// back to the initial board can be walked.
#[derive(Clone, Debug)]
pub struct Solution {
    nodes: Vec<Node>,
    goal: NodeId,
}

impl Solution {
    pub fn goal(&self) -> &Node {
        &self.nodes[self.goal]
    }

    pub fn depth(&self) -> u32 {
        self.goal().g
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    pub fn path(&self) -> Vec<&Node> {
        trace_solution(self)
    }
}

#[derive(Debug)]
pub struct SearchOutcome {
    pub stats: SearchStats,
    pub result: Result<Solution, SearchFailure>,
}

/// Best-first search from `initial` to [`GOAL`](crate::board::GOAL),
/// ordering the frontier by `f = g + h` and then by `h`.
///
/// Boards are never expanded twice. A successor that has already been
/// expanded is dropped; one that is merely waiting in the frontier is pushed
/// again, and whichever copy comes out first wins.
pub fn general_search(initial: &Board, algorithm: Algorithm, config: &SearchConfig) -> SearchOutcome {
    let started = Instant::now();

    let mut nodes = Vec::new();
    let mut frontier = Frontier::default();
    let mut explored = HashSet::new();
    let mut stats = SearchStats::default();

    let root = Node {
        board: *initial,
        g: 0,
        h: algorithm.estimate(initial),
        parent: None,
    };
    debug!(%algorithm, h = root.h, "starting search");
    frontier.push(0, &root);
    nodes.push(root);

    loop {
        if started.elapsed() >= config.time_limit {
            warn!(
                limit = ?config.time_limit,
                expanded = stats.expanded,
                "time limit reached, abandoning search"
            );
            return SearchOutcome {
                stats,
                result: Err(SearchFailure::TimedOut {
                    limit: config.time_limit,
                }),
            };
        }

        stats.max_frontier = stats.max_frontier.max(frontier.len());

        let id = match frontier.pop() {
            Some(id) => id,
            None => {
                warn!(expanded = stats.expanded, "frontier exhausted without reaching the goal");
                return SearchOutcome {
                    stats,
                    result: Err(SearchFailure::Exhausted),
                };
            }
        };

        let (board, g) = (nodes[id].board, nodes[id].g);
        if board.is_goal() {
            info!(
                depth = g,
                expanded = stats.expanded,
                max_frontier = stats.max_frontier,
                elapsed = ?started.elapsed(),
                "solved"
            );
            return SearchOutcome {
                stats,
                result: Ok(Solution { nodes, goal: id }),
            };
        }

        // a stale copy of a board that was expanded via another entry
        if !explored.insert(board) {
            continue;
        }
        stats.expanded += 1;

        for next in expand(&board) {
            if explored.contains(&next) {
                continue;
            }

            let child = Node {
                board: next,
                g: g + 1,
                h: algorithm.estimate(&next),
                parent: Some(id),
            };
            frontier.push(nodes.len(), &child);
            nodes.push(child);
        }
    }
}

/// Nodes from the initial board to the goal, in move order.
pub fn trace_solution(solution: &Solution) -> Vec<&Node> {
    let mut path = vec![solution.goal()];
    let mut current = solution.goal();
    while let Some(parent) = current.parent {
        current = solution.node(parent);
        path.push(current);
    }

    path.reverse();
    path
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::board::GOAL;

    const DEFAULT_PUZZLE: Board = Board::new([[1, 5, 2], [4, 3, 6], [7, 8, 0]]);

    fn solve(board: &Board, algorithm: Algorithm) -> (SearchStats, Solution) {
        let outcome = general_search(board, algorithm, &SearchConfig::default());
        (outcome.stats, outcome.result.expect("puzzle should be solvable"))
    }

    #[test]
    fn frontier_orders_by_f_then_h_then_insertion() {
        let node = |g, h| Node {
            board: GOAL,
            g,
            h,
            parent: None,
        };

        let mut frontier = Frontier::default();
        frontier.push(0, &node(2, 3)); // f 5
        frontier.push(1, &node(4, 1)); // f 5, lower h
        frontier.push(2, &node(1, 1)); // f 2
        frontier.push(3, &node(4, 1)); // ties with 1
        frontier.push(4, &node(0, 6)); // f 6

        assert_eq!(frontier.len(), 5);
        let order: Vec<_> = std::iter::from_fn(|| frontier.pop()).collect();
        assert_eq!(order, vec![2, 1, 3, 0, 4]);
    }

    #[test]
    fn goal_returns_immediately() {
        for algorithm in Algorithm::ALL {
            let (stats, solution) = solve(&GOAL, algorithm);

            assert_eq!(solution.depth(), 0);
            assert_eq!(stats.expanded, 0);
            assert_eq!(stats.max_frontier, 1);
            assert_eq!(solution.path().len(), 1);
        }
    }

    #[test]
    fn one_move_from_goal() {
        let board = Board::new([[1, 2, 3], [4, 5, 0], [7, 8, 6]]);
        for algorithm in Algorithm::ALL {
            let (stats, solution) = solve(&board, algorithm);

            assert_eq!(solution.depth(), 1);
            assert!(stats.expanded >= 1);
            if algorithm != Algorithm::UniformCost {
                // the goal is the only successor with f = 1
                assert_eq!(stats.expanded, 1);
            }
        }
    }

    #[test]
    fn default_puzzle_takes_six_moves() {
        for algorithm in Algorithm::ALL {
            let (stats, solution) = solve(&DEFAULT_PUZZLE, algorithm);

            assert_eq!(solution.depth(), 6, "{algorithm}");
            assert_eq!(*solution.goal().board(), GOAL);
            assert!(stats.expanded >= 6);
            assert!(stats.max_frontier >= 1);
        }
    }

    #[test]
    fn path_steps_one_move_at_a_time() {
        let (_, solution) = solve(&DEFAULT_PUZZLE, Algorithm::Manhattan);
        let path = trace_solution(&solution);

        assert_eq!(path.len(), 7);
        assert_eq!(*path[0].board(), DEFAULT_PUZZLE);
        assert_eq!(path[0].parent(), None);
        assert!(path.last().unwrap().board().is_goal());

        for (ix, step) in path.iter().enumerate() {
            assert_eq!(step.g() as usize, ix);
            assert_eq!(step.h(), crate::heuristic::manhattan_distance(step.board()));
        }
        for pair in path.windows(2) {
            assert!(expand(pair[0].board()).contains(pair[1].board()));
        }
    }

    #[test]
    fn uniform_cost_never_estimates() {
        let (_, solution) = solve(&DEFAULT_PUZZLE, Algorithm::UniformCost);

        assert!(solution.path().iter().all(|node| node.h() == 0));
        assert!(solution.path().iter().all(|node| node.f() == node.g()));
    }

    #[test]
    fn heuristic_expands_less_than_uniform_cost() {
        let (uniform, _) = solve(&DEFAULT_PUZZLE, Algorithm::UniformCost);
        let (manhattan, _) = solve(&DEFAULT_PUZZLE, Algorithm::Manhattan);

        assert!(manhattan.expanded < uniform.expanded);
    }

    #[test]
    fn zero_time_limit_gives_up() {
        let config = SearchConfig::default().with_time_limit(Duration::ZERO);
        let outcome = general_search(&DEFAULT_PUZZLE, Algorithm::Manhattan, &config);

        assert_eq!(
            outcome.result.unwrap_err(),
            SearchFailure::TimedOut {
                limit: Duration::ZERO
            }
        );
        assert_eq!(outcome.stats, SearchStats::default());
    }

    #[test]
    fn unsolvable_board_exhausts_frontier() {
        // swapping two tiles flips the permutation parity
        let board = Board::new([[2, 1, 3], [4, 5, 6], [7, 8, 0]]);
        let outcome = general_search(&board, Algorithm::Manhattan, &SearchConfig::default());

        assert_eq!(outcome.result.unwrap_err(), SearchFailure::Exhausted);
        // half of the 9! arrangements are reachable from any board
        assert_eq!(outcome.stats.expanded, 181_440);
    }
}
