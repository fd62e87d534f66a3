//! Expert assignment via maximum flow.
//!
//! Builds a layered network from one [`ProblemInstance`] snapshot:
//!
//! ```text
//! source ─1─▶ expert ─1─▶ skill ─req─▶ project ─Σreq─▶ sink
//! ```
//!
//! - an expert → skill edge exists only if the expert has the skill,
//! - a skill → project edge exists only if the requirement is positive,
//! - a project → sink edge exists only if the project has any demand.
//!
//! Zero-capacity edges are never materialised, which keeps BFS in the
//! flow solver on the sparse part of the graph.
//!
//! The maximum flow equals the largest number of demand slots that can be
//! filled, each expert filling at most one. Shortage is what remains.
//!
//! # Reference
//! Ahuja, Magnanti & Orlin (1993), "Network Flows", Ch. 12 (assignment
//! and b-matching as flow problems)

use tracing::trace;

use crate::flow::{EdgeId, FlowNetwork, NodeId};
use crate::models::{Assignment, ProblemInstance, SolveResult};

/// Vertex numbering of the layered network.
#[derive(Debug, Clone, Copy)]
struct Layout {
    experts: usize,
    skills: usize,
    projects: usize,
}

impl Layout {
    fn of(instance: &ProblemInstance) -> Self {
        Self {
            experts: instance.expert_count(),
            skills: instance.skill_count,
            projects: instance.project_count(),
        }
    }

    #[inline]
    fn source(&self) -> NodeId {
        0
    }

    #[inline]
    fn expert(&self, expert: usize) -> NodeId {
        1 + expert
    }

    #[inline]
    fn skill(&self, skill: usize) -> NodeId {
        1 + self.experts + skill
    }

    #[inline]
    fn project(&self, project: usize) -> NodeId {
        1 + self.experts + self.skills + project
    }

    #[inline]
    fn sink(&self) -> NodeId {
        1 + self.experts + self.skills + self.projects
    }

    #[inline]
    fn node_count(&self) -> usize {
        self.sink() + 1
    }
}

/// The built network plus the edge IDs needed to decode a flow.
struct LayeredNetwork {
    graph: FlowNetwork,
    layout: Layout,
    /// Per expert: `(skill, edge)` for every skill the expert has.
    expert_skill: Vec<Vec<(usize, EdgeId)>>,
    /// `(skill, project, edge)` in project-major order.
    skill_project: Vec<(usize, usize, EdgeId)>,
}

/// Solves one assignment snapshot.
///
/// The flow network is rebuilt on every [`solve`](Self::solve) call and
/// dropped after decoding, so a solver can be shared freely.
///
/// # Example
/// ```
/// use u_staffing::models::ProblemInstance;
/// use u_staffing::solver::AssignmentSolver;
///
/// let instance = ProblemInstance::new(2)
///     .with_experts(vec![vec![1, 0], vec![0, 1]])
///     .with_project(vec![1, 1]);
/// let result = AssignmentSolver::new(&instance).solve();
/// assert_eq!(result.shortage, 0);
/// assert_eq!(result.assignments.len(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct AssignmentSolver<'a> {
    instance: &'a ProblemInstance,
}

impl<'a> AssignmentSolver<'a> {
    /// Creates a solver for a validated instance.
    pub fn new(instance: &'a ProblemInstance) -> Self {
        Self { instance }
    }

    /// Computes a maximum assignment and the resulting shortage.
    pub fn solve(&self) -> SolveResult {
        let mut network = self.build();
        let layout = network.layout;
        let flow = network
            .graph
            .maximum_flow(layout.source(), layout.sink());

        // Every expert carries at most one unit, so at most one of its
        // skill edges has flow.
        let mut pools: Vec<Vec<usize>> = vec![Vec::new(); self.instance.skill_count];
        for (expert, edges) in network.expert_skill.iter().enumerate() {
            if let Some(&(skill, _)) = edges
                .iter()
                .find(|&&(_, edge)| network.graph.flow(edge) > 0)
            {
                pools[skill].push(expert);
            }
        }

        let mut assignments = Vec::with_capacity(flow.value as usize);
        for &(skill, project, edge) in &network.skill_project {
            for _ in 0..network.graph.flow(edge) {
                let expert = pools[skill]
                    .pop()
                    .expect("flow into a skill vertex equals flow out of it");
                assignments.push(Assignment::new(expert, skill, project));
            }
        }

        let shortage = self.instance.total_demand() - flow.value;
        trace!(
            flow = flow.value,
            shortage,
            augmentations = flow.augmentations,
            "assignment solved"
        );

        debug_assert!(
            crate::validation::validate_assignment(self.instance, &assignments).is_ok(),
            "decoded assignment violates instance constraints"
        );

        SolveResult::new(shortage, assignments)
    }

    /// Node and original-edge count of the network this instance builds.
    pub fn network_size(&self) -> (usize, usize) {
        let network = self.build();
        (network.graph.node_count(), network.graph.edge_count())
    }

    fn build(&self) -> LayeredNetwork {
        let instance = self.instance;
        let layout = Layout::of(instance);
        let mut graph = FlowNetwork::new(layout.node_count());

        for expert in 0..layout.experts {
            graph.add_edge(layout.source(), layout.expert(expert), 1);
        }

        let expert_skill: Vec<Vec<(usize, EdgeId)>> = instance
            .experts
            .iter()
            .enumerate()
            .map(|(expert, skills)| {
                skills
                    .iter()
                    .enumerate()
                    .filter(|&(_, &has)| has > 0)
                    .map(|(skill, _)| {
                        let edge = graph.add_edge(layout.expert(expert), layout.skill(skill), 1);
                        (skill, edge)
                    })
                    .collect()
            })
            .collect();

        let mut skill_project = Vec::new();
        for (project, requirements) in instance.projects.iter().enumerate() {
            for (skill, &need) in requirements.iter().enumerate() {
                if need > 0 {
                    let edge = graph.add_edge(
                        layout.skill(skill),
                        layout.project(project),
                        need as u64,
                    );
                    skill_project.push((skill, project, edge));
                }
            }
        }

        for project in 0..layout.projects {
            let demand = instance.project_demand(project);
            if demand > 0 {
                graph.add_edge(layout.project(project), layout.sink(), demand);
            }
        }

        LayeredNetwork {
            graph,
            layout,
            expert_skill,
            skill_project,
        }
    }
}
