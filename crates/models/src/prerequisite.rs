use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

/// One outgoing edge of the dependency graph: `prerequisite_id` must be
/// passed before the course owning this link may be taken
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrereqLink {
    pub prerequisite_id: Uuid,
    pub mandatory: bool,
}

/// Display attributes for a course referenced from the graph
#[derive(Debug, Clone, PartialEq)]
pub struct CourseLabel {
    pub code: String,
    pub title: String,
}

/// Transitive prerequisite expansion rooted at one course
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrereqTree {
    pub course_id: Uuid,
    pub code: String,
    pub title: String,
    pub requires: Vec<PrereqTreeNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrereqTreeNode {
    pub course_id: Uuid,
    pub code: String,
    pub title: String,
    pub mandatory: bool,
    pub requires: Vec<PrereqTreeNode>,
}

/// Expands the transitive prerequisites of `root` into a tree.
///
/// The traversal tracks the set of ancestors on the *current path* rather
/// than a global visited set: a course reachable along two independent
/// branches (a diamond) is expanded on both, while a course that is its own
/// transitive ancestor (malformed cyclic data) stops the descent on that
/// path. The edge table is not trusted to be acyclic.
pub fn build_tree(
    root: Uuid,
    labels: &HashMap<Uuid, CourseLabel>,
    edges: &HashMap<Uuid, Vec<PrereqLink>>,
) -> PrereqTree {
    let label = labels.get(&root);
    let mut path = vec![root];

    PrereqTree {
        course_id: root,
        code: label.map(|l| l.code.clone()).unwrap_or_default(),
        title: label.map(|l| l.title.clone()).unwrap_or_default(),
        requires: expand(root, labels, edges, &mut path),
    }
}

fn expand(
    course_id: Uuid,
    labels: &HashMap<Uuid, CourseLabel>,
    edges: &HashMap<Uuid, Vec<PrereqLink>>,
    path: &mut Vec<Uuid>,
) -> Vec<PrereqTreeNode> {
    let Some(links) = edges.get(&course_id) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(links.len());
    for link in links {
        // Already an ancestor on this path: cycle, cut the branch off here
        if path.contains(&link.prerequisite_id) {
            continue;
        }

        let Some(label) = labels.get(&link.prerequisite_id) else {
            // Dangling edge, nothing to display
            continue;
        };

        path.push(link.prerequisite_id);
        let requires = expand(link.prerequisite_id, labels, edges, path);
        path.pop();

        nodes.push(PrereqTreeNode {
            course_id: link.prerequisite_id,
            code: label.code.clone(),
            title: label.title.clone(),
            mandatory: link.mandatory,
            requires,
        });
    }

    nodes
}

/// Per-edge satisfaction state for one student against one course
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrereqStatus {
    pub course_id: Uuid,
    pub code: String,
    pub mandatory: bool,
    pub passed: bool,
}

/// Outcome of a prerequisite check: satisfied when every mandatory
/// prerequisite has a passed enrollment, trivially satisfied when the course
/// has none. Optional prerequisites are reported but never block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SatisfactionReport {
    pub satisfied: bool,
    pub mandatory_met: usize,
    pub mandatory_total: usize,
    pub prerequisites: Vec<PrereqStatus>,
}

pub fn evaluate_satisfaction(prerequisites: Vec<PrereqStatus>) -> SatisfactionReport {
    let mandatory_total = prerequisites.iter().filter(|p| p.mandatory).count();
    let mandatory_met = prerequisites
        .iter()
        .filter(|p| p.mandatory && p.passed)
        .count();

    SatisfactionReport {
        satisfied: mandatory_met == mandatory_total,
        mandatory_met,
        mandatory_total,
        prerequisites,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(code: &str) -> CourseLabel {
        CourseLabel {
            code: code.to_string(),
            title: format!("{code} title"),
        }
    }

    fn link(prerequisite_id: Uuid, mandatory: bool) -> PrereqLink {
        PrereqLink {
            prerequisite_id,
            mandatory,
        }
    }

    #[test]
    fn test_tree_without_prerequisites() {
        let a = Uuid::new_v4();
        let labels = HashMap::from([(a, label("MATH-101"))]);

        let tree = build_tree(a, &labels, &HashMap::new());

        assert_eq!(tree.course_id, a);
        assert_eq!(tree.code, "MATH-101");
        assert!(tree.requires.is_empty());
    }

    #[test]
    fn test_tree_expands_chain() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let labels = HashMap::from([(a, label("A")), (b, label("B")), (c, label("C"))]);
        let edges = HashMap::from([(a, vec![link(b, true)]), (b, vec![link(c, true)])]);

        let tree = build_tree(a, &labels, &edges);

        assert_eq!(tree.requires.len(), 1);
        assert_eq!(tree.requires[0].code, "B");
        assert_eq!(tree.requires[0].requires.len(), 1);
        assert_eq!(tree.requires[0].requires[0].code, "C");
        assert!(tree.requires[0].requires[0].requires.is_empty());
    }

    #[test]
    fn test_tree_terminates_on_cycle() {
        // Malformed edge data: A -> B -> C -> A
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let labels = HashMap::from([(a, label("A")), (b, label("B")), (c, label("C"))]);
        let edges = HashMap::from([
            (a, vec![link(b, true)]),
            (b, vec![link(c, true)]),
            (c, vec![link(a, true)]),
        ]);

        let tree = build_tree(a, &labels, &edges);

        // Finite structure: the backward edge C -> A is simply dropped
        let b_node = &tree.requires[0];
        let c_node = &b_node.requires[0];
        assert_eq!(c_node.code, "C");
        assert!(c_node.requires.is_empty());
    }

    #[test]
    fn test_diamond_expands_on_both_branches() {
        // A requires B and C; both require D. Not a cycle, so D must appear
        // under both branches
        let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let labels = HashMap::from([
            (a, label("A")),
            (b, label("B")),
            (c, label("C")),
            (d, label("D")),
        ]);
        let edges = HashMap::from([
            (a, vec![link(b, true), link(c, false)]),
            (b, vec![link(d, true)]),
            (c, vec![link(d, true)]),
        ]);

        let tree = build_tree(a, &labels, &edges);

        assert_eq!(tree.requires.len(), 2);
        assert_eq!(tree.requires[0].requires[0].code, "D");
        assert_eq!(tree.requires[1].requires[0].code, "D");
    }

    #[test]
    fn test_satisfaction_with_no_prerequisites() {
        let report = evaluate_satisfaction(Vec::new());

        assert!(report.satisfied);
        assert_eq!(report.mandatory_met, 0);
        assert_eq!(report.mandatory_total, 0);
    }

    #[test]
    fn test_unmet_mandatory_prerequisite() {
        let y = Uuid::new_v4();
        let report = evaluate_satisfaction(vec![PrereqStatus {
            course_id: y,
            code: "Y".to_string(),
            mandatory: true,
            passed: false,
        }]);

        assert!(!report.satisfied);
        assert_eq!(report.mandatory_met, 0);
        assert_eq!(report.mandatory_total, 1);
    }

    #[test]
    fn test_met_mandatory_prerequisite() {
        let y = Uuid::new_v4();
        let report = evaluate_satisfaction(vec![PrereqStatus {
            course_id: y,
            code: "Y".to_string(),
            mandatory: true,
            passed: true,
        }]);

        assert!(report.satisfied);
        assert_eq!(report.mandatory_met, 1);
    }

    #[test]
    fn test_optional_prerequisites_never_block() {
        let report = evaluate_satisfaction(vec![
            PrereqStatus {
                course_id: Uuid::new_v4(),
                code: "Y".to_string(),
                mandatory: true,
                passed: true,
            },
            PrereqStatus {
                course_id: Uuid::new_v4(),
                code: "Z".to_string(),
                mandatory: false,
                passed: false,
            },
        ]);

        assert!(report.satisfied);
        assert_eq!(report.mandatory_total, 1);
        // The optional edge is still reported for display
        assert_eq!(report.prerequisites.len(), 2);
    }
}
