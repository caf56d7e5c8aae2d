//! Lineage trees: a strain's documented ancestry.
//!
//! A tree is an owned recursive structure. Each [`LineageNode`] owns its
//! children, so traversal is strictly top-down and no parent pointers exist.
//! All traversals here are iterative and bounded by
//! [`MAX_LINEAGE_DEPTH`](crate::limits::MAX_LINEAGE_DEPTH), which keeps
//! hostile imports from exhausting the stack.

use crate::error::LineageError;
use crate::limits::MAX_LINEAGE_DEPTH;
use crate::model::{LineageRelationship, ProvenanceSource, StrainType};

/// One ancestor in a lineage tree, together with its own ancestors.
#[derive(Debug, Clone, PartialEq)]
pub struct LineageNode {
    pub strain_name: String,
    /// External identifier of the ancestor strain, if known.
    pub strain_id: Option<String>,
    pub relationship: LineageRelationship,
    /// Generations back from the owning strain; 1 is a direct parent.
    ///
    /// Callers keep this increasing with tree depth; it is not recomputed.
    pub generation: u32,
    /// Share of the owning strain's genetics, 0-100.
    pub contribution_pct: Option<f64>,
    pub strain_type: Option<StrainType>,
    pub breeder: Option<String>,
    pub verified: bool,
    /// Sub-ancestors. A node without children is the deepest known
    /// ancestor on its branch.
    pub children: Vec<LineageNode>,
    pub source: Option<ProvenanceSource>,
}

impl LineageNode {
    /// Creates a direct-parent node with no children.
    pub fn new(strain_name: impl Into<String>) -> Self {
        Self {
            strain_name: strain_name.into(),
            strain_id: None,
            relationship: LineageRelationship::Parent,
            generation: 1,
            contribution_pct: None,
            strain_type: None,
            breeder: None,
            verified: false,
            children: Vec::new(),
            source: None,
        }
    }

    pub fn with_relationship(mut self, relationship: LineageRelationship) -> Self {
        self.relationship = relationship;
        self
    }

    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = generation;
        self
    }

    pub fn with_contribution(mut self, pct: f64) -> Self {
        self.contribution_pct = Some(pct);
        self
    }

    pub fn with_breeder(mut self, breeder: impl Into<String>) -> Self {
        self.breeder = Some(breeder.into());
        self
    }

    pub fn with_source(mut self, source: ProvenanceSource) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_child(mut self, child: LineageNode) -> Self {
        self.children.push(child);
        self
    }

    /// Returns true if this node has no known ancestors.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth of the subtree rooted here: 1 for a leaf, otherwise
    /// `1 + max(child depths)`.
    pub fn depth(&self) -> Result<usize, LineageError> {
        let mut max_depth = 0;
        let mut stack: Vec<(&LineageNode, usize)> = vec![(self, 1)];

        while let Some((node, depth)) = stack.pop() {
            if depth > MAX_LINEAGE_DEPTH {
                return Err(LineageError::TooDeep {
                    root: self.strain_name.clone(),
                    max: MAX_LINEAGE_DEPTH,
                });
            }
            max_depth = max_depth.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }

        Ok(max_depth)
    }

    /// Iterates this node and all of its descendants in depth-first
    /// pre-order, yielding each node with its depth (this node = 1).
    ///
    /// Iteration stops at [`MAX_LINEAGE_DEPTH`]; use [`depth`](Self::depth)
    /// first when the tree comes from untrusted input.
    pub fn iter(&self) -> LineageIter<'_> {
        LineageIter {
            stack: vec![(self, 1)],
        }
    }

    /// Finds the first node (pre-order) whose name matches, ignoring case.
    pub fn find(&self, strain_name: &str) -> Option<&LineageNode> {
        self.iter()
            .map(|(node, _)| node)
            .find(|node| node.strain_name.eq_ignore_ascii_case(strain_name))
    }

    /// Total number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}

/// Depth-first iterator over a lineage subtree. See [`LineageNode::iter`].
#[derive(Debug, Clone)]
pub struct LineageIter<'a> {
    stack: Vec<(&'a LineageNode, usize)>,
}

impl<'a> Iterator for LineageIter<'a> {
    type Item = (&'a LineageNode, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (node, depth) = self.stack.pop()?;
        if depth < MAX_LINEAGE_DEPTH {
            // Reverse so the first child is visited first.
            self.stack
                .extend(node.children.iter().rev().map(|child| (child, depth + 1)));
        }
        Some((node, depth))
    }
}

/// Maximum depth over a forest of lineage roots; 0 for an empty forest.
pub fn forest_depth(roots: &[LineageNode]) -> Result<usize, LineageError> {
    roots.iter().try_fold(0, |max, root| -> Result<usize, LineageError> {
        Ok(max.max(root.depth()?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_generations() -> LineageNode {
        LineageNode::new("OG Kush")
            .with_relationship(LineageRelationship::Mother)
            .with_child(
                LineageNode::new("Chemdawg")
                    .with_relationship(LineageRelationship::Grandparent)
                    .with_generation(2)
                    .with_child(
                        LineageNode::new("Chem 91")
                            .with_relationship(LineageRelationship::GreatGrandparent)
                            .with_generation(3),
                    ),
            )
            .with_child(
                LineageNode::new("Hindu Kush")
                    .with_relationship(LineageRelationship::Grandparent)
                    .with_generation(2),
            )
    }

    #[test]
    fn test_leaf_depth() {
        let leaf = LineageNode::new("Durban Poison");
        assert!(leaf.is_leaf());
        assert_eq!(leaf.depth(), Ok(1));
    }

    #[test]
    fn test_three_generation_depth() {
        assert_eq!(three_generations().depth(), Ok(3));
    }

    #[test]
    fn test_forest_depth() {
        assert_eq!(forest_depth(&[]), Ok(0));
        let forest = vec![LineageNode::new("Durban Poison"), three_generations()];
        assert_eq!(forest_depth(&forest), Ok(3));
    }

    #[test]
    fn test_too_deep_is_reported() {
        let mut node = LineageNode::new("leaf");
        for i in 0..MAX_LINEAGE_DEPTH {
            node = LineageNode::new(format!("gen-{i}")).with_child(node);
        }
        assert!(matches!(node.depth(), Err(LineageError::TooDeep { .. })));
    }

    #[test]
    fn test_iter_preorder() {
        let tree = three_generations();
        let names: Vec<(&str, usize)> = tree
            .iter()
            .map(|(n, d)| (n.strain_name.as_str(), d))
            .collect();
        assert_eq!(
            names,
            vec![("OG Kush", 1), ("Chemdawg", 2), ("Chem 91", 3), ("Hindu Kush", 2)]
        );
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn test_find() {
        let tree = three_generations();
        let found = tree.find("chem 91").unwrap();
        assert_eq!(found.generation, 3);
        assert!(tree.find("Blue Dream").is_none());
    }
}
