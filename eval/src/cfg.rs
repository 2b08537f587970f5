// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! Flattens a procedure's nested `Block`/`SplitStmt`/`LoopStmt` structure
//! into an explicit control-flow graph the worklist in `evaluator.rs` walks.
//!
//! Every statement gets a successor edge per its own kind: a plain
//! statement flows to whatever is lexically next (or to the enclosing
//! continuation if it's the last in its block); a `SplitStmt` forks one
//! edge per branch, each branch rejoining the continuation on its own,
//! without the split node itself ever having a direct edge to it; a
//! `LoopStmt` is a widening point with two edges — one into its body (which
//! loops back to the `LoopStmt`'s own id), one straight to the
//! continuation, modelling that the analysis never tries to prove whether
//! or when the loop exits and instead hands whatever follows the loop's own
//! (eventually widened and narrowed) header environment. `GotoStmt`/
//! `LabelStmt` are resolved against a full-procedure
//! label index built up front, so a goto may jump to a label nested inside
//! a different branch or loop body than its own (this assumes reducible,
//! non-backward-jumping control flow the way `LoopStmt` already covers
//! every genuine loop — see DESIGN.md).

use adastat_ir::{Block, Label, NodeId, Procedure, Statement};
use indexmap::IndexMap;
use std::collections::HashSet;

pub struct Cfg<'p> {
    pub entry: Option<NodeId>,
    pub statements: IndexMap<NodeId, &'p Statement>,
    pub successors: IndexMap<NodeId, Vec<NodeId>>,
    pub widening_points: HashSet<NodeId>,
    /// Gotos whose target label was never found anywhere in the procedure.
    pub unresolved_gotos: Vec<NodeId>,
}

impl<'p> Cfg<'p> {
    pub fn build(procedure: &'p Procedure) -> Self {
        let mut labels = IndexMap::new();
        collect_labels(&procedure.body, &mut labels);

        let mut cfg = Cfg {
            entry: None,
            statements: IndexMap::new(),
            successors: IndexMap::new(),
            widening_points: HashSet::new(),
            unresolved_gotos: Vec::new(),
        };
        cfg.entry = cfg.build_block(&procedure.body, None, &labels);
        cfg
    }

    pub fn predecessors(&self) -> IndexMap<NodeId, Vec<NodeId>> {
        let mut preds: IndexMap<NodeId, Vec<NodeId>> = IndexMap::new();
        for (&from, tos) in &self.successors {
            for &to in tos {
                preds.entry(to).or_default().push(from);
            }
        }
        preds
    }

    fn add_edge(&mut self, from: NodeId, to: Option<NodeId>) {
        if let Some(to) = to {
            self.successors.entry(from).or_default().push(to);
        }
    }

    fn build_block(&mut self, block: &'p Block, outer_cont: Option<NodeId>, labels: &IndexMap<Label, NodeId>) -> Option<NodeId> {
        if block.statements.is_empty() {
            return outer_cont;
        }
        for (idx, stmt) in block.statements.iter().enumerate() {
            let id = stmt.id();
            self.statements.insert(id, stmt);
            let next = if idx + 1 < block.statements.len() { Some(block.statements[idx + 1].id()) } else { outer_cont };
            match stmt {
                Statement::Label(_) | Statement::Assign(_) | Statement::Read(_) | Statement::Assume(_) => {
                    self.add_edge(id, next);
                }
                Statement::Goto(g) => match labels.get(&g.target) {
                    Some(&target) => self.add_edge(id, Some(target)),
                    None => self.unresolved_gotos.push(id),
                },
                Statement::Split(s) => {
                    for branch in &s.branches {
                        let entry = self.build_block(branch, next, labels);
                        self.add_edge(id, entry);
                    }
                }
                Statement::Loop(l) => {
                    let body_entry = self.build_block(&l.body, Some(id), labels);
                    self.add_edge(id, body_entry);
                    self.add_edge(id, next);
                    self.widening_points.insert(id);
                }
            }
        }
        Some(block.statements[0].id())
    }
}

fn collect_labels(block: &Block, out: &mut IndexMap<Label, NodeId>) {
    for stmt in &block.statements {
        match stmt {
            Statement::Label(l) => {
                out.insert(l.label, l.id);
            }
            Statement::Split(s) => {
                for b in &s.branches {
                    collect_labels(b, out);
                }
            }
            Statement::Loop(l) => collect_labels(&l.body, out),
            _ => {}
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_ir::{AssignStmt, ConstValue, Expression, LitExpr, SourceType, Variable, VariableMode};
    use adastat_span::{Span, Symbol};

    fn lit(id: NodeId, n: i128) -> Expression {
        Expression::Lit(LitExpr { id, span: Span::dummy(), value: ConstValue::Integer(n), type_hint: SourceType::IntegerRange { lo: 0, hi: 10 } })
    }

    fn assign(id: NodeId, target: usize, n: i128) -> Statement {
        Statement::Assign(AssignStmt { id, span: Span::dummy(), target: adastat_ir::VarId(target), value: lit(id + 100, n) })
    }

    fn procedure(body: Block) -> Procedure {
        Procedure {
            name: Symbol::intern("p"),
            span: Span::dummy(),
            variables: vec![Variable { name: Symbol::intern("x"), type_hint: SourceType::IntegerRange { lo: 0, hi: 10 }, mode: VariableMode::Local, index: adastat_ir::VarId(0), purpose: None }],
            body,
        }
    }

    #[test]
    fn straight_line_block_chains_successors() {
        let body = Block::new(vec![assign(1, 0, 1), assign(2, 0, 2)]);
        let proc = procedure(body);
        let cfg = Cfg::build(&proc);
        assert_eq!(cfg.entry, Some(1));
        assert_eq!(cfg.successors.get(&1), Some(&vec![2]));
        assert!(cfg.successors.get(&2).is_none());
    }

    #[test]
    fn split_forks_into_each_branch_without_a_direct_edge_to_the_continuation() {
        let split = Statement::Split(adastat_ir::SplitStmt {
            id: 1,
            span: Span::dummy(),
            branches: vec![Block::new(vec![assign(2, 0, 1)]), Block::new(vec![assign(3, 0, 2)])],
        });
        let body = Block::new(vec![split, assign(4, 0, 3)]);
        let proc = procedure(body);
        let cfg = Cfg::build(&proc);
        assert_eq!(cfg.successors.get(&1), Some(&vec![2, 3]));
        assert_eq!(cfg.successors.get(&2), Some(&vec![4]));
        assert_eq!(cfg.successors.get(&3), Some(&vec![4]));
    }

    #[test]
    fn loop_is_a_widening_point_with_an_edge_into_the_body_and_to_the_continuation() {
        let loop_stmt = Statement::Loop(adastat_ir::LoopStmt { id: 1, span: Span::dummy(), body: Block::new(vec![assign(2, 0, 1)]) });
        let body = Block::new(vec![loop_stmt, assign(3, 0, 9)]);
        let proc = procedure(body);
        let cfg = Cfg::build(&proc);
        assert!(cfg.widening_points.contains(&1));
        assert_eq!(cfg.successors.get(&1), Some(&vec![2, 3]));
        assert_eq!(cfg.successors.get(&2), Some(&vec![1]));
    }

    #[test]
    fn goto_resolves_to_a_label_anywhere_in_the_procedure() {
        let label = Statement::Label(adastat_ir::LabelStmt { id: 5, span: Span::dummy(), label: Label(0) });
        let goto = Statement::Goto(adastat_ir::GotoStmt { id: 1, span: Span::dummy(), target: Label(0) });
        let body = Block::new(vec![goto, assign(2, 0, 1), label, assign(3, 0, 2)]);
        let proc = procedure(body);
        let cfg = Cfg::build(&proc);
        assert_eq!(cfg.successors.get(&1), Some(&vec![5]));
        assert!(cfg.unresolved_gotos.is_empty());
    }

    #[test]
    fn unresolved_goto_is_reported_not_panicked_on() {
        let goto = Statement::Goto(adastat_ir::GotoStmt { id: 1, span: Span::dummy(), target: Label(99) });
        let body = Block::new(vec![goto]);
        let proc = procedure(body);
        let cfg = Cfg::build(&proc);
        assert_eq!(cfg.unresolved_gotos, vec![1]);
        assert!(cfg.successors.get(&1).is_none());
    }
}
