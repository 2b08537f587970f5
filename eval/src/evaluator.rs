// Copyright (C) 2024-2026 The Adastat Team.
// This file is part of the adastat static analyzer.

//! The worklist fixpoint: repeated ascending-`NodeId`
//! sweeps over the procedure's CFG, each sweep recomputing every node's
//! incoming environment from its predecessors' last-known outgoing one
//! (Gauss-Seidel chaotic iteration — deterministic, since the sweep order
//! is fixed, without needing a priority queue). A node that is a loop
//! header widens its accumulated incoming environment after
//! `widening_threshold` growths; once the widened fixpoint is reached, a
//! further `narrowing_iterations` sweeps are run allowing environments to
//! shrink back down (never grow), recovering precision widening gave up.

use crate::{backward_eval, eval_expr, Budget, Cfg, Env, MergePredicate, Trace};
use adastat_domains::{AbsValue, BoolLattice};
use adastat_errors::{Handler, Warning};
use adastat_ir::{NodeId, Procedure, Statement, VarId};
use adastat_types::{resolve, Interpreter};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::rc::Rc;

/// `semantics[node][trace]` is the environment right after `node`'s own
/// effect has been applied — what a checker asking "what do we know here"
/// wants. `adastat-eval` additionally exposes the pre-effect environment in
/// [`AnalysisResult::before`] for checkers (such as a deref check) that care
/// about the state reaching a point rather than leaving it.
pub type Semantics = IndexMap<NodeId, IndexMap<Trace, Env>>;

#[derive(Clone, Debug)]
pub struct EvaluatorConfig {
    pub merge_predicate: MergePredicate,
    pub widening_threshold: usize,
    pub narrowing_iterations: usize,
    /// A hard cap on sweeps per phase, independent of the budget — guards
    /// against a non-terminating widening phase from a domain bug rather
    /// than from a legitimately large analysis.
    pub max_rounds: usize,
    /// Distinct trace buckets kept per node before they're collapsed into
    /// one merged bucket.
    pub max_traces_per_node: usize,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self { merge_predicate: MergePredicate::Always, widening_threshold: 3, narrowing_iterations: 2, max_rounds: 10_000, max_traces_per_node: 32 }
    }
}

pub struct AnalysisResult {
    pub before: Semantics,
    pub after: Semantics,
    /// Set if the budget or the round cap was hit before the analysis
    /// naturally converged — the caller should downgrade confidence in
    /// `after`'s precision accordingly.
    pub incomplete: bool,
}

pub struct Evaluator {
    config: EvaluatorConfig,
    interpreter: Rc<dyn Interpreter>,
}

impl Evaluator {
    pub fn new(config: EvaluatorConfig) -> Self {
        Self { config, interpreter: adastat_types::default_interpreter() }
    }

    pub fn analyze(&self, procedure: &Procedure, handler: &Handler, budget: &Budget) -> AnalysisResult {
        let cfg = Cfg::build(procedure);
        for &goto_id in &cfg.unresolved_gotos {
            if let Some(stmt) = cfg.statements.get(&goto_id) {
                handler.emit_warning(Warning::IrGenFailure { span: stmt.span().clone(), detail: "goto target label not found in this procedure".into() });
            }
        }
        let preds = cfg.predecessors();

        let mut var_tops: HashMap<VarId, AbsValue> = HashMap::new();
        let mut entry_env = Env::new();
        for v in &procedure.variables {
            let top = match resolve(&self.interpreter, &v.type_hint) {
                Some(interp) => interp.default_top.clone(),
                None => {
                    handler.emit_warning(Warning::UnsupportedType { span: procedure.span.clone(), type_name: v.type_hint.to_string() });
                    AbsValue::Universe
                }
            };
            var_tops.insert(v.index, top.clone());
            entry_env.set(v.index, top);
        }

        let mut in_envs: HashMap<NodeId, IndexMap<Trace, Env>> = HashMap::new();
        let mut update_counts: HashMap<(NodeId, Trace), usize> = HashMap::new();
        let mut incomplete = false;

        if let Some(entry) = cfg.entry {
            in_envs.entry(entry).or_default().insert(Trace::root(), entry_env.clone());
        }

        let mut out_envs = self.recompute_all_out(&cfg, &in_envs, &var_tops, handler);

        self.run_sweeps(&cfg, &preds, cfg.entry, &entry_env, &var_tops, &mut in_envs, &mut out_envs, &mut update_counts, handler, budget, true, &mut incomplete);

        for _ in 0..self.config.narrowing_iterations {
            if !budget.tick() {
                incomplete = true;
                break;
            }
            self.run_sweeps(&cfg, &preds, cfg.entry, &entry_env, &var_tops, &mut in_envs, &mut out_envs, &mut update_counts, handler, budget, false, &mut incomplete);
        }

        if incomplete {
            handler.emit_warning(Warning::BudgetExhausted { span: procedure.span.clone(), iterations: budget.iterations() });
        }

        AnalysisResult { before: into_semantics(in_envs), after: out_envs, incomplete }
    }

    #[allow(clippy::too_many_arguments)]
    fn run_sweeps(
        &self,
        cfg: &Cfg,
        preds: &IndexMap<NodeId, Vec<NodeId>>,
        entry: Option<NodeId>,
        entry_env: &Env,
        var_tops: &HashMap<VarId, AbsValue>,
        in_envs: &mut HashMap<NodeId, IndexMap<Trace, Env>>,
        out_envs: &mut Semantics,
        update_counts: &mut HashMap<(NodeId, Trace), usize>,
        handler: &Handler,
        budget: &Budget,
        widen_enabled: bool,
        incomplete: &mut bool,
    ) {
        let mut node_ids: Vec<NodeId> = cfg.statements.keys().copied().collect();
        node_ids.sort_unstable();

        let mut rounds = 0usize;
        loop {
            if !budget.tick() {
                *incomplete = true;
                return;
            }
            rounds += 1;
            if rounds > self.config.max_rounds {
                *incomplete = true;
                return;
            }
            let mut changed = false;
            for &node_id in &node_ids {
                let grew = self.process_node(cfg, preds, node_id, entry, entry_env, var_tops, in_envs, out_envs, update_counts, handler, widen_enabled);
                changed |= grew;
            }
            if !changed {
                return;
            }
        }
    }

    /// Recomputes `node_id`'s `in` environment from its predecessors' last
    /// `out`, merges it into the accumulated `in_envs[node_id]` (joining, or
    /// widening past the threshold, only in the widening phase), and
    /// refreshes `out_envs[node_id]` by applying this node's own transfer.
    /// Returns whether the accumulated `in` grew.
    #[allow(clippy::too_many_arguments)]
    fn process_node(
        &self,
        cfg: &Cfg,
        preds: &IndexMap<NodeId, Vec<NodeId>>,
        node_id: NodeId,
        entry: Option<NodeId>,
        entry_env: &Env,
        var_tops: &HashMap<VarId, AbsValue>,
        in_envs: &mut HashMap<NodeId, IndexMap<Trace, Env>>,
        out_envs: &mut Semantics,
        update_counts: &mut HashMap<(NodeId, Trace), usize>,
        handler: &Handler,
        widen_enabled: bool,
    ) -> bool {
        let mut contributions: Vec<(Trace, Env)> = Vec::new();
        if Some(node_id) == entry {
            contributions.push((Trace::root(), entry_env.clone()));
        }
        if let Some(ps) = preds.get(&node_id) {
            for &p in ps {
                if let Some(p_out) = out_envs.get(&p) {
                    for (p_trace, env) in p_out {
                        let extended = p_trace.extended(p, self.config.merge_predicate);
                        contributions.push((extended, env.clone()));
                    }
                }
            }
        }

        let mut candidate: IndexMap<Trace, Env> = IndexMap::new();
        for (trace, env) in contributions {
            candidate.entry(trace).and_modify(|e| *e = e.join(&env)).or_insert(env);
        }
        if candidate.len() > self.config.max_traces_per_node {
            let merged = candidate.values().fold(Env::new(), |acc, e| acc.join(e));
            candidate = IndexMap::new();
            candidate.insert(Trace::root(), merged);
        }

        let existing = in_envs.entry(node_id).or_default();
        let mut grew = false;
        for (trace, new_env) in candidate {
            let count = update_counts.entry((node_id, trace.clone())).or_insert(0);
            match existing.get(&trace) {
                None => {
                    existing.insert(trace, new_env);
                    grew = true;
                }
                Some(old) => {
                    let merged = if widen_enabled {
                        let joined = old.join(&new_env);
                        if cfg.widening_points.contains(&node_id) && *count >= self.config.widening_threshold {
                            old.widen(&joined)
                        } else {
                            joined
                        }
                    } else {
                        // Narrowing recomputes the raw candidate (not joined
                        // with `old`, which would always grow it back) and
                        // only accepts it if it's already a subset of `old` —
                        // the standard narrowing step.
                        if new_env.le(old) {
                            new_env
                        } else {
                            old.clone()
                        }
                    };
                    if !merged.le(old) || !old.le(&merged) {
                        *count += 1;
                        existing.insert(trace, merged);
                        grew = true;
                    }
                }
            }
        }

        if let Some(in_for_node) = in_envs.get(&node_id) {
            let fresh_out = self.transfer(cfg, node_id, in_for_node, var_tops, handler);
            out_envs.insert(node_id, fresh_out);
        }

        grew
    }

    fn recompute_all_out(&self, cfg: &Cfg, in_envs: &HashMap<NodeId, IndexMap<Trace, Env>>, var_tops: &HashMap<VarId, AbsValue>, handler: &Handler) -> Semantics {
        let mut out = Semantics::new();
        for &node_id in cfg.statements.keys() {
            let empty = IndexMap::new();
            let ins = in_envs.get(&node_id).unwrap_or(&empty);
            out.insert(node_id, self.transfer(cfg, node_id, ins, var_tops, handler));
        }
        out
    }

    /// This node's own effect, applied independently to every trace bucket
    /// in `ins`. `Label`/`Split`/`Loop`/`Goto` are identity transfers — all
    /// of their interesting behavior lives in the CFG's edge structure, not
    /// here. An `AssumeStmt` may drop a trace entirely (infeasible).
    fn transfer(&self, cfg: &Cfg, node_id: NodeId, ins: &IndexMap<Trace, Env>, var_tops: &HashMap<VarId, AbsValue>, handler: &Handler) -> IndexMap<Trace, Env> {
        let Some(&stmt) = cfg.statements.get(&node_id) else { return ins.clone() };
        let mut out = IndexMap::new();
        for (trace, env) in ins {
            match stmt {
                Statement::Label(_) | Statement::Split(_) | Statement::Loop(_) | Statement::Goto(_) => {
                    out.insert(trace.clone(), env.clone());
                }
                Statement::Assign(a) => {
                    let mut next = env.clone();
                    let value = eval_expr(&self.interpreter, &a.value, env, handler);
                    next.set(a.target, value);
                    out.insert(trace.clone(), next);
                }
                Statement::Read(r) => {
                    let mut next = env.clone();
                    let top = var_tops.get(&r.var).cloned().unwrap_or(AbsValue::Universe);
                    next.set(r.var, top);
                    out.insert(trace.clone(), next);
                }
                Statement::Assume(a) => {
                    let value = eval_expr(&self.interpreter, &a.condition, env, handler);
                    let truth = value.meet(&AbsValue::Bool(BoolLattice::True));
                    if truth.is_empty() {
                        continue;
                    }
                    let mut refined = env.clone();
                    if backward_eval(&self.interpreter, &a.condition, &truth, &mut refined, handler) {
                        out.insert(trace.clone(), refined);
                    }
                }
            }
        }
        out
    }
}

fn into_semantics(envs: HashMap<NodeId, IndexMap<Trace, Env>>) -> Semantics {
    envs.into_iter().collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use adastat_domains::{AbsValue, BoolLattice, Interval};
    use adastat_ir::{
        AssignStmt, AssumeStmt, Block, ConstValue, Expression, FunCallExpr, IdentifierExpr, LitExpr, LoopStmt, Operator, SourceType, SplitStmt,
        Variable, VariableMode,
    };
    use adastat_span::{Span, Symbol};

    fn var_expr(id: usize, idx: usize, lo: i128, hi: i128) -> Expression {
        Expression::Identifier(IdentifierExpr { id, span: Span::dummy(), var: adastat_ir::VarId(idx), type_hint: SourceType::IntegerRange { lo, hi } })
    }

    fn int_lit(id: usize, n: i128, lo: i128, hi: i128) -> Expression {
        Expression::Lit(LitExpr { id, span: Span::dummy(), value: ConstValue::Integer(n), type_hint: SourceType::IntegerRange { lo, hi } })
    }

    fn call(id: usize, op: Operator, args: Vec<Expression>, ty: SourceType) -> Expression {
        Expression::FunCall(FunCallExpr { id, span: Span::dummy(), operator: op, args, type_hint: ty, param_types: None })
    }

    fn bool_ty() -> SourceType {
        SourceType::Boolean
    }

    fn procedure(variables: Vec<Variable>, body: Block) -> Procedure {
        Procedure { name: Symbol::intern("p"), span: Span::dummy(), variables, body }
    }

    /// `assume(x < 10); assume(x > 3);` narrows `x` to `[4, 9]`.
    #[test]
    fn interval_refinement_through_conjoined_assumes() {
        let x = Variable { name: Symbol::intern("x"), type_hint: SourceType::IntegerRange { lo: 0, hi: 100 }, mode: VariableMode::In, index: adastat_ir::VarId(0), purpose: None };
        let assume_lt = Statement::Assume(AssumeStmt {
            id: 1,
            span: Span::dummy(),
            condition: call(2, Operator::Lt, vec![var_expr(3, 0, 0, 100), int_lit(4, 10, 0, 100)], bool_ty()),
            purpose: None,
        });
        let assume_gt = Statement::Assume(AssumeStmt {
            id: 5,
            span: Span::dummy(),
            condition: call(6, Operator::Gt, vec![var_expr(7, 0, 0, 100), int_lit(8, 3, 0, 100)], bool_ty()),
            purpose: None,
        });
        let proc = procedure(vec![x], Block::new(vec![assume_lt, assume_gt]));
        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);
        let final_env = &result.after[&5][&Trace::root()];
        assert_eq!(final_env.get(adastat_ir::VarId(0)), AbsValue::Interval(Interval::Range(4, 9)));
    }

    /// scenario 2: two assumes that together are infeasible drop the trace
    /// entirely rather than producing a bottom environment downstream.
    #[test]
    fn infeasible_conjunction_of_assumes_drops_the_trace() {
        let x = Variable { name: Symbol::intern("x"), type_hint: SourceType::IntegerRange { lo: 0, hi: 100 }, mode: VariableMode::In, index: adastat_ir::VarId(0), purpose: None };
        let assume_lt = Statement::Assume(AssumeStmt {
            id: 1,
            span: Span::dummy(),
            condition: call(2, Operator::Lt, vec![var_expr(3, 0, 0, 100), int_lit(4, 5, 0, 100)], bool_ty()),
            purpose: None,
        });
        let assume_gt = Statement::Assume(AssumeStmt {
            id: 5,
            span: Span::dummy(),
            condition: call(6, Operator::Gt, vec![var_expr(7, 0, 0, 100), int_lit(8, 50, 0, 100)], bool_ty()),
            purpose: None,
        });
        let proc = procedure(vec![x], Block::new(vec![assume_lt, assume_gt]));
        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);
        assert!(!result.after[&5].contains_key(&Trace::root()));
    }

    /// scenario 5: `x := 0; loop { assume(x < 100); x := x + 1 }` widens then
    /// narrows the loop header back down to `x ∈ [0, 100]`.
    #[test]
    fn loop_widens_then_narrows_to_the_tight_bound() {
        let x = Variable { name: Symbol::intern("x"), type_hint: SourceType::IntegerRange { lo: 0, hi: 1000 }, mode: VariableMode::Local, index: adastat_ir::VarId(0), purpose: None };
        let init = Statement::Assign(AssignStmt { id: 1, span: Span::dummy(), target: adastat_ir::VarId(0), value: int_lit(2, 0, 0, 1000) });
        let assume = Statement::Assume(AssumeStmt {
            id: 10,
            span: Span::dummy(),
            condition: call(11, Operator::Lt, vec![var_expr(12, 0, 0, 1000), int_lit(13, 100, 0, 1000)], bool_ty()),
            purpose: None,
        });
        let increment = Statement::Assign(AssignStmt {
            id: 14,
            span: Span::dummy(),
            target: adastat_ir::VarId(0),
            value: call(15, Operator::Add, vec![var_expr(16, 0, 0, 1000), int_lit(17, 1, 0, 1000)], SourceType::IntegerRange { lo: 0, hi: 1000 }),
        });
        let the_loop = Statement::Loop(LoopStmt { id: 20, span: Span::dummy(), body: Block::new(vec![assume, increment]) });
        let proc = procedure(vec![x], Block::new(vec![init, the_loop]));
        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::new(500, None);
        let result = evaluator.analyze(&proc, &handler, &budget);
        let header = &result.after[&20][&Trace::root()];
        assert_eq!(header.get(adastat_ir::VarId(0)), AbsValue::Interval(Interval::Range(0, 100)));
    }

    /// scenario 6: a split forking on a boolean condition rejoins the two
    /// branch environments by join.
    #[test]
    fn split_branches_rejoin_by_join() {
        let x = Variable { name: Symbol::intern("x"), type_hint: SourceType::IntegerRange { lo: 0, hi: 100 }, mode: VariableMode::In, index: adastat_ir::VarId(0), purpose: None };
        let then_branch = Block::new(vec![Statement::Assign(AssignStmt { id: 2, span: Span::dummy(), target: adastat_ir::VarId(0), value: int_lit(3, 1, 0, 100) })]);
        let else_branch = Block::new(vec![Statement::Assign(AssignStmt { id: 4, span: Span::dummy(), target: adastat_ir::VarId(0), value: int_lit(5, 2, 0, 100) })]);
        let split = Statement::Split(SplitStmt { id: 1, span: Span::dummy(), branches: vec![then_branch, else_branch] });
        let after = Statement::Assign(AssignStmt { id: 6, span: Span::dummy(), target: adastat_ir::VarId(1), value: int_lit(7, 0, 0, 1) });
        let mut variables = vec![x];
        variables.push(Variable { name: Symbol::intern("y"), type_hint: SourceType::IntegerRange { lo: 0, hi: 1 }, mode: VariableMode::Local, index: adastat_ir::VarId(1), purpose: None });
        let proc = procedure(variables, Block::new(vec![split, after]));
        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let result = evaluator.analyze(&proc, &handler, &budget);
        let final_env = &result.after[&6][&Trace::root()];
        assert_eq!(final_env.get(adastat_ir::VarId(0)), AbsValue::Interval(Interval::Range(1, 2)));
    }

    #[test]
    fn unresolved_goto_emits_a_warning_rather_than_panicking() {
        let proc = procedure(
            vec![],
            Block::new(vec![Statement::Goto(adastat_ir::GotoStmt { id: 1, span: Span::dummy(), target: adastat_ir::Label(99) })]),
        );
        let evaluator = Evaluator::new(EvaluatorConfig::default());
        let handler = Handler::new();
        let budget = Budget::unbounded();
        let _ = evaluator.analyze(&proc, &handler, &budget);
        assert!(!handler.warnings().is_empty());
    }
}
