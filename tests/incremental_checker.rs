mod common;

use satbridge::cnf::Lit;
use satbridge::host::{Constraint, Expr, Host, PropId, Search, Store};
use satbridge::sat::{self, Lifecycle, SatPropagator};
use satbridge::solver::{IncrementalSolver, SolveResult, SolverStats, VarPolarity};

use common::{bool_vars, last_assumptions, recorded};

#[test]
fn and_gate_scenario() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b", "t"]);
    let (a, b, t) = (v[0], v[1], v[2]);
    let mut sat = SatPropagator::with_varisat(&mut store);
    sat::add_bool_and_eq_var(&mut sat, &store, &Expr::var(a), &Expr::var(b), &Expr::var(t))
        .expect("and");
    let mut search = Search::new(store);
    search.post(Box::new(sat)).expect("post");

    search.push();
    search.assign(a, 1).expect("a");
    search.push();
    search.assign(b, 1).expect("b");

    search.push();
    assert!(search.assign(t, 0).is_err());
    search.pop();

    search.push();
    assert!(search.assign(t, 1).is_ok());
    search.pop();
}

#[test]
fn sibling_branch_does_not_see_stale_literal() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b", "c"]);
    let (mut sat, rec) = recorded(&mut store);
    sat::add_bool_or_array_equal_true(&mut sat, &store, &[Expr::var(v[0]), Expr::var(v[1])])
        .expect("or");
    sat::add_bool_le(&mut sat, &store, &Expr::var(v[2]), &Expr::var(v[2])).expect("le");
    let la = Lit::pos(sat.registry().engine_var(v[0]).expect("a"));
    let lb = Lit::pos(sat.registry().engine_var(v[1]).expect("b"));
    let lc = Lit::pos(sat.registry().engine_var(v[2]).expect("c"));
    let mut search = Search::new(store);
    search.post(Box::new(sat)).expect("post");

    search.push();
    search.assign(v[2], 1).expect("c");

    search.push();
    search.assign(v[0], 0).expect("a");
    assert_eq!(last_assumptions(&rec), vec![lc, !la]);
    search.pop();

    search.push();
    search.assign(v[1], 1).expect("b");
    let seen = last_assumptions(&rec);
    assert_eq!(seen, vec![lc, lb]);
    assert!(!seen.iter().any(|l| l.var == la.var));
}

#[test]
fn trail_grows_by_one_per_bind_and_shrinks_on_backtrack() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b", "c", "d"]);
    let (mut sat, rec) = recorded(&mut store);
    let all = v.iter().map(|&x| Expr::var(x)).collect::<Vec<_>>();
    sat::add_bool_or_array_equal_true(&mut sat, &store, &all).expect("or");
    let lits = v
        .iter()
        .map(|&x| Lit::pos(sat.registry().engine_var(x).expect("registered")))
        .collect::<Vec<_>>();
    let mut search = Search::new(store);
    search.post(Box::new(sat)).expect("post");

    for (depth, &var) in v[..3].iter().enumerate() {
        search.push();
        search.assign(var, 0).expect("bind");
        let seen = last_assumptions(&rec);
        assert_eq!(seen.len(), depth + 1);
        assert_eq!(seen[depth], !lits[depth]);
    }
    search.pop();
    search.pop();
    search.push();
    search.assign(v[3], 1).expect("d");
    assert_eq!(last_assumptions(&rec), vec![!lits[0], lits[3]]);
}

#[test]
fn rebinding_same_value_fires_no_new_check() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b"]);
    let (mut sat, rec) = recorded(&mut store);
    sat::add_bool_eq(&mut sat, &store, &Expr::var(v[0]), &Expr::var(v[1])).expect("eq");
    let mut search = Search::new(store);
    search.post(Box::new(sat)).expect("post");

    search.push();
    search.assign(v[0], 1).expect("a");
    let calls = rec.borrow().assumption_log().len();
    search.assign(v[0], 1).expect("same value");
    assert_eq!(rec.borrow().assumption_log().len(), calls);
    assert!(search.assign(v[0], 0).is_err());
}

#[test]
fn contradictory_pair_fails_on_first_bind() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["x", "y"]);
    let (x, y) = (v[0], v[1]);
    let (mut sat, rec) = recorded(&mut store);
    sat::add_bool_eq(&mut sat, &store, &Expr::var(x), &Expr::var(y)).expect("eq");
    sat::add_bool_eq(&mut sat, &store, &Expr::var(x), &Expr::not(y)).expect("eq neg");

    // drive the lifecycle by hand: attach without the initial root check
    sat.post(&mut store, PropId(0));
    assert_eq!(sat.state(), Lifecycle::Posted);
    store.push_level();
    store.bind(y, 0).expect("bind");
    let (_, data) = store.pop_event().expect("bind event");
    assert!(sat.on_event(&mut store, data).is_err());
    assert_eq!(rec.borrow().assumption_log().len(), 1);
    assert_eq!(sat.stats().failures, 1);
}

#[test]
fn contradictory_pair_prunes_the_root() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["x", "y"]);
    let mut sat = SatPropagator::with_varisat(&mut store);
    sat::add_bool_eq(&mut sat, &store, &Expr::var(v[0]), &Expr::var(v[1])).expect("eq");
    sat::add_bool_eq(&mut sat, &store, &Expr::var(v[0]), &Expr::not(v[1])).expect("eq neg");
    let mut search = Search::new(store);
    assert!(search.post(Box::new(sat)).is_err());
    assert!(search.root_failed());
    assert!(search.assign(v[0], 1).is_err());
    assert!(search.solve(&v, Default::default()).solutions.is_empty());
}

#[test]
fn initial_propagate_replays_prebound_variables() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b"]);
    let (mut sat, rec) = recorded(&mut store);
    sat::add_bool_not(&mut sat, &store, &Expr::var(v[0]), &Expr::var(v[1])).expect("not");
    let la = Lit::pos(sat.registry().engine_var(v[0]).expect("a"));
    store.bind(v[0], 1).expect("fix a");

    let mut search = Search::new(store);
    search.post(Box::new(sat)).expect("post");
    assert_eq!(last_assumptions(&rec), vec![la]);

    // b must be the negation of the fixed a
    search.push();
    assert!(search.assign(v[1], 1).is_err());
    search.pop();
    search.push();
    search.assign(v[1], 0).expect("b");
    assert_eq!(last_assumptions(&rec).len(), 2);
}

#[test]
fn prebound_conflict_fails_during_post() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b"]);
    let (mut sat, rec) = recorded(&mut store);
    sat::add_bool_le(&mut sat, &store, &Expr::var(v[0]), &Expr::var(v[1])).expect("le");
    store.bind(v[0], 1).expect("fix a");
    store.bind(v[1], 0).expect("fix b");

    let mut search = Search::new(store);
    assert!(search.post(Box::new(sat)).is_err());
    assert!(search.root_failed());
    assert_eq!(rec.borrow().assumption_log().len(), 2);
}

#[test]
fn second_post_is_ignored() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b"]);
    let mut sat = SatPropagator::with_varisat(&mut store);
    sat::add_bool_eq(&mut sat, &store, &Expr::var(v[0]), &Expr::var(v[1])).expect("eq");
    sat.post(&mut store, PropId(0));
    sat.post(&mut store, PropId(0));
    store.push_level();
    store.bind(v[0], 1).expect("bind");
    let mut events = 0;
    while store.pop_event().is_some() {
        events += 1;
    }
    assert_eq!(events, 1);
}

#[test]
fn live_trail_follows_the_counter() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b"]);
    let mut sat = SatPropagator::with_varisat(&mut store);
    sat::add_bool_or_array_equal_true(&mut sat, &store, &[Expr::var(v[0]), Expr::var(v[1])])
        .expect("or");
    sat.post(&mut store, PropId(0));
    sat.initial_propagate(&mut store).expect("root");

    store.push_level();
    store.bind(v[0], 0).expect("a");
    let (_, data) = store.pop_event().expect("event");
    sat.on_event(&mut store, data).expect("a ok");
    assert_eq!(sat.bound_literals(&store).len(), 1);

    store.pop_level();
    assert!(sat.bound_literals(&store).is_empty());
    assert!(!store.is_bound(v[0]));

    store.push_level();
    store.bind(v[1], 1).expect("b");
    let (_, data) = store.pop_event().expect("event");
    sat.on_event(&mut store, data).expect("b ok");
    let lb = sat.registry().engine_var(v[1]).expect("b");
    assert_eq!(sat.bound_literals(&store), &[Lit::pos(lb)]);
}

/// Engine that never answers.
struct Silent;

impl IncrementalSolver for Silent {
    fn new_var(&mut self, _polarity: VarPolarity) -> u32 {
        1
    }
    fn add_clause(&mut self, _clause: Vec<Lit>) {}
    fn add_empty_clause(&mut self) {}
    fn solve(&mut self, _assumptions: &[Lit]) -> SolveResult {
        SolveResult::Unknown
    }
    fn model_value(&self, _var: u32) -> Option<bool> {
        None
    }
    fn stats(&self) -> SolverStats {
        SolverStats::default()
    }
    fn backend_name(&self) -> &'static str {
        "silent"
    }
}

#[test]
fn unknown_answer_never_prunes() {
    let mut store = Store::new();
    let a = store.new_bool_var("a");
    let mut sat = SatPropagator::new(&mut store, Silent);
    sat::add_bool_or_array_equal_true(&mut sat, &store, &[]).expect("or");
    sat::add_bool_eq(&mut sat, &store, &Expr::var(a), &Expr::var(a)).expect("eq");
    let mut search = Search::new(store);
    search.post(Box::new(sat)).expect("post");
    search.push();
    search.assign(a, 1).expect("unknown is not a failure");
}

#[test]
fn bridge_created_below_root_keeps_siblings_apart() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b"]);
    let mut search = Search::new(store);
    search.push();

    let (mut sat, rec) = recorded(search.store_mut());
    sat::add_bool_or_array_equal_true(
        &mut sat,
        search.store(),
        &[Expr::var(v[0]), Expr::var(v[1])],
    )
    .expect("or");
    let la = Lit::pos(sat.registry().engine_var(v[0]).expect("a"));
    let lb = Lit::pos(sat.registry().engine_var(v[1]).expect("b"));
    search.post(Box::new(sat)).expect("post");

    search.push();
    search.assign(v[0], 1).expect("a");
    assert_eq!(last_assumptions(&rec), vec![la]);
    search.pop();

    search.push();
    search.assign(v[1], 1).expect("b");
    assert_eq!(last_assumptions(&rec), vec![lb]);
}

#[test]
fn bridge_posted_mid_search_replays_and_backtracks() {
    let mut store = Store::new();
    let v = bool_vars(&mut store, &["a", "b", "c"]);
    let mut search = Search::new(store);
    search.push();
    search.assign(v[2], 1).expect("c before attach");

    let (mut sat, rec) = recorded(search.store_mut());
    sat::add_bool_or_array_equal_true(
        &mut sat,
        search.store(),
        &[Expr::var(v[0]), Expr::var(v[1])],
    )
    .expect("or");
    sat::add_bool_le(&mut sat, search.store(), &Expr::var(v[2]), &Expr::var(v[2])).expect("le");
    let la = Lit::pos(sat.registry().engine_var(v[0]).expect("a"));
    let lb = Lit::pos(sat.registry().engine_var(v[1]).expect("b"));
    let lc = Lit::pos(sat.registry().engine_var(v[2]).expect("c"));
    search.post(Box::new(sat)).expect("post");
    assert_eq!(last_assumptions(&rec), vec![lc]);

    search.push();
    search.assign(v[0], 0).expect("a");
    assert_eq!(last_assumptions(&rec), vec![lc, !la]);
    search.pop();

    search.push();
    search.assign(v[1], 1).expect("b");
    assert_eq!(last_assumptions(&rec), vec![lc, lb]);
    search.pop();

    // back above the attach level: the replayed bind is gone too
    search.pop();
    assert_eq!(search.depth(), 0);
    search.push();
    search.assign(v[1], 0).expect("b alone");
    assert_eq!(last_assumptions(&rec), vec![!lb]);
}
