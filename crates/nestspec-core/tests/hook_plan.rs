//! Hook plan ordering across nested suites.

use std::cell::RefCell;
use std::rc::Rc;

use nestspec_core::{collect_hooks, plan_hooks, HookPhase, Invokable, SuiteBuilder, SuiteTree};

type Journal = Rc<RefCell<Vec<String>>>;

fn log(journal: &Journal, entry: &str) -> impl Fn() + 'static {
    let journal = journal.clone();
    let entry = entry.to_string();
    move || journal.borrow_mut().push(entry.clone())
}

fn run(hooks: &[Invokable]) {
    for hook in hooks {
        hook.invoke().expect("hook");
    }
}

/// Registers all four hook kinds for `name` on the current level.
fn hooks_for(s: &mut SuiteBuilder, journal: &Journal, name: &str) {
    s.before(log(journal, &format!("{name}.before")));
    s.before_each(log(journal, &format!("{name}.beforeEach")));
    s.after_each(log(journal, &format!("{name}.afterEach")));
    s.after(log(journal, &format!("{name}.after")));
}

fn three_levels(journal: &Journal) -> SuiteTree {
    let j = journal.clone();
    SuiteTree::build(move |s| {
        hooks_for(s, &j, "root");
        let j = j.clone();
        s.describe("A", move |s| {
            hooks_for(s, &j, "A");
            let j = j.clone();
            s.describe("B", move |s| {
                hooks_for(s, &j, "B");
                s.it("spec", || ());
            });
        });
    })
    .expect("build")
}

#[test]
fn test_full_plan_ordering() {
    let journal: Journal = Rc::default();
    let tree = three_levels(&journal);
    let plan = plan_hooks(&tree, tree.collect_specs()[0]);

    run(&plan.before);
    run(&plan.before_each);
    run(&plan.after_each);
    run(&plan.after);

    assert_eq!(
        *journal.borrow(),
        vec![
            "root.before",
            "A.before",
            "B.before",
            "root.beforeEach",
            "A.beforeEach",
            "B.beforeEach",
            "B.afterEach",
            "A.afterEach",
            "root.afterEach",
            "B.after",
            "A.after",
            "root.after",
        ]
    );
}

#[test]
fn test_teardown_is_reverse_of_setup_per_suite_pair() {
    let journal: Journal = Rc::default();
    let tree = three_levels(&journal);
    let b = tree
        .child_suite(tree.child_suite(tree.root(), "A").expect("A"), "B")
        .expect("B");

    run(&collect_hooks(&tree, b, HookPhase::BeforeEach));
    let setup: Vec<String> = journal
        .borrow()
        .iter()
        .map(|e| e.trim_end_matches(".beforeEach").to_string())
        .collect();
    journal.borrow_mut().clear();

    run(&collect_hooks(&tree, b, HookPhase::AfterEach));
    let mut teardown: Vec<String> = journal
        .borrow()
        .iter()
        .map(|e| e.trim_end_matches(".afterEach").to_string())
        .collect();
    teardown.reverse();

    assert_eq!(setup, teardown);
}

#[test]
fn test_multiple_hooks_per_level_keep_call_order() {
    let journal: Journal = Rc::default();
    let j = journal.clone();
    let tree = SuiteTree::build(move |s| {
        s.before_each(log(&j, "first"));
        s.before_each(log(&j, "second"));
        s.it("spec", || ());
    })
    .expect("build");

    run(&plan_hooks(&tree, tree.collect_specs()[0]).before_each);
    assert_eq!(*journal.borrow(), vec!["first", "second"]);
}

#[test]
fn test_sibling_suite_hooks_do_not_leak() {
    let journal: Journal = Rc::default();
    let j = journal.clone();
    let tree = SuiteTree::build(move |s| {
        let (a, b) = (j.clone(), j.clone());
        s.describe("A", move |s| {
            s.before_each(log(&a, "A.beforeEach"));
            s.it("a", || ());
        });
        s.describe("B", move |s| {
            s.before_each(log(&b, "B.beforeEach"));
            s.it("b", || ());
        });
    })
    .expect("build");

    let b_spec = tree.collect_specs()[1];
    run(&plan_hooks(&tree, b_spec).before_each);
    assert_eq!(*journal.borrow(), vec!["B.beforeEach"]);
}
