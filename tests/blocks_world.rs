use enumset::EnumSet;

use strips_planner::config::{PlannerConfig, Strategy};
use strips_planner::graphplan;
use strips_planner::sink::{MemorySink, TracingSink, WriterSink};
use strips_planner::strips::{
    self, apply_action, is_goal, ActionSchema, Domain, Grounder, Literal, Object, Parameter, Problem, Solution, State,
};

fn move_schema() -> ActionSchema {
    ActionSchema::new(
        "move",
        vec![Parameter::new("?x"), Parameter::new("?y"), Parameter::new("?z")],
        vec![
            Literal::positive("on", &["?x", "?y"]),
            Literal::positive("clear", &["?x"]),
            Literal::positive("clear", &["?z"]),
        ],
        vec![
            Literal::positive("on", &["?x", "?z"]),
            Literal::positive("clear", &["?y"]),
            Literal::negative("on", &["?x", "?y"]),
            Literal::negative("clear", &["?z"]),
        ],
    )
}

fn blocks_world() -> (Domain, Problem) {
    let init: State = vec![
        Literal::positive("on", &["a", "table"]),
        Literal::positive("on", &["b", "table"]),
        Literal::positive("on", &["c", "a"]),
        Literal::positive("clear", &["b"]),
        Literal::positive("clear", &["c"]),
        Literal::positive("clear", &["table"]),
    ]
    .into_iter()
    .collect();
    let goal: State = vec![Literal::positive("on", &["a", "b"])].into_iter().collect();
    let objects = ["a", "b", "c", "table"].iter().map(|o| Object::new(o)).collect();
    let problem = Problem::new("blocks-1", objects, init, goal);
    let domain = Domain::new("blocks", EnumSet::empty(), vec![move_schema()]).with_values(problem.values());
    (domain, problem)
}

/// Replays a rendered path from the initial state and returns where it ends.
fn replay(grounder: &Grounder, problem: &Problem, solution: &Solution) -> State {
    solution.path.iter().fold(problem.init.clone(), |state, step| {
        let action = grounder
            .applicable_actions(&state)
            .into_iter()
            .find(|a| &a.to_string() == step)
            .unwrap_or_else(|| panic!("{} is not applicable in {}", step, state));
        apply_action(&action, &state)
    })
}

#[test]
fn test_depth_first() {
    let (domain, problem) = blocks_world();
    let config = PlannerConfig::default();
    let sink = TracingSink;
    let grounder = Grounder::new(&domain, &config, &sink).unwrap();
    let solutions = strips::solve(&grounder, &problem, None).unwrap();
    assert_eq!(solutions.len(), 1);
    let solution = &solutions[0];
    assert_eq!(solution.steps, solution.path.len());
    assert!(is_goal(&replay(&grounder, &problem, solution), &problem.goal));
}

#[test]
fn test_breadth_first_and_astar_agree() {
    let (domain, problem) = blocks_world();
    let config = PlannerConfig::from_toml_str("strategy = \"breadth_first\"\nmax_solutions = 2").unwrap();
    let sink = MemorySink::new();
    let grounder = Grounder::new(&domain, &config, &sink).unwrap();
    let bfs = strips::solve(&grounder, &problem, None).unwrap();
    assert_eq!(bfs.len(), 2);
    assert_eq!(bfs[0].steps, 2);
    assert_eq!(bfs[0].path, vec!["move c a table".to_owned(), "move a table b".to_owned()]);
    // The second solution ends with b on c, a different goal state from the first.
    assert_eq!(
        bfs[1].path,
        vec!["move c a table".to_owned(), "move b table c".to_owned(), "move a table b".to_owned()]
    );
    assert_eq!(bfs[1].steps, 3);
    for solution in &bfs {
        assert!(solution.steps >= bfs[0].steps);
        assert!(is_goal(&replay(&grounder, &problem, solution), &problem.goal));
    }

    let goal = problem.goal.clone();
    let flat = move |state: &State| if is_goal(state, &goal) { 0 } else { 3 };
    let astar = strips::solve(&grounder, &problem, Some(&flat)).unwrap();
    assert_eq!(astar.len(), 1);
    assert_eq!(astar[0].steps, bfs[0].steps);
}

#[test]
fn test_exhaustive_grounding_finds_same_length() {
    let (domain, problem) = blocks_world();
    let config = PlannerConfig::default().with_fast(false).with_strategy(Strategy::BreadthFirst);
    let sink = MemorySink::new();
    let grounder = Grounder::new(&domain, &config, &sink).unwrap();
    assert_eq!(grounder.combinations(0).len(), 64);
    let solutions = strips::solve(&grounder, &problem, None).unwrap();
    assert_eq!(solutions[0].steps, 2);
}

#[test]
fn test_graphplan() {
    let (domain, problem) = blocks_world();
    let config = PlannerConfig::default().with_verbose(true);
    let sink = WriterSink::new(Vec::new());
    let grounder = Grounder::new(&domain, &config, &sink).unwrap();
    let plan = graphplan::solve(&grounder, &problem).unwrap().expect("plan");
    assert_eq!(plan.layers.len(), 2);

    let end = plan.sequence().into_iter().fold(problem.init.clone(), |state, action| apply_action(action, &state));
    assert!(is_goal(&end, &problem.goal));

    drop(grounder);
    let output = String::from_utf8(sink.into_inner()).unwrap();
    assert!(output.starts_with("P0: 6, A0: 3, P1: "));
    assert!(output.contains("Processing graph at layer 2."));
    assert!(!output.contains("ERROR: "));
}
