// Plays every bundled demo problem end to end

use algotty::config::Config;
use algotty::engine::{PlaybackController, RunMode};
use algotty::script::{DataStructureKind, HighlightStyle, ProblemDocument, ScalarValue};
use algotty::view::render::graph_node_id;
use algotty::view::{Surface, ViewContent};
use std::path::PathBuf;
use std::time::Duration;

fn demo(name: &str) -> ProblemDocument {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("demos")
        .join(name);
    ProblemDocument::load(&path).expect("demo should load")
}

fn controller_for(document: &ProblemDocument, language: &str) -> PlaybackController {
    let session = document.session(Some(language)).expect("language missing");
    let script = document.solution(language).and_then(|s| s.script());
    let mut controller = PlaybackController::new(&Config::default());
    controller.initialize(Surface::default(), script, session.kind);
    controller
}

/// Play to the end with the automatic timer, then let transient cues expire
fn play_through(controller: &mut PlaybackController) {
    controller.play();
    for _ in 0..10_000 {
        if !controller.is_playing() {
            break;
        }
        controller.tick(Duration::from_millis(250));
    }
    controller.tick(Duration::from_secs(5));
}

fn styles(controller: &PlaybackController, id: &str) -> Vec<HighlightStyle> {
    controller
        .view()
        .elements()
        .and_then(|set| set.get(id))
        .map(|e| e.styles.iter().collect())
        .expect("element missing")
}

#[test]
fn test_every_demo_loads_and_plays() {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos");
    let mut count = 0;
    for entry in std::fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }
        let document = ProblemDocument::load(&path).unwrap();
        for language in document.languages() {
            let mut controller = controller_for(&document, &language);
            play_through(&mut controller);
            assert_eq!(controller.mode(), RunMode::Stopped, "{}", path.display());
            assert!(controller.is_at_end(), "{} ({})", path.display(), language);
        }
        count += 1;
    }
    assert!(count >= 5);
}

#[test]
fn test_bubble_sort_ends_sorted() {
    let document = demo("bubble_sort.json");
    assert_eq!(document.category, DataStructureKind::Array);

    for language in ["python", "java"] {
        let mut c = controller_for(&document, language);
        play_through(&mut c);
        let labels: Vec<i64> = c
            .view()
            .elements()
            .unwrap()
            .iter()
            .map(|e| e.label.parse().unwrap())
            .collect();
        assert_eq!(labels, vec![1, 2, 5, 8], "{}", language);
    }
}

#[test]
fn test_bubble_sort_cpp_has_no_animation() {
    let document = demo("bubble_sort.json");
    let c = controller_for(&document, "cpp");
    assert!(!c.view().is_available());
    assert!(c.is_empty());
}

#[test]
fn test_tree_traversal_visits_every_node() {
    let document = demo("tree_traversal.json");
    let mut c = controller_for(&document, "python");

    let set = c.view().elements().unwrap();
    assert_eq!(set.len(), 7);
    assert_eq!(set.resolve("tree-path-root").map(String::as_str), Some("tree-node-4"));
    assert_eq!(set.resolve("tree-path-LR").map(String::as_str), Some("tree-node-3"));

    play_through(&mut c);
    for v in 1..=7 {
        let id = format!("tree-node-{}", v);
        assert_eq!(styles(&c, &id), vec![HighlightStyle::Visited], "{}", id);
    }
    assert_eq!(
        c.variables().get("result"),
        Some(&ScalarValue::Text("1, 2, 3, 4, 5, 6, 7".to_string()))
    );
}

#[test]
fn test_valid_parentheses_empties_stack() {
    let document = demo("valid_parentheses.json");
    let mut c = controller_for(&document, "python");
    assert_eq!(c.view().elements().map(|set| set.len()), Some(0));

    // After reading "({[" three entries are stacked
    while c.view().elements().map(|set| set.len()) != Some(3) {
        c.next_step();
    }
    assert_eq!(
        c.view().elements().unwrap().get("stack-2").map(|e| e.label.as_str()),
        Some("[")
    );
    assert_eq!(c.view().tracker.shown("stack"), Some(r#"["(","{","["]"#));

    play_through(&mut c);
    assert_eq!(c.view().elements().map(|set| set.len()), Some(0));
    assert_eq!(c.variables().get("valid"), Some(&ScalarValue::Bool(true)));
    assert_eq!(c.view().tracker.shown("stack"), Some("[]"));
}

#[test]
fn test_graph_bfs_visits_all_nodes() {
    let document = demo("graph_bfs.json");
    let mut c = controller_for(&document, "python");
    // 6 edges and 5 nodes
    assert_eq!(c.view().elements().map(|set| set.len()), Some(11));

    play_through(&mut c);
    for name in ["A", "B", "C", "D", "E"] {
        let id = graph_node_id(&ScalarValue::Text(name.to_string()));
        assert_eq!(styles(&c, &id), vec![HighlightStyle::Visited], "{}", id);
    }
    assert_eq!(styles(&c, "edge-A-B"), vec![HighlightStyle::Visited]);
}

#[test]
fn test_reverse_linked_list_reorders_nodes() {
    let document = demo("reverse_linked_list.json");
    let mut c = controller_for(&document, "python");
    play_through(&mut c);

    let set = c.view().elements().unwrap();
    let labels: Vec<&str> = set.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, vec!["4", "3", "2", "1"]);
    assert!(set
        .iter()
        .all(|e| e.styles.iter().collect::<Vec<_>>() == vec![HighlightStyle::Sorted]));
}

#[test]
fn test_hashing_demo_lists_steps() {
    let document = demo("two_sum.json");
    assert_eq!(document.category, DataStructureKind::Generic);
    let c = controller_for(&document, "python");

    match &c.view().content {
        ViewContent::StepListing(lines) => {
            assert_eq!(lines.len(), c.len());
            assert!(lines[0].contains("look up 7"));
        }
        other => panic!("expected a step listing, got {:?}", other),
    }
}
