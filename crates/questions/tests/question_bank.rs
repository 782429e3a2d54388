//! Question bank payloads as they come back from the portal, run through the
//! rearrange board and the list filters.

use pretty_assertions::assert_eq;
use questions::{
    Difficulty, ListFilter, Page, QuestionFilter, RearrangeBoard, RearrangeQuestion,
};
use serde_json::json;

fn sorting_question() -> RearrangeQuestion {
    serde_json::from_value(json!({
        "id": "r-17",
        "question": "Order the phases of a compiler",
        "items": [
            { "item_id": "lex", "value": "Lexing" },
            { "item_id": "opt", "value": "Optimisation" },
            { "item_id": "parse", "value": "Parsing" },
            { "item_id": "gen", "value": "Code generation" }
        ],
        "correct_order": ["lex", "parse", "opt", "gen"],
        "explanation": "Text becomes tokens, then a tree, then better code.",
        "topic": "compilers",
        "difficulty": "medium"
    }))
    .expect("question decodes")
}

#[test]
fn drag_sequence_reaches_correct_order() {
    let question = sorting_question();
    let mut board = RearrangeBoard::from_question(&question).unwrap();

    let before = board.evaluate_current();
    assert_eq!(before.positions, vec![true, false, false, true]);

    board.move_item("parse", "opt").unwrap();
    let after = board.evaluate_current();
    assert!(after.is_correct);

    let values: Vec<&str> = board
        .items_in_order()
        .iter()
        .map(|i| i.value.as_str())
        .collect();
    assert_eq!(
        values,
        vec!["Lexing", "Parsing", "Optimisation", "Code generation"]
    );
}

#[test]
fn question_page_decodes_and_filter_builds_query() {
    let page: Page<RearrangeQuestion> = serde_json::from_value(json!({
        "items": [serde_json::to_value(sorting_question()).unwrap()],
        "page": 3,
        "per_page": 1,
        "total": 4
    }))
    .unwrap();
    assert_eq!(page.items[0].difficulty, Difficulty::Medium);
    assert!(page.has_next());

    let mut filter = QuestionFilter::new();
    filter.set_topic(Some("compilers".into()));
    filter.goto_page(page.page + 1);
    let query = filter.query();
    assert!(query.contains(&("topic", "compilers".to_string())));
    assert!(query.contains(&("page", "4".to_string())));
}
