use color_eyre::Result;
use questions::{Evaluation, RearrangeBoard, RearrangeQuestion};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::json;

use super::read_json;
use crate::cli::RearrangeCmd;
use crate::output::print_json;
use crate::runtime::Runtime;

pub fn run(action: RearrangeCmd, rt: &Runtime) -> Result<()> {
    match action {
        RearrangeCmd::Check {
            file,
            order,
            explain,
        } => {
            let question: RearrangeQuestion = read_json(&file)?;
            let mut board = RearrangeBoard::from_question(&question)?;
            board.set_candidate(order)?;
            if explain {
                board.reveal();
            }
            let evaluation = board.evaluate_current();

            if rt.json {
                print_json(&json!({
                    "positions": evaluation.positions,
                    "correct_positions": evaluation.correct_positions,
                    "is_correct": evaluation.is_correct,
                }))?;
            } else {
                print_evaluation(&question, &board, &evaluation);
            }
        }
        RearrangeCmd::Shuffle { file, seed } => {
            let question: RearrangeQuestion = read_json(&file)?;
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let board = RearrangeBoard::shuffled(
                question.items.clone(),
                question.correct_order.clone(),
                &mut rng,
            )?;
            if rt.json {
                print_json(board.candidate())?;
            } else {
                for (i, item) in board.items_in_order().iter().enumerate() {
                    println!("{:>2}. [{}] {}", i + 1, item.item_id, item.value);
                }
            }
        }
    }
    Ok(())
}

fn print_evaluation(question: &RearrangeQuestion, board: &RearrangeBoard, eval: &Evaluation) {
    println!("{}", question.question);
    for ((item, ok), expected) in board
        .items_in_order()
        .iter()
        .zip(&eval.positions)
        .zip(board.correct_order())
    {
        let mark = if *ok { "ok " } else { "XX " };
        if *ok {
            println!("  {mark}{}", item.value);
        } else {
            let want = board.item(expected).map_or(expected.as_str(), |i| i.value.as_str());
            println!("  {mark}{}  (expected: {want})", item.value);
        }
    }
    if eval.is_correct {
        println!("correct");
    } else {
        println!("{} of {} positions correct", eval.correct_positions, eval.total());
    }
    if board.is_revealed() {
        if let Some(explanation) = &question.explanation {
            println!("\n{explanation}");
        }
    }
}
