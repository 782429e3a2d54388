//! Rearrange order evaluator.
//!
//! A `RearrangeBoard` holds the items of one rearrange question, the order the
//! student currently sees and the expected order. Every comparison is done on
//! `item_id`s; display values may repeat.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use crate::error::RearrangeError;
use crate::model::{RearrangeItem, RearrangeQuestion};

/// Outcome of comparing a candidate order against the expected one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    /// One flag per position: `correct_order[i] == candidate[i]`.
    pub positions: Vec<bool>,
    pub correct_positions: usize,
    pub is_correct: bool,
}

impl Evaluation {
    pub fn total(&self) -> usize {
        self.positions.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RearrangeBoard {
    items: Vec<RearrangeItem>,
    correct_order: Vec<String>,
    initial: Vec<String>,
    candidate: Vec<String>,
    revealed: bool,
}

impl RearrangeBoard {
    /// Board presenting `items` in the order given.
    pub fn new(
        items: Vec<RearrangeItem>,
        correct_order: Vec<String>,
    ) -> Result<Self, RearrangeError> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.item_id.as_str()) {
                return Err(RearrangeError::DuplicateItem(item.item_id.clone()));
            }
        }
        let initial: Vec<String> = items.iter().map(|i| i.item_id.clone()).collect();
        check_permutation(&initial, &correct_order)?;

        Ok(Self {
            items,
            correct_order,
            candidate: initial.clone(),
            initial,
            revealed: false,
        })
    }

    pub fn from_question(question: &RearrangeQuestion) -> Result<Self, RearrangeError> {
        Self::new(question.items.clone(), question.correct_order.clone())
    }

    /// Board presenting the items in a random order. `reset` returns to that
    /// shuffled order, not to the authored one.
    pub fn shuffled<R: Rng + ?Sized>(
        items: Vec<RearrangeItem>,
        correct_order: Vec<String>,
        rng: &mut R,
    ) -> Result<Self, RearrangeError> {
        let mut board = Self::new(items, correct_order)?;
        board.initial.shuffle(rng);
        board.candidate = board.initial.clone();
        Ok(board)
    }

    pub fn items(&self) -> &[RearrangeItem] {
        &self.items
    }

    pub fn correct_order(&self) -> &[String] {
        &self.correct_order
    }

    pub fn candidate(&self) -> &[String] {
        &self.candidate
    }

    pub fn item(&self, item_id: &str) -> Option<&RearrangeItem> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    /// Items in the current candidate order.
    pub fn items_in_order(&self) -> Vec<&RearrangeItem> {
        self.candidate
            .iter()
            .filter_map(|id| self.item(id))
            .collect()
    }

    /// Drop `dragged` onto `target`: the dragged item is removed from its
    /// position and inserted at the index the target held before the move.
    /// Returns whether the order changed.
    pub fn move_item(&mut self, dragged: &str, target: &str) -> Result<bool, RearrangeError> {
        let from = self.position(dragged)?;
        let to = self.position(target)?;
        if from == to {
            return Ok(false);
        }
        let id = self.candidate.remove(from);
        self.candidate.insert(to, id);
        debug!(dragged, target, from, to, "rearrange item moved");
        Ok(true)
    }

    pub fn set_candidate(&mut self, candidate: Vec<String>) -> Result<(), RearrangeError> {
        check_permutation(&self.initial, &candidate)?;
        self.candidate = candidate;
        Ok(())
    }

    pub fn evaluate(&self, candidate: &[String]) -> Result<Evaluation, RearrangeError> {
        check_permutation(&self.initial, candidate)?;
        let positions: Vec<bool> = self
            .correct_order
            .iter()
            .zip(candidate)
            .map(|(expected, got)| expected == got)
            .collect();
        let correct_positions = positions.iter().filter(|ok| **ok).count();
        Ok(Evaluation {
            is_correct: correct_positions == positions.len(),
            correct_positions,
            positions,
        })
    }

    pub fn evaluate_current(&self) -> Evaluation {
        // The candidate is kept a permutation by every mutator.
        let positions: Vec<bool> = self
            .correct_order
            .iter()
            .zip(&self.candidate)
            .map(|(expected, got)| expected == got)
            .collect();
        let correct_positions = positions.iter().filter(|ok| **ok).count();
        Evaluation {
            is_correct: correct_positions == positions.len(),
            correct_positions,
            positions,
        }
    }

    /// Back to the order first presented. The reveal state is left alone.
    pub fn reset(&mut self) {
        self.candidate = self.initial.clone();
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn hide(&mut self) {
        self.revealed = false;
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    fn position(&self, item_id: &str) -> Result<usize, RearrangeError> {
        self.candidate
            .iter()
            .position(|id| id == item_id)
            .ok_or_else(|| RearrangeError::UnknownItem(item_id.to_string()))
    }
}

fn check_permutation(known: &[String], order: &[String]) -> Result<(), RearrangeError> {
    if known.len() != order.len() {
        return Err(RearrangeError::NotAPermutation);
    }
    let known: HashSet<&str> = known.iter().map(String::as_str).collect();
    let mut seen = HashSet::new();
    for id in order {
        if !known.contains(id.as_str()) {
            return Err(RearrangeError::UnknownItem(id.clone()));
        }
        if !seen.insert(id.as_str()) {
            return Err(RearrangeError::NotAPermutation);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn item(id: &str) -> RearrangeItem {
        RearrangeItem {
            item_id: id.into(),
            value: id.to_lowercase(),
            images: Vec::new(),
        }
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn board() -> RearrangeBoard {
        RearrangeBoard::new(
            vec![item("A"), item("B"), item("C")],
            ids(&["C", "A", "B"]),
        )
        .unwrap()
    }

    #[test]
    fn moving_last_onto_first_solves_board() {
        let mut b = board();
        assert!(b.move_item("C", "A").unwrap());
        assert_eq!(b.candidate(), ids(&["C", "A", "B"]).as_slice());
        let eval = b.evaluate_current();
        assert!(eval.is_correct);
        assert_eq!(eval.correct_positions, 3);
    }

    #[test]
    fn partial_candidate_reports_positions() {
        let b = board();
        let eval = b.evaluate(&ids(&["A", "C", "B"])).unwrap();
        assert_eq!(eval.positions, vec![false, false, true]);
        assert_eq!(eval.correct_positions, 1);
        assert!(!eval.is_correct);
    }

    #[test]
    fn moving_forward_inserts_at_target_index() {
        let mut b = board();
        b.move_item("A", "C").unwrap();
        assert_eq!(b.candidate(), ids(&["B", "C", "A"]).as_slice());
    }

    #[test]
    fn same_item_move_is_noop() {
        let mut b = board();
        assert!(!b.move_item("B", "B").unwrap());
        assert_eq!(b.candidate(), ids(&["A", "B", "C"]).as_slice());
    }

    #[test]
    fn unknown_item_is_rejected() {
        let mut b = board();
        assert_eq!(
            b.move_item("Z", "A"),
            Err(RearrangeError::UnknownItem("Z".into()))
        );
    }

    #[test]
    fn non_permutations_are_rejected() {
        let b = board();
        assert_eq!(
            b.evaluate(&ids(&["A", "A", "B"])),
            Err(RearrangeError::NotAPermutation)
        );
        assert_eq!(
            b.evaluate(&ids(&["A", "B"])),
            Err(RearrangeError::NotAPermutation)
        );
        assert_eq!(
            b.evaluate(&ids(&["A", "B", "D"])),
            Err(RearrangeError::UnknownItem("D".into()))
        );
    }

    #[test]
    fn construction_checks_ids() {
        assert_eq!(
            RearrangeBoard::new(vec![item("A"), item("A")], ids(&["A", "A"])),
            Err(RearrangeError::DuplicateItem("A".into()))
        );
        assert_eq!(
            RearrangeBoard::new(vec![item("A"), item("B")], ids(&["A"])),
            Err(RearrangeError::NotAPermutation)
        );
    }

    #[test]
    fn duplicate_display_values_compare_by_id() {
        let mut first = item("x1");
        first.value = "same".into();
        let mut second = item("x2");
        second.value = "same".into();
        let b = RearrangeBoard::new(vec![first, second], ids(&["x2", "x1"])).unwrap();
        assert!(!b.evaluate_current().is_correct);
        assert!(b.evaluate(&ids(&["x2", "x1"])).unwrap().is_correct);
    }

    #[test]
    fn reset_restores_presented_order_and_keeps_reveal() {
        let mut b = board();
        b.reveal();
        b.move_item("C", "A").unwrap();
        b.reset();
        assert_eq!(b.candidate(), ids(&["A", "B", "C"]).as_slice());
        assert!(b.is_revealed());
        b.hide();
        assert!(!b.is_revealed());
    }

    #[test]
    fn shuffled_board_resets_to_its_shuffle() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut b = RearrangeBoard::shuffled(
            vec![item("A"), item("B"), item("C"), item("D")],
            ids(&["D", "C", "B", "A"]),
            &mut rng,
        )
        .unwrap();
        let presented = b.candidate().to_vec();
        let mut sorted = presented.clone();
        sorted.sort();
        assert_eq!(sorted, ids(&["A", "B", "C", "D"]));

        let first = presented[0].clone();
        let last = presented[3].clone();
        b.move_item(&last, &first).unwrap();
        b.reset();
        assert_eq!(b.candidate(), presented.as_slice());
    }
}
