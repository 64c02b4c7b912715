//! # Answer-Set Enumeration
//!
//! Lazily generates the Cartesian product of every question field's legal
//! answers. [`Permutations`] keeps one index per field and advances them like
//! an odometer, rightmost field fastest, so memory stays proportional to the
//! number of fields however large the product grows.
//!
//! An empty field list yields no combinations (not one empty combination),
//! and so does any field with zero answers.

use std::iter::FusedIterator;

use ccws_catalog::QuestionField;

use crate::answers::AnswerCombination;

/// Number of combinations for `fields`, or `None` if it overflows `usize`.
pub fn combination_count(fields: &[QuestionField]) -> Option<usize> {
    if is_empty_product(fields) {
        return Some(0);
    }
    fields
        .iter()
        .try_fold(1usize, |acc, field| acc.checked_mul(field.answers.len()))
}

/// No fields, or a field with zero answers, leaves nothing to enumerate.
fn is_empty_product(fields: &[QuestionField]) -> bool {
    fields.is_empty() || fields.iter().any(|f| f.answers.is_empty())
}

/// Every combination of one answer per field.
pub fn permute(fields: &[QuestionField]) -> Permutations {
    Permutations::new(fields.to_vec())
}

/// Lazy iterator over answer combinations.
#[derive(Debug, Clone)]
pub struct Permutations {
    fields: Vec<QuestionField>,
    /// Index into each field's answers; `None` once exhausted.
    cursor: Option<Vec<usize>>,
    /// Combinations left to yield, when the total fits in `usize`.
    remaining: Option<usize>,
}

impl Permutations {
    /// Enumerate over owned fields.
    pub fn new(fields: Vec<QuestionField>) -> Self {
        let remaining = combination_count(&fields);
        let cursor = (!is_empty_product(&fields)).then(|| vec![0; fields.len()]);
        Self {
            fields,
            cursor,
            remaining,
        }
    }

    /// The fields being enumerated.
    pub fn fields(&self) -> &[QuestionField] {
        &self.fields
    }

    fn current(&self, cursor: &[usize]) -> AnswerCombination {
        AnswerCombination::from_pairs(
            self.fields
                .iter()
                .zip(cursor)
                .map(|(field, &i)| (field.id.as_str(), field.answers[i].as_str())),
        )
    }
}

impl Iterator for Permutations {
    type Item = AnswerCombination;

    fn next(&mut self) -> Option<AnswerCombination> {
        let mut cursor = self.cursor.take()?;
        let item = self.current(&cursor);

        // Advance the odometer; carrying out of the leftmost digit ends it.
        let mut exhausted = true;
        for (digit, field) in cursor.iter_mut().zip(&self.fields).rev() {
            *digit += 1;
            if *digit < field.answers.len() {
                exhausted = false;
                break;
            }
            *digit = 0;
        }
        if !exhausted {
            self.cursor = Some(cursor);
        }
        self.remaining = self.remaining.map(|n| n.saturating_sub(1));
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.remaining {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Permutations {}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn arb_fields() -> impl Strategy<Value = Vec<QuestionField>> {
        prop::collection::vec(
            prop::collection::btree_set("[a-z]{1,3}", 0..5),
            0..5,
        )
        .prop_map(|sets| {
            sets.into_iter()
                .enumerate()
                .map(|(i, answers)| QuestionField::new(format!("f{i}"), answers))
                .collect()
        })
    }

    proptest! {
        /// The iterator yields exactly the product of the answer counts, every
        /// combination distinct and each field answered with a legal value.
        #[test]
        fn count_matches_product(fields in arb_fields()) {
            let expected = combination_count(&fields).unwrap();
            let combos: Vec<AnswerCombination> = permute(&fields).collect();
            prop_assert_eq!(combos.len(), expected);

            let distinct: HashSet<&AnswerCombination> = combos.iter().collect();
            prop_assert_eq!(distinct.len(), combos.len());

            for combo in &combos {
                prop_assert_eq!(combo.len(), fields.len());
                for ((id, value), field) in combo.pairs().iter().zip(&fields) {
                    prop_assert_eq!(id, &field.id);
                    prop_assert!(field.answers.contains(value));
                }
            }
        }
    }
}
