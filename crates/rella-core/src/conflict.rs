//! Conflict resolution between recommended and not-recommended actions
//!
//! - recommended duplicates: strictly higher priority replaces, ties keep the
//!   earlier entry
//! - not-recommended duplicates: the last occurrence wins
//! - any code present in not-recommended is dropped from recommended
//!
//! Both lists keep the order in which each code was first seen.
use std::collections::HashMap;

use crate::data_model::Action;

pub fn resolve_conflicts(
    recommended: Vec<Action>,
    not_recommended: Vec<Action>,
) -> (Vec<Action>, Vec<Action>) {
    let mut recs: Vec<Action> = Vec::with_capacity(recommended.len());
    let mut rec_index: HashMap<String, usize> = HashMap::new();

    for action in recommended {
        match rec_index.get(&action.code) {
            Some(&i) => {
                if action.rank() > recs[i].rank() {
                    recs[i] = action;
                }
            }
            None => {
                rec_index.insert(action.code.clone(), recs.len());
                recs.push(action);
            }
        }
    }

    let mut nots: Vec<Action> = Vec::with_capacity(not_recommended.len());
    let mut not_index: HashMap<String, usize> = HashMap::new();

    for action in not_recommended {
        match not_index.get(&action.code) {
            Some(&i) => nots[i] = action,
            None => {
                not_index.insert(action.code.clone(), nots.len());
                nots.push(action);
            }
        }
    }

    recs.retain(|a| !not_index.contains_key(&a.code));

    (recs, nots)
}
