use std::collections::BTreeSet;

use crate::models::Interest;

/// Similarity between two interest sets.
#[derive(Debug, Clone, PartialEq)]
pub struct InterestMatch {
    /// Intersection, in declaration order.
    pub shared: Vec<Interest>,
    pub shared_count: usize,
    /// `shared / min(|a|, |b|)`; 0.0 when either set is empty.
    pub overlap_ratio: f64,
    /// `shared / |a ∪ b|`; 0.0 when the union is empty.
    pub jaccard_index: f64,
}

/// Compare two interest sets. Pure; never fails.
pub fn compare(a: &BTreeSet<Interest>, b: &BTreeSet<Interest>) -> InterestMatch {
    let shared: Vec<Interest> = a.intersection(b).copied().collect();
    let shared_count = shared.len();

    let smaller = a.len().min(b.len());
    let overlap_ratio = if smaller == 0 {
        0.0
    } else {
        shared_count as f64 / smaller as f64
    };

    let union = a.union(b).count();
    let jaccard_index = if union == 0 {
        0.0
    } else {
        shared_count as f64 / union as f64
    };

    InterestMatch {
        shared,
        shared_count,
        overlap_ratio,
        jaccard_index,
    }
}

/// Shared interests as prose, shortest form first:
/// "", "Hiking", "Hiking and Movies", "Hiking, Movies, and Coffee",
/// "Hiking, Movies, Coffee, and 2 more".
pub fn format_shared_interests(shared: &[Interest]) -> String {
    match shared {
        [] => String::new(),
        [only] => only.display_name().to_string(),
        [first, second] => format!("{} and {}", first.display_name(), second.display_name()),
        [first, second, third] => format!(
            "{}, {}, and {}",
            first.display_name(),
            second.display_name(),
            third.display_name()
        ),
        [first, second, third, rest @ ..] => format!(
            "{}, {}, {}, and {} more",
            first.display_name(),
            second.display_name(),
            third.display_name(),
            rest.len()
        ),
    }
}

/// All display names joined with ", ", sorted alphabetically. Prose
/// highlights keep declaration order; full listings sort for stable scanning.
pub fn format_as_list(interests: &BTreeSet<Interest>) -> String {
    let mut names: Vec<&str> = interests.iter().map(|i| i.display_name()).collect();
    names.sort_unstable();
    names.join(", ")
}
