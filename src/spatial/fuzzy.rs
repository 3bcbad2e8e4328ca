use crate::util::last_token;

/// Ghosts closer than this edit distance to a candidate's name are offered
/// as merge targets.
pub const GHOST_EDIT_DISTANCE_LIMIT: usize = 3;

pub fn levenshtein(a: &str, b: &str) -> usize {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();

    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];
    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        table[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            table[i][j] = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + substitution);
        }
    }

    table[a.len()][b.len()]
}

pub fn names_compatible(ghost_name: &str, candidate_name: &str) -> bool {
    let ghost = ghost_name.trim().to_lowercase();
    let candidate = candidate_name.trim().to_lowercase();
    if ghost.is_empty() || candidate.is_empty() {
        return false;
    }

    if levenshtein(&ghost, &candidate) < GHOST_EDIT_DISTANCE_LIMIT {
        return true;
    }

    matches!(
        (last_token(&ghost), last_token(&candidate)),
        (Some(a), Some(b)) if a == b
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn edit_distance_basics() {
        assert_eq!(levenshtein("Bob Smith", "Bob Smith"), 0);
        assert_eq!(levenshtein("Bob Smith", "Rob Smith"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("Zoë", "Zoe"), 1);
    }

    #[test]
    fn compatible_by_distance_or_surname() {
        assert!(names_compatible("Jon Smith", "John Smith"));
        assert!(names_compatible("Bobby Smith", "Robert Smith"));
        assert!(names_compatible("MARIA lee", "Maria Lee"));
        assert!(!names_compatible("Alex Chen", "Priya Natarajan"));
        assert!(!names_compatible("", "Anyone"));
    }
}
