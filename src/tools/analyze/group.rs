use crate::tools::clean::fold_text;

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Latin,
    Wide,
    Separator,
}

fn char_class(c: char) -> CharClass {
    if c.is_ascii_alphanumeric() {
        CharClass::Latin
    } else if c.is_alphanumeric() {
        CharClass::Wide
    } else {
        CharClass::Separator
    }
}

/// Tokens of a folded title: maximal runs of ASCII alphanumerics or of other
/// alphanumerics (CJK has no spaces, so script changes split tokens too).
pub(super) fn tokens(title: &str) -> Vec<String> {
    let folded = fold_text(title);
    let mut out = Vec::new();
    let mut current = String::new();
    let mut class = CharClass::Separator;
    for c in folded.chars() {
        let next = char_class(c);
        if next != class && !current.is_empty() {
            out.push(std::mem::take(&mut current));
        }
        if next != CharClass::Separator {
            current.push(c);
        }
        class = next;
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// Sorted tokens joined by single spaces.
pub(super) fn token_sort_key(title: &str) -> String {
    let mut tokens = tokens(title);
    tokens.sort();
    tokens.join(" ")
}

/// Indel similarity of two token-sort keys on a 0-100 scale:
/// `100 * (1 - indel / (len_a + len_b))`. Empty keys match nothing.
pub(super) fn key_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    // indel = len_a + len_b - 2 * lcs
    200.0 * common_subsequence_len(&a, &b) as f64 / (a.len() + b.len()) as f64
}

fn common_subsequence_len(a: &[char], b: &[char]) -> usize {
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];
    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }
    prev[b.len()]
}

/// Greedy single-pass grouping in input order.
///
/// Each ungrouped record seeds a new group and pulls in every later
/// ungrouped record whose title is at least `threshold` similar to the seed.
pub(super) fn assign_groups(titles: &[&str], threshold: f64) -> Vec<usize> {
    let keys: Vec<String> = titles.iter().map(|t| token_sort_key(t)).collect();
    let mut groups: Vec<Option<usize>> = vec![None; keys.len()];
    let mut next_group = 0;
    for seed in 0..keys.len() {
        if groups[seed].is_some() {
            continue;
        }
        groups[seed] = Some(next_group);
        for other in seed + 1..keys.len() {
            if groups[other].is_none() && key_similarity(&keys[seed], &keys[other]) >= threshold {
                groups[other] = Some(next_group);
            }
        }
        next_group += 1;
    }
    groups.into_iter().map(|g| g.unwrap_or_default()).collect()
}
