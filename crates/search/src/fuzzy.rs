//! Approximate string similarity.

/// Length of the longest common subsequence of two char slices.
fn lcs_length(a: &[char], b: &[char]) -> usize {
    let (a, b) = if a.len() < b.len() { (b, a) } else { (a, b) };
    if b.is_empty() {
        return 0;
    }

    // Use two rows for space optimization
    let mut prev = vec![0usize; b.len() + 1];
    let mut curr = vec![0usize; b.len() + 1];

    for &ca in a {
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Indel similarity in `[0.0, 1.0]`.
///
/// `1 - (insertions + deletions) / (len(a) + len(b))`, which equals
/// `2 * lcs / (len(a) + len(b))`. Two empty inputs are identical.
pub fn indel_similarity(a: &[char], b: &[char]) -> f64 {
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    (2 * lcs_length(a, b)) as f64 / total as f64
}

/// Best-window similarity of the shorter string against the longer one,
/// as an integer percentage truncated toward zero.
///
/// Truncation keeps `score >= threshold` equivalent to comparing the exact
/// ratio, so 66.7% never passes a threshold of 67.
///
/// Every full-length window of the longer string is scored, plus the
/// shorter windows that touch either end, so a query hanging off the start
/// or end of the text is still aligned. Returns 0 when exactly one side is
/// empty.
pub fn partial_similarity(query: &str, text: &str) -> u8 {
    let q: Vec<char> = query.chars().collect();
    let t: Vec<char> = text.chars().collect();

    match (q.is_empty(), t.is_empty()) {
        (true, true) => return 100,
        (true, false) | (false, true) => return 0,
        _ => {}
    }

    let (shorter, longer) = if q.len() <= t.len() { (&q, &t) } else { (&t, &q) };
    let m = shorter.len();
    let n = longer.len();

    if m == n {
        return to_percent(indel_similarity(shorter, longer));
    }

    let mut best = 0.0f64;
    let mut consider = |window: &[char]| {
        let score = indel_similarity(shorter, window);
        if score > best {
            best = score;
        }
        best >= 1.0
    };

    // Windows hanging off the left edge
    for end in 1..m {
        if consider(&longer[..end]) {
            return 100;
        }
    }
    // Full-length windows
    for start in 0..=(n - m) {
        if consider(&longer[start..start + m]) {
            return 100;
        }
    }
    // Windows hanging off the right edge
    for start in (n - m + 1)..n {
        if consider(&longer[start..]) {
            return 100;
        }
    }

    to_percent(best)
}

/// Absorbs float error such as `0.29 * 100.0 == 28.999999999999996`.
const PERCENT_EPSILON: f64 = 1e-9;

fn to_percent(ratio: f64) -> u8 {
    (ratio * 100.0 + PERCENT_EPSILON).floor().clamp(0.0, 100.0) as u8
}
