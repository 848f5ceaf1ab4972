//! Levenshtein edit distance.

/// Minimum number of single-byte insertions, deletions and substitutions
/// turning `a` into `b`, each costing 1.
///
/// Rows of the `(len(a)+1) x (len(b)+1)` table are filled one at a time and
/// only the previous row is kept. The first row and column count up from 0;
/// a matching byte copies the diagonal, a mismatch takes one plus the
/// smallest of the three neighbours.
///
/// ```
/// use chained_speller::edit_distance;
///
/// assert_eq!(edit_distance("kitten", "sitting"), 3);
/// assert_eq!(edit_distance("", "abc"), 3);
/// ```
pub fn edit_distance<A, B>(a: A, b: B) -> usize
where
    A: AsRef<[u8]>,
    B: AsRef<[u8]>,
{
    let (a, b) = (a.as_ref(), b.as_ref());
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j + 1].min(curr[j]).min(prev[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}
