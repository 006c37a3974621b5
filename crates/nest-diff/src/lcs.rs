//! Longest-common-subsequence alignment shared by the tree and line engines.
//!
//! [`lcs`] finds the anchors, [`align`] walks both sequences against them and
//! reports, per position, whether an element is common, paired with an
//! unmatched element on the other side, or only present on one side.

/// One step of an alignment walk, expressed as indices into the inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// `actual[actual]` matches the current anchor, as does `base[base]`.
    Common { actual: usize, base: usize },
    /// Two unmatched elements at the same gap position, to be diffed together.
    Paired { actual: usize, base: usize },
    /// An unmatched element only present in `actual`.
    Added(usize),
    /// An unmatched element only present in `base`.
    Removed(usize),
}

/// Compute a longest common subsequence of `a` and `b` under `eq`.
///
/// The result borrows from `a`. When several subsequences have the same
/// length, backtracking prefers dropping the current element of `a` over the
/// current element of `b`, which makes the output deterministic.
pub fn lcs<'a, T, F>(a: &'a [T], b: &[T], eq: F) -> Vec<&'a T>
where
    F: Fn(&T, &T) -> bool,
{
    let (n, m) = (a.len(), b.len());
    let width = m + 1;
    // table[i * width + j] = length of the LCS of a[..i] and b[..j]
    let mut table = vec![0usize; (n + 1) * width];

    for i in 1..=n {
        for j in 1..=m {
            table[i * width + j] = if eq(&a[i - 1], &b[j - 1]) {
                table[(i - 1) * width + (j - 1)] + 1
            } else {
                table[i * width + (j - 1)].max(table[(i - 1) * width + j])
            };
        }
    }

    let mut out = Vec::with_capacity(table[n * width + m]);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if eq(&a[i - 1], &b[j - 1]) {
            out.push(&a[i - 1]);
            i -= 1;
            j -= 1;
        } else if table[i * width + (j - 1)] > table[(i - 1) * width + j] {
            j -= 1;
        } else {
            i -= 1;
        }
    }
    out.reverse();
    out
}

/// Align `actual` against `base`, anchored on their longest common subsequence.
///
/// Between two anchors, unmatched elements are paired positionally; whichever
/// side has leftovers emits them as pure additions or removals. After the last
/// anchor a terminal pass with no anchor flushes both tails, so every element
/// of both inputs appears in exactly one step.
pub fn align<T, F>(actual: &[T], base: &[T], eq: F) -> Vec<Step>
where
    F: Fn(&T, &T) -> bool,
{
    let anchors = lcs(actual, base, &eq);
    let mut steps = Vec::with_capacity(actual.len().max(base.len()));
    let (mut ai, mut bi) = (0usize, 0usize);

    for anchor in anchors.into_iter().map(Some).chain(std::iter::once(None)) {
        let is_anchor = |x: &T| anchor.is_some_and(|a| eq(a, x));

        while bi < base.len() && !is_anchor(&base[bi]) {
            if ai < actual.len() && !is_anchor(&actual[ai]) {
                steps.push(Step::Paired { actual: ai, base: bi });
                ai += 1;
            } else {
                steps.push(Step::Removed(bi));
            }
            bi += 1;
        }

        while ai < actual.len() && !is_anchor(&actual[ai]) {
            steps.push(Step::Added(ai));
            ai += 1;
        }

        if anchor.is_some() {
            steps.push(Step::Common { actual: ai, base: bi });
            ai += 1;
            bi += 1;
        }
    }

    steps
}
