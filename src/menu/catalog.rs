//! Gallery catalog grouping and natural ordering

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Galleries grouped by upper-cased first character
pub type LetterGroups = BTreeMap<char, Vec<String>>;

/// Group gallery identifiers by first letter
///
/// Identifiers are trimmed; empty ones are dropped and duplicates collapse.
/// Each group is sorted with [`natural_cmp`].
pub fn group_galleries<I, S>(galleries: I) -> LetterGroups
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups = LetterGroups::new();
    for name in galleries {
        let name = name.as_ref().trim();
        let Some(first) = name.chars().next() else {
            continue;
        };
        let letter = first.to_uppercase().next().unwrap_or(first);
        let group = groups.entry(letter).or_default();
        if !group.iter().any(|existing| existing == name) {
            group.push(name.to_string());
        }
    }
    for group in groups.values_mut() {
        group.sort_by(|a, b| natural_cmp(a, b));
    }
    groups
}

#[derive(Debug, PartialEq, Eq)]
enum Chunk<'a> {
    Digits(&'a str),
    Text(&'a str),
}

fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            Some(previous) if previous != digit => {
                out.push(if previous { Chunk::Digits(&s[start..i]) } else { Chunk::Text(&s[start..i]) });
                start = i;
            }
            _ => {}
        }
        in_digits = Some(digit);
    }
    if let Some(digit) = in_digits {
        out.push(if digit { Chunk::Digits(&s[start..]) } else { Chunk::Text(&s[start..]) });
    }
    out
}

fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a_trim = a.trim_start_matches('0');
    let b_trim = b.trim_start_matches('0');
    a_trim
        .len()
        .cmp(&b_trim.len())
        .then_with(|| a_trim.cmp(b_trim))
        // "07" after "7"
        .then_with(|| a.len().cmp(&b.len()))
}

fn cmp_text(a: &str, b: &str) -> Ordering {
    let lower = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<String>();
    lower(a).cmp(&lower(b))
}

/// Numeric-aware, case-insensitive string ordering
///
/// Runs of ASCII digits compare by value, so "Gallery 2" sorts before
/// "Gallery 10". Strings equal under that ordering fall back to a plain
/// comparison so the result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);

    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (l, r) {
            (Chunk::Digits(x), Chunk::Digits(y)) => cmp_digits(x, y),
            (Chunk::Text(x), Chunk::Text(y)) => cmp_text(x, y),
            // Numbers before letters
            (Chunk::Digits(_), Chunk::Text(_)) => Ordering::Less,
            (Chunk::Text(_), Chunk::Digits(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    left.len().cmp(&right.len()).then_with(|| a.cmp(b))
}
