/// Compress device numbers into range notation.
///
/// Sorts, drops duplicates, and emits `a` for singletons and `a-b` for
/// maximal runs of consecutive numbers, joined with ", ":
/// - [] -> ""
/// - [3, 1, 2] -> "1-3"
/// - [1, 2, 3, 5, 7, 8, 9] -> "1-3, 5, 7-9"
pub fn compress(numbers: &[u32]) -> String {
    let mut sorted = numbers.to_vec();
    sorted.sort_unstable();
    sorted.dedup();
    compress_sorted(&sorted)
}

/// Streaming variant for input that is already sorted and unique.
pub fn compress_sorted(sorted: &[u32]) -> String {
    let mut runs: Vec<String> = Vec::new();
    let mut iter = sorted.iter().copied();
    let Some(first) = iter.next() else {
        return String::new();
    };

    let (mut start, mut prev) = (first, first);
    for n in iter {
        if prev.checked_add(1) == Some(n) {
            prev = n;
            continue;
        }
        runs.push(format_run(start, prev));
        start = n;
        prev = n;
    }
    runs.push(format_run(start, prev));

    runs.join(", ")
}

fn format_run(start: u32, end: u32) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

/// Expand range notation back into sorted, unique numbers.
///
/// Tokens that do not parse are skipped.
pub fn expand(ranges: &str) -> Vec<u32> {
    let mut numbers = Vec::new();
    for token in ranges.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once('-') {
            Some((a, b)) => {
                if let (Ok(a), Ok(b)) = (a.trim().parse::<u32>(), b.trim().parse::<u32>()) {
                    numbers.extend(a.min(b)..=a.max(b));
                }
            }
            None => {
                if let Ok(n) = token.parse::<u32>() {
                    numbers.push(n);
                }
            }
        }
    }
    numbers.sort_unstable();
    numbers.dedup();
    numbers
}
