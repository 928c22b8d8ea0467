use crate::domain::model::{PermutationCount, Total};

/// Number of ordered sequences of daily doses (1 or 2 pills a day) that sum
/// exactly to `total` pills.
///
/// Satisfies `count(0) = 1`, `count(1) = 1`,
/// `count(n) = count(n - 1) + count(n - 2)` — the last day of a valid
/// schedule delivers either 1 or 2 pills, so every schedule for `n` extends
/// one for `n - 1` or one for `n - 2`. Computed bottom-up in O(n) time and
/// constant space; the naive branching recursion this replaces is O(φ^n).
pub fn count(total: Total) -> PermutationCount {
    let mut prev: PermutationCount = 1; // count(0)
    let mut curr: PermutationCount = 1; // count(1)

    for _ in 2..=total {
        let next = prev + curr;
        prev = curr;
        curr = next;
    }

    if total == 0 {
        prev
    } else {
        curr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_totals() {
        assert_eq!(count(0), 1);
        assert_eq!(count(1), 1);
        assert_eq!(count(2), 2);
        assert_eq!(count(3), 3);
        assert_eq!(count(4), 5);
        assert_eq!(count(5), 8);
    }

    #[test]
    fn test_recurrence_holds_over_full_domain() {
        for n in 2..=47 {
            assert_eq!(count(n), count(n - 1) + count(n - 2), "failed at n = {n}");
        }
    }

    #[test]
    fn test_deterministic_across_invocations() {
        for n in 1..=47 {
            assert_eq!(count(n), count(n));
        }
    }

    #[test]
    fn test_upper_domain_bound() {
        // Fibonacci(48) under the shifted indexing.
        assert_eq!(count(47), 4_807_526_976);
    }
}
