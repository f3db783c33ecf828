/*!
 * Splitting text into clipboard-sized parts
 *
 * Every part is later wrapped in a header and footer whose length depends on
 * the part number and the total part count ("Part 9/9" is shorter than
 * "Part 10/10"), so the per-part text budget is found by iterating on the
 * part count until it stops changing.
 */

use crate::error::{NavError, Result};
use crate::utils::char_len;

/// Upper bound on fixed-point and re-split iterations
pub const MAX_ITERATIONS: usize = 64;

/// Text budget derived for an assumed part count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartPlan {
    /// Part count the budget was computed for
    pub parts: usize,
    /// Header plus footer length for `parts` out of `parts`
    pub overhead: usize,
    /// Characters of content allowed per part
    pub budget: usize,
}

/// Compute the plan for an assumed part count
fn plan_for<F>(parts: usize, limit: usize, overhead: &F) -> Result<PartPlan>
where
    F: Fn(usize, usize) -> usize,
{
    let hf = overhead(parts, parts);
    if hf >= limit {
        return Err(NavError::LimitTooSmall {
            limit,
            overhead: hf,
        });
    }
    Ok(PartPlan {
        parts,
        overhead: hf,
        budget: limit - hf,
    })
}

/// Find the per-part budget by fixed-point iteration on the part count.
///
/// Starting from one part, the header/footer overhead for "part p of p" is
/// subtracted from `limit` and the content length divided by the remaining
/// budget gives the next part count. Stops once the count no longer changes
/// or the content fits into a single part.
pub fn converge_budget<F>(content_len: usize, limit: usize, overhead: &F) -> Result<PartPlan>
where
    F: Fn(usize, usize) -> usize,
{
    let mut plan = plan_for(1, limit, overhead)?;

    for _ in 0..MAX_ITERATIONS {
        let new_parts = content_len.div_ceil(plan.budget).max(1);
        if new_parts == plan.parts || new_parts <= 1 {
            return Ok(PartPlan {
                parts: new_parts,
                ..plan
            });
        }
        plan = plan_for(new_parts, limit, overhead)?;
    }

    Ok(plan)
}

/// Greedily pack whole lines into parts of at most `budget` characters.
///
/// Lines keep their trailing `\n`, so concatenating the parts gives back
/// `content`. A line longer than `budget` is placed alone in its own part.
pub fn split_lines(content: &str, budget: usize) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in content.split_inclusive('\n') {
        let line_len = char_len(line);
        if current_len + line_len > budget && !current.is_empty() {
            parts.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() || parts.is_empty() {
        parts.push(current);
    }
    parts
}

/// Split `content` into the fewest parts that fit `limit` once framed.
///
/// `overhead(part, total)` returns the header plus footer length for part
/// `part` (1-based) of `total`. It must not decrease when `total` grows.
/// Always returns at least one part.
pub fn partition<F>(content: &str, limit: usize, overhead: F) -> Result<Vec<String>>
where
    F: Fn(usize, usize) -> usize,
{
    let mut plan = converge_budget(char_len(content), limit, &overhead)?;

    // Line boundaries can force more parts than the estimate; retry with the
    // real count while its longer header would overflow the limit.
    for _ in 0..MAX_ITERATIONS {
        let parts = split_lines(content, plan.budget);
        if overhead(parts.len(), parts.len()) <= plan.overhead {
            return Ok(parts);
        }
        plan = plan_for(parts.len(), limit, &overhead)?;
    }

    Ok(split_lines(content, plan.budget))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simple_overhead(part: usize, total: usize) -> usize {
        format!("Part {}/{}", part, total).len() + 30
    }

    #[test]
    fn test_small_content_single_part() {
        let content = "a\nb\nc\n";
        let parts = partition(content, 4096, simple_overhead).unwrap();
        assert_eq!(parts, vec![content.to_string()]);
    }

    #[test]
    fn test_converges_on_many_lines() {
        let content = "abcdefghi\n".repeat(1000);
        let limit = 200;

        let plan = converge_budget(char_len(&content), limit, &simple_overhead).unwrap();
        assert_eq!(plan.parts, char_len(&content).div_ceil(plan.budget));
        assert_eq!(plan.parts, 63);
        assert_eq!(plan.budget, 160);

        let parts = partition(&content, limit, simple_overhead).unwrap();
        assert!(parts.len() > 1);
        assert_eq!(parts.concat(), content);
        for (i, part) in parts.iter().enumerate() {
            let rendered = char_len(part) + simple_overhead(i + 1, parts.len());
            assert!(rendered <= limit, "part {} is {} chars", i + 1, rendered);
        }
    }

    #[test]
    fn test_parts_end_on_line_boundaries() {
        let content: String = (0..300)
            .map(|i| format!("line number {}\n", i))
            .collect();
        let parts = partition(&content, 250, simple_overhead).unwrap();

        for part in &parts {
            assert!(part.ends_with('\n'));
        }
        assert_eq!(parts.concat(), content);
    }

    #[test]
    fn test_content_without_trailing_newline() {
        let content = "first\nsecond\nthird";
        let parts = split_lines(content, 8);
        assert_eq!(parts, vec!["first\n", "second\n", "third"]);
        assert_eq!(parts.concat(), content);
    }

    #[test]
    fn test_long_line_gets_its_own_part() {
        let long = "x".repeat(300);
        let content = format!("short\n{}\nend\n", long);
        let parts = partition(&content, 100, simple_overhead).unwrap();

        assert_eq!(parts.concat(), content);
        assert!(parts.iter().any(|p| p == &format!("{}\n", long)));
        for part in parts.iter().filter(|p| !p.starts_with('x')) {
            assert!(char_len(part) <= 100);
        }
    }

    #[test]
    fn test_limit_too_small() {
        let err = partition("abc\n", 10, simple_overhead).unwrap_err();
        assert!(matches!(err, NavError::LimitTooSmall { limit: 10, .. }));
    }

    #[test]
    fn test_empty_content() {
        let parts = partition("", 100, simple_overhead).unwrap();
        assert_eq!(parts, vec![String::new()]);
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let content = "ééééé\n".repeat(4);
        // 6 characters per line, 12 bytes per line
        let parts = split_lines(&content, 12);
        assert_eq!(parts.len(), 2);
    }
}
