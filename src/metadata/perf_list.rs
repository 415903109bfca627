use std::collections::HashSet;

/// Collect the event names from captured `perf list` output.
///
/// Every whitespace separated token outside a `[...]` description is taken as a name, so aliases
/// such as `cpu-cycles OR cycles` contribute both spellings.
pub fn parse_perf_list(output: &str) -> HashSet<String> {
    output
        .lines()
        .flat_map(|line| {
            // Descriptions are bracketed and trail the names.
            let names = match line.find('[') {
                Some(idx) => &line[..idx],
                None => line,
            };
            names.split_whitespace()
        })
        .filter(|tok| *tok != "OR" && !tok.ends_with(':'))
        .map(String::from)
        .collect()
}
