//! Full-format process listing parsing
//!
//! Parses the output of `ps -ef` as captured inside a container. The first
//! line is a column header; its whitespace-delimited token count is the
//! minimum column width of every data row. The command field is the join of
//! all tokens from the last header column onward, since a command line can
//! itself contain embedded whitespace.

/// Reconstruct the command string of every well-formed row in a `ps -ef`
/// listing, in process-list order.
///
/// Rows with fewer columns than the header (blank trailing lines, truncated
/// rows) are skipped silently rather than treated as errors.
///
/// ```
/// let listing = "\
/// UID        PID  PPID  C STIME TTY          TIME CMD
/// root         1     0  0 05:49 ?        00:00:00 node --inspect=9229 index.js
/// root        17     0  0 06:44 pts/0    00:00:00 bash
/// ";
/// let commands = portprobe_core::proclist::commands(listing);
/// assert_eq!(commands[0], "node --inspect=9229 index.js");
/// assert_eq!(commands[1], "bash");
/// ```
pub fn commands(listing: &str) -> Vec<String> {
    let mut lines = listing.lines();
    let Some(header) = lines.next() else {
        return Vec::new();
    };
    let total_cols = header.split_whitespace().count();
    if total_cols == 0 {
        return Vec::new();
    }

    lines
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            if cols.len() < total_cols {
                return None;
            }
            Some(cols[total_cols - 1..].join(" "))
        })
        .collect()
}
