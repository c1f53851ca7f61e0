//! Trace log parser.
//!
//! Parses call/return trace text into a namespace → statistics map.
//!
//! Call line:   `TRACE <id>: |||(<namespace>/<function>)`
//! Return line: `TRACE <id>: ||| => <value>`
//!
//! Depth is encoded by the number of `|` markers. Returns are matched to
//! calls through a stack local to one parse; an unmatched return is
//! dropped without resynchronization.

use super::schema::{CallRecord, FunctionRecord, NamespaceMap, NamespaceRecord, ReturnValue};
use crate::utils::config::{DEPTH_MARKER, RETURN_TOKEN, TRACE_LINE_PREFIX};
use crate::utils::error::ParseError;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// First two-part parenthesized token: `(namespace/function)`
static CALL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^/()]+)/([^)]+)\)").expect("valid call token pattern"));

/// A call waiting for its return line
#[derive(Debug)]
struct StackFrame {
    trace_id: String,
    namespace: String,
    function: String,
}

/// Parse a trace log into a namespace map
///
/// **Public** - main entry point for trace imports
///
/// Malformed lines are skipped (best-effort parse). The call stack used
/// for return matching lives only for the duration of this call.
///
/// # Errors
/// * `ParseError::EmptyInput` - no call line was recognized
pub fn parse_trace_log(content: &str) -> Result<NamespaceMap, ParseError> {
    let mut namespaces = NamespaceMap::new();
    let mut call_stack: Vec<StackFrame> = Vec::new();
    let mut skipped = 0usize;

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let line_num = index + 1;
        let handled = if line.contains(RETURN_TOKEN) {
            parse_return_line(line, &mut namespaces, &mut call_stack)
        } else {
            parse_call_line(line, line_num, &mut namespaces, &mut call_stack)
        };

        if !handled {
            debug!("Skipping unparseable line {}: {}", line_num, line);
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("Skipped {} malformed trace lines", skipped);
    }

    if namespaces.is_empty() {
        return Err(ParseError::EmptyInput);
    }

    count_calls(&mut namespaces);

    debug!("Parsed {} namespaces from trace log", namespaces.len());

    Ok(namespaces)
}

/// Split a line into its trace id and remainder
///
/// **Private** - shared by call and return parsing
fn split_trace_line(line: &str) -> Option<(&str, &str)> {
    let (id_part, rest) = line.split_once(':')?;
    let trace_id = id_part.trim().strip_prefix(TRACE_LINE_PREFIX)?;
    Some((trace_id.trim(), rest.trim()))
}

/// Register one call line; returns false if the line didn't parse
///
/// **Private** - internal helper for parse_trace_log
fn parse_call_line(
    line: &str,
    line_num: usize,
    namespaces: &mut NamespaceMap,
    call_stack: &mut Vec<StackFrame>,
) -> bool {
    let Some((trace_id, rest)) = split_trace_line(line) else {
        return false;
    };

    let depth = rest.chars().filter(|c| *c == DEPTH_MARKER).count();

    let Some(token) = CALL_TOKEN.captures(rest) else {
        return false;
    };
    let namespace = token[1].to_string();
    let function = token[2].to_string();

    let record = namespaces
        .entry(namespace.clone())
        .or_insert_with(|| NamespaceRecord {
            file_prefix: namespace.replace('.', "/"),
            functions: Default::default(),
            total_n_calls: 0,
        });

    let func = record
        .functions
        .entry(function.clone())
        .or_insert_with(|| FunctionRecord {
            name: function.clone(),
            n_calls: 0,
            calls: Default::default(),
        });

    func.calls.insert(
        trace_id.to_string(),
        CallRecord {
            line_num,
            depth,
            returned: None,
        },
    );

    call_stack.push(StackFrame {
        trace_id: trace_id.to_string(),
        namespace,
        function,
    });

    true
}

/// Match one return line against the call stack
///
/// **Private** - internal helper for parse_trace_log
fn parse_return_line(
    line: &str,
    namespaces: &mut NamespaceMap,
    call_stack: &mut Vec<StackFrame>,
) -> bool {
    let Some((trace_id, rest)) = split_trace_line(line) else {
        return false;
    };

    let Some((_, value)) = rest.split_once(RETURN_TOKEN) else {
        return false;
    };

    let Some(frame) = call_stack.pop() else {
        debug!("Return with empty call stack: id {}", trace_id);
        return true;
    };

    // Unmatched ids are dropped without scanning the stack
    if frame.trace_id != trace_id {
        debug!(
            "Dropping return for id {} (stack top was {})",
            trace_id, frame.trace_id
        );
        return true;
    }

    if let Some(call) = namespaces
        .get_mut(&frame.namespace)
        .and_then(|ns| ns.functions.get_mut(&frame.function))
        .and_then(|f| f.calls.get_mut(&frame.trace_id))
    {
        call.returned = Some(ReturnValue {
            value: value.trim().to_string(),
        });
    }

    true
}

/// Fill in `n_calls` per function and `total_n_calls` per namespace
///
/// **Private** - post-pass over the finished map
fn count_calls(namespaces: &mut NamespaceMap) {
    for record in namespaces.values_mut() {
        let mut total = 0u64;
        for func in record.functions.values_mut() {
            func.n_calls = func.calls.len() as u64;
            total += func.n_calls;
        }
        record.total_n_calls = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_call_and_return() {
        let map = parse_trace_log("TRACE t1: (ns.foo/bar)\nTRACE t1: => 42\n").unwrap();

        let ns = &map["ns.foo"];
        assert_eq!(ns.file_prefix, "ns/foo");
        assert_eq!(ns.total_n_calls, 1);

        let func = &ns.functions["bar"];
        assert_eq!(func.n_calls, 1);
        let call = &func.calls["t1"];
        assert_eq!(call.line_num, 1);
        assert_eq!(call.depth, 0);
        assert_eq!(call.returned.as_ref().unwrap().value, "42");
    }

    #[test]
    fn test_nested_calls_track_depth() {
        let log = "\
TRACE t1: (app.core/outer)
TRACE t2: | (app.core/inner)
TRACE t2: | => :ok
TRACE t1: => :done
";
        let map = parse_trace_log(log).unwrap();
        let funcs = &map["app.core"].functions;

        assert_eq!(funcs["outer"].calls["t1"].depth, 0);
        assert_eq!(funcs["inner"].calls["t2"].depth, 1);
        assert_eq!(funcs["outer"].calls["t1"].returned.as_ref().unwrap().value, ":done");
        assert_eq!(map["app.core"].total_n_calls, 2);
    }

    #[test]
    fn test_mismatched_return_is_dropped() {
        let log = "\
TRACE t1: (ns.a/f)
TRACE t9: => 1
";
        let map = parse_trace_log(log).unwrap();
        let call = &map["ns.a"].functions["f"].calls["t1"];
        assert!(call.returned.is_none());
    }

    #[test]
    fn test_return_with_empty_stack_is_ignored() {
        let log = "\
TRACE t0: => 7
TRACE t1: (ns.a/f)
";
        let map = parse_trace_log(log).unwrap();
        assert_eq!(map["ns.a"].functions["f"].n_calls, 1);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let log = "\
garbage without grammar
TRACE t1: no call token here
TRACE t1: (ns.a/f)
";
        let map = parse_trace_log(log).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map["ns.a"].total_n_calls, 1);
    }

    #[test]
    fn test_no_call_lines_is_empty_input() {
        assert!(matches!(
            parse_trace_log("nothing\n=> 1\n"),
            Err(ParseError::EmptyInput)
        ));
        assert!(matches!(parse_trace_log(""), Err(ParseError::EmptyInput)));
    }

    #[test]
    fn test_call_counts_sum_over_functions() {
        let log = "\
TRACE a: (ns.x/f)
TRACE a: => 1
TRACE b: (ns.x/f)
TRACE b: => 2
TRACE c: (ns.x/g)
TRACE c: => 3
";
        let map = parse_trace_log(log).unwrap();
        let ns = &map["ns.x"];
        assert_eq!(ns.functions["f"].n_calls, 2);
        assert_eq!(ns.functions["g"].n_calls, 1);
        assert_eq!(ns.total_n_calls, 3);
    }
}
