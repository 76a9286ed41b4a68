use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use tracing::{debug, trace};

use crate::{
    Gate, GateKind, Netlist, NetlistBuilder, NetlistError, Result, SignalId,
};

/// Longest accepted signal token.
const MAX_SIGNAL_DIGITS: usize = 9;

/// How many ids (output included) a gate line must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    fn accepts(&self, n: usize) -> bool {
        match *self {
            Arity::Exactly(k) => n == k,
            Arity::AtLeast(k) => n >= k,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Rule {
    keyword: &'static str,
    kind: GateKind,
    ids: Arity,
}

/// The whole line grammar: one rule per keyword.
static GRAMMAR: [Rule; 6] = [
    Rule {
        keyword: "NOT",
        kind: GateKind::Not,
        ids: Arity::Exactly(2),
    },
    Rule {
        keyword: "XOR",
        kind: GateKind::Xor,
        ids: Arity::Exactly(3),
    },
    Rule {
        keyword: "AND",
        kind: GateKind::And,
        ids: Arity::AtLeast(3),
    },
    Rule {
        keyword: "OR",
        kind: GateKind::Or,
        ids: Arity::AtLeast(3),
    },
    Rule {
        keyword: "NAND",
        kind: GateKind::Nand,
        ids: Arity::AtLeast(3),
    },
    Rule {
        keyword: "NOR",
        kind: GateKind::Nor,
        ids: Arity::AtLeast(3),
    },
];

fn find_rule(keyword: &str) -> Option<&'static Rule> {
    GRAMMAR.iter().find(|rule| rule.keyword == keyword)
}

/// Reads a signal id, which must match `[1-9][0-9]{0,8}`.
fn read_signal(s: &str) -> Option<SignalId> {
    let bytes = s.as_bytes();
    if bytes.is_empty() || bytes.len() > MAX_SIGNAL_DIGITS {
        return None;
    }
    if !matches!(bytes[0], b'1'..=b'9') || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    s.parse::<SignalId>().ok()
}

/// Parses a single netlist line.
///
/// Returns `Ok(None)` for an empty line, the gate it declares otherwise.
/// A line holding only whitespace is not empty, hence malformed.
/// `line` is the 1-based line number, only used for the error.
pub fn parse_line(line: usize, text: &str) -> Result<Option<Gate>> {
    if text.is_empty() {
        return Ok(None);
    }

    let malformed = || NetlistError::MalformedLine {
        line,
        text: text.to_string(),
    };

    let mut tokens = text.split_whitespace();
    let rule = tokens.next().and_then(find_rule).ok_or_else(malformed)?;

    let ids = tokens
        .map(read_signal)
        .collect::<Option<Vec<SignalId>>>()
        .ok_or_else(malformed)?;

    if !rule.ids.accepts(ids.len()) {
        return Err(malformed());
    }

    let (output, inputs) = ids.split_first().ok_or_else(malformed)?;
    Ok(Some(Gate::new(*output, rule.kind, inputs.to_vec())))
}

impl Netlist {
    /// Reads a whole netlist, one gate per line, and validates it.
    ///
    /// Lines end with `\n` or `\r\n`. A line which is not valid UTF-8 cannot match
    /// any gate and is reported as malformed, like any other bad line.
    ///
    /// Every line is read before anything else happens. If some lines are malformed
    /// or drive an already driven signal, all of them are reported at once in
    /// [`NetlistError::Rejected`].
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        let mut reader = BufReader::new(reader);
        let mut builder = NetlistBuilder::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let mut raw = buf.as_slice();
            if let Some(rest) = raw.strip_suffix(b"\n") {
                raw = rest;
            }
            if let Some(rest) = raw.strip_suffix(b"\r") {
                raw = rest;
            }
            trace!(line = builder.lines_read() + 1, "{}", String::from_utf8_lossy(raw));
            builder.push_raw_line(raw);
        }
        debug!("read {} lines", builder.lines_read());
        builder.build()
    }

    /// Creates a netlist from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = File::open(path.as_ref())?;
        Netlist::from_reader(f)
    }
}

/// Parses a netlist held in memory, see [`Netlist::from_reader`].
///
/// ```rust
/// let netlist = combtab::parse_netlist("NOT 2 1\n").unwrap();
/// assert_eq!(netlist.get_inputs_id(), vec![1]);
/// ```
pub fn parse_netlist(text: &str) -> Result<Netlist> {
    Netlist::from_reader(text.as_bytes())
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(text: &str) -> Option<Gate> {
        parse_line(1, text).unwrap()
    }

    #[test]
    fn read_signal_test() {
        assert_eq!(read_signal(""), None);
        assert_eq!(read_signal("0"), None);
        assert_eq!(read_signal("01"), None);
        assert_eq!(read_signal("-5"), None);
        assert_eq!(read_signal("+5"), None);
        assert_eq!(read_signal("4z"), None);
        assert_eq!(read_signal("1234567890"), None);

        assert_eq!(read_signal("1"), Some(1));
        assert_eq!(read_signal("10"), Some(10));
        assert_eq!(read_signal("999999999"), Some(999_999_999));
    }

    #[test]
    fn blank_lines_test() {
        assert_eq!(parse(""), None);
        for text in ["   ", "\t \t", " "] {
            assert_eq!(
                parse_line(2, text),
                Err(NetlistError::MalformedLine {
                    line: 2,
                    text: text.to_string()
                })
            );
        }
    }

    #[test]
    fn from_reader_non_utf8_line() {
        let input: &[u8] = b"FOO\nNOT 2 \xff1\r\nNOT 3 1\n";
        match Netlist::from_reader(input) {
            Err(NetlistError::Rejected(d)) => assert_eq!(
                d.iter().collect::<Vec<_>>(),
                vec![
                    &NetlistError::MalformedLine {
                        line: 1,
                        text: "FOO".to_string()
                    },
                    &NetlistError::MalformedLine {
                        line: 2,
                        text: "NOT 2 \u{fffd}1".to_string()
                    },
                ]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn from_reader_line_endings() {
        let unix = Netlist::from_reader(&b"NOT 2 1\n\nNOT 3 2"[..]).unwrap();
        let dos = Netlist::from_reader(&b"NOT 2 1\r\n\r\nNOT 3 2\r\n"[..]).unwrap();
        assert_eq!(unix, dos);
        assert_eq!(unix.signal_count(), 3);
    }

    #[test]
    fn parse_not_test() {
        assert_eq!(parse("NOT 2 1"), Some(Gate::new(2, GateKind::Not, vec![1])));
        assert_eq!(
            parse("  \tNOT   20   10  "),
            Some(Gate::new(20, GateKind::Not, vec![10]))
        );
        assert!(parse_line(1, "NOT 2").is_err());
        assert!(parse_line(1, "NOT 2 1 3").is_err());
    }

    #[test]
    fn parse_xor_test() {
        assert_eq!(
            parse("XOR 3 1 2"),
            Some(Gate::new(3, GateKind::Xor, vec![1, 2]))
        );
        assert!(parse_line(1, "XOR 3 1").is_err());
        assert!(parse_line(1, "XOR 3 1 2 4").is_err());
    }

    #[test]
    fn parse_multi_input_test() {
        assert_eq!(
            parse("AND 4 1 2 3"),
            Some(Gate::new(4, GateKind::And, vec![1, 2, 3]))
        );
        assert_eq!(
            parse("OR 4 1 1"),
            Some(Gate::new(4, GateKind::Or, vec![1, 1]))
        );
        assert_eq!(
            parse("NAND 9 8 7"),
            Some(Gate::new(9, GateKind::Nand, vec![8, 7]))
        );
        assert_eq!(
            parse("NOR 9 8 7 6 5"),
            Some(Gate::new(9, GateKind::Nor, vec![8, 7, 6, 5]))
        );
        assert!(parse_line(1, "AND 4 1").is_err());
        assert!(parse_line(1, "NOR 4").is_err());
    }

    #[test]
    fn parse_malformed_test() {
        for text in [
            "IN 1",
            "and 3 1 2",
            "NOT2 1",
            "NOT 2 0",
            "NOT 02 1",
            "NOT 2 1x",
            "XNOR 3 1 2",
            "NOT 1234567890 1",
            "1 2 3",
        ] {
            assert_eq!(
                parse_line(7, text),
                Err(NetlistError::MalformedLine {
                    line: 7,
                    text: text.to_string()
                }),
                "line {:?}",
                text
            );
        }
    }
}
