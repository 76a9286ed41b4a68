//! Module defining the [`Netlist`] struct, as well as [`Gate`], [`GateKind`] and the builder used to read it.
//!
//! To get the truth table of a netlist, check [`crate::table::TruthTable`].

pub mod dfs;
pub mod dot;
pub mod error;
pub mod gate;
mod integrity;
mod parser;

use std::collections::HashMap;

use tracing::debug;

use dfs::{BackEdge, PostOrder};
pub use error::{Diagnostics, NetlistError, Result};
pub use gate::{Gate, GateKind, SignalId};
pub use parser::{parse_line, parse_netlist};

/// Accumulates gate lines until the whole netlist has been read.
///
/// Malformed lines and signals driven twice do not stop the reading: they are
/// collected, and [`.build()`] reports all of them at once.
///
/// [`.build()`]: NetlistBuilder::build
///
/// ```rust
/// use combtab::{NetlistBuilder, NetlistError};
/// let mut builder = NetlistBuilder::new();
/// builder.push_line("NOT 5 1");
/// builder.push_line("NOT 5 2");
/// match builder.build() {
///     Err(NetlistError::Rejected(diagnostics)) => assert_eq!(diagnostics.len(), 1),
///     _ => panic!("signal 5 is driven twice"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct NetlistBuilder {
    /// Declared gates, keyed by the signal they drive.
    /// Its keys are the set of outputs seen so far.
    gates: HashMap<SignalId, Gate>,
    /// Reverse index: signal -> gates consuming it.
    consumers: HashMap<SignalId, Vec<SignalId>>,
    diagnostics: Diagnostics,
    lines_read: usize,
}

impl NetlistBuilder {
    pub fn new() -> Self {
        NetlistBuilder::default()
    }

    /// Number of lines pushed so far, blank lines included.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }

    pub fn get_diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Parses the next line of the netlist and records its gate.
    pub fn push_line(&mut self, text: &str) {
        self.lines_read += 1;
        let line = self.lines_read;
        match parse_line(line, text) {
            Ok(Some(gate)) => self.add_gate(line, gate),
            Ok(None) => (),
            Err(e) => self.diagnostics.push(e),
        }
    }

    /// Same as [`.push_line()`], for a line read as raw bytes.
    /// Bytes which are not UTF-8 make the line malformed.
    ///
    /// [`.push_line()`]: NetlistBuilder::push_line
    pub fn push_raw_line(&mut self, raw: &[u8]) {
        match std::str::from_utf8(raw) {
            Ok(text) => self.push_line(text),
            Err(_) => {
                self.lines_read += 1;
                self.diagnostics.push(NetlistError::MalformedLine {
                    line: self.lines_read,
                    text: String::from_utf8_lossy(raw).into_owned(),
                });
            }
        }
    }

    /// Records a gate declared at the given line.
    ///
    /// Consumer edges are always recorded. If the output is already driven, the
    /// first gate is kept and a [`NetlistError::DuplicateOutput`] is collected.
    pub fn add_gate(&mut self, line: usize, gate: Gate) {
        let output = gate.get_output();
        for &input in gate.get_inputs() {
            self.consumers.entry(input).or_default().push(output);
        }

        if self.gates.contains_key(&output) {
            self.diagnostics
                .push(NetlistError::DuplicateOutput { line, signal: output });
        } else {
            self.gates.insert(output, gate);
        }
    }

    /// Validates the gates read so far and freezes them into a [`Netlist`].
    ///
    /// Fails with:
    /// - [`NetlistError::Rejected`] if any line was malformed or drove a signal twice,
    /// - [`NetlistError::CombinationalCycle`] otherwise, if gates depend on each other in a loop.
    pub fn build(self) -> Result<Netlist> {
        if !self.diagnostics.is_empty() {
            debug!("rejecting netlist: {} diagnostics", self.diagnostics.len());
            return Err(NetlistError::Rejected(self.diagnostics));
        }

        self.check_acyclic()?;
        let gates = self.infer_inputs();
        Netlist::from_gates(gates)
    }
}

/// A validated, acyclic combinational netlist.
///
/// Every signal has exactly one gate: primary inputs carry a [`GateKind::In`] gate.
/// Internally, signals are numbered densely by ascending id, which is also the
/// order they are rendered in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Netlist {
    /// All signal ids, ascending. A signal's position is its dense index.
    signals: Vec<SignalId>,
    /// `gates[i]` drives `signals[i]`.
    gates: Vec<Gate>,
    /// Dense indices of the inputs of `gates[i]`, in declared order.
    fanins: Vec<Vec<usize>>,
    /// Evaluation order, inputs before outputs.
    order: Vec<usize>,
    /// Dense indices of the primary inputs, by descending id.
    inputs: Vec<usize>,
}

impl Netlist {
    /// Freezes a total signal -> gate map. The map must be acyclic.
    fn from_gates(gates: HashMap<SignalId, Gate>) -> Result<Self> {
        let mut signals = gates.keys().copied().collect::<Vec<SignalId>>();
        signals.sort_unstable();

        let mut by_id = gates;
        let mut ordered = Vec::with_capacity(signals.len());
        for id in &signals {
            let gate = by_id.remove(id).ok_or(NetlistError::InvalidState(format!(
                "signal {} lost its gate",
                id
            )))?;
            ordered.push(gate);
        }

        let fanins = ordered
            .iter()
            .map(|gate| {
                gate.get_inputs()
                    .iter()
                    .map(|&input| {
                        signals.binary_search(&input).map_err(|_| {
                            NetlistError::InvalidState(format!(
                                "input {} of signal {} has no gate",
                                input,
                                gate.get_output()
                            ))
                        })
                    })
                    .collect::<Result<Vec<usize>>>()
            })
            .collect::<Result<Vec<Vec<usize>>>>()?;

        let order = PostOrder::new(&fanins)
            .into_order()
            .map_err(|BackEdge(i)| NetlistError::CombinationalCycle(signals[i]))?;

        let inputs = (0..signals.len())
            .rev()
            .filter(|&i| ordered[i].is_input())
            .collect::<Vec<usize>>();

        debug!(
            "netlist frozen: {} signals, {} primary inputs",
            signals.len(),
            inputs.len()
        );

        Ok(Netlist {
            signals,
            gates: ordered,
            fanins,
            order,
            inputs,
        })
    }

    /// Number of signals, primary inputs included.
    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    /// Number of primary inputs.
    pub fn input_count(&self) -> usize {
        self.inputs.len()
    }

    /// All signal ids, ascending.
    pub fn get_signals(&self) -> &[SignalId] {
        &self.signals
    }

    /// Dense index of a signal.
    pub fn index_of(&self, id: SignalId) -> Option<usize> {
        self.signals.binary_search(&id).ok()
    }

    /// Retrieves the gate driving a signal.
    pub fn get_gate(&self, id: SignalId) -> Option<&Gate> {
        Some(&self.gates[self.index_of(id)?])
    }

    /// All gates, by ascending output id.
    pub fn get_gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Primary input ids, by descending id.
    ///
    /// This is also their bit significance in the truth table: the first one is
    /// the least significant bit of the row index.
    pub fn get_inputs_id(&self) -> Vec<SignalId> {
        self.inputs.iter().map(|&i| self.signals[i]).collect()
    }

    /// Evaluation order as signal ids: every gate comes after all of its inputs.
    pub fn get_evaluation_order(&self) -> Vec<SignalId> {
        self.order.iter().map(|&i| self.signals[i]).collect()
    }

    pub(crate) fn dense_order(&self) -> &[usize] {
        &self.order
    }

    pub(crate) fn dense_inputs(&self) -> &[usize] {
        &self.inputs
    }

    pub(crate) fn dense_fanins(&self, index: usize) -> &[usize] {
        &self.fanins[index]
    }

    pub(crate) fn dense_kind(&self, index: usize) -> GateKind {
        self.gates[index].get_kind()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn build(lines: &[&str]) -> Result<Netlist> {
        let mut builder = NetlistBuilder::new();
        for line in lines {
            builder.push_line(line);
        }
        builder.build()
    }

    #[test]
    fn build_not_test() {
        let netlist = build(&["NOT 2 1"]).unwrap();
        assert_eq!(netlist.get_signals(), &[1, 2]);
        assert_eq!(netlist.get_inputs_id(), vec![1]);
        assert_eq!(netlist.get_evaluation_order(), vec![1, 2]);
        assert_eq!(netlist.get_gate(1), Some(&Gate::input(1)));
        assert_eq!(
            netlist.get_gate(2),
            Some(&Gate::new(2, GateKind::Not, vec![1]))
        );
        assert_eq!(netlist.get_gate(3), None);
    }

    #[test]
    fn inputs_are_descending() {
        let netlist = build(&["AND 10 3 7 1", "OR 11 10 5"]).unwrap();
        assert_eq!(netlist.get_inputs_id(), vec![7, 5, 3, 1]);
        assert_eq!(netlist.signal_count(), 6);
        assert_eq!(netlist.input_count(), 4);
    }

    #[test]
    fn order_respects_dependencies() {
        let netlist = build(&["XOR 4 3 2", "NOT 3 1", "AND 2 1 5", "NOR 6 4 2 1"]).unwrap();
        let order = netlist.get_evaluation_order();
        assert_eq!(order.len(), netlist.signal_count());
        let pos = |id| order.iter().position(|&s| s == id).unwrap();
        for gate in netlist.get_gates() {
            for &input in gate.get_inputs() {
                assert!(pos(input) < pos(gate.get_output()));
            }
        }
    }

    #[test]
    fn malformed_lines_are_all_reported() {
        match build(&["NOT 2 1", "XOR 3 1", "", "FOO", "AND 4 2 3"]) {
            Err(NetlistError::Rejected(d)) => {
                let lines = d.iter().map(|e| e.line()).collect::<Vec<_>>();
                assert_eq!(lines, vec![Some(2), Some(4)]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_output_test() {
        match build(&["NOT 5 1", "NOT 5 2"]) {
            Err(NetlistError::Rejected(d)) => {
                assert_eq!(
                    d.iter().collect::<Vec<_>>(),
                    vec![&NetlistError::DuplicateOutput { line: 2, signal: 5 }]
                );
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn duplicate_output_hides_cycle() {
        // The cycle check is not even attempted.
        match build(&["AND 1 2 3", "AND 2 1 4", "NOT 2 7"]) {
            Err(NetlistError::Rejected(d)) => assert_eq!(d.len(), 1),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn cycle_test() {
        assert!(matches!(
            build(&["AND 1 2 3", "AND 2 1 4"]),
            Err(NetlistError::CombinationalCycle(_))
        ));
        assert!(matches!(
            build(&["OR 1 1 2"]),
            Err(NetlistError::CombinationalCycle(1))
        ));
    }

    #[test]
    fn empty_netlist() {
        let netlist = build(&[]).unwrap();
        assert_eq!(netlist.signal_count(), 0);
        assert_eq!(netlist.input_count(), 0);
        let netlist = build(&["", ""]).unwrap();
        assert_eq!(netlist.signal_count(), 0);
    }

    #[test]
    fn whitespace_only_line_is_malformed() {
        match build(&["NOT 2 1", "   "]) {
            Err(NetlistError::Rejected(d)) => assert_eq!(
                d.iter().collect::<Vec<_>>(),
                vec![&NetlistError::MalformedLine {
                    line: 2,
                    text: "   ".to_string()
                }]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn raw_lines_keep_numbering() {
        let mut builder = NetlistBuilder::new();
        builder.push_raw_line(b"NOT 2 1");
        builder.push_raw_line(b"\xfe\xff");
        builder.push_raw_line(b"");
        builder.push_raw_line(b"AND 4 2 3");
        assert_eq!(builder.lines_read(), 4);
        let lines = builder
            .get_diagnostics()
            .iter()
            .map(|e| e.line())
            .collect::<Vec<_>>();
        assert_eq!(lines, vec![Some(2)]);
    }
}
