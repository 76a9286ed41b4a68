//! Gate evaluation over a netlist.
//!
//! Values live in a [`SignalValues`], one per input assignment. Evaluating the
//! signals in [`Netlist::get_evaluation_order`] guarantees that every gate finds
//! its inputs already computed.

use crate::{GateKind, Netlist, NetlistError, Result, SignalId};

impl GateKind {
    /// Applies the gate function to its input values, in declared order.
    ///
    /// Returns [`None`] for [`GateKind::In`], whose value is supplied externally,
    /// and for a `NOT` or `XOR` missing some of its inputs.
    ///
    /// ```rust
    /// use combtab::GateKind;
    /// assert_eq!(GateKind::Nand.apply([true, true, false]), Some(true));
    /// assert_eq!(GateKind::Xor.apply([true, true]), Some(false));
    /// assert_eq!(GateKind::In.apply([]), None);
    /// ```
    pub fn apply<I: IntoIterator<Item = bool>>(&self, inputs: I) -> Option<bool> {
        let mut inputs = inputs.into_iter();
        match self {
            GateKind::In => None,
            GateKind::Not => inputs.next().map(|a| !a),
            GateKind::And => Some(inputs.all(|a| a)),
            GateKind::Nand => Some(!inputs.all(|a| a)),
            GateKind::Or => Some(inputs.any(|a| a)),
            GateKind::Nor => Some(!inputs.any(|a| a)),
            GateKind::Xor => {
                let a = inputs.next()?;
                let b = inputs.next()?;
                Some(a ^ b)
            }
        }
    }
}

/// The value of every signal of a netlist, for one input assignment.
///
/// Values are stored densely, by ascending signal id. Everything starts at `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignalValues<'a> {
    signals: &'a [SignalId],
    values: Vec<bool>,
}

impl<'a> SignalValues<'a> {
    /// Fresh values for the signals of `netlist`, all `false`.
    pub fn new(netlist: &'a Netlist) -> Self {
        SignalValues {
            signals: netlist.get_signals(),
            values: vec![false; netlist.signal_count()],
        }
    }

    pub fn get(&self, id: SignalId) -> Option<bool> {
        let i = self.signals.binary_search(&id).ok()?;
        Some(self.values[i])
    }

    pub fn set(&mut self, id: SignalId, value: bool) -> Result<()> {
        let i = self
            .signals
            .binary_search(&id)
            .map_err(|_| NetlistError::UnknownSignal(id))?;
        self.values[i] = value;
        Ok(())
    }

    /// Values by ascending signal id.
    pub fn as_slice(&self) -> &[bool] {
        &self.values
    }

    /// `(signal, value)` pairs by ascending signal id.
    pub fn iter(&self) -> impl Iterator<Item = (SignalId, bool)> + '_ {
        self.signals.iter().copied().zip(self.values.iter().copied())
    }

    pub(crate) fn set_dense(&mut self, index: usize, value: bool) {
        self.values[index] = value;
    }
}

impl Netlist {
    /// Computes the value of a signal from the values of its inputs.
    ///
    /// Primary inputs are left untouched: their value must have been seeded with
    /// [`SignalValues::set`]. The inputs of the gate must already be evaluated.
    pub fn evaluate(&self, values: &mut SignalValues, id: SignalId) -> Result<()> {
        let index = self.index_of(id).ok_or(NetlistError::UnknownSignal(id))?;
        self.evaluate_dense(values, index);
        Ok(())
    }

    pub(crate) fn evaluate_dense(&self, values: &mut SignalValues, index: usize) {
        let kind = self.dense_kind(index);
        let inputs = self
            .dense_fanins(index)
            .iter()
            .map(|&input| values.values[input]);
        if let Some(value) = kind.apply(inputs) {
            values.values[index] = value;
        }
    }

    /// Seeds the primary inputs from the bits of `assignment` and evaluates every signal.
    ///
    /// Bit 0 of `assignment` goes to the primary input with the largest id, bit 1 to
    /// the next largest, and so on (see [`Netlist::get_inputs_id`]).
    ///
    /// ```rust
    /// let netlist = combtab::parse_netlist("AND 3 1 2").unwrap();
    /// // Bit 0 is signal 2, bit 1 is signal 1.
    /// let values = netlist.simulate(0b01);
    /// assert_eq!(values.get(1), Some(false));
    /// assert_eq!(values.get(2), Some(true));
    /// assert_eq!(values.get(3), Some(false));
    /// ```
    pub fn simulate(&self, assignment: usize) -> SignalValues<'_> {
        let mut values = SignalValues::new(self);
        let mut n = assignment;
        for &input in self.dense_inputs() {
            values.set_dense(input, n % 2 == 1);
            n /= 2;
        }
        for &index in self.dense_order() {
            if !self.dense_kind(index).is_input() {
                self.evaluate_dense(&mut values, index);
            }
        }
        values
    }
}
