use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::dfs::{BackEdge, PostOrder};
use crate::{Gate, Netlist, NetlistBuilder, NetlistError, Result, SignalId};

impl NetlistBuilder {
    /// Checks that the declared gates do not depend on each other in a loop.
    ///
    /// Only the reverse index is walked (signal -> consumers), so synthesized inputs,
    /// which cannot be part of a loop, are not needed yet.
    pub(super) fn check_acyclic(&self) -> Result<()> {
        let mut ids = self
            .consumers
            .iter()
            .flat_map(|(&input, outputs)| std::iter::once(input).chain(outputs.iter().copied()))
            .chain(self.gates.keys().copied())
            .collect::<Vec<SignalId>>();
        ids.sort_unstable();
        ids.dedup();

        let dense = |id: SignalId| {
            ids.binary_search(&id).map_err(|_| {
                NetlistError::InvalidState(format!("signal {} missing from the index", id))
            })
        };

        let mut adjacency = vec![Vec::new(); ids.len()];
        for (&input, outputs) in &self.consumers {
            adjacency[dense(input)?] = outputs
                .iter()
                .map(|&output| dense(output))
                .collect::<Result<Vec<usize>>>()?;
        }

        match PostOrder::new(&adjacency).into_order() {
            Ok(_) => Ok(()),
            Err(BackEdge(i)) => {
                debug!("combinational cycle through signal {}", ids[i]);
                Err(NetlistError::CombinationalCycle(ids[i]))
            }
        }
    }

    /// Adds an [`GateKind::In`] gate for every signal consumed but never driven.
    ///
    /// [`GateKind::In`]: crate::GateKind::In
    pub(super) fn infer_inputs(self) -> HashMap<SignalId, Gate> {
        let mut gates = self.gates;
        let undriven = self
            .consumers
            .keys()
            .filter(|&id| !gates.contains_key(id))
            .copied()
            .collect::<Vec<SignalId>>();

        debug!("inferred {} primary inputs", undriven.len());
        for id in undriven {
            gates.insert(id, Gate::input(id));
        }
        gates
    }
}

impl Netlist {
    /// Checking if the netlist structure is correct:
    /// - signals are sorted and unique, each with a gate driving it
    /// - gate fanins match the gate inputs and kinds
    /// - the evaluation order is a permutation putting inputs before outputs
    /// - primary inputs are exactly the `IN` gates, by descending id.
    ///
    /// This function was written for debug purposes, as the netlist is valid by construction.
    pub fn check_integrity(&self) -> Result<()> {
        let n = self.signals.len();
        if self.gates.len() != n || self.fanins.len() != n {
            return Err(NetlistError::InvalidState(format!(
                "{} signals but {} gates and {} fanin lists",
                n,
                self.gates.len(),
                self.fanins.len()
            )));
        }
        if self.signals.windows(2).any(|w| w[0] >= w[1]) {
            return Err(NetlistError::InvalidState(
                "signals are not strictly ascending".to_string(),
            ));
        }

        for (i, gate) in self.gates.iter().enumerate() {
            if gate.get_output() != self.signals[i] {
                return Err(NetlistError::InvalidState(format!(
                    "gate driving {} stored for signal {}",
                    gate.get_output(),
                    self.signals[i]
                )));
            }
            if !gate.get_kind().accepts_arity(gate.get_inputs().len()) {
                return Err(NetlistError::InvalidState(format!(
                    "{} gate driving {} has {} inputs",
                    gate.get_kind(),
                    gate.get_output(),
                    gate.get_inputs().len()
                )));
            }
            let fanin_ids = self.fanins[i]
                .iter()
                .map(|&j| self.signals.get(j).copied())
                .collect::<Option<Vec<SignalId>>>();
            if fanin_ids.as_deref() != Some(gate.get_inputs()) {
                return Err(NetlistError::InvalidState(format!(
                    "fanins of signal {} do not match its gate",
                    self.signals[i]
                )));
            }
        }

        let mut position = vec![usize::MAX; n];
        for (pos, &i) in self.order.iter().enumerate() {
            if i >= n || position[i] != usize::MAX {
                return Err(NetlistError::InvalidState(
                    "evaluation order is not a permutation".to_string(),
                ));
            }
            position[i] = pos;
        }
        if self.order.len() != n {
            return Err(NetlistError::InvalidState(
                "evaluation order is not a permutation".to_string(),
            ));
        }
        for (i, fanins) in self.fanins.iter().enumerate() {
            if let Some(&j) = fanins.iter().find(|&&j| position[j] >= position[i]) {
                return Err(NetlistError::InvalidState(format!(
                    "signal {} evaluated before its input {}",
                    self.signals[i], self.signals[j]
                )));
            }
        }

        let expected_inputs = (0..n)
            .rev()
            .filter(|&i| self.gates[i].is_input())
            .collect::<HashSet<usize>>();
        let inputs = self.inputs.iter().copied().collect::<HashSet<usize>>();
        if inputs != expected_inputs
            || inputs.len() != self.inputs.len()
            || self.inputs.windows(2).any(|w| w[0] <= w[1])
        {
            return Err(NetlistError::InvalidState(
                "primary inputs do not match the IN gates".to_string(),
            ));
        }

        Ok(())
    }
}
