use std::fmt::Display;

/// A signal id.
///
/// Signals are written as 1 to 9 decimal digits without a leading zero, so any
/// valid id fits in a `u32`. The id 0 is never produced by the parser.
pub type SignalId = u32;

/// The logic function computed by a gate.
///
/// [`GateKind::In`] is never parsed: it is synthesized for every signal that is
/// consumed by some gate but driven by none (a primary input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// A primary input, its value is supplied externally.
    In,
    Not,
    And,
    Or,
    Nand,
    Nor,
    Xor,
}

impl GateKind {
    /// Keyword used in netlist files, `IN` for synthesized inputs.
    pub fn keyword(&self) -> &'static str {
        match self {
            GateKind::In => "IN",
            GateKind::Not => "NOT",
            GateKind::And => "AND",
            GateKind::Or => "OR",
            GateKind::Nand => "NAND",
            GateKind::Nor => "NOR",
            GateKind::Xor => "XOR",
        }
    }

    /// Returns true if `n` inputs is a legal fanin count for this kind.
    pub fn accepts_arity(&self, n: usize) -> bool {
        match self {
            GateKind::In => n == 0,
            GateKind::Not => n == 1,
            GateKind::Xor => n == 2,
            GateKind::And | GateKind::Or | GateKind::Nand | GateKind::Nor => n >= 2,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, GateKind::In)
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A single-output gate.
///
/// Inputs are kept in declared order, duplicates included (`AND 3 1 1` is legal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    output: SignalId,
    kind: GateKind,
    inputs: Vec<SignalId>,
}

impl Gate {
    /// Returns a new gate.
    ///
    /// Panics if the number of inputs does not match the kind, or if an id is 0.
    /// The parser only ever builds well-formed gates, so this is a programming error.
    pub fn new(output: SignalId, kind: GateKind, inputs: Vec<SignalId>) -> Self {
        if !kind.accepts_arity(inputs.len()) {
            panic!(
                "Hey, you are trying to create a {} gate driving signal {} with {} inputs.",
                kind,
                output,
                inputs.len()
            )
        }
        if output == 0 || inputs.contains(&0) {
            panic!("Signal id 0 is not a valid signal, gate driving {}.", output)
        }
        Gate {
            output,
            kind,
            inputs,
        }
    }

    /// Returns a synthesized primary input.
    pub fn input(output: SignalId) -> Self {
        Gate::new(output, GateKind::In, Vec::new())
    }

    pub fn get_output(&self) -> SignalId {
        self.output
    }

    pub fn get_kind(&self) -> GateKind {
        self.kind
    }

    pub fn get_inputs(&self) -> &[SignalId] {
        &self.inputs
    }

    pub fn is_input(&self) -> bool {
        self.kind.is_input()
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.kind, self.output)?;
        for input in &self.inputs {
            write!(f, " {}", input)?;
        }
        Ok(())
    }
}
