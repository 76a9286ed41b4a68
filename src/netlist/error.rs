use std::fmt::Display;

use thiserror::Error;

use super::SignalId;

/// The result of a netlist operation.
pub type Result<T> = std::result::Result<T, NetlistError>;

/// Error returned when a netlist operation failed.
///
/// The `Display` output of the first three variants is the exact diagnostic
/// line reported to the user.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetlistError {
    /// The line matches none of the gate shapes.
    #[error("Error in line {line}: {text}")]
    MalformedLine { line: usize, text: String },

    /// The signal is already driven by the gate of an earlier line.
    #[error("Error in line {line}: signal {signal} is assigned to multiple outputs.")]
    DuplicateOutput { line: usize, signal: SignalId },

    /// The declared gates depend on each other in a loop.
    /// Carries one of the signals on the loop.
    #[error("Error: sequential logic analysis has not yet been implemented.")]
    CombinationalCycle(SignalId),

    /// Every malformed line and duplicate output found while reading the netlist.
    #[error("{0}")]
    Rejected(Diagnostics),

    /// There are too many primary inputs to index every row of the truth table.
    #[error("{0} primary inputs is too many to enumerate")]
    TooManyInputs(usize),

    /// The signal is not part of the netlist.
    #[error("signal {0} does not exist")]
    UnknownSignal(SignalId),

    /// Reading the netlist failed.
    #[error("io error: {0}")]
    IoError(String),

    /// The netlist has reached an invalid state. This should never happen.
    #[error("the netlist has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),
}

impl From<std::io::Error> for NetlistError {
    fn from(value: std::io::Error) -> Self {
        NetlistError::IoError(value.to_string())
    }
}

impl NetlistError {
    /// Returns the 1-based line number the error points at, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            NetlistError::MalformedLine { line, .. } | NetlistError::DuplicateOutput { line, .. } => {
                Some(*line)
            }
            _ => None,
        }
    }
}

/// Line-level errors accumulated while reading a netlist, in line order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<NetlistError>);

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics(Vec::new())
    }

    pub fn push(&mut self, error: NetlistError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NetlistError> {
        self.0.iter()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a NetlistError;
    type IntoIter = std::slice::Iter<'a, NetlistError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
