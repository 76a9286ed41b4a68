pub mod eval;
pub mod netlist;
pub mod table;

// Re-exporting symbols and modules.
pub use netlist::dfs;
pub use netlist::dot;
pub use netlist::{
    Diagnostics, Gate, GateKind, Netlist, NetlistBuilder, NetlistError, Result, SignalId,
    parse_line, parse_netlist,
};
