//! You can export netlists to the Graphviz dot format using [`Netlist::to_dot`].
//!
//! ```rust
//! use combtab::parse_netlist;
//! use combtab::dot::GraphvizStyle;
//!
//! let netlist = parse_netlist("XOR 3 1 2\nAND 4 1 2").unwrap();
//! let dot = netlist.to_dot(&GraphvizStyle::default());
//! assert!(dot.contains("1 -> 3"));
//! ```
//!
//! You can then render the graphs using the DOT engine.

use std::fmt::Display;

use crate::{Gate, GateKind, Netlist};

// Definining default global style.
const DEFAULT_RANKDIR: &str = "BT";

// Defining default style for nodes.
const DEFAULT_INPUT_NODE_FORMAT: &str = "[shape=box]";
const DEFAULT_GATE_NODE_FORMAT: &str = "[shape=circle]";
const DEFAULT_NOT_NODE_FORMAT: &str = "[shape=invtriangle]";

// Defining default style for edges.
const DEFAULT_EDGE_FORMAT: &str = "[arrowsize=0.3]";

/// String containing the graphviz node style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of nodes can be described.
#[derive(Debug, Clone)]
pub struct GraphvizNodeStyle(String);

impl GraphvizNodeStyle {
    pub fn new(style: impl Into<String>) -> Self {
        GraphvizNodeStyle(style.into())
    }
}

impl Display for GraphvizNodeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for Graphviz rendering.
///
/// ### Global parameters
/// - `rankdir`
/// - `edge`, the style shared by all edges.
///
/// ### Nodes
/// - primary inputs
/// - `NOT` gates
/// - every other gate, labelled with its keyword.
#[derive(Debug, Clone)]
pub struct GraphvizStyle {
    pub rankdir: String,
    pub edge: String,
    pub input: GraphvizNodeStyle,
    pub not: GraphvizNodeStyle,
    pub gate: GraphvizNodeStyle,
}

impl Default for GraphvizStyle {
    fn default() -> Self {
        GraphvizStyle {
            rankdir: DEFAULT_RANKDIR.to_string(),
            edge: DEFAULT_EDGE_FORMAT.to_string(),
            input: GraphvizNodeStyle(DEFAULT_INPUT_NODE_FORMAT.to_string()),
            not: GraphvizNodeStyle(DEFAULT_NOT_NODE_FORMAT.to_string()),
            gate: GraphvizNodeStyle(DEFAULT_GATE_NODE_FORMAT.to_string()),
        }
    }
}

impl Gate {
    fn graphviz_decl(&self) -> String {
        let label = match self.get_kind() {
            GateKind::In => format!("i{}", self.get_output()),
            GateKind::Not => "".to_string(),
            kind => format!("{}\\n{}", kind, self.get_output()),
        };
        format!("{} [label=\"{}\"]\n", self.get_output(), label)
    }
}

impl Netlist {
    /// Returns a DOT representation of the netlist, edges going from inputs to gates.
    pub fn to_dot(&self, graphviz_style: &GraphvizStyle) -> String {
        let mut decl_inputs = format!("subgraph inputs {{\n rank=same\n node {}\n", graphviz_style.input);
        let mut decl_nots = format!("subgraph nots {{\n node {}\n", graphviz_style.not);
        let mut decl_gates = format!("subgraph gates {{\n node {}\n", graphviz_style.gate);
        let mut decl_edges = String::new();

        for gate in self.get_gates() {
            match gate.get_kind() {
                GateKind::In => decl_inputs.push_str(&gate.graphviz_decl()),
                GateKind::Not => decl_nots.push_str(&gate.graphviz_decl()),
                _ => decl_gates.push_str(&gate.graphviz_decl()),
            }
            for input in gate.get_inputs() {
                decl_edges.push_str(&format!("{} -> {}\n", input, gate.get_output()));
            }
        }

        format!(
            "digraph {{
    rankdir=\"{}\"
    edge {}
    {}
    }}
    {}
    }}
    {}
    }}
    {}
}}
",
            graphviz_style.rankdir,
            graphviz_style.edge,
            decl_inputs,
            decl_nots,
            decl_gates,
            decl_edges
        )
    }
}
