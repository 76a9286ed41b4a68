//! Truth table enumeration.
//!
//! A netlist with `k` primary inputs has `2^k` rows. Row `r` assigns bit `j` of `r`
//! to the `j`-th primary input by descending id (the largest id is the least
//! significant bit). Each row is rendered as one `'0'`/`'1'` character per
//! signal, by ascending id, inputs and gates together.
//!
//! ```rust
//! use combtab::{parse_netlist, table::TruthTable};
//! let netlist = parse_netlist("NOT 2 1").unwrap();
//! let table = TruthTable::new(&netlist).unwrap();
//! let mut out = Vec::new();
//! table.write_to(&mut out).unwrap();
//! assert_eq!(String::from_utf8(out).unwrap(), "01\n10\n");
//! ```

use std::io::Write;

use rayon::prelude::*;
use tracing::debug;

use crate::{Netlist, NetlistError, Result, eval::SignalValues};

/// Default number of rows evaluated together by [`TruthTable::write_parallel`].
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// The truth table of a netlist. Rows are computed on demand.
#[derive(Debug, Clone, Copy)]
pub struct TruthTable<'a> {
    netlist: &'a Netlist,
    row_count: usize,
}

impl<'a> TruthTable<'a> {
    /// Fails with [`NetlistError::TooManyInputs`] if `2^k` does not fit in a `usize`.
    pub fn new(netlist: &'a Netlist) -> Result<Self> {
        let k = netlist.input_count();
        if k >= usize::BITS as usize {
            return Err(NetlistError::TooManyInputs(k));
        }
        let row_count = 1usize << k;
        debug!("truth table: {} inputs, {} rows", k, row_count);
        Ok(TruthTable { netlist, row_count })
    }

    /// `2^k` for `k` primary inputs, so a netlist without inputs still has one row.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Width of a rendered row: one character per signal.
    pub fn row_width(&self) -> usize {
        self.netlist.signal_count()
    }

    /// The value of every signal for row `r`.
    pub fn row(&self, r: usize) -> Result<SignalValues<'a>> {
        if r >= self.row_count {
            return Err(NetlistError::InvalidState(format!(
                "row {} out of a {} rows table",
                r, self.row_count
            )));
        }
        Ok(self.netlist.simulate(r))
    }

    /// Appends the rendering of `values` to `buf`, without newline.
    pub fn render_into(values: &SignalValues, buf: &mut String) {
        buf.extend(
            values
                .as_slice()
                .iter()
                .map(|&value| if value { '1' } else { '0' }),
        );
    }

    /// Renders row `r`, without newline.
    pub fn render_row(&self, r: usize) -> Result<String> {
        let values = self.row(r)?;
        let mut buf = String::with_capacity(self.row_width());
        TruthTable::render_into(&values, &mut buf);
        Ok(buf)
    }

    /// Rendered rows, in order.
    pub fn rows(&self) -> impl Iterator<Item = String> + '_ {
        (0..self.row_count).map(|r| {
            let mut buf = String::with_capacity(self.row_width());
            TruthTable::render_into(&self.netlist.simulate(r), &mut buf);
            buf
        })
    }

    /// Writes every row, newline terminated, evaluating one row at a time.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buf = String::with_capacity(self.row_width() + 1);
        for r in 0..self.row_count {
            buf.clear();
            TruthTable::render_into(&self.netlist.simulate(r), &mut buf);
            buf.push('\n');
            writer.write_all(buf.as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Same output as [`TruthTable::write_to`], rows being evaluated in parallel
    /// `chunk_size` at a time. Chunks are written in order.
    pub fn write_parallel<W: Write>(&self, writer: &mut W, chunk_size: usize) -> Result<()> {
        let chunk_size = chunk_size.max(1);
        let mut start = 0;
        while start < self.row_count {
            let end = self.row_count.min(start.saturating_add(chunk_size));
            let chunk = (start..end)
                .into_par_iter()
                .map(|r| {
                    let mut buf = String::with_capacity(self.row_width() + 1);
                    TruthTable::render_into(&self.netlist.simulate(r), &mut buf);
                    buf.push('\n');
                    buf
                })
                .collect::<Vec<String>>();
            for row in &chunk {
                writer.write_all(row.as_bytes())?;
            }
            start = end;
        }
        writer.flush()?;
        Ok(())
    }
}
