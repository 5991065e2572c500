use std::io::{self, Write};

use crate::sweep::MeasurementResult;

pub const HEADER: &str = "src,dst,lines,median_ns,p90_ns,p95_ns";

/// CSV table writer, flushed after every line so rows appear as they finish.
pub struct CsvReport<W: Write> {
    out: W,
}

impl<W: Write> CsvReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn header(&mut self) -> io::Result<()> {
        writeln!(self.out, "{HEADER}")?;
        self.out.flush()
    }

    pub fn row(&mut self, r: &MeasurementResult) -> io::Result<()> {
        writeln!(
            self.out,
            "{},{},{},{:.1},{:.1},{:.1}",
            r.src, r.dst, r.width, r.median_ns, r.p90_ns, r.p95_ns
        )?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
