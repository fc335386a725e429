use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use ising_sim::{MacroStepRecord, RunSummary};

use crate::error::{CliError, Result};

pub const SCAN_HEADER: &str =
    "beta,m,abs_m,m2,m4,energy,binder,susceptibility,specific_heat,tau_m2,acceptance";

/// Delimited-text sink for per-sweep magnetizations or scan rows.
pub struct StatsWriter {
    path: Option<PathBuf>,
    out: Box<dyn Write>,
}

impl StatsWriter {
    /// Write to `path` if given, else to stdout.
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let out: Box<dyn Write> = match path {
            Some(p) => Box::new(BufWriter::new(File::create(p).map_err(|source| {
                CliError::Stats {
                    path: p.to_path_buf(),
                    source,
                }
            })?)),
            None => Box::new(BufWriter::new(io::stdout().lock())),
        };
        Ok(Self {
            path: path.map(Path::to_path_buf),
            out,
        })
    }

    /// `sweep,magnetization`, one line per record.
    pub fn record(&mut self, record: &MacroStepRecord) -> Result<()> {
        let line = format_record(record);
        self.write_line(&line)
    }

    pub fn header(&mut self, header: &str) -> Result<()> {
        self.write_line(header)
    }

    pub fn summary_row(&mut self, summary: &RunSummary) -> Result<()> {
        let line = format_summary_row(summary);
        self.write_line(&line)
    }

    pub fn finish(mut self) -> Result<()> {
        let res = self.out.flush();
        self.wrap(res)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        let res = writeln!(self.out, "{line}");
        self.wrap(res)
    }

    fn wrap(&self, res: io::Result<()>) -> Result<()> {
        res.map_err(|source| match &self.path {
            Some(path) => CliError::Stats {
                path: path.clone(),
                source,
            },
            None => CliError::Io(source),
        })
    }
}

pub fn format_record(record: &MacroStepRecord) -> String {
    format!("{},{}", record.sweep(), record.magnetization)
}

pub fn format_summary_row(s: &RunSummary) -> String {
    let tau = s.mag2_tau.map(|t| t.to_string()).unwrap_or_default();
    format!(
        "{},{},{},{},{},{},{},{},{},{},{}",
        s.beta,
        s.mag,
        s.abs_mag,
        s.mag2,
        s.mag4,
        s.energy,
        s.binder(),
        s.susceptibility(),
        s.specific_heat(),
        tau,
        s.acceptance_rate
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_line_uses_sweep_number() {
        let rec = MacroStepRecord {
            step: 32,
            magnetization: -0.25,
            snapshot: vec![1; 16],
        };
        assert_eq!(format_record(&rec), "2,-0.25");
    }

    #[test]
    fn summary_row_has_one_field_per_column() {
        let s = RunSummary {
            beta: 0.5,
            n_spins: 4,
            n_records: 3,
            mag: 1.0,
            abs_mag: 1.0,
            mag2: 1.0,
            mag4: 1.0,
            energy: -2.0,
            energy2: 4.0,
            mag2_tau: None,
            acceptance_rate: 0.0,
        };
        let row = format_summary_row(&s);
        assert_eq!(
            row.split(',').count(),
            SCAN_HEADER.split(',').count()
        );
        assert!(row.starts_with("0.5,1,1,1,1,-2,"));
        assert!(row.ends_with(",,0"));
    }

    #[test]
    fn writes_file() {
        let path = std::env::temp_dir().join(format!("ising-stats-{}.csv", std::process::id()));
        let mut w = StatsWriter::open(Some(&path)).unwrap();
        w.record(&MacroStepRecord {
            step: 4,
            magnetization: 1.0,
            snapshot: vec![1; 4],
        })
        .unwrap();
        w.finish().unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1,1\n");
        std::fs::remove_file(&path).unwrap();
    }
}
