//! Line oriented text protocol spoken with `dreadnaut`.

use std::io::{self, Write};

use plansym_core::{ErrorInfo, SymError};
use plansym_graph::ColoredGraph;

const GROUP_SIZE_MARKER: &str = "grpsize=";

/// Raw automorphism data recovered from the engine output, before it is
/// checked against the graph it describes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Generators in cycle notation, in emission order.
    pub generators: Vec<Vec<Vec<usize>>>,
    /// Group order truncated to an integer.
    pub group_order: u64,
    /// Orbit partition in emission order.
    pub orbits: Vec<Vec<usize>>,
}

/// Writes the commands that make the engine read `graph` with its colour
/// partition, print generators and orbits, and quit.
pub fn write_protocol<W: Write>(graph: &ColoredGraph, out: &mut W) -> io::Result<()> {
    writeln!(out, "n={} g", graph.vertex_count())?;
    for v in 0..graph.vertex_count() {
        let mut line = String::new();
        if let Ok(neighbours) = graph.neighbours(v) {
            for u in neighbours {
                line.push_str(&u.to_string());
                line.push(' ');
            }
        }
        line.push(';');
        writeln!(out, "{line}")?;
    }
    let cells: Vec<String> = graph
        .color_cells()
        .iter()
        .map(|cell| {
            let mut text = String::new();
            for v in cell {
                text.push_str(&v.to_string());
                text.push(' ');
            }
            text
        })
        .collect();
    writeln!(out, "f=[{}]", cells.join("|"))?;
    writeln!(out, "x")?;
    writeln!(out, "o")?;
    writeln!(out, "q")?;
    Ok(())
}

/// Protocol text for `graph`, as written by [`write_protocol`].
pub fn protocol_text(graph: &ColoredGraph) -> String {
    let mut buf = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = write_protocol(graph, &mut buf);
    String::from_utf8_lossy(&buf).into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Generators,
    Orbits,
}

/// Incremental parser fed one output line at a time.
///
/// After the first error further lines are still accepted and ignored so the
/// caller can keep draining the stream; the error surfaces from
/// [`OutputParser::finish`].
#[derive(Debug)]
pub struct OutputParser {
    section: Section,
    pending: Option<String>,
    generators: Vec<Vec<Vec<usize>>>,
    group_order: Option<u64>,
    orbit_text: String,
    lines: usize,
    error: Option<SymError>,
}

impl Default for OutputParser {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputParser {
    /// Creates a parser positioned at the start of the generator section.
    pub fn new() -> Self {
        Self {
            section: Section::Generators,
            pending: None,
            generators: Vec::new(),
            group_order: None,
            orbit_text: String::new(),
            lines: 0,
            error: None,
        }
    }

    /// Consumes one line of engine output (without its terminator).
    pub fn feed(&mut self, line: &str) {
        self.lines += 1;
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.feed_inner(line) {
            self.error = Some(err);
        }
    }

    fn feed_inner(&mut self, line: &str) -> Result<(), SymError> {
        match self.section {
            Section::Generators => {
                if line.contains(GROUP_SIZE_MARKER) {
                    self.close_pending()?;
                    self.group_order = Some(parse_group_order(line)?);
                    self.section = Section::Orbits;
                } else if line.starts_with('(') {
                    self.close_pending()?;
                    self.pending = Some(line.trim().to_string());
                } else if line.starts_with(char::is_whitespace) {
                    if let Some(pending) = self.pending.as_mut() {
                        let rest = line.trim();
                        if !rest.starts_with('(') {
                            pending.push(' ');
                        }
                        pending.push_str(rest);
                    }
                }
            }
            Section::Orbits => {
                if !line.contains("cpu") {
                    self.orbit_text.push_str(line.trim());
                    self.orbit_text.push(' ');
                }
            }
        }
        Ok(())
    }

    fn close_pending(&mut self) -> Result<(), SymError> {
        if let Some(text) = self.pending.take() {
            self.generators.push(parse_cycles(&text)?);
        }
        Ok(())
    }

    /// Number of lines fed so far.
    pub fn lines_seen(&self) -> usize {
        self.lines
    }

    /// Finishes parsing once the stream is exhausted.
    pub fn finish(mut self) -> Result<EngineOutput, SymError> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        let group_order = self.group_order.ok_or_else(|| {
            SymError::ProtocolViolation(
                ErrorInfo::new("missing-grpsize", "engine output has no grpsize= line")
                    .with_context("lines", self.lines.to_string())
                    .with_hint("check that the engine binary is dreadnaut and accepts the x/o commands"),
            )
        })?;
        let orbits = parse_orbits(&self.orbit_text)?;
        Ok(EngineOutput {
            generators: self.generators,
            group_order,
            orbits,
        })
    }
}

/// Parses a complete engine transcript.
pub fn parse_output(text: &str) -> Result<EngineOutput, SymError> {
    let mut parser = OutputParser::new();
    for line in text.lines() {
        parser.feed(line);
    }
    parser.finish()
}

/// Parses cycle notation such as `(1 2)(3 4 5)` into point lists.
pub fn parse_cycles(text: &str) -> Result<Vec<Vec<usize>>, SymError> {
    let mut cycles = Vec::new();
    let mut current: Option<Vec<usize>> = None;
    let mut number: Option<usize> = None;
    for ch in text.chars() {
        if let Some(digit) = ch.to_digit(10) {
            if current.is_none() {
                return Err(cycle_error("stray-point", "point outside of a cycle", text));
            }
            let value = number
                .unwrap_or(0)
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as usize))
                .ok_or_else(|| cycle_error("point-overflow", "point does not fit usize", text))?;
            number = Some(value);
            continue;
        }
        if let (Some(value), Some(cycle)) = (number.take(), current.as_mut()) {
            cycle.push(value);
        }
        match ch {
            '(' => {
                if current.is_some() {
                    return Err(cycle_error("nested-cycle", "cycle opened twice", text));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                Some(cycle) => cycles.push(cycle),
                None => {
                    return Err(cycle_error("unbalanced-cycle", "cycle closed twice", text));
                }
            },
            c if c.is_whitespace() || c == ',' => {}
            _ => {
                return Err(SymError::ProtocolViolation(
                    ErrorInfo::new("unexpected-character", "cannot parse cycle")
                        .with_context("char", ch.to_string())
                        .with_context("text", text),
                ));
            }
        }
    }
    if current.is_some() {
        return Err(cycle_error("unbalanced-cycle", "cycle is never closed", text));
    }
    Ok(cycles)
}

fn cycle_error(code: &str, message: &str, text: &str) -> SymError {
    SymError::ProtocolViolation(ErrorInfo::new(code, message).with_context("text", text))
}

/// Extracts the group order from a line like
/// `1 orbit; grpsize=24; 3 gens; 10 nodes; maxlev=4`.
///
/// Fractional and scientific notations (`1.5e12`, `3.2*10^45`) are accepted
/// and truncated; values beyond `u64` saturate.
pub fn parse_group_order(line: &str) -> Result<u64, SymError> {
    let start = line.find(GROUP_SIZE_MARKER).ok_or_else(|| {
        SymError::ProtocolViolation(
            ErrorInfo::new("missing-grpsize", "line has no grpsize= field").with_context("line", line),
        )
    })? + GROUP_SIZE_MARKER.len();
    let rest = &line[start..];
    let raw = rest.split(';').next().unwrap_or(rest).trim();
    let value = parse_float(raw).ok_or_else(|| {
        SymError::ProtocolViolation(
            ErrorInfo::new("bad-grpsize", "group order is not a number")
                .with_context("grpsize", raw)
                .with_context("line", line),
        )
    })?;
    // `as` truncates toward zero and saturates at the u64 bounds
    Ok(value as u64)
}

fn parse_float(raw: &str) -> Option<f64> {
    if let Some((mantissa, exponent)) = raw.split_once("*10^") {
        let mantissa: f64 = mantissa.trim().parse().ok()?;
        let exponent: i32 = exponent.trim().parse().ok()?;
        return Some(mantissa * 10f64.powi(exponent));
    }
    raw.parse().ok()
}

/// Parses the orbit listing: `;` separated groups of vertex ids and
/// inclusive `low:high` ranges, each optionally followed by a `(size)` note.
pub fn parse_orbits(text: &str) -> Result<Vec<Vec<usize>>, SymError> {
    let mut orbits = Vec::new();
    for group in text.split(';') {
        let group = match group.find('(') {
            Some(idx) => &group[..idx],
            None => group,
        };
        let mut orbit = Vec::new();
        for token in group.split_whitespace() {
            match token.split_once(':') {
                Some((low, high)) => {
                    let low = parse_vertex(low, text)?;
                    let high = parse_vertex(high, text)?;
                    if low > high {
                        return Err(SymError::ProtocolViolation(
                            ErrorInfo::new("bad-range", "orbit range is descending")
                                .with_context("range", token)
                                .with_context("text", text),
                        ));
                    }
                    orbit.extend(low..=high);
                }
                None => orbit.push(parse_vertex(token, text)?),
            }
        }
        if !orbit.is_empty() {
            orbits.push(orbit);
        }
    }
    Ok(orbits)
}

fn parse_vertex(token: &str, text: &str) -> Result<usize, SymError> {
    token.trim().parse().map_err(|_| {
        SymError::ProtocolViolation(
            ErrorInfo::new("bad-orbit-token", "orbit entry is not a vertex id")
                .with_context("token", token)
                .with_context("text", text),
        )
    })
}
