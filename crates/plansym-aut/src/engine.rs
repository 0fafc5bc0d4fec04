use std::fmt::Display;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};

use plansym_core::{ErrorInfo, SymError};
use plansym_graph::ColoredGraph;
use tracing::{debug, info, trace, warn};

use crate::config::EngineConfig;
use crate::protocol::{write_protocol, EngineOutput, OutputParser};
use crate::result::AutomorphismResult;

const ECHO_TARGET: &str = "plansym::dreadnaut";

/// Anything able to compute the automorphism group of a coloured graph.
pub trait AutomorphismEngine {
    /// Returns generators, orbits and group order of `graph`.
    fn compute(&self, graph: &ColoredGraph) -> Result<AutomorphismResult, SymError>;
}

/// Runs `dreadnaut` as a subprocess, one process per graph.
///
/// The protocol is written by a writer thread while a reader thread drains
/// and parses standard output, so neither side can stall on a full pipe and
/// a configured timeout covers both phases.
///
/// Standard error is not merged into the parsed stream. It is drained by its
/// own thread and every non-blank line is logged at `warn`, so the parser
/// only ever sees dreadnaut's stdout.
#[derive(Debug, Clone, Default)]
pub struct DreadnautEngine {
    config: EngineConfig,
}

impl DreadnautEngine {
    /// Creates an engine using `config`.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Launch configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn run(&self, graph: &ColoredGraph) -> Result<EngineOutput, SymError> {
        let mut payload = Vec::new();
        write_protocol(graph, &mut payload).map_err(|err| self.failure("render", err))?;

        let mut child = Command::new(&self.config.program)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|err| self.failure("spawn", err))?;

        let pipes = (child.stdin.take(), child.stdout.take(), child.stderr.take());
        let (stdin, stdout, stderr) = match pipes {
            (Some(stdin), Some(stdout), Some(stderr)) => (stdin, stdout, stderr),
            _ => {
                reap(&mut child);
                return Err(self.failure("pipes", "child pipes were not captured"));
            }
        };

        let mut workers = Workers::default();
        let (done_tx, done_rx) = mpsc::sync_channel(1);
        let verbose = self.config.verbose;
        let spawned = spawn_named("dreadnaut-stdout", move || {
            // receiver may already be gone after a timeout
            let _ = done_tx.send(read_output(stdout, verbose));
        })
        .and_then(|reader| {
            workers.reader = Some(reader);
            spawn_named("dreadnaut-stderr", move || drain_stderr(stderr))
        })
        .and_then(|drain| {
            workers.drain = Some(drain);
            spawn_named("dreadnaut-stdin", move || feed(stdin, &payload))
        });
        match spawned {
            Ok(writer) => workers.writer = Some(writer),
            Err(err) => {
                reap(&mut child);
                workers.join();
                return Err(self.failure("worker-thread", err));
            }
        }

        let (status, outcome) = match self.config.timeout() {
            None => {
                let outcome = done_rx
                    .recv()
                    .map_err(|_| self.failure("reader", "reader exited without a result"));
                (child.wait().map_err(|err| self.failure("wait", err)), outcome)
            }
            Some(limit) => match done_rx.recv_timeout(limit) {
                Ok(outcome) => (
                    child.wait().map_err(|err| self.failure("wait", err)),
                    Ok(outcome),
                ),
                Err(RecvTimeoutError::Timeout) => {
                    warn!(
                        program = %self.config.program.display(),
                        timeout_ms = limit.as_millis() as u64,
                        "automorphism engine timed out, killing it"
                    );
                    reap(&mut child);
                    workers.join();
                    return Err(SymError::ProcessFailure(
                        ErrorInfo::new("timeout", "automorphism engine did not finish in time")
                            .with_context("program", self.config.program.display().to_string())
                            .with_context("timeout_ms", limit.as_millis().to_string())
                            .with_hint("raise timeout_ms or leave it unset to wait indefinitely"),
                    ));
                }
                Err(RecvTimeoutError::Disconnected) => (
                    child.wait().map_err(|err| self.failure("wait", err)),
                    Err(self.failure("reader", "reader exited without a result")),
                ),
            },
        };

        let written = workers.writer.take().map(JoinHandle::join);
        if let Some(reader) = workers.reader.take() {
            if reader.join().is_err() {
                workers.join();
                return Err(self.failure("reader", "reader thread panicked"));
            }
        }
        workers.join();

        let status = status?;
        report_status(&self.config, status);
        match written {
            Some(Ok(Err(err))) => return Err(self.failure("write-stdin", err)),
            Some(Err(_)) => return Err(self.failure("write-stdin", "writer thread panicked")),
            _ => {}
        }
        outcome?
    }

    fn failure(&self, code: &str, err: impl Display) -> SymError {
        SymError::ProcessFailure(
            ErrorInfo::new(code, err.to_string())
                .with_context("program", self.config.program.display().to_string()),
        )
    }
}

impl AutomorphismEngine for DreadnautEngine {
    fn compute(&self, graph: &ColoredGraph) -> Result<AutomorphismResult, SymError> {
        if graph.is_empty() {
            debug!("empty graph, skipping automorphism engine");
            return Ok(AutomorphismResult::trivial(0));
        }
        let output = self.run(graph)?;
        let result = AutomorphismResult::from_output(output, graph.vertex_count())?;
        debug!(
            vertices = graph.vertex_count(),
            generators = result.group().len(),
            group_order = result.group_order(),
            orbits = result.orbits().len(),
            "automorphism engine finished"
        );
        Ok(result)
    }
}

/// Writes the rendered protocol and closes stdin when the writer drops.
fn feed(stdin: ChildStdin, payload: &[u8]) -> io::Result<()> {
    let mut writer = BufWriter::new(stdin);
    writer.write_all(payload)?;
    writer.flush()
}

fn spawn_named<T, F>(name: &str, body: F) -> io::Result<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new().name(name.into()).spawn(body)
}

/// Helper threads of one engine run.
#[derive(Default)]
struct Workers {
    reader: Option<JoinHandle<()>>,
    drain: Option<JoinHandle<()>>,
    writer: Option<JoinHandle<io::Result<()>>>,
}

impl Workers {
    /// Joins whatever is still running. Call only once the child is gone.
    fn join(&mut self) {
        for handle in [self.reader.take(), self.drain.take()].into_iter().flatten() {
            let _ = handle.join();
        }
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
    }
}

fn read_output<R: Read>(stdout: R, verbose: bool) -> Result<EngineOutput, SymError> {
    let mut parser = OutputParser::new();
    for line in BufReader::new(stdout).lines() {
        let line = line.map_err(|err| {
            SymError::ProcessFailure(
                ErrorInfo::new("read-stdout", err.to_string())
                    .with_context("lines", parser.lines_seen().to_string()),
            )
        })?;
        if verbose {
            info!(target: ECHO_TARGET, "{line}");
        } else {
            trace!(target: ECHO_TARGET, "{line}");
        }
        parser.feed(&line);
    }
    parser.finish()
}

fn drain_stderr<R: Read>(stderr: R) {
    for line in BufReader::new(stderr).lines() {
        match line {
            Ok(line) if !line.trim().is_empty() => warn!(target: ECHO_TARGET, "stderr: {line}"),
            Ok(_) => {}
            Err(_) => break,
        }
    }
}

fn report_status(config: &EngineConfig, status: ExitStatus) {
    if !status.success() {
        warn!(
            program = %config.program.display(),
            status = %status,
            "automorphism engine exited unsuccessfully"
        );
    }
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph_never_spawns() {
        let engine = DreadnautEngine::new(EngineConfig::with_program("/nonexistent/dreadnaut"));
        let result = engine.compute(&ColoredGraph::new()).unwrap();
        assert_eq!(result.vertex_count(), 0);
        assert!(result.orbits().is_empty());
    }

    #[test]
    fn missing_program_is_a_process_failure() {
        let engine = DreadnautEngine::new(EngineConfig::with_program("/nonexistent/dreadnaut"));
        let graph = ColoredGraph::with_colors(vec![0, 0]);
        let err = engine.compute(&graph).unwrap_err();
        assert!(matches!(err, SymError::ProcessFailure(_)));
        assert_eq!(err.info().code, "spawn");
    }
}
