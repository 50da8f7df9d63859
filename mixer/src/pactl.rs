use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use crate::control::{AudioControl, CommandOutput, Mutation};
use crate::error::{MixerError, Result};

pub const DEFAULT_PROGRAM: &str = "pactl";
pub const DEFAULT_SINK: &str = "@DEFAULT_SINK@";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// `AudioControl` backed by the `pactl` command line tool.
#[derive(Debug, Clone)]
pub struct Pactl {
  program: String,
  sink: String,
  timeout: Duration,
}

impl Default for Pactl {
  fn default() -> Self {
    Self {
      program: DEFAULT_PROGRAM.to_string(),
      sink: DEFAULT_SINK.to_string(),
      timeout: DEFAULT_TIMEOUT,
    }
  }
}

impl Pactl {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_program(mut self, program: impl Into<String>) -> Self {
    self.program = program.into();
    self
  }

  pub fn with_sink(mut self, sink: impl Into<String>) -> Self {
    self.sink = sink.into();
    self
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn program(&self) -> &str {
    &self.program
  }

  pub fn sink(&self) -> &str {
    &self.sink
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  /// Run the tool once with `args`.
  ///
  /// One deadline covers both the process exit and reading its output, so
  /// anything it leaves holding the pipes can't stretch the call past the
  /// timeout.
  pub fn run(&self, args: &[&str]) -> Result<CommandOutput> {
    log::debug!("Running {} {}", self.program, args.join(" "));

    let deadline = Instant::now() + self.timeout;
    let mut child = Command::new(&self.program)
      .args(args)
      .stdin(Stdio::null())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .spawn()
      .map_err(|e| MixerError::ExternalCommand(format!("Failed to execute {}: {}", self.program, e)))?;

    let (tx, rx) = mpsc::channel();
    drain(Pipe::Stdout, child.stdout.take(), tx.clone());
    drain(Pipe::Stderr, child.stderr.take(), tx);

    let succeeded = self.wait(&mut child, deadline)?;

    let mut stdout = None;
    let mut stderr = None;
    while stdout.is_none() || stderr.is_none() {
      let remaining = deadline.saturating_duration_since(Instant::now());
      match rx.recv_timeout(remaining) {
        Ok((Pipe::Stdout, text)) => stdout = Some(text),
        Ok((Pipe::Stderr, text)) => stderr = Some(text),
        Err(RecvTimeoutError::Timeout) => {
          log::warn!("{} exited but its output stayed open past the timeout", self.program);
          return Err(self.timed_out());
        }
        Err(RecvTimeoutError::Disconnected) => break,
      }
    }

    Ok(CommandOutput {
      succeeded,
      stdout: stdout.unwrap_or_default(),
      stderr: stderr.unwrap_or_default(),
    })
  }

  fn wait(&self, child: &mut Child, deadline: Instant) -> Result<bool> {
    loop {
      match child.try_wait() {
        Ok(Some(status)) => return Ok(status.success()),
        Ok(None) if Instant::now() >= deadline => {
          let _ = child.kill();
          let _ = child.wait();
          log::warn!("{} timed out after {}ms", self.program, self.timeout.as_millis());
          return Err(self.timed_out());
        }
        Ok(None) => thread::sleep(POLL_INTERVAL),
        Err(e) => {
          let _ = child.kill();
          return Err(MixerError::ExternalCommand(format!(
            "Failed to wait for {}: {}",
            self.program, e
          )));
        }
      }
    }
  }

  fn timed_out(&self) -> MixerError {
    MixerError::ExternalCommand(format!(
      "{} timed out after {}ms",
      self.program,
      self.timeout.as_millis()
    ))
  }
}

#[derive(Debug, Clone, Copy)]
enum Pipe {
  Stdout,
  Stderr,
}

/// Read a child pipe to the end on its own thread so a chatty tool can't
/// block on a full pipe while we poll for its exit.
fn drain<R: Read + Send + 'static>(pipe: Pipe, reader: Option<R>, tx: Sender<(Pipe, String)>) {
  thread::spawn(move || {
    let mut buf = Vec::new();
    if let Some(mut reader) = reader {
      let _ = reader.read_to_end(&mut buf);
    }
    let _ = tx.send((pipe, String::from_utf8_lossy(&buf).into_owned()));
  });
}

impl AudioControl for Pactl {
  fn query_level(&self) -> Result<CommandOutput> {
    self.run(&["get-sink-volume", &self.sink])
  }

  fn query_mute(&self) -> Result<CommandOutput> {
    self.run(&["get-sink-mute", &self.sink])
  }

  fn mutate(&self, mutation: &Mutation) -> Result<CommandOutput> {
    let argument = mutation.argument();
    match mutation {
      Mutation::SetVolume(_) => self.run(&["set-sink-volume", &self.sink, &argument]),
      Mutation::ToggleMute => self.run(&["set-sink-mute", &self.sink, &argument]),
    }
  }
}
