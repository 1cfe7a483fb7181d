//! Handles input and output with an engine running as a child process.
//
//  Copyright 2019 Michael Leany
//
//  This Source Code Form is subject to the terms of the Mozilla Public
//  License, v. 2.0. If a copy of the MPL was not distributed with this
//  file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
////////////////////////////////////////////////////////////////////////////////////////////////////
use std::ffi::OsStr;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::*;
use std::thread;
use std::time::{Duration, Instant};
use log::{info, warn, error};
use super::EngineError;

/// A running engine. Lines from its standard output are read on a separate thread so that
/// receiving can time out. All input and output is logged using the log crate (assuming a logger
/// is set up).
///
/// Dropping the `Engine` sends it `quit` and reaps the process.
#[derive(Debug)]
pub struct Engine {
    name: String,
    child: Child,
    stdin: ChildStdin,
    receiver: Receiver<String>,
}

impl Engine {
    /// Starts `cmd` with `args`. `name` is used in the log.
    pub fn launch<T, U>(cmd: T, args: &[U], name: &str) -> Result<Engine, EngineError>
        where T: AsRef<OsStr>, U: AsRef<OsStr> {
        let mut child = Command::new(&cmd)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| match err.kind() {
                ErrorKind::NotFound => EngineError::NotFound(cmd.as_ref().to_string_lossy().into_owned()),
                _ => EngineError::from(err),
            })?;

        let stdin = child.stdin.take().ok_or(EngineError::Closed)?;
        let stdout = child.stdout.take().ok_or(EngineError::Closed)?;

        let (sender, receiver) = channel();
        let thread_name = name.to_owned();
        thread::spawn(move || {
            Self::thread(stdout, sender, &thread_name);
        });
        info!("started {}", name);

        Ok(Engine { name: name.to_owned(), child, stdin, receiver })
    }

    /// Sends a line to the engine.
    pub fn send(&mut self, s: &str) -> Result<(), EngineError> {
        info!("<chess-rules>: {}", s);
        writeln!(self.stdin, "{}", s)?;
        self.stdin.flush()?;

        Ok(())
    }

    /// Retrieves a line from the engine, waiting no later than `deadline`.
    pub fn recv_until(&self, deadline: Instant) -> Result<String, EngineError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining == Duration::from_secs(0) {
            return Err(EngineError::Timeout);
        }

        Ok(self.receiver.recv_timeout(remaining)?)
    }

    /// A function run in a separate thread to forward the engine's output.
    fn thread<R: std::io::Read>(stdout: R, sender: Sender<String>, name: &str) {
        for line in BufReader::new(stdout).lines() {
            match line {
                Ok(line) => {
                    let line = line.trim().to_string();
                    info!("<{}>: {}", name, line);
                    if sender.send(line).is_err() {
                        break;
                    }
                },
                Err(err) => {
                    error!("io error reading from {}: {}", name, err);
                    break;
                },
            }
        }
    }
}

impl Drop for Engine {
    /// Sends `quit`, then makes sure the process is gone.
    fn drop(&mut self) {
        let _ = self.send("quit");

        match self.child.try_wait() {
            Ok(Some(_)) => {},
            _ => {
                if let Err(err) = self.child.kill() {
                    warn!("could not stop {}: {}", self.name, err);
                }
            },
        }
        let _ = self.child.wait();
    }
}
