//! External process execution
//!
//! Every collaborator (composer, mysql, nginx, mkcert, openssl, ...) is reached
//! through the [`CommandRunner`] trait so the pipeline can be driven against
//! fakes in tests. Invocations block until the child exits; no timeout is
//! imposed.

use std::fmt;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// A fully described external invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    pub stdin: Option<String>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            env: Vec::new(),
            stdin: None,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument
    #[must_use]
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Wrap this invocation in `sudo -n`, keeping environment variables
    #[must_use]
    pub fn elevated(self) -> Self {
        let mut args = vec!["-n".to_string()];
        // sudo resets the environment; pass variables explicitly
        for (key, value) in &self.env {
            args.push(format!("{key}={value}"));
        }
        args.push(self.program);
        args.extend(self.args);

        Self {
            program: "sudo".to_string(),
            args,
            current_dir: self.current_dir,
            env: Vec::new(),
            stdin: self.stdin,
        }
    }
}

/// Renders program and arguments only; environment values may hold secrets
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains('=') && arg.split('=').next().is_some_and(is_secret_key) {
                write!(f, " {}=***", arg.split('=').next().unwrap_or_default())?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}

fn is_secret_key(key: &str) -> bool {
    key.contains("PWD") || key.contains("PASSWORD")
}

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code; `None` when terminated by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    #[cfg(test)]
    pub fn success() -> Self {
        Self {
            code: Some(0),
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub fn with_stdout(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    #[cfg(test)]
    pub fn failure(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.code == Some(0)
    }

    /// Best human-readable explanation of a failure
    pub fn failure_reason(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        match self.code {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Capability to run and locate external programs
pub trait CommandRunner {
    /// Run to completion, capturing output
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput>;

    /// Resolve a program on `PATH`
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run and turn a non-zero exit into an error carrying the failure reason
    fn run_checked(&self, spec: &CommandSpec) -> std::result::Result<CommandOutput, String> {
        match self.run(spec) {
            Ok(output) if output.succeeded() => Ok(output),
            Ok(output) => Err(format!("`{spec}` {}", output.failure_reason())),
            Err(e) => Err(format!("could not run `{}`: {e}", spec.program)),
        }
    }
}

/// Runner backed by real child processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        log::debug!("running: {spec}");

        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .envs(spec.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(if spec.stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            });
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }

        let mut child = command.spawn()?;
        let pipe = child.stdin.take();
        // stdin is fed from its own thread while the output pipes drain;
        // a child that echoes its input (`tee`) would otherwise block
        let output = thread::scope(|scope| {
            let writer = pipe.zip(spec.stdin.as_deref()).map(|(mut pipe, input)| {
                scope.spawn(move || pipe.write_all(input.as_bytes()))
            });
            let output = child.wait_with_output()?;
            if let Some(writer) = writer {
                let written = writer
                    .join()
                    .map_err(|_| io::Error::other("stdin writer panicked"))?;
                match written {
                    Err(e) if e.kind() != io::ErrorKind::BrokenPipe => return Err(e),
                    _ => {}
                }
            }
            Ok::<_, io::Error>(output)
        })?;

        let result = CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        log::debug!("{} exited with {:?}", spec.program, result.code);
        Ok(result)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}
