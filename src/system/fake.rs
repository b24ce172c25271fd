//! In-memory command runner for tests
//!
//! Records every invocation and answers from per-program handlers, which may
//! also simulate a tool's side effects (e.g. writing a certificate file).

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use super::process::{CommandOutput, CommandRunner, CommandSpec};

type Handler = Box<dyn Fn(&CommandSpec) -> CommandOutput>;

#[derive(Default)]
pub struct FakeRunner {
    missing: HashSet<String>,
    handlers: HashMap<String, Handler>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl FakeRunner {
    /// Every program is present and succeeds with empty output
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `locate` fail for a program
    pub fn without(mut self, program: &str) -> Self {
        self.missing.insert(program.to_string());
        self
    }

    /// Answer every invocation of `program` with a fixed output
    pub fn respond(self, program: &str, output: CommandOutput) -> Self {
        self.on(program, move |_| output.clone())
    }

    /// Answer invocations of `program` with a handler
    pub fn on<F>(mut self, program: &str, handler: F) -> Self
    where
        F: Fn(&CommandSpec) -> CommandOutput + 'static,
    {
        self.handlers.insert(program.to_string(), Box::new(handler));
        self
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Programs invoked, with any `sudo -n VAR=..` prefix removed
    pub fn programs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|spec| effective_program(spec).to_string())
            .collect()
    }

    /// Calls whose effective program is `program`
    pub fn calls_to(&self, program: &str) -> Vec<CommandSpec> {
        self.calls
            .borrow()
            .iter()
            .filter(|spec| effective_program(spec) == program)
            .cloned()
            .collect()
    }
}

fn effective_program(spec: &CommandSpec) -> &str {
    if spec.program != "sudo" {
        return &spec.program;
    }
    spec.args
        .iter()
        .find(|arg| !arg.starts_with('-') && !arg.contains('='))
        .map_or("sudo", String::as_str)
}

impl CommandRunner for FakeRunner {
    fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        self.calls.borrow_mut().push(spec.clone());
        let handler = self
            .handlers
            .get(&spec.program)
            .or_else(|| self.handlers.get(effective_program(spec)));
        Ok(handler.map_or_else(CommandOutput::success, |h| h(spec)))
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        if self.missing.contains(program) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }
}
