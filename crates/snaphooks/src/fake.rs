// Copyright (c) Contributors to the SPK project.
// SPDX-License-Identifier: Apache-2.0

//! In-memory stand-ins for `snapctl` and `secrets-config`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::exec::Runner;
use crate::snapctl::ServiceStatus;
use crate::Error;

fn failed(tool: &str, args: &[String], output: &str) -> Error {
    Error::CommandFailed {
        command: format!("{tool} {}", args.join(" ")),
        status: "exit status: 1".to_string(),
        output: output.to_string(),
    }
}

#[derive(Debug, Default)]
struct State {
    options: Value,
    services: BTreeMap<String, ServiceStatus>,
    connections: BTreeSet<String>,
    failures: BTreeMap<String, String>,
    calls: Vec<Vec<String>>,
}

/// Interprets snapctl commands against an in-memory option document.
#[derive(Debug)]
pub struct FakeSnapctl {
    state: Mutex<State>,
}

impl Default for FakeSnapctl {
    fn default() -> Self {
        Self::with_options(Value::Object(Map::new()))
    }
}

impl FakeSnapctl {
    pub fn with_options(options: Value) -> Self {
        Self {
            state: Mutex::new(State {
                options,
                ..State::default()
            }),
        }
    }

    pub fn with_service(self, name: &str, enabled: bool, active: bool) -> Self {
        self.state.lock().unwrap().services.insert(
            name.to_string(),
            ServiceStatus {
                enabled,
                active,
                notes: "-".to_string(),
            },
        );
        self
    }

    pub fn with_connection(self, plug: &str) -> Self {
        self.state.lock().unwrap().connections.insert(plug.to_string());
        self
    }

    /// Make every call of `subcommand` fail with `output`.
    pub fn failing(self, subcommand: &str, output: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(subcommand.to_string(), output.to_string());
        self
    }

    /// The current value of a dotted option key.
    pub fn option(&self, key: &str) -> Option<Value> {
        lookup(&self.state.lock().unwrap().options, key).cloned()
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Recorded calls of one subcommand.
    pub fn calls_of(&self, subcommand: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|call| call.first().map(String::as_str) == Some(subcommand))
            .collect()
    }
}

fn lookup<'a>(root: &'a Value, key: &str) -> Option<&'a Value> {
    key.split('.').try_fold(root, |node, segment| node.get(segment))
}

fn insert(root: &mut Value, key: &str, value: Value) {
    let mut node = root;
    let mut segments = key.split('.').peekable();
    while let Some(segment) = segments.next() {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let map = node.as_object_mut().unwrap();
        if segments.peek().is_none() {
            map.insert(segment.to_string(), value);
            return;
        }
        node = map
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
}

fn remove(root: &mut Value, key: &str) {
    let (parent, last) = match key.rsplit_once('.') {
        Some((parent, last)) => (parent, last),
        None => ("", key),
    };
    let node = if parent.is_empty() {
        Some(root)
    } else {
        parent
            .split('.')
            .try_fold(root, |node, segment| node.get_mut(segment))
    };
    if let Some(Value::Object(map)) = node {
        map.remove(last);
    }
}

fn split_flags(args: &[String]) -> (BTreeSet<&str>, Vec<&str>) {
    let mut flags = BTreeSet::new();
    let mut rest = Vec::new();
    for arg in args {
        if arg.starts_with('-') || arg.starts_with(':') {
            flags.insert(arg.as_str());
        } else {
            rest.push(arg.as_str());
        }
    }
    (flags, rest)
}

impl State {
    fn get(&self, args: &[String]) -> crate::Result<String> {
        let (flags, keys) = split_flags(args);
        if keys.len() == 1 && !flags.contains("-d") {
            return Ok(match lookup(&self.options, keys[0]) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => serde_json::to_string_pretty(other).unwrap(),
            });
        }
        if keys.is_empty() {
            return Ok(serde_json::to_string_pretty(&self.options).unwrap());
        }
        let mut doc = Map::new();
        for key in keys {
            if let Some(value) = lookup(&self.options, key) {
                doc.insert(key.to_string(), value.clone());
            }
        }
        Ok(serde_json::to_string_pretty(&Value::Object(doc)).unwrap())
    }

    fn set(&mut self, args: &[String]) -> crate::Result<String> {
        let (flags, pairs) = split_flags(args);
        for pair in pairs {
            let (key, raw) = pair
                .split_once('=')
                .ok_or_else(|| failed("snapctl", args, "invalid parameter"))?;
            let value = if flags.contains("-s") {
                Value::String(raw.to_string())
            } else {
                serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
            };
            insert(&mut self.options, key, value);
        }
        Ok(String::new())
    }

    fn change_services(&mut self, subcommand: &str, args: &[String]) -> crate::Result<String> {
        let (flags, names) = split_flags(args);
        for name in names {
            let status = self.services.entry(name.to_string()).or_insert_with(|| ServiceStatus {
                notes: "-".to_string(),
                ..ServiceStatus::default()
            });
            match subcommand {
                "start" | "restart" => status.active = true,
                _ => status.active = false,
            }
            if flags.contains("--enable") {
                status.enabled = true;
            }
            if flags.contains("--disable") {
                status.enabled = false;
            }
        }
        Ok(String::new())
    }

    fn services(&self, args: &[String]) -> String {
        let mut out = "Service  Startup  Current  Notes\n".to_string();
        for (name, status) in &self.services {
            if !args.is_empty() && !args.contains(name) {
                continue;
            }
            out.push_str(&format!(
                "{name}  {}  {}  {}\n",
                if status.enabled { "enabled" } else { "disabled" },
                if status.active { "active" } else { "inactive" },
                status.notes
            ));
        }
        out
    }
}

#[async_trait]
impl Runner for FakeSnapctl {
    async fn run(&self, args: &[String]) -> crate::Result<String> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(args.to_vec());

        let Some((subcommand, rest)) = args.split_first() else {
            return Err(failed("snapctl", args, "missing subcommand"));
        };
        if let Some(output) = state.failures.get(subcommand) {
            return Err(failed("snapctl", args, output));
        }
        match subcommand.as_str() {
            "get" => state.get(rest),
            "set" => state.set(rest),
            "unset" => {
                for key in rest {
                    remove(&mut state.options, key);
                }
                Ok(String::new())
            }
            "start" | "stop" | "restart" => state.change_services(subcommand, rest),
            "services" => Ok(state.services(rest).trim().to_string()),
            "is-connected" => match rest.first() {
                Some(plug) if state.connections.contains(plug) => Ok(String::new()),
                _ => Err(failed("snapctl", args, "")),
            },
            other => Err(failed("snapctl", args, &format!("unknown command {other:?}"))),
        }
    }
}

/// Records every invocation and succeeds, unless told to fail.
#[derive(Debug, Default)]
pub struct RecordingTool {
    calls: Mutex<Vec<Vec<String>>>,
    failure: Option<String>,
}

impl RecordingTool {
    pub fn failing(output: &str) -> Self {
        Self {
            failure: Some(output.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Runner for RecordingTool {
    async fn run(&self, args: &[String]) -> crate::Result<String> {
        self.calls.lock().unwrap().push(args.to_vec());
        match &self.failure {
            Some(output) => Err(failed("secrets-config", args, output)),
            None => Ok(String::new()),
        }
    }
}
