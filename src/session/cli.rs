//! Agent session backed by the `claude` CLI in stream-json mode.

use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdout, Command};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::{AgentSession, EventStream, SessionEvent};
use crate::agent::RequestDescriptor;

pub const DEFAULT_PROGRAM: &str = "claude";
/// Longest stdout line accepted as one event.
pub const DEFAULT_MAX_LINE_BYTES: usize = 16 * 1024 * 1024;
const MAX_STDERR_BYTES: usize = 8 * 1024;

/// Runs each request as a `claude --print --output-format stream-json`
/// child process and decodes its stdout line by line.
#[derive(Debug, Clone)]
pub struct CliSession {
    program: PathBuf,
    program_args: Vec<String>,
    extra_args: Vec<String>,
    env: HashMap<String, String>,
    max_line_bytes: usize,
}

impl CliSession {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            program_args: Vec::new(),
            extra_args: Vec::new(),
            env: HashMap::new(),
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Launch through another program, e.g. `npx @anthropic-ai/claude-code`.
    /// `program_args` come before the generated arguments.
    pub fn with_command(
        mut self,
        program: impl Into<PathBuf>,
        program_args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.program = program.into();
        self.program_args = program_args.into_iter().map(Into::into).collect();
        self
    }

    /// Arguments appended after the generated ones.
    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_args.push(arg.into());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Cap on a single stdout line; a longer line ends the session with a
    /// parse error.
    pub fn with_max_line_bytes(mut self, max: usize) -> Self {
        self.max_line_bytes = max;
        self
    }

    /// Command-line arguments for a request. The prompt is sent on stdin.
    pub fn args(&self, request: &RequestDescriptor) -> Vec<String> {
        let mut args = vec![
            "--print".to_string(),
            "--output-format".to_string(),
            "stream-json".to_string(),
            "--verbose".to_string(),
            "--max-turns".to_string(),
            request.max_turns.to_string(),
            "--model".to_string(),
            request.model.to_string(),
            "--permission-mode".to_string(),
            request.permission_mode.to_string(),
        ];

        if !request.allowed_tools.is_empty() {
            args.push("--allowedTools".to_string());
            args.push(request.allowed_tools.join(","));
        }

        if let Some(prompt) = &request.system_prompt {
            args.push("--system-prompt".to_string());
            args.push(prompt.clone());
        }

        args.extend(self.extra_args.iter().cloned());
        args
    }
}

impl Default for CliSession {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AgentSession for CliSession {
    fn name(&self) -> &str {
        "claude-cli"
    }

    async fn start(&self, request: &RequestDescriptor) -> crate::Result<EventStream> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.program_args)
            .args(self.args(request))
            .current_dir(&request.working_dir)
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd.spawn().map_err(|e| {
            crate::Error::Process(format!(
                "Failed to spawn {}: {}",
                self.program.display(),
                e
            ))
        })?;
        debug!(
            program = %self.program.display(),
            pid = ?child.id(),
            cwd = %request.working_dir.display(),
            "Spawned agent session"
        );

        if let Some(mut stdin) = child.stdin.take() {
            let prompt = request.prompt.clone();
            tokio::spawn(async move {
                if let Err(e) = stdin.write_all(prompt.as_bytes()).await {
                    warn!(error = %e, "Failed to write prompt to session stdin");
                }
            });
        }

        let stdout = child.stdout.take().ok_or_else(|| {
            crate::Error::Process("Session stdout was not captured".to_string())
        })?;
        let stderr = child.stderr.take().map(|mut stderr| {
            tokio::spawn(async move {
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                while let Ok(n) = stderr.read(&mut chunk).await {
                    if n == 0 {
                        break;
                    }
                    if buf.len() < MAX_STDERR_BYTES {
                        let take = n.min(MAX_STDERR_BYTES - buf.len());
                        buf.extend_from_slice(&chunk[..take]);
                    }
                }
                String::from_utf8_lossy(&buf).into_owned()
            })
        });

        let state = CliStream {
            stdout: BufReader::new(stdout),
            max_line_bytes: self.max_line_bytes,
            child,
            stderr,
            cancel: request.cancel.clone(),
            done: false,
        };

        Ok(Box::pin(stream::unfold(state, |mut state| async move {
            state.next_event().await.map(|event| (event, state))
        })))
    }
}

enum RawLine {
    Line(String),
    TooLong,
    Eof,
}

/// Read one `\n`-terminated line, giving up once it exceeds `limit` bytes.
async fn read_bounded_line<R>(reader: &mut R, limit: usize) -> std::io::Result<RawLine>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let mut limited = (&mut *reader).take((limit as u64).saturating_add(1));
    if limited.read_until(b'\n', &mut buf).await? == 0 {
        return Ok(RawLine::Eof);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if buf.len() > limit {
        return Ok(RawLine::TooLong);
    }

    String::from_utf8(buf)
        .map(RawLine::Line)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

struct CliStream {
    stdout: BufReader<ChildStdout>,
    max_line_bytes: usize,
    child: Child,
    stderr: Option<JoinHandle<String>>,
    cancel: CancellationToken,
    done: bool,
}

impl CliStream {
    async fn next_event(&mut self) -> Option<crate::Result<SessionEvent>> {
        while !self.done {
            let line = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    self.stop();
                    return None;
                }
                line = read_bounded_line(&mut self.stdout, self.max_line_bytes) => line,
            };

            match line {
                Ok(RawLine::Line(line)) if line.trim().is_empty() => continue,
                Ok(RawLine::Line(line)) => {
                    let event = SessionEvent::from_json_line(&line);
                    if event.is_err() {
                        self.stop();
                    }
                    return Some(event);
                }
                Ok(RawLine::TooLong) => {
                    self.stop();
                    return Some(Err(crate::Error::Parse(format!(
                        "Session event exceeds {} bytes",
                        self.max_line_bytes
                    ))));
                }
                Ok(RawLine::Eof) => {
                    self.done = true;
                    return self.finish().await.err().map(Err);
                }
                Err(e) => {
                    self.stop();
                    return Some(Err(crate::Error::Stream(format!(
                        "Failed to read session output: {}",
                        e
                    ))));
                }
            }
        }
        None
    }

    fn stop(&mut self) {
        self.done = true;
        if let Err(e) = self.child.start_kill() {
            debug!(error = %e, "Session process already exited");
        }
    }

    async fn finish(&mut self) -> crate::Result<()> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| crate::Error::Process(format!("Failed to wait for session: {}", e)))?;

        if status.success() {
            return Ok(());
        }

        let stderr = match self.stderr.take() {
            Some(handle) => handle.await.unwrap_or_default(),
            None => String::new(),
        };
        let code = status
            .code()
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let stderr = stderr.trim();

        Err(crate::Error::Process(if stderr.is_empty() {
            format!("Claude Code process exited with code {}", code)
        } else {
            format!("Claude Code process exited with code {}: {}", code, stderr)
        }))
    }
}
