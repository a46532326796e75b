//! Terminal context capture.
//!
//! This module detects the user's shell and multiplexer and reads the
//! visible pane buffer, which is the only cross-shell way to see what the
//! user just saw without installing shell hooks.

use std::fmt;
use std::path::Path;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::EnvSnapshot;

/// Environment variable a shell alias can use to pass along `$?`
pub const EXIT_CODE_ENV: &str = "WUT_EXIT_CODE";

/// Earlier command blocks included ahead of the most recent one
const MAX_HISTORY_COMMANDS: usize = 2;

/// Upper bound on waiting for screen to finish writing a hardcopy
const HARDCOPY_TIMEOUT: Duration = Duration::from_secs(2);
const HARDCOPY_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Supported shells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellKind {
    Bash,
    Zsh,
    Fish,
    Unknown,
}

impl ShellKind {
    /// Recognise a shell from a process name or path (`-zsh`, `/bin/bash`, ...)
    pub fn from_name(name: &str) -> Option<Self> {
        let base = name.trim().rsplit('/').next().unwrap_or_default();
        match base.trim_start_matches('-') {
            "bash" => Some(ShellKind::Bash),
            "zsh" => Some(ShellKind::Zsh),
            "fish" => Some(ShellKind::Fish),
            _ => None,
        }
    }
}

impl fmt::Display for ShellKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellKind::Bash => write!(f, "bash"),
            ShellKind::Zsh => write!(f, "zsh"),
            ShellKind::Fish => write!(f, "fish"),
            ShellKind::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not determine shell (parent process: {parent:?}, SHELL: {shell_env:?})")]
pub struct ShellDetectionError {
    pub parent: Option<String>,
    pub shell_env: Option<String>,
}

/// Determine the user's shell from the parent process, then `$SHELL`
pub fn get_shell(env: &EnvSnapshot) -> Result<ShellKind, ShellDetectionError> {
    let parent = parent_process_name();
    tracing::debug!(parent = ?parent, shell = ?env.get("SHELL"), "detecting shell");
    detect_shell(parent.as_deref(), env.get("SHELL"))
}

pub fn detect_shell(
    parent: Option<&str>,
    shell_env: Option<&str>,
) -> Result<ShellKind, ShellDetectionError> {
    parent
        .and_then(ShellKind::from_name)
        .or_else(|| shell_env.and_then(ShellKind::from_name))
        .ok_or_else(|| ShellDetectionError {
            parent: parent.map(str::to_string),
            shell_env: shell_env.map(str::to_string),
        })
}

fn parent_process_name() -> Option<String> {
    use sysinfo::System;

    let pid = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    sys.refresh_processes();
    let parent = sys.process(pid)?.parent()?;
    sys.process(parent).map(|p| p.name().to_string())
}

/// Terminal multiplexers whose panes can be captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Multiplexer {
    Tmux,
    Screen,
}

impl fmt::Display for Multiplexer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Multiplexer::Tmux => write!(f, "tmux"),
            Multiplexer::Screen => write!(f, "screen"),
        }
    }
}

/// Program and arguments for one capture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureCommand {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Multiplexer {
    /// The session we are running in, from `TMUX` or `STY`
    pub fn detect(env: &EnvSnapshot) -> Option<Self> {
        if env.contains("TMUX") {
            Some(Multiplexer::Tmux)
        } else if env.contains("STY") {
            Some(Multiplexer::Screen)
        } else {
            None
        }
    }

    /// Build the capture command. Screen writes to `hardcopy`; tmux prints
    /// to stdout and ignores it.
    pub fn capture_command(
        &self,
        env: &EnvSnapshot,
        history_lines: usize,
        hardcopy: &Path,
    ) -> CaptureCommand {
        match self {
            Multiplexer::Tmux => {
                let mut args = vec!["capture-pane".to_string(), "-p".to_string(), "-J".to_string()];
                if let Some(pane) = env.get("TMUX_PANE") {
                    args.extend(["-t".to_string(), pane.to_string()]);
                }
                if history_lines > 0 {
                    args.extend(["-S".to_string(), format!("-{history_lines}")]);
                }
                CaptureCommand {
                    program: "tmux",
                    args,
                }
            }
            Multiplexer::Screen => {
                let mut args = Vec::new();
                if let Some(window) = env.get("WINDOW") {
                    args.extend(["-p".to_string(), window.to_string()]);
                }
                args.extend(["-X".to_string(), "hardcopy".to_string()]);
                if history_lines > 0 {
                    args.push("-h".to_string());
                }
                args.push(hardcopy.display().to_string());
                CaptureCommand {
                    program: "screen",
                    args,
                }
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("could not read screen hardcopy: {0}")]
    Hardcopy(#[source] std::io::Error),

    #[error("{0} pane capture returned no text")]
    Empty(Multiplexer),
}

/// Captured terminal state
#[derive(Debug, Clone)]
pub struct TerminalContext {
    pub shell: ShellKind,
    pub multiplexer: Multiplexer,
    /// Pane lines, most recent last
    pub lines: Vec<String>,
    /// `$?` of the previous command, when the shell exported it
    pub exit_code: Option<i32>,
    pub working_dir: Option<String>,
    pub os: &'static str,
}

/// One prompt line and the output printed after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandBlock {
    pub command: String,
    pub output: Vec<String>,
}

/// Capture the current pane of `multiplexer`
///
/// The caller guarantees we are inside that multiplexer's session.
pub fn get_terminal_context(
    shell: ShellKind,
    multiplexer: Multiplexer,
    history_lines: usize,
    env: &EnvSnapshot,
) -> Result<TerminalContext, CaptureError> {
    let raw = capture_pane(multiplexer, history_lines, env)?;
    let lines = normalize_pane(&raw);
    if lines.is_empty() {
        return Err(CaptureError::Empty(multiplexer));
    }
    tracing::debug!(%multiplexer, lines = lines.len(), "captured pane");

    Ok(TerminalContext {
        shell,
        multiplexer,
        lines,
        exit_code: env.get(EXIT_CODE_ENV).and_then(|v| v.trim().parse().ok()),
        working_dir: std::env::current_dir()
            .ok()
            .map(|dir| dir.display().to_string()),
        os: std::env::consts::OS,
    })
}

fn capture_pane(
    multiplexer: Multiplexer,
    history_lines: usize,
    env: &EnvSnapshot,
) -> Result<String, CaptureError> {
    let hardcopy = tempfile::NamedTempFile::new().map_err(CaptureError::Hardcopy)?;
    let capture = multiplexer.capture_command(env, history_lines, hardcopy.path());
    tracing::debug!(program = capture.program, args = ?capture.args, "running pane capture");

    let mut command = Command::new(capture.program);
    command.args(&capture.args);
    if let Some(path) = env.get("PATH") {
        command.env("PATH", path);
    }
    let output = command.output().map_err(|source| CaptureError::Spawn {
        program: capture.program,
        source,
    })?;

    if !output.status.success() {
        return Err(CaptureError::Failed {
            program: capture.program,
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    match multiplexer {
        Multiplexer::Tmux => Ok(String::from_utf8_lossy(&output.stdout).into_owned()),
        Multiplexer::Screen => {
            let bytes = read_hardcopy(hardcopy.path(), HARDCOPY_TIMEOUT)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
    }
}

/// Read a screen hardcopy once it is complete.
///
/// `screen -X` only queues the command for the session and exits, so the
/// file may still be empty or growing. Wait until it is non-empty and its
/// size holds across two polls, or until `timeout` passes.
fn read_hardcopy(path: &Path, timeout: Duration) -> Result<Vec<u8>, CaptureError> {
    let deadline = Instant::now() + timeout;
    let mut last_len = 0;
    loop {
        let len = std::fs::metadata(path)
            .map_err(CaptureError::Hardcopy)?
            .len();
        if len > 0 && len == last_len {
            break;
        }
        if Instant::now() >= deadline {
            tracing::debug!(len, "screen hardcopy did not settle in time");
            break;
        }
        last_len = len;
        thread::sleep(HARDCOPY_POLL_INTERVAL);
    }
    std::fs::read(path).map_err(CaptureError::Hardcopy)
}

/// Split captured text into lines, dropping `\r`, trailing whitespace and
/// the blank padding below the last line of output
pub fn normalize_pane(raw: &str) -> Vec<String> {
    let mut lines: Vec<String> = raw
        .lines()
        .map(|line| line.replace('\r', "").trim_end().to_string())
        .collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

/// Text before the `program` token on an invocation line; the rightmost
/// standalone match is the invocation
fn prompt_prefix<'a>(line: &'a str, program: &str) -> Option<&'a str> {
    let idx = line.rmatch_indices(program).map(|(idx, _)| idx).find(|&idx| {
        let before = line[..idx].chars().next_back();
        let after = line[idx + program.len()..].chars().next();
        before.map_or(true, |c| c.is_whitespace() || c == '/')
            && after.map_or(true, char::is_whitespace)
    })?;

    // Step back over a path such as `./target/release/`
    let token_start = line[..idx]
        .rfind(char::is_whitespace)
        .map(|pos| pos + 1)
        .unwrap_or(0);
    let prompt = &line[..token_start];
    (!prompt.trim().is_empty()).then_some(prompt)
}

impl TerminalContext {
    /// Split the pane into command blocks using the prompt of the current
    /// `program` invocation (the last non-empty line). The invocation itself
    /// is excluded. Empty when no prompt can be recognised.
    pub fn commands(&self, program: &str) -> Vec<CommandBlock> {
        let Some(last) = self.lines.iter().rposition(|line| !line.trim().is_empty()) else {
            return Vec::new();
        };
        let Some(prompt) = prompt_prefix(&self.lines[last], program) else {
            return Vec::new();
        };

        let mut blocks = Vec::new();
        let mut current: Option<CommandBlock> = None;
        for line in &self.lines[..last] {
            if let Some(command) = line.strip_prefix(prompt) {
                blocks.extend(current.take());
                current = Some(CommandBlock {
                    command: command.trim().to_string(),
                    output: Vec::new(),
                });
            } else if let Some(block) = current.as_mut() {
                block.output.push(line.clone());
            }
        }
        blocks.extend(current);
        blocks.retain(|block| !block.command.is_empty() || !block.output.is_empty());
        blocks
    }

    /// Format context for inclusion in a prompt
    pub fn format_for_prompt(&self, program: &str) -> String {
        let mut parts = vec![
            format!("Shell: {}", self.shell),
            format!("Operating system: {}", self.os),
        ];

        if let Some(ref dir) = self.working_dir {
            parts.push(format!("Working directory: {}", dir));
        }

        if let Some(code) = self.exit_code {
            parts.push(format!(
                "Exit code of last command: {} ({})",
                code,
                interpret_exit_code(code)
            ));
        }

        let blocks = self.commands(program);
        if let Some((latest, earlier)) = blocks.split_last() {
            let skip = earlier.len().saturating_sub(MAX_HISTORY_COMMANDS);
            if skip < earlier.len() {
                parts.push("\nEarlier commands:".to_string());
                for block in &earlier[skip..] {
                    parts.push(render_block(block));
                }
            }
            parts.push("\nMost recent command:".to_string());
            parts.push(render_block(latest));
        } else {
            parts.push("\nTerminal output (most recent last):".to_string());
            parts.push(self.lines.join("\n"));
        }

        parts.join("\n")
    }
}

fn render_block(block: &CommandBlock) -> String {
    let mut text = format!("$ {}", block.command);
    for line in &block.output {
        text.push('\n');
        text.push_str(line);
    }
    text
}

/// Interpret common exit codes
fn interpret_exit_code(code: i32) -> &'static str {
    match code {
        0 => "success",
        1 => "general error",
        2 => "misuse of shell command",
        126 => "permission problem or command not executable",
        127 => "command not found",
        130 => "terminated by Ctrl+C (SIGINT)",
        137 => "killed (SIGKILL)",
        139 => "segmentation fault (SIGSEGV)",
        143 => "terminated (SIGTERM)",
        _ if code > 128 && code < 256 => "terminated by signal",
        _ => "unknown",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;
    use tempfile::TempDir;

    /// Install an executable shell script called `name` in `dir`
    #[cfg(unix)]
    pub(crate) fn fake_program(dir: &Path, name: &str, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn context(lines: &[&str]) -> TerminalContext {
        TerminalContext {
            shell: ShellKind::Zsh,
            multiplexer: Multiplexer::Tmux,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            exit_code: None,
            working_dir: None,
            os: "linux",
        }
    }

    fn env(vars: &[(&str, &str)]) -> EnvSnapshot {
        vars.iter().copied().collect()
    }

    #[test]
    fn test_shell_from_name() {
        assert_eq!(ShellKind::from_name("zsh"), Some(ShellKind::Zsh));
        assert_eq!(ShellKind::from_name("-bash"), Some(ShellKind::Bash));
        assert_eq!(
            ShellKind::from_name("/usr/local/bin/fish"),
            Some(ShellKind::Fish)
        );
        assert_eq!(ShellKind::from_name("tmux: server"), None);
        assert_eq!(ShellKind::from_name("sh"), None);
    }

    #[test]
    fn test_detect_shell_prefers_parent_process() {
        assert_eq!(
            detect_shell(Some("fish"), Some("/bin/zsh")),
            Ok(ShellKind::Fish)
        );
        assert_eq!(
            detect_shell(Some("python3"), Some("/bin/zsh")),
            Ok(ShellKind::Zsh)
        );
        let err = detect_shell(Some("python3"), None).unwrap_err();
        assert_eq!(err.parent.as_deref(), Some("python3"));
        assert!(detect_shell(None, Some("/bin/tcsh")).is_err());
    }

    #[test]
    fn test_multiplexer_detect() {
        assert_eq!(
            Multiplexer::detect(&env(&[("TMUX", "/tmp/tmux-1000/default,1,0")])),
            Some(Multiplexer::Tmux)
        );
        assert_eq!(
            Multiplexer::detect(&env(&[("STY", "1234.pts-0.host")])),
            Some(Multiplexer::Screen)
        );
        assert_eq!(Multiplexer::detect(&env(&[("TMUX", "")])), None);
        assert_eq!(Multiplexer::detect(&env(&[])), None);
    }

    #[test]
    fn test_tmux_capture_command() {
        let hardcopy = PathBuf::from("/tmp/unused");
        let cmd = Multiplexer::Tmux.capture_command(&env(&[("TMUX_PANE", "%3")]), 0, &hardcopy);
        assert_eq!(cmd.program, "tmux");
        assert_eq!(cmd.args, vec!["capture-pane", "-p", "-J", "-t", "%3"]);

        let cmd = Multiplexer::Tmux.capture_command(&env(&[]), 500, &hardcopy);
        assert_eq!(cmd.args, vec!["capture-pane", "-p", "-J", "-S", "-500"]);
    }

    #[test]
    fn test_screen_capture_command() {
        let hardcopy = PathBuf::from("/tmp/wut-hardcopy");
        let cmd = Multiplexer::Screen.capture_command(&env(&[("WINDOW", "2")]), 0, &hardcopy);
        assert_eq!(cmd.program, "screen");
        assert_eq!(
            cmd.args,
            vec!["-p", "2", "-X", "hardcopy", "/tmp/wut-hardcopy"]
        );

        let cmd = Multiplexer::Screen.capture_command(&env(&[]), 100, &hardcopy);
        assert_eq!(cmd.args, vec!["-X", "hardcopy", "-h", "/tmp/wut-hardcopy"]);
    }

    #[test]
    fn test_normalize_pane() {
        let lines = normalize_pane("$ ls\r\nfoo   \nbar\n\n   \n\n");
        assert_eq!(lines, vec!["$ ls", "foo", "bar"]);
        assert!(normalize_pane("\n\n  \n").is_empty());
    }

    #[test]
    fn test_commands_split_on_prompt() {
        let ctx = context(&[
            "user@host:~$ ls",
            "Cargo.toml  src",
            "user@host:~$ cargo build",
            "error[E0382]: borrow of moved value",
            "  --> src/main.rs:10:5",
            "user@host:~$ wut",
        ]);
        let blocks = ctx.commands("wut");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].command, "ls");
        assert_eq!(blocks[0].output, vec!["Cargo.toml  src"]);
        assert_eq!(blocks[1].command, "cargo build");
        assert_eq!(blocks[1].output.len(), 2);
    }

    #[test]
    fn test_commands_with_query_and_path_invocation() {
        let ctx = context(&[
            "~/wut-project % make",
            "make: *** No targets specified.",
            "~/wut-project % ./target/debug/wut --query 'why?'",
        ]);
        let blocks = ctx.commands("wut");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].command, "make");
    }

    #[test]
    fn test_commands_with_program_named_directory_in_prompt() {
        let ctx = context(&[
            "~/wut % make",
            "make: *** No targets specified.",
            "~/wut % wut",
        ]);
        let blocks = ctx.commands("wut");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].command, "make");
        assert_eq!(blocks[0].output, vec!["make: *** No targets specified."]);
    }

    #[test]
    fn test_commands_without_prompt() {
        let ctx = context(&["some output", "wut"]);
        assert!(ctx.commands("wut").is_empty());

        let ctx = context(&["no invocation here"]);
        assert!(ctx.commands("wut").is_empty());
    }

    #[test]
    fn test_format_for_prompt_uses_latest_command() {
        let mut ctx = context(&[
            "$ echo one",
            "one",
            "$ echo two",
            "two",
            "$ echo three",
            "three",
            "$ false",
            "$ wut",
        ]);
        ctx.exit_code = Some(127);
        ctx.working_dir = Some("/home/user".to_string());

        let prompt = ctx.format_for_prompt("wut");
        assert!(prompt.contains("Shell: zsh"));
        assert!(prompt.contains("Working directory: /home/user"));
        assert!(prompt.contains("127 (command not found)"));
        assert!(prompt.contains("Most recent command:\n$ false"));
        assert!(prompt.contains("$ echo three"));
        assert!(prompt.contains("$ echo two"));
        assert!(!prompt.contains("$ echo one"));
    }

    #[test]
    fn test_format_for_prompt_falls_back_to_raw_lines() {
        let ctx = context(&["segmentation fault (core dumped)", "wut"]);
        let prompt = ctx.format_for_prompt("wut");
        assert!(prompt.contains("Terminal output (most recent last):"));
        assert!(prompt.contains("segmentation fault (core dumped)"));
    }

    #[test]
    fn test_interpret_exit_code() {
        assert_eq!(interpret_exit_code(0), "success");
        assert_eq!(interpret_exit_code(127), "command not found");
        assert_eq!(interpret_exit_code(130), "terminated by Ctrl+C (SIGINT)");
        assert_eq!(interpret_exit_code(134), "terminated by signal");
        assert_eq!(interpret_exit_code(-1), "unknown");
    }

    #[cfg(unix)]
    fn capture_env(dir: &TempDir, mux_var: &str) -> EnvSnapshot {
        env(&[
            (mux_var, "session"),
            ("PATH", dir.path().to_str().unwrap()),
            (EXIT_CODE_ENV, "2"),
        ])
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_tmux_capture_reads_stdout() {
        let dir = TempDir::new().unwrap();
        fake_program(
            dir.path(),
            "tmux",
            "#!/bin/sh\nprintf '$ ls missing\\nls: missing: No such file\\n$ wut\\n\\n\\n'\n",
        );

        let ctx = get_terminal_context(
            ShellKind::Bash,
            Multiplexer::Tmux,
            0,
            &capture_env(&dir, "TMUX"),
        )
        .unwrap();
        assert_eq!(ctx.lines, vec!["$ ls missing", "ls: missing: No such file", "$ wut"]);
        assert_eq!(ctx.exit_code, Some(2));
        assert_eq!(ctx.multiplexer, Multiplexer::Tmux);
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_tmux_capture_empty_output() {
        let dir = TempDir::new().unwrap();
        fake_program(dir.path(), "tmux", "#!/bin/sh\nprintf '\\n  \\n'\n");

        let err = get_terminal_context(
            ShellKind::Bash,
            Multiplexer::Tmux,
            0,
            &capture_env(&dir, "TMUX"),
        )
        .unwrap_err();
        assert!(matches!(err, CaptureError::Empty(Multiplexer::Tmux)));
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_tmux_capture_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        fake_program(
            dir.path(),
            "tmux",
            "#!/bin/sh\necho 'no server running on /tmp/tmux-1000/default' >&2\nexit 1\n",
        );

        let err = get_terminal_context(
            ShellKind::Bash,
            Multiplexer::Tmux,
            0,
            &capture_env(&dir, "TMUX"),
        )
        .unwrap_err();
        match err {
            CaptureError::Failed {
                program,
                status,
                stderr,
            } => {
                assert_eq!(program, "tmux");
                assert_eq!(status.code(), Some(1));
                assert_eq!(stderr, "no server running on /tmp/tmux-1000/default");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_tmux_missing_from_path() {
        let dir = TempDir::new().unwrap();

        let err = get_terminal_context(
            ShellKind::Bash,
            Multiplexer::Tmux,
            0,
            &capture_env(&dir, "TMUX"),
        )
        .unwrap_err();
        match err {
            CaptureError::Spawn { program, source } => {
                assert_eq!(program, "tmux");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    #[serial]
    #[cfg(unix)]
    fn test_screen_hardcopy_written_after_exit() {
        let dir = TempDir::new().unwrap();
        // Exits at once and fills the hardcopy (last argument) later
        fake_program(
            dir.path(),
            "screen",
            "#!/bin/sh\nPATH=/usr/bin:/bin\nfor last; do :; done\n( sleep 0.3; printf '$ make\\nmake: *** No rule\\n$ wut\\n' > \"$last\" ) >/dev/null 2>&1 &\nexit 0\n",
        );

        let ctx = get_terminal_context(
            ShellKind::Zsh,
            Multiplexer::Screen,
            0,
            &capture_env(&dir, "STY"),
        )
        .unwrap();
        assert_eq!(ctx.lines, vec!["$ make", "make: *** No rule", "$ wut"]);
        assert_eq!(ctx.commands("wut").len(), 1);
    }

    #[test]
    fn test_read_hardcopy_gives_up_after_timeout() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let started = Instant::now();
        let bytes = read_hardcopy(file.path(), Duration::from_millis(100)).unwrap();
        assert!(bytes.is_empty());
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
