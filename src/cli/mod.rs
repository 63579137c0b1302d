//! CLI for scriptline
//!
//! - `run`: materialize a script and execute it via an interpreter
//! - `expand`: print the materialized script without executing it
//! - `completions`: generate shell completions

use anyhow::{bail, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use scriptline::{
    BuildContext, ConsoleLogger, FileJobSource, Interpreter, JobSource, LocalWorkspace,
    Materializer, PropertyOptions, ScriptRunner, StringJobSource, Workspace,
};
use std::path::PathBuf;
use std::process::ExitCode;

/// CLI arguments for scriptline
#[derive(Parser, Debug)]
#[command(name = "scriptline")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Materialize a script and execute it via an interpreter
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Interpreter to use
        #[arg(short, long, value_enum, default_value_t = InterpreterArg::Powershell)]
        interpreter: InterpreterArg,

        /// Override the interpreter command (disables install-path probing)
        #[arg(long)]
        interpreter_cmd: Option<String>,

        /// Extra interpreter arguments inserted before the script path,
        /// e.g. '-ExecutionPolicy Bypass -File'
        #[arg(long)]
        interpreter_args: Option<String>,

        /// Property set amending the options variable, one key=value per line
        #[arg(long)]
        properties: Option<String>,

        /// Read the property set from a file
        #[arg(long, conflicts_with = "properties")]
        properties_file: Option<PathBuf>,

        /// Legacy freeform options appended after the property-derived ones
        #[arg(long)]
        legacy_opts: Option<String>,

        /// Disable ANSI annotation of console output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the materialized script without executing it
    Expand {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: ShellArg,
    },
}

/// Script selection and expansion context, shared by `run` and `expand`
#[derive(clap::Args, Debug)]
struct JobArgs {
    /// Script file to run; the path may contain ${NAME} placeholders
    #[arg(conflicts_with = "inline")]
    script: Option<String>,

    /// Inline script text instead of a file
    #[arg(long)]
    inline: Option<String>,

    /// Build workspace directory
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Job name exposed as JOB_NAME
    #[arg(long, default_value = "scriptline")]
    job_name: String,

    /// Build number exposed as BUILD_NUMBER
    #[arg(long, default_value_t = 1)]
    build_number: usize,

    /// Build parameter as KEY=VALUE; repeatable
    #[arg(short, long = "param", value_parser = parse_key_val)]
    params: Vec<(String, String)>,

    /// Extra environment variable as KEY=VALUE; repeatable
    #[arg(short, long = "env", value_parser = parse_key_val)]
    envs: Vec<(String, String)>,

    /// Write the temp file with CRLF line endings and a trailing CRLF
    #[arg(long)]
    crlf: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum InterpreterArg {
    Powershell,
    Pwsh,
    Sh,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ShellArg {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))
}

impl JobArgs {
    fn source(&self) -> Result<Box<dyn JobSource>> {
        match (&self.script, &self.inline) {
            (Some(path), None) => Ok(Box::new(FileJobSource::new(&self.job_name, path))),
            (None, Some(text)) => Ok(Box::new(StringJobSource::new(&self.job_name, text))),
            (None, None) => bail!("either a script file or --inline is required"),
            (Some(_), Some(_)) => unreachable!("clap rejects the combination"),
        }
    }

    fn context(&self, workspace: &LocalWorkspace) -> BuildContext {
        let mut context = BuildContext::new(&self.job_name, self.build_number, workspace.root());
        for (key, value) in &self.envs {
            context = context.with_env_var(key, value);
        }
        for (key, value) in &self.params {
            context = context.with_parameter(key, value);
        }
        context
    }
}

/// Parse and execute CLI arguments
///
/// The returned exit code mirrors the executed script's for `run`.
pub fn run() -> Result<ExitCode> {
    let args = Args::parse();

    match args.command {
        Command::Run {
            job,
            interpreter,
            interpreter_cmd,
            interpreter_args,
            properties,
            properties_file,
            legacy_opts,
            no_color,
        } => {
            let workspace = LocalWorkspace::new(&job.workspace).with_context(|| {
                format!("Failed to open workspace: {}", job.workspace.display())
            })?;
            let context = job.context(&workspace);
            let source = job.source()?;

            let mut interpreter = match interpreter {
                InterpreterArg::Powershell => Interpreter::powershell(),
                InterpreterArg::Pwsh => Interpreter::pwsh(),
                InterpreterArg::Sh => Interpreter::posix_shell(),
            };
            if let Some(cmd) = interpreter_cmd {
                interpreter.command = cmd;
                interpreter.probe_paths.clear();
            }
            if let Some(raw) = interpreter_args {
                interpreter.args =
                    shell_words::split(&raw).context("Failed to parse --interpreter-args")?;
            }

            let mut options = PropertyOptions::new();
            if let Some(path) = properties_file {
                let text = std::fs::read_to_string(&path).with_context(|| {
                    format!("Failed to read properties file: {}", path.display())
                })?;
                options = options.with_properties(text);
            } else if let Some(text) = properties {
                options = options.with_properties(text);
            }
            if let Some(legacy) = legacy_opts {
                options = options.with_legacy_opts(legacy);
            }

            let console = if no_color {
                ConsoleLogger::stdout().without_color()
            } else {
                ConsoleLogger::stdout()
            };
            let materializer = Materializer::new()
                .with_suffix(interpreter.script_suffix.clone())
                .with_crlf_newlines(job.crlf);
            let runner = ScriptRunner::new(interpreter, console)
                .with_materializer(materializer)
                .with_options(options);

            let succeeded = runner.perform(source.as_ref(), &context, &workspace)?;
            Ok(if succeeded {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }

        Command::Expand { job } => {
            let workspace = LocalWorkspace::new(&job.workspace).with_context(|| {
                format!("Failed to open workspace: {}", job.workspace.display())
            })?;
            let context = job.context(&workspace);
            let source = job.source()?;

            let raw = source.resolve(&context, &workspace, &scriptline::CancelFlag::new())?;
            let expanded = context.expand(&raw);
            let output = if job.crlf {
                scriptline::normalize_crlf(&expanded)
            } else {
                expanded
            };
            print!("{}", output);
            Ok(ExitCode::SUCCESS)
        }

        Command::Completions { shell } => {
            use clap_complete::{generate, Shell};

            let shell = match shell {
                ShellArg::Bash => Shell::Bash,
                ShellArg::Zsh => Shell::Zsh,
                ShellArg::Fish => Shell::Fish,
                ShellArg::PowerShell => Shell::PowerShell,
            };
            let mut cmd = Args::command();
            generate(shell, &mut cmd, "scriptline", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("TARGET=staging").unwrap(),
            ("TARGET".to_string(), "staging".to_string())
        );
        assert!(parse_key_val("no-equals").is_err());
    }

    #[test]
    fn test_args_parse_run_inline() {
        let args = Args::parse_from([
            "scriptline",
            "run",
            "--inline",
            "Write-Host hi",
            "--param",
            "A=1",
            "--interpreter",
            "pwsh",
        ]);
        match args.command {
            Command::Run {
                job, interpreter, ..
            } => {
                assert_eq!(job.inline.as_deref(), Some("Write-Host hi"));
                assert_eq!(job.params, vec![("A".to_string(), "1".to_string())]);
                assert_eq!(interpreter, InterpreterArg::Pwsh);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_args_reject_script_and_inline_together() {
        let result =
            Args::try_parse_from(["scriptline", "run", "job.ps1", "--inline", "Write-Host hi"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_source_requires_script_or_inline() {
        let args = Args::parse_from(["scriptline", "expand"]);
        match args.command {
            Command::Expand { job } => assert!(job.source().is_err()),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
