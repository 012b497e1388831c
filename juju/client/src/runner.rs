use std::io;
use std::time::Duration;

use subprocess::Exec;
use subprocess::ExitStatus;
use subprocess::Popen;
use subprocess::Redirection;

use super::ErrorKind;
use super::Result;
use super::ResultExt;


/// Combined result of a command that ran to completion.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct CommandOutput {
    /// Standard output and standard error, merged.
    pub output: String,

    /// The command exited with a zero status.
    pub success: bool,
}

impl CommandOutput {
    pub fn new<S>(success: bool, output: S) -> CommandOutput
        where S: Into<String>,
    {
        CommandOutput {
            output: output.into(),
            success,
        }
    }
}


/// Executes external commands on behalf of the juju client.
///
/// Implementations must return `Ok` for commands that ran to completion,
/// regardless of their exit status, and reserve `Err` for commands that
/// could not be run or did not complete in time.
pub trait CommandRunner: Send + Sync {
    /// Run the command with `args`, optionally writing `input` to its standard input.
    fn run(&self, args: &[String], input: Option<&str>) -> Result<CommandOutput>;
}


/// Run commands as child processes, bounded by a timeout.
pub struct SubprocessRunner {
    command: String,
    timeout: Duration,
}

impl SubprocessRunner {
    pub fn new<S>(command: S, timeout: Duration) -> SubprocessRunner
        where S: Into<String>,
    {
        SubprocessRunner {
            command: command.into(),
            timeout,
        }
    }

    /// Kill a child that is no longer waited on.
    ///
    /// Errors are ignored: the process may have exited in the meantime.
    fn terminate(process: &mut Popen) {
        let _ = process.kill();
        let _ = process.wait();
    }

    fn timeout_error(&self, args: &[String]) -> ErrorKind {
        let command = args.first().cloned().unwrap_or_default();
        ErrorKind::CommandTimeout(command, self.timeout.as_secs())
    }
}

impl CommandRunner for SubprocessRunner {
    fn run(&self, args: &[String], input: Option<&str>) -> Result<CommandOutput> {
        let mut process = Exec::cmd(&self.command)
            .args(args)
            .stdin(Redirection::Pipe)
            .stdout(Redirection::Pipe)
            .stderr(Redirection::Merge)
            .popen()?;

        let input = input.map(|input| input.as_bytes().to_vec());
        let read = process.communicate_start(input)
            .limit_time(self.timeout)
            .read();
        let output = match read {
            Ok((stdout, _)) => stdout.unwrap_or_default(),
            Err(error) => {
                SubprocessRunner::terminate(&mut process);
                if error.error.kind() == io::ErrorKind::TimedOut {
                    return Err(self.timeout_error(args).into());
                }
                return Err(error.error).chain_err(|| ErrorKind::CommandFailed(
                    args.first().cloned().unwrap_or_default(),
                    String::from("unable to read command output"),
                ));
            }
        };

        let status = match process.wait_timeout(self.timeout)? {
            Some(status) => status,
            None => {
                SubprocessRunner::terminate(&mut process);
                return Err(self.timeout_error(args).into());
            }
        };
        let output = String::from_utf8_lossy(&output).into_owned();
        let success = match status {
            ExitStatus::Exited(code) => code == 0,
            _ => false,
        };
        Ok(CommandOutput::new(success, output))
    }
}


#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::super::Error;
    use super::super::ErrorKind;
    use super::CommandOutput;
    use super::CommandRunner;
    use super::SubprocessRunner;

    fn args(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| String::from(*arg)).collect()
    }

    #[test]
    fn captures_output() {
        let runner = SubprocessRunner::new("sh", Duration::from_secs(5));
        let output = runner.run(&args(&["-c", "echo out; echo err 1>&2"]), None).unwrap();
        assert_eq!(output, CommandOutput::new(true, "out\nerr\n"));
    }

    #[test]
    fn forwards_input() {
        let runner = SubprocessRunner::new("cat", Duration::from_secs(5));
        let output = runner.run(&[], Some("secret\n")).unwrap();
        assert_eq!(output, CommandOutput::new(true, "secret\n"));
    }

    #[test]
    fn reports_exit_failures() {
        let runner = SubprocessRunner::new("sh", Duration::from_secs(5));
        let output = runner.run(&args(&["-c", "echo nope; exit 3"]), None).unwrap();
        assert_eq!(output, CommandOutput::new(false, "nope\n"));
    }

    #[test]
    fn times_out() {
        let runner = SubprocessRunner::new("sh", Duration::from_secs(1));
        match runner.run(&args(&["-c", "sleep 10"]), None) {
            Err(Error(ErrorKind::CommandTimeout(command, 1), _)) => assert_eq!(command, "-c"),
            Err(error) => panic!("Unexpected error: {:?}", error),
            Ok(_) => panic!("Unexpected success!"),
        };
    }
}
