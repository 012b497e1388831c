use sojobo_models::AccessLevel;
use sojobo_models::ScopeKind;


error_chain! {
    foreign_links {
        Io(::std::io::Error);
        Json(::serde_json::Error);
        Popen(::subprocess::PopenError);
    }

    errors {
        CommandFailed(command: String, output: String) {
            description("juju command failed")
            display("juju {} failed: {}", command, output)
        }

        CommandTimeout(command: String, seconds: u64) {
            description("juju command timed out")
            display("juju {} did not complete within {} seconds", command, seconds)
        }

        LevelScopeMismatch(level: AccessLevel, kind: ScopeKind) {
            description("access level does not belong to the scope")
            display("access level '{}' cannot be applied to a {} scope", level, kind)
        }

        UnexpectedOutput(command: String, reason: String) {
            description("unexpected juju output")
            display("unexpected output from juju {}: {}", command, reason)
        }
    }
}
