use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::Cli;

/// Execute the `gitup completions <shell>` command.
pub fn execute(shell: Shell, out: &mut impl Write) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    clap_complete::generate(shell, &mut command, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_completions_mention_binary_and_flags() {
        let mut buf = Vec::new();
        execute(Shell::Bash, &mut buf);
        let script = String::from_utf8(buf).unwrap();

        assert!(script.contains("gitup"));
        assert!(script.contains("--dry-run"));
        assert!(script.contains("--porcelain"));
    }
}
