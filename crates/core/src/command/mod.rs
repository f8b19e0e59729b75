//! Command-line assembly: tokenization, escaping, and argument ordering

mod builder;
mod tokenizer;

pub use builder::{
    EXECUTION_POLICY_VALUE, FLAG_COMMAND, FLAG_EXECUTION_POLICY, FLAG_FILE, FLAG_NON_INTERACTIVE,
    FLAG_NO_PROFILE, FLAG_VERSION, build_arguments, build_command_line, supports_explicit_version,
};
pub use tokenizer::{escape_cmd, escape_sh, tokenize};

use crate::types::HostPlatform;
use std::path::PathBuf;

/// A fully assembled invocation: the resolved executable and its ordered
/// argument vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub executable: PathBuf,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Renders a single string suitable for embedding inside a shell
    /// wrapper, escaping per the target platform's quoting rules. The `<`
    /// redirect operator emitted in stdin mode must stay literal, so it is
    /// never escaped.
    pub fn render(&self, platform: HostPlatform) -> String {
        let escape = |token: &str| -> String {
            if token == "<" {
                return token.to_string();
            }
            match platform {
                HostPlatform::Windows => escape_cmd(token),
                HostPlatform::Unix => escape_sh(token),
            }
        };

        let mut line = escape(&self.executable.to_string_lossy());
        for arg in &self.args {
            line.push(' ');
            line.push_str(&escape(arg));
        }
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_keeps_redirect_literal_and_escapes_spaces() {
        let command = CommandLine {
            executable: PathBuf::from("/opt/microsoft/powershell/7/pwsh"),
            args: vec![
                "-Command".to_string(),
                "-".to_string(),
                "<".to_string(),
                "/tmp/my step.ps1".to_string(),
            ],
        };
        let line = command.render(HostPlatform::Unix);
        assert_eq!(
            line,
            "/opt/microsoft/powershell/7/pwsh -Command - < '/tmp/my step.ps1'"
        );
    }

    #[test]
    fn render_quotes_for_cmd_on_windows() {
        let command = CommandLine {
            executable: PathBuf::from(r"C:\Program Files\PowerShell\7\pwsh.exe"),
            args: vec!["-NonInteractive".to_string(), "100%".to_string()],
        };
        let line = command.render(HostPlatform::Windows);
        assert_eq!(
            line,
            "\"C:\\Program Files\\PowerShell\\7\\pwsh.exe\" -NonInteractive 100%%"
        );
    }
}
