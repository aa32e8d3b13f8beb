//! Password-authenticated single-command execution over SSH

use serde::{Deserialize, Serialize};
use ssh2::Session;
use std::io::Read;
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// What the remote command produced. Failures of any kind land in `error`;
/// the helper never returns a Rust error for them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommandOutput {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub output: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl CommandOutput {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            error: message.into(),
        }
    }
}

/// Connect, authenticate with a password, run one command, capture both streams.
pub fn run_command(host: &str, user: &str, password: &str, command: &str) -> CommandOutput {
    debug!("ssh {}@{}: {}", user, host, command);

    let address = if host.contains(':') {
        host.to_string()
    } else {
        format!("{}:22", host)
    };

    let addr = match address.to_socket_addrs() {
        Ok(mut addrs) => match addrs.next() {
            Some(addr) => addr,
            None => return CommandOutput::failure(format!("host non risolto: {}", host)),
        },
        Err(e) => return CommandOutput::failure(format!("indirizzo non valido: {}", e)),
    };
    let tcp = match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
        Ok(tcp) => tcp,
        Err(e) => return CommandOutput::failure(format!("connessione fallita: {}", e)),
    };

    let mut session = match Session::new() {
        Ok(s) => s,
        Err(e) => return CommandOutput::failure(format!("sessione SSH fallita: {}", e)),
    };
    session.set_tcp_stream(tcp);
    if let Err(e) = session.handshake() {
        return CommandOutput::failure(format!("handshake fallito: {}", e));
    }
    if let Err(e) = session.userauth_password(user, password) {
        return CommandOutput::failure(format!("autenticazione fallita: {}", e));
    }

    let mut channel = match session.channel_session() {
        Ok(c) => c,
        Err(e) => return CommandOutput::failure(format!("canale fallito: {}", e)),
    };
    if let Err(e) = channel.exec(command) {
        return CommandOutput::failure(format!("esecuzione fallita: {}", e));
    }

    let mut output = String::new();
    let mut error = String::new();
    if let Err(e) = channel.read_to_string(&mut output) {
        return CommandOutput::failure(format!("lettura stdout fallita: {}", e));
    }
    if let Err(e) = channel.stderr().read_to_string(&mut error) {
        return CommandOutput::failure(format!("lettura stderr fallita: {}", e));
    }
    let _ = channel.wait_close();

    CommandOutput { output, error }
}

/// Async wrapper so CLI callers do not block the runtime on the TCP session
pub async fn run_command_async(
    host: String,
    user: String,
    password: String,
    command: String,
) -> CommandOutput {
    match tokio::task::spawn_blocking(move || run_command(&host, &user, &password, &command)).await
    {
        Ok(output) => output,
        Err(e) => CommandOutput::failure(format!("task SSH interrotto: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_host_reports_error() {
        // Port 1 is closed on loopback in any sane environment
        let result = run_command("127.0.0.1:1", "user", "pw", "ls");
        assert!(result.output.is_empty());
        assert!(!result.error.is_empty());
    }

    #[test]
    fn test_unresolvable_host_reports_error() {
        let result = run_command("host.invalid.local.test:99", "user", "pw", "ls");
        assert!(result.output.is_empty());
        assert!(!result.error.is_empty());
    }

    #[test]
    fn test_empty_fields_skipped_in_json() {
        let result = CommandOutput::failure("boom");
        let encoded = serde_json::to_string(&result).unwrap();
        assert!(!encoded.contains("output"));
        assert!(encoded.contains("boom"));
    }
}
