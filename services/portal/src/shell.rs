//! services/portal/src/shell.rs
//!
//! A line-oriented renderer for the portal. It holds one tab's session and
//! turns simple commands into navigations, logins and admin actions.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::admin::{format_timestamp, AdminView, AuthState, FeedState, LogState};
use crate::error::PortalError;
use crate::portal::{Page, Portal};

const HELP: &str = "\
Commands:
  go <path>         navigate (/, /host, /team, /resources, /project, /admin)
  login <name>      submit the login form
  password <pw>     submit the admin password
  refresh           re-fetch the visitor log
  clear             clear the visitor log
  notifications     show recent visitors
  whoami            show the session username
  help              show this text
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Login(String),
    Password(String),
    Refresh,
    Clear,
    Notifications,
    WhoAmI,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, String> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let command = match word.to_ascii_lowercase().as_str() {
            "go" | "goto" if !rest.is_empty() => Command::Go(rest.to_string()),
            "go" | "goto" => return Err("usage: go <path>".to_string()),
            "login" => Command::Login(rest.to_string()),
            "password" | "pw" => Command::Password(rest.to_string()),
            "refresh" | "retry" => Command::Refresh,
            "clear" => Command::Clear,
            "notifications" | "feed" => Command::Notifications,
            "whoami" => Command::WhoAmI,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => return Err(format!("unknown command '{}' (try `help`)", other)),
        };
        Ok(command)
    }
}

//=========================================================================================
// Rendering
//=========================================================================================

pub fn render_page(page: &Page, username: Option<&str>) -> String {
    let mut out = format!("== {} ({}) ==\n", page.route().title(), page.route().path());
    match page {
        Page::Login(login) => {
            out.push_str("Enter a username with `login <name>`.\n");
            if let Some(error) = login.error() {
                out.push_str(&format!("! {}\n", error));
            }
        }
        Page::Info(_) => {
            out.push_str(&format!("Welcome, {}.\n", username.unwrap_or("visitor")));
        }
        Page::Admin(view) => out.push_str(&render_admin(view)),
    }
    out
}

fn render_admin(view: &AdminView) -> String {
    let controller = view.controller();
    let mut out = String::new();

    match controller.auth_state() {
        AuthState::Authenticated => out.push_str("Access granted.\n"),
        AuthState::Authenticating => out.push_str("Checking password...\n"),
        AuthState::Unauthenticated => out.push_str("Enter the admin password with `password <pw>`.\n"),
    }
    if let Some(error) = controller.auth_error() {
        out.push_str(&format!("! {}\n", error));
    }

    match controller.log_state() {
        LogState::NotRequested => {}
        LogState::Loading => out.push_str("Loading visitor log...\n"),
        LogState::Failed(message) => {
            out.push_str(&format!("! {} (type `retry`)\n", message));
        }
        LogState::Empty => out.push_str("NO VISITOR RECORDS FOUND\n"),
        LogState::Loaded(rows) => {
            out.push_str(&format!("Visitor log ({} entries):\n", rows.len()));
            for row in rows {
                out.push_str(&format!("  #{:<3} {:<24} {}\n", row.badge, row.username, row.display_time));
            }
        }
    }
    if let Some(error) = controller.clear_error() {
        out.push_str(&format!("! {} (type `clear` to retry)\n", error));
    }

    out.push_str(&render_notifications(view));
    out
}

fn render_notifications(view: &AdminView) -> String {
    match view.feed_state() {
        FeedState::Loading => "Recent visitors: loading...\n".to_string(),
        FeedState::Ready(entries) if entries.is_empty() => "Recent visitors: none\n".to_string(),
        FeedState::Ready(entries) => {
            let mut out = String::from("Recent visitors:\n");
            for entry in entries {
                out.push_str(&format!("  {:<24} {}\n", entry.username, format_timestamp(entry.timestamp)));
            }
            out
        }
    }
}

//=========================================================================================
// Command Loop
//=========================================================================================

async fn say<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> std::io::Result<()> {
    output.write_all(text.as_bytes()).await?;
    if !text.ends_with('\n') {
        output.write_all(b"\n").await?;
    }
    output.flush().await
}

async fn leave(page: Option<Page>) {
    if let Some(Page::Admin(view)) = page {
        view.unmount().await;
    }
}

/// Runs the shell until `quit` or end of input. Starts on the login route.
pub async fn run_shell<R, W>(portal: Portal, input: R, mut output: W) -> Result<(), PortalError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut page = Some(portal.navigate("/").page);
    if let Some(current) = &page {
        say(&mut output, &render_page(current, None)).await?;
    }

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                say(&mut output, &message).await?;
                continue;
            }
        };
        debug!("Shell command: {:?}", command);

        match command {
            Command::Quit => break,
            Command::Help => say(&mut output, HELP).await?,
            Command::WhoAmI => {
                let name = portal.header_username();
                say(&mut output, name.as_deref().unwrap_or("(not logged in)")).await?;
            }
            Command::Go(location) => {
                leave(page.take()).await;
                let navigation = portal.navigate(&location);
                if navigation.was_redirected() {
                    say(&mut output, &format!("-> redirected to {}", navigation.landed().path())).await?;
                }
                page = Some(navigation.page);
            }
            Command::Login(name) => {
                // Recording continues in the background; navigation does not wait.
                let destination = match page.as_mut() {
                    Some(Page::Login(login)) => {
                        login.on_input(&name);
                        login.submit().ok().map(|submission| submission.destination)
                    }
                    _ => {
                        say(&mut output, "go to / to log in").await?;
                        None
                    }
                };
                if let Some(destination) = destination {
                    page = Some(portal.enter(destination));
                }
            }
            Command::Password(candidate) => match &page {
                Some(Page::Admin(view)) => {
                    view.controller().on_password_input();
                    // The outcome is rendered from the controller state below.
                    let _ = view.controller().submit_password(&candidate).await;
                }
                _ => say(&mut output, "go to /admin first").await?,
            },
            Command::Refresh => match &page {
                Some(Page::Admin(view)) => {
                    let _ = view.controller().refresh().await;
                }
                _ => say(&mut output, "nothing to refresh here").await?,
            },
            Command::Clear => match &page {
                Some(Page::Admin(view)) => {
                    if !view.controller().clear_enabled() {
                        say(&mut output, "nothing to clear").await?;
                    }
                    let _ = view.controller().clear_log().await;
                }
                _ => say(&mut output, "go to /admin first").await?,
            },
            Command::Notifications => match &page {
                Some(Page::Admin(view)) => say(&mut output, &render_notifications(view)).await?,
                _ => say(&mut output, "notifications are shown on /admin").await?,
            },
        }

        if let Some(current) = &page {
            let name = portal.header_username();
            say(&mut output, &render_page(current, name.as_deref())).await?;
        }
    }

    leave(page.take()).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portal::PortalSettings;
    use crate::session::SessionContext;
    use crate::test_support::{entries, ScriptedDirectory};
    use std::sync::Arc;

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("go /admin"), Ok(Command::Go("/admin".to_string())));
        assert_eq!(Command::parse("  LOGIN  Alice Smith "), Ok(Command::Login("Alice Smith".to_string())));
        assert_eq!(Command::parse("login"), Ok(Command::Login(String::new())));
        assert_eq!(Command::parse("retry"), Ok(Command::Refresh));
        assert!(Command::parse("go").is_err());
        assert!(Command::parse("dance").is_err());
    }

    async fn run(directory: Arc<ScriptedDirectory>, script: &str) -> String {
        let portal = Portal::new(SessionContext::in_memory(), directory, PortalSettings::default());
        let mut output = Vec::new();
        run_shell(portal, script.as_bytes(), &mut output).await.unwrap();
        String::from_utf8(output).unwrap()
    }

    #[tokio::test]
    async fn login_then_protected_page() {
        let output = run(Arc::new(ScriptedDirectory::default()), "login\nlogin alice\nwhoami\n").await;
        assert!(output.contains("Please enter your username to continue."));
        assert!(output.contains("== Host Details (/host) =="));
        assert!(output.contains("Welcome, alice."));
    }

    #[tokio::test]
    async fn admin_session_shows_log_and_feed() {
        let directory = Arc::new(ScriptedDirectory::with_entries(entries(2)));
        let output = run(
            directory,
            "go /admin\npassword nope\npassword CUTOUT\nquit\n",
        )
        .await;
        assert!(output.contains("Incorrect password. Access denied."));
        assert!(output.contains("Access granted."));
        assert!(output.contains("#2"));
        assert!(output.contains("visitor-2"));
    }

    #[tokio::test]
    async fn fresh_tab_cannot_skip_to_host() {
        let output = run(Arc::new(ScriptedDirectory::default()), "go /host\n").await;
        assert!(output.contains("-> redirected to /"));
    }
}
