//! # Console
//!
//! Line-driven front end for several sessions on one hub. Each line names
//! the session it speaks for, so two "tabs" can be driven from one stdin:
//!
//! ```text
//! a login alice
//! a buy pet_egg_basic
//! a join r1
//! b login bob
//! b join r1
//! a say hello
//! b poll
//! b report - alice she said badword
//! ```
//!
//! `-` stands for a blank field in `report <type> <target> <reason...>`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use gamehub_shared::Item;

use crate::error::HubError;
use crate::hub::GameHub;
use crate::session::{ClientSession, Profile};

/// Placeholder for a blank report field.
const BLANK_FIELD: &str = "-";

/// Help text for the console.
pub const HELP: &str = "\
usage: <session> <command> [args]
  login <name>                    set profile (blank = guest)
  profile                         balance, inventory, receipts
  grant                           add the grant amount
  buy <item_id>                   purchase one unit
  join [room]                     join a room (blank = default)
  leave                           leave the current room
  say <text...>                   send a chat line
  poll                            show new room events
  log                             show the whole chat log
  report <type> <target> <why...> file a report (- = blank)
  catalog                         list items and supply
  reports                         list reports, newest first
  stats                           room delivery counters
  help                            this text
  quit                            exit";

/// One parsed console command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `login <name>`
    Login(String),
    /// `profile`
    Profile,
    /// `grant`
    Grant,
    /// `buy <item_id>`
    Buy(String),
    /// `join [room]`
    Join(String),
    /// `leave`
    Leave,
    /// `say <text...>`
    Say(String),
    /// `poll`
    Poll,
    /// `log`
    Log,
    /// `report <type> <target> <reason...>`
    Report {
        /// Category, `None` when blank.
        report_type: Option<String>,
        /// Target, `None` when blank.
        target_id: Option<String>,
        /// Raw reason.
        reason: String,
    },
    /// `catalog`
    Catalog,
    /// `reports`
    Reports,
    /// `stats`
    Stats,
    /// `help`
    Help,
    /// `quit`
    Quit,
}

/// A console line: which session, and what to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleLine {
    /// Session label.
    pub session: String,
    /// Command to run.
    pub command: Command,
}

/// Parses one input line. Returns `None` for blank lines and `#` comments.
///
/// # Errors
///
/// Returns a message for unknown commands or missing arguments.
pub fn parse_line(line: &str) -> Result<Option<ConsoleLine>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (session, rest) = split_word(line);
    if matches!(session, "help" | "quit" | "exit") {
        let command = if session == "help" { Command::Help } else { Command::Quit };
        return Ok(Some(ConsoleLine {
            session: String::new(),
            command,
        }));
    }

    let (verb, args) = split_word(rest);
    let command = match verb {
        "login" => Command::Login(args.to_string()),
        "profile" => Command::Profile,
        "grant" => Command::Grant,
        "buy" => {
            if args.is_empty() {
                return Err("usage: buy <item_id>".to_string());
            }
            Command::Buy(args.to_string())
        }
        "join" => Command::Join(args.to_string()),
        "leave" => Command::Leave,
        "say" => Command::Say(args.to_string()),
        "poll" => Command::Poll,
        "log" => Command::Log,
        "report" => parse_report(args)?,
        "catalog" => Command::Catalog,
        "reports" => Command::Reports,
        "stats" => Command::Stats,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        "" => return Err(format!("{session}: missing command")),
        other => return Err(format!("unknown command: {other}")),
    };

    Ok(Some(ConsoleLine {
        session: session.to_string(),
        command,
    }))
}

fn split_word(text: &str) -> (&str, &str) {
    let text = text.trim_start();
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim()),
        None => (text, ""),
    }
}

fn parse_report(args: &str) -> Result<Command, String> {
    let (report_type, rest) = split_word(args);
    let (target_id, reason) = split_word(rest);
    if report_type.is_empty() || target_id.is_empty() {
        return Err("usage: report <type|-> <target|-> <reason...>".to_string());
    }

    let field = |value: &str| (value != BLANK_FIELD).then(|| value.to_string());
    Ok(Command::Report {
        report_type: field(report_type),
        target_id: field(target_id),
        reason: reason.to_string(),
    })
}

/// Sessions keyed by label, all on one hub.
pub struct Console {
    /// The hub.
    hub: GameHub,
    /// Sessions created so far.
    sessions: BTreeMap<String, ClientSession>,
    /// Username of the most recent successful login.
    last_user: Option<String>,
}

/// What the console wants the caller to do after a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Print these lines and continue.
    Output(Vec<String>),
    /// Stop reading input.
    Quit,
}

impl Console {
    /// Creates a console with no sessions.
    #[must_use]
    pub fn new(hub: GameHub) -> Self {
        Self {
            hub,
            sessions: BTreeMap::new(),
            last_user: None,
        }
    }

    /// Username of the most recent successful login, if any.
    #[must_use]
    pub fn last_user(&self) -> Option<&str> {
        self.last_user.as_deref()
    }

    /// Logs session `label` in as `username`, as if `<label> login <username>`
    /// had been typed. Used to bring back the previous run's profile.
    pub fn restore(&mut self, label: &str, username: &str) -> Outcome {
        self.execute(ConsoleLine {
            session: label.to_string(),
            command: Command::Login(username.to_string()),
        })
    }

    /// The hub behind the console.
    #[must_use]
    pub fn hub(&self) -> &GameHub {
        &self.hub
    }

    /// Parses and runs one line. Errors are rendered as output lines.
    pub fn run_line(&mut self, line: &str) -> Outcome {
        match parse_line(line) {
            Ok(None) => Outcome::Output(Vec::new()),
            Ok(Some(parsed)) => self.execute(parsed),
            Err(message) => Outcome::Output(vec![format!("error: {message}")]),
        }
    }

    /// Runs one parsed line.
    pub fn execute(&mut self, line: ConsoleLine) -> Outcome {
        let ConsoleLine { session, command } = line;
        match command {
            Command::Quit => return Outcome::Quit,
            Command::Help => return Outcome::Output(HELP.lines().map(str::to_string).collect()),
            Command::Catalog => return Outcome::Output(self.hub.catalog().iter().map(render_item).collect()),
            Command::Reports => {
                return Outcome::Output(
                    self.hub
                        .reports_newest_first()
                        .iter()
                        .map(|r| {
                            let flag = if r.flagged { " [flagged]" } else { "" };
                            format!("{} {} -> {}: {}{flag}", r.report_type, r.user_id, r.target_id, r.reason)
                        })
                        .collect(),
                )
            }
            Command::Stats => {
                let stats = self.hub.delivery_stats();
                return Outcome::Output(vec![format!(
                    "published {} delivered {} dropped {} subscribers {}",
                    stats.published, stats.delivered, stats.dropped, stats.subscribers
                )]);
            }
            _ => {}
        }

        let hub = &self.hub;
        let client = self.sessions.entry(session.clone()).or_insert_with(|| hub.session());
        let is_login = matches!(command, Command::Login(_));
        let output = match run_session_command(client, command) {
            Ok(lines) => {
                if is_login {
                    self.last_user = client.username().map(str::to_string);
                }
                lines
            }
            Err(e) => vec![format!("error: {e}")],
        };
        Outcome::Output(output.into_iter().map(|l| format!("[{session}] {l}")).collect())
    }
}

fn run_session_command(client: &mut ClientSession, command: Command) -> Result<Vec<String>, HubError> {
    let lines = match command {
        Command::Login(name) => render_profile(&client.login(&name)?),
        Command::Profile => render_profile(&client.profile()?),
        Command::Grant => vec![format!("balance {}", client.grant()?)],
        Command::Buy(item_id) => {
            let receipt = client.buy(&item_id)?;
            vec![format!("bought {} for {} (receipt {})", receipt.item_id, receipt.amount, receipt.id)]
        }
        Command::Join(room_id) => vec![format!("joined {}", client.join_room(&room_id)?)],
        Command::Leave => {
            if client.leave_room()? {
                vec!["left room".to_string()]
            } else {
                vec!["not in a room".to_string()]
            }
        }
        Command::Say(text) => vec![client.send_chat(&text)?.line],
        Command::Poll => client.poll_chat()?.iter().map(gamehub_shared::RoomEvent::render).collect(),
        Command::Log => client.chat_log()?.to_vec(),
        Command::Report {
            report_type,
            target_id,
            reason,
        } => {
            let report = client.submit_report(report_type.as_deref(), target_id.as_deref(), &reason)?;
            let flag = if report.flagged { " [flagged]" } else { "" };
            vec![format!("report {} filed{flag}", report.id)]
        }
        Command::Catalog | Command::Reports | Command::Stats | Command::Help | Command::Quit => Vec::new(),
    };
    Ok(lines)
}

fn render_item(item: &Item) -> String {
    format!("{} ({}) price {} {}", item.id, item.name, item.price, item.supply_label())
}

fn render_profile(profile: &Profile) -> Vec<String> {
    let mut header = format!("{} balance {}", profile.username, profile.balance);
    if !profile.inventory.is_empty() {
        let _ = write!(header, " inventory [{}]", profile.inventory.join(", "));
    }

    let mut lines = vec![header];
    lines.extend(
        profile
            .receipts
            .iter()
            .map(|r| format!("  receipt {} {} {} @{}", r.id, r.item_id, r.amount, r.timestamp)),
    );
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HubConfig;
    use gamehub_networking::InProcessHub;
    use gamehub_shared::MemoryStore;
    use std::sync::Arc;

    fn console() -> Console {
        let hub = GameHub::with_store(
            HubConfig::default(),
            Arc::new(MemoryStore::new()),
            Arc::new(InProcessHub::default()),
        )
        .unwrap();
        Console::new(hub)
    }

    fn output(outcome: Outcome) -> Vec<String> {
        match outcome {
            Outcome::Output(lines) => lines,
            Outcome::Quit => panic!("unexpected quit"),
        }
    }

    #[test]
    fn test_parse_basic() {
        assert_eq!(parse_line("  ").unwrap(), None);
        assert_eq!(parse_line("# note").unwrap(), None);
        assert_eq!(
            parse_line("a say hello   world").unwrap(),
            Some(ConsoleLine {
                session: "a".to_string(),
                command: Command::Say("hello   world".to_string()),
            })
        );
        assert_eq!(parse_line("a join").unwrap().unwrap().command, Command::Join(String::new()));
        assert_eq!(parse_line("quit").unwrap().unwrap().command, Command::Quit);
    }

    #[test]
    fn test_parse_report_blanks() {
        let parsed = parse_line("a report - bob he said badword").unwrap().unwrap();
        assert_eq!(
            parsed.command,
            Command::Report {
                report_type: None,
                target_id: Some("bob".to_string()),
                reason: "he said badword".to_string(),
            }
        );
        assert!(parse_line("a report chat").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_line("a dance").is_err());
        assert!(parse_line("a buy").is_err());
        assert!(parse_line("a").is_err());
    }

    #[test]
    fn test_console_flow() {
        let mut console = console();

        assert_eq!(output(console.run_line("a grant")), vec!["[a] error: set a profile first"]);
        assert_eq!(output(console.run_line("a login alice")), vec!["[a] alice balance 1000"]);
        assert!(output(console.run_line("a buy pet_egg_basic"))[0].starts_with("[a] bought pet_egg_basic for 100"));

        console.run_line("a join r1");
        console.run_line("b login bob");
        console.run_line("b join r1");
        assert_eq!(output(console.run_line("a say hi badword")), vec!["[a] alice: hi **** [filtered]"]);
        assert_eq!(
            output(console.run_line("b poll")),
            vec!["[b] [system] bob joined", "[b] alice: hi ****"]
        );

        let catalog = output(console.run_line("x catalog"));
        assert_eq!(catalog[0], "pet_egg_basic (Basic Pet Egg) price 100 minted 1/10000");

        assert_eq!(console.run_line("quit"), Outcome::Quit);
    }

    #[test]
    fn test_last_user_follows_logins() {
        let mut console = console();
        assert_eq!(console.last_user(), None);

        console.run_line("a login alice");
        console.run_line("b login");
        assert_eq!(console.last_user(), Some("guest"));

        console.run_line("a grant");
        assert_eq!(console.last_user(), Some("guest"));
    }

    #[test]
    fn test_restore_previous_profile() {
        let mut first = console();
        first.run_line("a login alice");
        first.run_line("a grant");
        let last = first.last_user().unwrap().to_string();

        let mut second = Console::new(first.hub().clone());
        assert_eq!(output(second.restore("a", &last)), vec!["[a] alice balance 1100"]);
        assert_eq!(output(second.run_line("a grant")), vec!["[a] balance 1200"]);
        assert_eq!(second.last_user(), Some("alice"));
    }
}
