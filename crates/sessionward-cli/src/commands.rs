use std::io::{self, BufRead, Write};

use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use sessionward_core::{NavigationOutcome, Navigator, SessionApp, ToastQueue, UserProfile};

pub const USAGE: &str = "\
Usage: sessionward <command>

Commands:
  status                                   Show whether a session is active
  login [--remember] [--token T] [--profile JSON]
                                           Store a session from an external login
  whoami                                   Show the signed-in user
  get <path>                               GET an API path with the session credential
  visit <path>                             Navigate to a route through the guard
  logout                                   End the session
  shell                                    Run commands from stdin in one session
  help                                     Show this message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Status,
    Login {
        token: Option<String>,
        profile: Option<String>,
        remember: bool,
    },
    Whoami,
    Get(String),
    Visit(String),
    Logout,
    Shell,
    Help,
}

impl Command {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        let mut args = args.iter().map(AsRef::<str>::as_ref);
        let command = match args.next() {
            None | Some("help") | Some("--help") | Some("-h") => Command::Help,
            Some("status") => Command::Status,
            Some("whoami") => Command::Whoami,
            Some("logout") => Command::Logout,
            Some("shell") => Command::Shell,
            Some("get") => Command::Get(
                args.next()
                    .ok_or_else(|| anyhow!("get requires a path"))?
                    .to_string(),
            ),
            Some("visit") => Command::Visit(
                args.next()
                    .ok_or_else(|| anyhow!("visit requires a path"))?
                    .to_string(),
            ),
            Some("login") => {
                let mut token = None;
                let mut profile = None;
                let mut remember = false;
                while let Some(arg) = args.next() {
                    match arg {
                        "--remember" => remember = true,
                        "--token" => {
                            token = Some(
                                args.next()
                                    .ok_or_else(|| anyhow!("--token requires a value"))?
                                    .to_string(),
                            )
                        }
                        "--profile" => {
                            profile = Some(
                                args.next()
                                    .ok_or_else(|| anyhow!("--profile requires a value"))?
                                    .to_string(),
                            )
                        }
                        other => bail!("Unknown login option: {}", other),
                    }
                }
                return Ok(Command::Login {
                    token,
                    profile,
                    remember,
                });
            }
            Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
        };

        if let Some(extra) = args.next() {
            bail!("Unexpected argument: {}", extra);
        }
        Ok(command)
    }
}

pub async fn run(app: &SessionApp, toasts: &ToastQueue, command: Command) -> Result<()> {
    let result = execute(app, command).await;
    for toast in toasts.drain() {
        println!("[{}] {}", toast.kind.label(), toast.message);
    }
    result
}

async fn execute(app: &SessionApp, command: Command) -> Result<()> {
    match command {
        Command::Help => println!("{}", USAGE),
        Command::Shell => println!("Already in a shell"),
        Command::Status => {
            if app.auth.is_authenticated() {
                println!("Signed in");
            } else {
                println!("Signed out");
            }
        }
        Command::Whoami => match app.auth.get_user() {
            Some(user) => println!("{}", describe_user(&user)),
            None => println!("No user profile stored"),
        },
        Command::Login {
            token,
            profile,
            remember,
        } => {
            let token = match token {
                Some(token) => token,
                None => rpassword::prompt_password("Token: ").context("Failed to read token")?,
            };
            let token = token.trim();
            if token.is_empty() {
                bail!("Token must not be empty");
            }
            let profile: Value = match profile {
                Some(raw) => serde_json::from_str(&raw).context("Profile is not valid JSON")?,
                None => Value::Object(Default::default()),
            };

            app.auth
                .login(token, &UserProfile::new(profile), remember)
                .context("Failed to store session")?;
            println!(
                "Signed in ({})",
                if remember { "remembered" } else { "this session only" }
            );
            print_location(app);
        }
        Command::Get(path) => {
            let result: Result<Value, _> = app.client.get(&path).await;
            match result {
                Ok(body) => println!("{}", serde_json::to_string_pretty(&body)?),
                Err(e) if e.is_unauthorized() => {
                    print_location(app);
                    return Err(e).context("Session expired, please log in again");
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Visit(path) => {
            match app.router.navigate(&path)? {
                NavigationOutcome::Navigated { to, redirected: true } => {
                    println!("Redirected to {}", to)
                }
                NavigationOutcome::Navigated { to, .. } => println!("At {}", to),
                NavigationOutcome::Unchanged(to) => println!("Already at {}", to),
            }
        }
        Command::Logout => {
            app.auth.logout().await;
            print_location(app);
        }
    }
    Ok(())
}

/// Read commands from stdin until EOF or `exit`
pub async fn shell(app: &SessionApp, toasts: &ToastQueue) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        print!("sessionward> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.first() {
            None => continue,
            Some(&"exit") | Some(&"quit") => break,
            Some(_) => {}
        }

        let outcome = match Command::parse(&words) {
            Ok(command) => run(app, toasts, command).await,
            Err(e) => Err(e),
        };
        if let Err(e) = outcome {
            eprintln!("Error: {:#}", e);
        }
    }
    Ok(())
}

fn print_location(app: &SessionApp) {
    if let Some(location) = app.router.current() {
        println!("Now at {}", location);
    }
}

fn describe_user(user: &UserProfile) -> String {
    match (user.display_name(), user.field("email")) {
        (Some(name), Some(email)) if name != email => format!("{} <{}>", name, email),
        (Some(name), _) => name.to_string(),
        _ => user.as_value().to_string(),
    }
}
