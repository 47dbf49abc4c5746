use std::path::Path;
use std::process::ExitCode;

use bulletin::prelude::*;

const USAGE: &str = "\
usage: board-cli <command> [args]

  signup <email> <name> <password>
  login <email> <password>
  logout
  whoami
  list [page] [size]
  categories
  show <id>
  create <category> <title> <content> [file]
  edit <id> <category> <title> <content> [file]
  delete <id>

Configuration comes from BULLETIN_API_BASE_URL, BULLETIN_STORAGE_DIR,
BULLETIN_STORAGE_KEY and BULLETIN_TIMEOUT_SECS.";

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Signup { email: String, name: String, password: String },
    Login { email: String, password: String },
    Logout,
    WhoAmI,
    List { page: u32, size: u32 },
    Categories,
    Show(BoardId),
    Create { category: BoardCategory, title: String, content: String, file: Option<String> },
    Edit { id: BoardId, category: BoardCategory, title: String, content: String, file: Option<String> },
    Delete(BoardId),
}

/// Commands that need a logged-in session before they run.
fn requires_login(command: &Command) -> bool {
    matches!(
        command,
        Command::Create { .. } | Command::Edit { .. } | Command::Delete(_)
    )
}

fn parse_command(args: &[String]) -> Result<Command, String> {
    let arg = |i: usize, what: &str| {
        args.get(i).cloned().ok_or_else(|| format!("missing {what}"))
    };
    let id = |i: usize| -> Result<BoardId, String> {
        let raw = arg(i, "post id")?;
        raw.parse().map(BoardId).map_err(|_| format!("not a post id: {raw}"))
    };
    let category = |i: usize| -> Result<BoardCategory, String> {
        arg(i, "category")?.parse().map_err(|e: bulletin::protocol::ProtocolError| e.to_string())
    };
    let number = |i: usize, default: u32| -> Result<u32, String> {
        match args.get(i) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|_| format!("not a number: {raw}")),
        }
    };

    let Some(name) = args.first() else {
        return Err("missing command".into());
    };
    let command = match name.as_str() {
        "signup" => Command::Signup {
            email: arg(1, "email")?,
            name: arg(2, "name")?,
            password: arg(3, "password")?,
        },
        "login" => Command::Login { email: arg(1, "email")?, password: arg(2, "password")? },
        "logout" => Command::Logout,
        "whoami" => Command::WhoAmI,
        "list" => Command::List { page: number(1, 0)?, size: number(2, DEFAULT_PAGE_SIZE)? },
        "categories" => Command::Categories,
        "show" => Command::Show(id(1)?),
        "create" => Command::Create {
            category: category(1)?,
            title: arg(2, "title")?,
            content: arg(3, "content")?,
            file: args.get(4).cloned(),
        },
        "edit" => Command::Edit {
            id: id(1)?,
            category: category(2)?,
            title: arg(3, "title")?,
            content: arg(4, "content")?,
            file: args.get(5).cloned(),
        },
        "delete" => Command::Delete(id(1)?),
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(command)
}

// ---------------------------------------------------------------------------
// Running
// ---------------------------------------------------------------------------

fn draft(
    category: BoardCategory,
    title: String,
    content: String,
    file: Option<String>,
) -> Result<BoardDraft, String> {
    let draft = BoardDraft::new(title, content, category);
    let Some(path) = file else {
        return Ok(draft);
    };
    let data = std::fs::read(&path).map_err(|e| format!("cannot read {path}: {e}"))?;
    let file_name = Path::new(&path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.clone());
    Ok(draft.with_attachment(Attachment {
        content_type: content_type_for(&file_name).to_string(),
        file_name,
        data,
    }))
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "application/octet-stream",
    }
}

fn print_board(board: &Board) {
    println!("#{} [{}] {}", board.id, board.board_category, board.title);
    println!("posted {}", board.created_at);
    if let Some(url) = &board.image_url {
        println!("image {url}");
    }
    println!();
    println!("{}", board.content);
}

async fn run<N: Navigator>(
    client: &BulletinClient<bulletin::transport::ReqwestTransport, N>,
    command: Command,
) -> Result<Option<Notice>, ClientError> {
    match command {
        Command::Signup { email, name, password } => {
            client
                .signup(&SignupRequest {
                    username: email,
                    name,
                    confirm_password: password.clone(),
                    password,
                })
                .await?;
            Ok(Some(Notice::success("Account created. You can log in now.")))
        }
        Command::Login { email, password } => {
            let identity = client
                .login(&LoginRequest { username: email, password })
                .await?;
            Ok(Some(Notice::success(format!("Welcome, {}.", identity.name))))
        }
        Command::Logout => {
            client.logout();
            Ok(Some(Notice::success("Logged out.")))
        }
        Command::WhoAmI => {
            match client.session().user() {
                Some(user) => println!("{} <{}>", user.name, user.username),
                None if client.session().is_authenticated() => println!("(logged in)"),
                None => println!("not logged in"),
            }
            Ok(None)
        }
        Command::List { page, size } => {
            let page = client.list_boards(page, size).await?;
            for board in &page.content {
                println!(
                    "{:>6}  {:<6}  {}  {}",
                    board.id.0,
                    board.category.as_str(),
                    board.created_at,
                    board.title
                );
            }
            println!(
                "page {} of {} ({} posts)",
                page.number + 1,
                page.total_pages.max(1),
                page.total_elements
            );
            Ok(None)
        }
        Command::Categories => {
            for (key, label) in client.categories().await? {
                println!("{key:<8} {label}");
            }
            Ok(None)
        }
        Command::Show(id) => {
            print_board(&client.board(id).await?);
            Ok(None)
        }
        Command::Create { category, title, content, file } => {
            let draft = match draft(category, title, content, file) {
                Ok(draft) => draft,
                Err(message) => return Ok(Some(Notice::error(message))),
            };
            let board = client.create_board(&draft).await?;
            Ok(Some(Notice::success(format!("Created post #{}.", board.id))))
        }
        Command::Edit { id, category, title, content, file } => {
            let draft = match draft(category, title, content, file) {
                Ok(draft) => draft,
                Err(message) => return Ok(Some(Notice::error(message))),
            };
            client.update_board(id, &draft).await?;
            Ok(Some(Notice::success(format!("Updated post #{id}."))))
        }
        Command::Delete(id) => {
            client.delete_board(id).await?;
            Ok(Some(Notice::success(format!("Deleted post #{id}."))))
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_command(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{e}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(2);
        }
    };
    let client = match BulletinClient::builder()
        .config(config)
        .navigator(|| eprintln!("Your session has ended. Run `board-cli login` again."))
        .build()
    {
        Ok(client) => client,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    if requires_login(&command)
        && RouteGuard::Private.check(client.session()) != GuardOutcome::Allow
    {
        eprintln!("Please log in first.");
        return ExitCode::FAILURE;
    }

    match run(&client, command).await {
        Ok(Some(notice)) if notice.level == NoticeLevel::Error => {
            eprintln!("{notice}");
            ExitCode::FAILURE
        }
        Ok(Some(notice)) => {
            println!("{notice}");
            ExitCode::SUCCESS
        }
        Ok(None) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}", e.notice());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_parse_command_list_defaults() {
        assert_eq!(
            parse_command(&args("list")).unwrap(),
            Command::List { page: 0, size: DEFAULT_PAGE_SIZE }
        );
        assert_eq!(
            parse_command(&args("list 3 5")).unwrap(),
            Command::List { page: 3, size: 5 }
        );
    }

    #[test]
    fn test_parse_command_create_with_category() {
        let command = parse_command(&args("create qna Title Body pic.png")).unwrap();
        assert_eq!(
            command,
            Command::Create {
                category: BoardCategory::Qna,
                title: "Title".into(),
                content: "Body".into(),
                file: Some("pic.png".into()),
            }
        );
        assert!(requires_login(&command));
    }

    #[test]
    fn test_parse_command_rejects_bad_input() {
        assert!(parse_command(&[]).is_err());
        assert!(parse_command(&args("frobnicate")).is_err());
        assert!(parse_command(&args("show seven")).is_err());
        assert!(parse_command(&args("create MEME t c")).is_err());
        assert!(parse_command(&args("login only@email.com")).is_err());
    }

    #[test]
    fn test_content_type_for_known_extensions() {
        assert_eq!(content_type_for("a.PNG"), "image/png");
        assert_eq!(content_type_for("b.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("notes"), "application/octet-stream");
    }
}
