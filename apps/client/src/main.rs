use anyhow::Context;
use chitchat_chats::{Chat, User};
use chitchat_config::load as load_config;
use chitchat_runtime::{shutdown_signal, telemetry, ClientServices, ClientSession};
use chitchat_session::{AuthToken, Completion, SessionEvent, SessionUser};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::info;

#[derive(Parser)]
#[command(name = "chitchat")]
#[command(about = "Chitchat client (console by default)")]
struct Cli {
    #[command(flatten)]
    identity: Identity,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct Identity {
    /// Id of the signed-in user
    #[arg(long, env = "CHITCHAT_USER_ID")]
    user_id: String,

    /// Token issued by the backend at sign-in
    #[arg(long, env = "CHITCHAT_TOKEN", hide_env_values = true)]
    token: String,

    /// Display name of the signed-in user
    #[arg(long, env = "CHITCHAT_USER_NAME")]
    name: Option<String>,
}

impl Identity {
    fn into_session_user(self) -> SessionUser {
        let name = self.name.unwrap_or_else(|| self.user_id.clone());
        SessionUser::new(User::new(self.user_id, name), AuthToken::new(self.token))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List your chats
    Chats,
    /// Search for users
    Search { query: String },
    /// Search for users and open the chat with one of them
    Start {
        query: String,
        #[arg(long)]
        pick: String,
    },
    /// Start interactive console (default)
    Console,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;

    let config = load_config().context("failed to load configuration")?;
    let services =
        ClientServices::initialise(&config).context("failed to initialise client services")?;
    let session = services
        .start_session(cli.identity.into_session_user())
        .await?;

    match cli.command.unwrap_or(Commands::Console) {
        Commands::Chats => {
            print_chats(&session);
            session.end();
            Ok(())
        }
        Commands::Search { query } => run_search(session, &query).await,
        Commands::Start { query, pick } => run_start(session, &query, &pick).await,
        Commands::Console => run_console(session).await,
    }
}

async fn run_search(mut session: ClientSession, query: &str) -> anyhow::Result<()> {
    if let Completion::Applied(users) = session.search(query).await? {
        print_users(&users);
    }
    session.end();
    Ok(())
}

async fn run_start(mut session: ClientSession, query: &str, pick: &str) -> anyhow::Result<()> {
    session.search(query).await?;

    if let Completion::Applied(chat) = session
        .open_chat(pick)
        .await
        .with_context(|| format!("failed to open chat with {pick}"))?
    {
        println!("Opened chat {}", describe_chat(&session, &chat));
    }

    session.end();
    Ok(())
}

async fn run_console(mut session: ClientSession) -> anyhow::Result<()> {
    info!(user_id = %session.session().id(), "starting interactive console");

    let mut events = session.subscribe();

    println!("Chitchat Interactive Console");
    println!("Type commands like '/search <name>', '/open <user-id>', '/chats', '/help', '/quit'");
    println!("Use Ctrl+C or '/quit' to exit");
    println!("---");
    print_chats(&session);

    let stdin = tokio::io::stdin();
    let mut reader = BufReader::new(stdin);
    let mut line = String::new();

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        print!("> ");
        std::io::Write::flush(&mut std::io::stdout())?;

        line.clear();
        let bytes_read = tokio::select! {
            read = reader.read_line(&mut line) => read?,
            _ = &mut shutdown => {
                println!();
                break;
            }
        };
        if bytes_read == 0 {
            break; // EOF
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let (command, argument) = input
            .split_once(char::is_whitespace)
            .map(|(command, argument)| (command, argument.trim()))
            .unwrap_or((input, ""));

        match command {
            "/quit" | "/exit" | "/q" => {
                println!("Goodbye!");
                break;
            }
            "/help" | "/h" => print_help(),
            "/search" | "/s" => match session.search(argument).await {
                Ok(Completion::Applied(users)) => print_users(&users),
                Ok(Completion::Superseded) => {}
                Err(error) => println!("Search failed: {error}"),
            },
            "/open" | "/o" => match session.open_chat(argument).await {
                Ok(Completion::Applied(chat)) => {
                    println!("Opened chat {}", describe_chat(&session, &chat))
                }
                Ok(Completion::Superseded) => {}
                Err(error) => println!("Could not open chat: {error}"),
            },
            "/chats" | "/c" => print_chats(&session),
            "/select" => match session.select_chat(argument) {
                Ok(chat) => println!("Selected chat {}", chat.id),
                Err(error) => println!("Could not select chat: {error}"),
            },
            "/close" => {
                session.close_search();
                println!("Search closed");
            }
            "/send" => match selected_chat(&session) {
                Some(chat_id) => match session.send_message(&chat_id, argument) {
                    Ok(message) => println!("Sent {}", message.id),
                    Err(error) => println!("Could not send message: {error}"),
                },
                None => println!("No chat selected"),
            },
            "/messages" | "/m" => {
                let chat_id = if argument.is_empty() {
                    selected_chat(&session)
                } else {
                    Some(argument.to_string())
                };
                match chat_id {
                    Some(chat_id) => print_messages(&session, &chat_id),
                    None => println!("No chat selected"),
                }
            }
            "/read" => match selected_chat(&session) {
                Some(chat_id) => match session.mark_read(&chat_id, argument) {
                    Ok(true) => println!("Marked {argument} as read"),
                    Ok(false) => println!("{argument} was already read"),
                    Err(error) => println!("Could not mark message: {error}"),
                },
                None => println!("No chat selected"),
            },
            _ => {
                println!("Unknown command: {}", command);
                println!("Type '/help' for available commands");
            }
        }

        print_notices(&mut events);
    }

    session.end();
    Ok(())
}

fn print_help() {
    println!("Available commands:");
    println!("  /search, /s <text>    - Search users by name or email");
    println!("  /open, /o <user-id>   - Open the chat with a user from the results");
    println!("  /close                - Close the search results");
    println!("  /chats, /c            - List your chats");
    println!("  /select <chat-id>     - Select a chat");
    println!("  /send <text>          - Send a message to the selected chat");
    println!("  /messages, /m [id]    - Show messages of the selected (or given) chat");
    println!("  /read <message-id>    - Mark a message of the selected chat as read");
    println!("  /help, /h             - Show this help");
    println!("  /quit, /exit, /q      - Exit console");
}

fn print_notices(events: &mut broadcast::Receiver<SessionEvent>) {
    loop {
        match events.try_recv() {
            Ok(SessionEvent::Notice(notice)) => println!("[{:?}] {notice}", notice.level),
            Ok(_) => {}
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
}

fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found");
        return;
    }

    println!("Users:");
    for user in users {
        match &user.email {
            Some(email) => println!("  {}: {} <{}>", user.id, user.name, email),
            None => println!("  {}: {}", user.id, user.name),
        }
    }
}

fn print_chats(session: &ClientSession) {
    let chats = session.registry().chats();
    if chats.is_empty() {
        println!("No chats found");
        return;
    }

    println!("Chats:");
    for chat in chats {
        let marker = if session.registry().current_selection().map(|c| &c.id) == Some(&chat.id) {
            "*"
        } else {
            " "
        };
        let unread = session.unread_count(&chat.id);
        if unread > 0 {
            println!("{marker} {} ({unread} unread)", describe_chat(session, chat));
        } else {
            println!("{marker} {}", describe_chat(session, chat));
        }
    }
}

fn print_messages(session: &ClientSession, chat_id: &str) {
    match session.messages(chat_id) {
        Ok([]) => println!("No messages yet"),
        Ok(messages) => {
            for message in messages {
                let read = if message.read_by.is_some() { " (read)" } else { "" };
                println!(
                    "  [{}] {}: {}{}",
                    message.created_at.format("%H:%M"),
                    message.sender,
                    message.content,
                    read
                );
            }
        }
        Err(error) => println!("Could not load messages: {error}"),
    }
}

fn selected_chat(session: &ClientSession) -> Option<String> {
    session
        .registry()
        .current_selection()
        .map(|chat| chat.id.clone())
}

fn describe_chat(session: &ClientSession, chat: &Chat) -> String {
    match (&chat.title, chat.counterpart(session.session().id())) {
        (Some(title), _) if chat.is_group => format!("{}: {}", chat.id, title),
        (_, Some(other)) => format!("{}: with {}", chat.id, other),
        _ => chat.id.clone(),
    }
}
