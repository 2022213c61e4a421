//! Household command parser.
//!
//! Commands look like `/addexpense 12.50 rent`. The command word is
//! case-insensitive. In group chats it may carry a `@botname` suffix; commands
//! addressed to another bot are treated as plain messages.

/// Result of parsing an incoming message.
#[derive(Debug, Clone, PartialEq)]
pub enum BotInput {
    /// Plain message, not addressed to the bot.
    Message(String),
    /// Parsed command.
    Command(HouseCommand),
}

/// A parsed household command.
#[derive(Debug, Clone, PartialEq)]
pub enum HouseCommand {
    /// Set the sender's display emoji.
    SetEmoji(String),
    /// Add an item to the grocery list.
    AddGrocery(String),
    /// Show the grocery list.
    GroceryList,
    /// Record a payment made by the sender.
    AddExpense { amount: f64, description: String },
    /// Record a chore the sender takes on.
    AddChore(String),
    /// Assign a chore to another member by username.
    AssignChore { assignee: String, chore: String },
    /// Mark one of the sender's pending chores as done.
    CompleteChore(String),
    /// Show pending chores.
    ChoreList,
    /// Show every stored member preference.
    ShowUser,
    /// Show balances and settling transfers.
    Balance,
    /// Days left until rent is due.
    RentDays,
    /// Show help message.
    Help,
    /// Known command with missing or malformed arguments.
    Invalid(&'static str),
    /// Unknown command.
    Unknown(String),
}

impl HouseCommand {
    /// Get the command name.
    pub fn name(&self) -> &str {
        match self {
            HouseCommand::SetEmoji(_) => "setemoji",
            HouseCommand::AddGrocery(_) => "addgrocery",
            HouseCommand::GroceryList => "grocerylist",
            HouseCommand::AddExpense { .. } => "addexpense",
            HouseCommand::AddChore(_) => "addchore",
            HouseCommand::AssignChore { .. } => "assignchore",
            HouseCommand::CompleteChore(_) => "completechore",
            HouseCommand::ChoreList => "chorelist",
            HouseCommand::ShowUser => "showuser",
            HouseCommand::Balance => "balance",
            HouseCommand::RentDays => "rentdays",
            HouseCommand::Help => "help",
            HouseCommand::Invalid(name) => name,
            HouseCommand::Unknown(cmd) => cmd,
        }
    }
}

/// Parse a message into plain text or a command.
///
/// `bot_username` is this bot's own username. When it is known, a
/// `/cmd@name` suffix naming any other bot makes the message plain text.
pub fn parse_input(input: &str, bot_username: Option<&str>) -> BotInput {
    let trimmed = input.trim();

    let Some(without_slash) = trimmed.strip_prefix('/') else {
        return BotInput::Message(trimmed.to_string());
    };

    let (word, args) = match without_slash.find(char::is_whitespace) {
        Some(pos) => (&without_slash[..pos], without_slash[pos..].trim()),
        None => (without_slash, ""),
    };
    let (cmd, addressee) = match word.split_once('@') {
        Some((cmd, addressee)) => (cmd, Some(addressee)),
        None => (word, None),
    };
    if let (Some(addressee), Some(own)) = (addressee, bot_username) {
        if !addressee.eq_ignore_ascii_case(own.trim_start_matches('@')) {
            return BotInput::Message(trimmed.to_string());
        }
    }
    let cmd = cmd.to_lowercase();

    let command = match cmd.as_str() {
        "setemoji" => non_empty(args, "setemoji", HouseCommand::SetEmoji),
        "addgrocery" => non_empty(args, "addgrocery", HouseCommand::AddGrocery),
        "grocerylist" => HouseCommand::GroceryList,
        "addexpense" => match parse_expense_args(args) {
            Some((amount, description)) => HouseCommand::AddExpense {
                amount,
                description,
            },
            None => HouseCommand::Invalid("addexpense"),
        },
        "addchore" => non_empty(args, "addchore", HouseCommand::AddChore),
        "assignchore" => match parse_assign_args(args) {
            Some((assignee, chore)) => HouseCommand::AssignChore { assignee, chore },
            None => HouseCommand::Invalid("assignchore"),
        },
        "completechore" => non_empty(args, "completechore", HouseCommand::CompleteChore),
        "chorelist" => HouseCommand::ChoreList,
        "showuser" => HouseCommand::ShowUser,
        "balance" => HouseCommand::Balance,
        "rentdays" => HouseCommand::RentDays,
        "help" | "start" => HouseCommand::Help,
        _ => HouseCommand::Unknown(cmd),
    };

    BotInput::Command(command)
}

fn non_empty(args: &str, name: &'static str, make: fn(String) -> HouseCommand) -> HouseCommand {
    if args.is_empty() {
        HouseCommand::Invalid(name)
    } else {
        make(args.to_string())
    }
}

/// Split `addexpense` arguments into amount and description.
///
/// The amount starts at the first digit; a decimal part written with `.` or
/// `,` is included. Anything before the number is ignored.
pub fn parse_expense_args(args: &str) -> Option<(f64, String)> {
    let text = args.trim();
    let bytes = text.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;

    let digits_end = |from: usize| {
        bytes[from..]
            .iter()
            .position(|b| !b.is_ascii_digit())
            .map_or(bytes.len(), |n| from + n)
    };

    let mut end = digits_end(start);
    if end + 1 < bytes.len()
        && matches!(bytes[end], b'.' | b',')
        && bytes[end + 1].is_ascii_digit()
    {
        end = digits_end(end + 1);
    }

    let amount: f64 = text[start..end].replace(',', ".").parse().ok()?;
    Some((amount, text[end..].trim().to_string()))
}

/// Split `assignchore` arguments into username and chore text.
///
/// Expects `@username` (word characters only), one whitespace, then the
/// chore text on the same line.
pub fn parse_assign_args(args: &str) -> Option<(String, String)> {
    let is_word = |c: char| c.is_ascii_alphanumeric() || c == '_';

    for (at, _) in args.match_indices('@') {
        let rest = &args[at + 1..];
        let name_len = rest.find(|c: char| !is_word(c)).unwrap_or(rest.len());
        if name_len == 0 {
            continue;
        }
        let mut after = rest[name_len..].chars();
        if !after.next().is_some_and(char::is_whitespace) {
            continue;
        }
        let chore = after.as_str().lines().next().unwrap_or("").trim();
        if chore.is_empty() {
            continue;
        }
        return Some((rest[..name_len].to_string(), chore.to_string()));
    }
    None
}

/// Command information for help display.
pub struct CommandInfo {
    /// Command name.
    pub name: &'static str,
    /// Command syntax.
    pub syntax: &'static str,
    /// Command description.
    pub description: &'static str,
    /// Reply for missing or malformed arguments.
    pub usage: Option<&'static str>,
}

/// Get all available command information.
pub fn get_command_help() -> Vec<CommandInfo> {
    vec![
        CommandInfo {
            name: "setemoji",
            syntax: "/setemoji <emoji>",
            description: "Set the emoji shown next to your name",
            usage: Some("Please enter the emoji in the format: /setemoji <emoji>"),
        },
        CommandInfo {
            name: "addgrocery",
            syntax: "/addgrocery <item name>",
            description: "Add an item to the grocery list",
            usage: Some("Please enter the grocery item in the format: /addgrocery <item name>"),
        },
        CommandInfo {
            name: "grocerylist",
            syntax: "/grocerylist",
            description: "Show the grocery list",
            usage: None,
        },
        CommandInfo {
            name: "addexpense",
            syntax: "/addexpense <amount> <description>",
            description: "Record something you paid for the household",
            usage: Some(
                "Please enter the expense in the format: /addexpense <amount> <description>",
            ),
        },
        CommandInfo {
            name: "addchore",
            syntax: "/addchore <chore description>",
            description: "Record a chore you will do",
            usage: Some("Please enter the chore in the format: /addchore <chore description>"),
        },
        CommandInfo {
            name: "assignchore",
            syntax: "/assignchore @username <chore description>",
            description: "Assign a chore to someone else",
            usage: Some(
                "Please enter the chore assignment in the format: /assignchore @username <chore description>",
            ),
        },
        CommandInfo {
            name: "completechore",
            syntax: "/completechore <chore description>",
            description: "Mark one of your chores as done",
            usage: Some("Please specify the chore description to complete."),
        },
        CommandInfo {
            name: "chorelist",
            syntax: "/chorelist",
            description: "Show pending chores",
            usage: None,
        },
        CommandInfo {
            name: "showuser",
            syntax: "/showuser",
            description: "Show everyone's emoji",
            usage: None,
        },
        CommandInfo {
            name: "balance",
            syntax: "/balance",
            description: "Show balances and who owes whom",
            usage: None,
        },
        CommandInfo {
            name: "rentdays",
            syntax: "/rentdays",
            description: "Days left until rent is due",
            usage: None,
        },
        CommandInfo {
            name: "help",
            syntax: "/help",
            description: "Show this help",
            usage: None,
        },
    ]
}

/// Usage hint for a command, falling back to the help pointer.
pub fn usage_for(name: &str) -> String {
    get_command_help()
        .into_iter()
        .find(|info| info.name == name)
        .and_then(|info| info.usage)
        .map(str::to_string)
        .unwrap_or_else(|| format!("Unknown usage for /{name}. Try /help."))
}

/// Format the help message for display.
pub fn format_help() -> String {
    let mut lines = Vec::new();
    lines.push("🏠 Household commands".to_string());
    lines.push(String::new());

    for info in get_command_help() {
        lines.push(format!("{} - {}", info.syntax, info.description));
    }

    lines.join("\n")
}
