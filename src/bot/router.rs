//! Command dispatch.
//!
//! Each command produces exactly one reply. Failures never escape: bad input
//! turns into a usage hint and storage errors into a generic apology.

use std::fmt::Write;

use chrono::NaiveDate;
use tracing::{debug, error};

use super::command::{format_help, parse_input, usage_for, BotInput, HouseCommand};
use crate::chore::{ChoreRepository, NewChore};
use crate::config::HouseholdConfig;
use crate::datetime::{
    days_until_rent, format_in_tz, local_today, ordinal, DATETIME_FORMAT, DATE_FORMAT,
};
use crate::db::Database;
use crate::expense::{ExpenseService, GroceryRemoval};
use crate::grocery::GroceryRepository;
use crate::preference::PreferenceRepository;
use crate::settlement::{format_amount, format_balance_report, format_split};
use crate::transport::Sender;
use crate::{HousebotError, Result};

/// Routes parsed commands to the stores and formats the replies.
pub struct CommandRouter<'a> {
    db: &'a Database,
    household: &'a HouseholdConfig,
    bot_username: Option<&'a str>,
}

impl<'a> CommandRouter<'a> {
    /// Create a new CommandRouter.
    pub fn new(db: &'a Database, household: &'a HouseholdConfig) -> Self {
        Self {
            db,
            household,
            bot_username: None,
        }
    }

    /// Ignore commands addressed to bots other than `username`.
    pub fn with_bot_username(mut self, username: &'a str) -> Self {
        self.bot_username = Some(username);
        self
    }

    /// Handle raw message text. Plain messages get no reply.
    pub async fn handle_text(&self, sender: &Sender, text: &str) -> Option<String> {
        match parse_input(text, self.bot_username) {
            BotInput::Message(_) => None,
            BotInput::Command(command) => Some(self.dispatch(sender, command).await),
        }
    }

    /// Run a command and build its reply.
    pub async fn dispatch(&self, sender: &Sender, command: HouseCommand) -> String {
        debug!(sender = sender.id, command = command.name(), "dispatching command");

        let name = command.name().to_string();
        let result = match command {
            HouseCommand::SetEmoji(emoji) => self.set_emoji(sender, &emoji).await,
            HouseCommand::AddGrocery(item) => self.add_grocery(sender, &item).await,
            HouseCommand::GroceryList => self.grocery_list().await,
            HouseCommand::AddExpense {
                amount,
                description,
            } => self.add_expense(sender, amount, &description).await,
            HouseCommand::AddChore(chore) => self.add_chore(sender, &chore).await,
            HouseCommand::AssignChore { assignee, chore } => {
                self.assign_chore(&assignee, &chore).await
            }
            HouseCommand::CompleteChore(chore) => self.complete_chore(sender, &chore).await,
            HouseCommand::ChoreList => self.chore_list().await,
            HouseCommand::ShowUser => self.show_users().await,
            HouseCommand::Balance => self.balance().await,
            HouseCommand::RentDays => {
                rent_days_reply(local_today(self.household.tz()), self.household.rent_day)
            }
            HouseCommand::Help => Ok(format_help()),
            HouseCommand::Invalid(name) => Ok(usage_for(name)),
            HouseCommand::Unknown(cmd) => Ok(format!(
                "Unknown command /{cmd}. Try /help for the list of commands."
            )),
        };

        match result {
            Ok(reply) => reply,
            Err(HousebotError::Validation(reason)) => {
                debug!(command = %name, %reason, "rejected command input");
                usage_for(&name)
            }
            Err(e) => {
                error!("Error handling /{}: {}", name, e);
                format!("❌ An error occurred while {}.", action_for(&name))
            }
        }
    }

    async fn set_emoji(&self, sender: &Sender, emoji: &str) -> Result<String> {
        PreferenceRepository::new(self.db.pool())
            .upsert_emoji(sender.id, sender.display_name(), emoji)
            .await?;
        Ok(format!("✅ Emoji set to \"{emoji}\""))
    }

    async fn add_grocery(&self, sender: &Sender, item: &str) -> Result<String> {
        GroceryRepository::new(self.db.pool())
            .add(item, sender.display_name())
            .await?;
        Ok(format!("🛒 Grocery item added: \"{item}\""))
    }

    async fn grocery_list(&self) -> Result<String> {
        let items = GroceryRepository::new(self.db.pool()).list().await?;
        if items.is_empty() {
            return Ok("No grocery items have been added yet.".to_string());
        }

        let members = PreferenceRepository::new(self.db.pool())
            .directory(&self.household.default_emoji)
            .await?;
        let tz = self.household.tz();

        let mut reply = String::from("🛒 Grocery List 🛒\n");
        for item in &items {
            let _ = writeln!(
                reply,
                "• {} (added by {} on {})",
                item.name,
                members.for_name(&item.added_by),
                format_in_tz(&item.created_at, tz, DATE_FORMAT)
            );
        }
        Ok(reply.trim_end().to_string())
    }

    async fn add_expense(&self, sender: &Sender, amount: f64, description: &str) -> Result<String> {
        let service = ExpenseService::new(self.db, self.household.size()?);
        let recorded = service
            .record_expense(sender.id, sender.display_name(), amount, description)
            .await?;

        let mut reply = format!(
            "✅ Expense recorded: {} for \"{}\"\n{}",
            format_amount(recorded.expense.amount),
            recorded.expense.description,
            format_split(&recorded.split)
        );
        match recorded.grocery {
            GroceryRemoval::Removed => {
                let _ = write!(
                    reply,
                    "\n🛒 Grocery item \"{description}\" has been removed from the list."
                );
            }
            GroceryRemoval::Failed => {
                reply.push_str("\n⚠️ The expense was saved, but the grocery list could not be updated.");
            }
            GroceryRemoval::NotListed => {}
        }
        Ok(reply)
    }

    async fn add_chore(&self, sender: &Sender, chore: &str) -> Result<String> {
        ChoreRepository::new(self.db.pool())
            .create(&NewChore::self_assigned(
                sender.id,
                sender.display_name(),
                chore,
            ))
            .await?;
        Ok(format!("✅ Chore recorded: \"{chore}\""))
    }

    async fn assign_chore(&self, assignee: &str, chore: &str) -> Result<String> {
        ChoreRepository::new(self.db.pool())
            .create(&NewChore::assigned_to(assignee, chore))
            .await?;
        Ok(format!("✅ Chore assigned to @{assignee}: \"{chore}\""))
    }

    async fn complete_chore(&self, sender: &Sender, chore: &str) -> Result<String> {
        let completed = ChoreRepository::new(self.db.pool())
            .complete(chore, sender.display_name())
            .await?;
        Ok(match completed {
            Some(_) => format!("✅ Chore marked as completed: \"{chore}\""),
            None => format!("❌ Could not find a pending chore with the description: \"{chore}\""),
        })
    }

    async fn chore_list(&self) -> Result<String> {
        let chores = ChoreRepository::new(self.db.pool()).list_pending().await?;
        if chores.is_empty() {
            return Ok("No pending chores available.".to_string());
        }

        let members = PreferenceRepository::new(self.db.pool())
            .directory(&self.household.default_emoji)
            .await?;
        let tz = self.household.tz();

        let mut reply = String::from("📝 Chore List:\n");
        for (index, chore) in chores.iter().enumerate() {
            let _ = writeln!(
                reply,
                "{}. {} - {} (Assigned on {})",
                index + 1,
                chore.description,
                members.for_name(&chore.assigned_to_name),
                format_in_tz(&chore.created_at, tz, DATETIME_FORMAT)
            );
        }
        Ok(reply.trim_end().to_string())
    }

    async fn show_users(&self) -> Result<String> {
        let preferences = PreferenceRepository::new(self.db.pool()).list_all().await?;
        if preferences.is_empty() {
            return Ok("📋 No user settings found.".to_string());
        }

        let mut reply = String::from("👥 User Emoji List:\n");
        for pref in &preferences {
            let _ = writeln!(
                reply,
                "{} - @{} - {}",
                pref.emoji, pref.display_name, pref.participant_id
            );
        }
        Ok(reply.trim_end().to_string())
    }

    async fn balance(&self) -> Result<String> {
        let service = ExpenseService::new(self.db, self.household.size()?);
        let (sheet, settlement, expenses) = service.settlement(&self.household.roster).await?;

        let mut members = PreferenceRepository::new(self.db.pool())
            .directory(&self.household.default_emoji)
            .await?;
        for expense in &expenses {
            members.register_name(expense.participant_id, &expense.participant_name);
        }

        Ok(format_balance_report(&sheet, &settlement, &members))
    }
}

/// Reply for `rentdays` on a given local date.
pub fn rent_days_reply(today: NaiveDate, rent_day: u32) -> Result<String> {
    let days = days_until_rent(today, rent_day).ok_or_else(|| {
        HousebotError::Config(format!("invalid rent day: {rent_day}"))
    })?;
    Ok(format!(
        "There are {days} days left until the {}.",
        ordinal(rent_day)
    ))
}

/// Phrase naming what a command was doing, for failure replies.
fn action_for(command: &str) -> &'static str {
    match command {
        "setemoji" => "setting the emoji",
        "addgrocery" => "adding the grocery item",
        "grocerylist" => "fetching the grocery list",
        "addexpense" => "saving the expense",
        "addchore" => "saving the chore",
        "assignchore" => "assigning the chore",
        "completechore" => "updating the chore status",
        "chorelist" => "retrieving the chore list",
        "showuser" => "fetching user settings",
        "balance" => "calculating the balance",
        "rentdays" => "counting the days until rent",
        _ => "handling the command",
    }
}
