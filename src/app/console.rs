use crate::app::controller::PropertyClient;
use crate::app::state::FormField;
use crate::app::view::{listing_entries, ListingAction};
use anyhow::{anyhow, bail, Context, Result};
use colored::Colorize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

pub const HELP: &str = "\
Commands:
  list                   re-fetch and show all properties
  show                   show the form
  set <field> <value>    set address, price, size or description
  submit                 create, or update the staged property
  clear                  reset the form to create mode
  edit <id>              load a listed property into the form
  delete <id>            delete a listed property
  find <id>              load a property by typed id
  remove <id>            delete a property by typed id
  help                   show this text
  quit                   exit";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Show,
    Set(FormField, String),
    Submit,
    Clear,
    Edit(i64),
    Delete(i64),
    Find(String),
    Remove(String),
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "show" => Command::Show,
            "set" => {
                let (name, value) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
                let field =
                    FormField::parse(name).ok_or_else(|| anyhow!("Unknown field: {:?}", name))?;
                Command::Set(field, value.trim().to_string())
            }
            "submit" | "save" => Command::Submit,
            "clear" => Command::Clear,
            "edit" => Command::Edit(listing_id(rest)?),
            "delete" => Command::Delete(listing_id(rest)?),
            "find" => Command::Find(rest.to_string()),
            "remove" => Command::Remove(rest.to_string()),
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "" => bail!("Empty command"),
            other => bail!("Unknown command: {:?}", other),
        };
        Ok(command)
    }
}

fn listing_id(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("Expected a numeric id, got {:?}", raw))
}

fn print_listing(client: &PropertyClient) {
    let entries = listing_entries(&client.view().listing);
    if entries.is_empty() {
        println!("(no properties)");
        return;
    }

    for entry in entries {
        for (i, line) in entry.lines.iter().enumerate() {
            if i == 0 {
                println!("{}", line.bold());
            } else {
                println!("   {}", line);
            }
        }
        let actions: Vec<String> = entry
            .actions
            .iter()
            .map(|action| match action {
                ListingAction::Edit(id) => format!("edit {}", id),
                ListingAction::Delete(id) => format!("delete {}", id),
            })
            .collect();
        println!("   [{}]", actions.join("] ["));
        println!();
    }
}

fn print_form(client: &PropertyClient) {
    let form = &client.view().form;
    match form.staged_id {
        Some(id) => println!("Form (editing {}):", id),
        None => println!("Form:"),
    }
    println!("   address:     {}", form.address);
    println!("   price:       {}", form.price);
    println!("   size:        {}", form.size);
    println!("   description: {}", form.description);
    println!("   [{}]", form.submit_label());
}

fn print_status(client: &PropertyClient) {
    if let Some(message) = client.status() {
        println!("{}", message.display_line().color(message.kind.color()));
    }
}

/// Run one command. Returns `false` when the console should exit.
pub async fn dispatch(client: &mut PropertyClient, command: Command) -> bool {
    debug!("Command: {:?}", command);
    match command {
        Command::List => {
            client.refresh().await;
            print_listing(client);
        }
        Command::Show => print_form(client),
        Command::Set(field, value) => client.set_field(field, value),
        Command::Submit => {
            client.submit().await;
            print_listing(client);
        }
        Command::Clear => client.clear_form(),
        Command::Edit(id) => {
            if client.listing_action(ListingAction::Edit(id)).await {
                print_form(client);
            }
        }
        Command::Delete(id) => {
            if client.listing_action(ListingAction::Delete(id)).await {
                print_listing(client);
            }
        }
        Command::Find(raw) => {
            client.lookup_edit(&raw).await;
            print_form(client);
        }
        Command::Remove(raw) => {
            client.lookup_delete(&raw).await;
            print_listing(client);
        }
        Command::Help => println!("{}", HELP),
        Command::Quit => return false,
    }
    print_status(client);
    true
}

/// Read commands line by line until `quit` or end of input
pub async fn run<R>(client: &mut PropertyClient, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    client.load().await;
    print_listing(client);
    print_status(client);

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Ok(command) => {
                if !dispatch(client, command).await {
                    break;
                }
            }
            Err(err) => println!("{}", err.to_string().red()),
        }
    }

    Ok(())
}
