//! # Interactive Shop Session
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         tally shop                                      │
//! │                                                                         │
//! │   stdin ──► ShopCommand ──► execute() ──► Store ──► text output         │
//! │                                            ▲                            │
//! │   Poller (every poll_interval_secs) ───────┘                            │
//! │                                                                         │
//! │   IdleReminder: prints a nudge after idle_timeout_secs of silence,      │
//! │   reset by store activity and by the cart and checkout commands         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;
use std::str::FromStr;
use std::sync::Arc;

use tally_sync::{Poller, Store, TallyConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::idle::{IdleHandle, IdleReminder, IDLE_MESSAGE};
use crate::observer::CliObserver;
use crate::view;

pub const HELP: &str = "\
Commands:
  list          show the product list
  cart          show your cart
  add KEY       put one unit of KEY in the cart
  remove KEY    take one unit of KEY out of the cart
  sync          refresh the catalog from the server
  status        show when the catalog was last refreshed
  checkout      check the cart against the server and show the total
  help          show this message
  quit          leave the shop
";

/// One line typed by the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShopCommand {
    List,
    Cart,
    Add(String),
    Remove(String),
    Sync,
    Status,
    Checkout,
    Help,
    Quit,
}

impl FromStr for ShopCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or("").to_lowercase();
        let arg = words.next();

        let command = match (verb.as_str(), arg) {
            ("list" | "ls" | "products", None) => ShopCommand::List,
            ("cart", None) => ShopCommand::Cart,
            ("add", Some(key)) => ShopCommand::Add(key.to_string()),
            ("remove" | "rm", Some(key)) => ShopCommand::Remove(key.to_string()),
            ("sync", None) => ShopCommand::Sync,
            ("status", None) => ShopCommand::Status,
            ("checkout", None) => ShopCommand::Checkout,
            ("help" | "?", None) => ShopCommand::Help,
            ("quit" | "exit" | "q", None) => ShopCommand::Quit,
            ("add" | "remove" | "rm", None) => {
                return Err(format!("Usage: {} KEY", verb));
            }
            _ => return Err(format!("Unknown command: {}. Type `help`.", line.trim())),
        };

        if words.next().is_some() {
            return Err(format!("Too many arguments: {}", line.trim()));
        }
        Ok(command)
    }
}

/// Runs the session until `quit` or end of input.
pub async fn run(config: &TallyConfig) -> anyhow::Result<()> {
    let reminder = IdleReminder::spawn(config.session.idle_timeout(), || {
        println!("\n{}", IDLE_MESSAGE);
    });
    let observer = Arc::new(CliObserver::new(reminder.handle()));
    let store = Store::from_config(config, observer.clone())?;

    observer.set_foreground(true);
    match store.sync_with_server().await {
        Ok(_) => print!("{}", view::render_catalog(&store.snapshot())),
        Err(e) => println!("Could not load the catalog: {}. Type `sync` to retry.", e),
    }
    observer.set_foreground(false);

    let poller = config.sync.poll_interval().map(|interval| {
        info!(?interval, "Background sync enabled");
        Poller::spawn(store.clone(), interval)
    });

    print!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<ShopCommand>() {
            Ok(ShopCommand::Quit) => break,
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };

        observer.set_foreground(true);
        let output = execute(&store, &reminder.handle(), command).await;
        observer.set_foreground(false);
        print!("{}", output);
    }

    if let Some(poller) = poller {
        if let Err(e) = poller.shutdown().await {
            warn!(error = %e, "Poller did not acknowledge shutdown");
        }
    }
    println!("Bye!");
    Ok(())
}

/// Runs one command against the store and returns what to print.
pub async fn execute(store: &Store, idle: &IdleHandle, command: ShopCommand) -> String {
    match command {
        ShopCommand::List => view::render_catalog(&store.snapshot()),
        ShopCommand::Cart => {
            idle.reset();
            view::render_cart(&store.snapshot())
        }
        ShopCommand::Add(key) => match store.add_item_to_cart(&key) {
            Ok(()) => format!(
                "Added {}. In cart: {}, left in stock: {}\n",
                key,
                store.cart_quantity(&key),
                store.get_item_quantity(&key).unwrap_or(0)
            ),
            Err(e) => format!("{}\n", e),
        },
        ShopCommand::Remove(key) => {
            if store.remove_item_from_cart(&key) {
                format!("Removed {}. In cart: {}\n", key, store.cart_quantity(&key))
            } else {
                format!("{} is not in your cart.\n", key)
            }
        }
        ShopCommand::Sync => match store.sync_with_server().await {
            Ok(deltas) => format!("{}\n", view::render_sync(&deltas)),
            Err(e) => format!("Sync failed: {}\n", e),
        },
        ShopCommand::Status => view::render_status(&store.status().await),
        ShopCommand::Checkout => {
            idle.reset();
            match store.check_out().await {
                Ok(outcome) => view::render_outcome(&outcome),
                Err(e) => format!("Checkout failed: {}\n", e),
            }
        }
        ShopCommand::Help => HELP.to_string(),
        ShopCommand::Quit => String::new(),
    }
}
