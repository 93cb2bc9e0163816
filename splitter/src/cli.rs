use clap::{Parser, Subcommand, ValueEnum};
use shared::{DivisionMode, Theme};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bill-splitter")]
#[command(about = "Split a restaurant bill among the people at the table")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the saved data (defaults to the platform data dir)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// More log output; repeat for debug logs
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage the people at the table
    Diner {
        #[command(subcommand)]
        action: DinerCommand,
    },

    /// Manage the items on the bill
    Item {
        #[command(subcommand)]
        action: ItemCommand,
    },

    /// Choose how the bill is divided
    Mode {
        #[arg(value_enum)]
        mode: ModeArg,
    },

    /// Show what everybody owes
    Summary,

    /// Save the bill to history and print the text to share
    Share,

    /// Discard the current bill and start over
    New,

    /// Browse finished bills
    History {
        #[command(subcommand)]
        action: HistoryCommand,
    },

    /// Names of people you often eat with
    Names {
        #[command(subcommand)]
        action: NamesCommand,
    },

    /// Service percentage, currency and theme
    Settings {
        #[command(subcommand)]
        action: SettingsCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum DinerCommand {
    /// Add someone to the table
    Add { name: String },

    /// Rename a diner
    Rename {
        /// Current name or id
        diner: String,
        new_name: String,
    },

    /// Remove a diner; they are dropped from every item
    Remove {
        /// Name or id
        diner: String,
    },

    /// Toggle whether a diner has paid
    Paid {
        /// Name or id
        diner: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    /// Add an item to the bill
    Add {
        name: String,

        /// Price as typed, e.g. 12.50 or "$1,200"
        price: String,

        /// Diner who had it (repeat for several); everyone when omitted
        #[arg(long = "for", value_name = "DINER")]
        diners: Vec<String>,

        /// Charge the full price to each diner instead of splitting it
        #[arg(long)]
        each: bool,
    },

    /// Change an item; options left out keep their current value
    Update {
        /// Name or id
        item: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        price: Option<String>,

        /// Diner who had it (repeat for several); replaces the current selection
        #[arg(long = "for", value_name = "DINER", conflicts_with = "everyone")]
        diners: Vec<String>,

        /// Assign the item to the whole table
        #[arg(long)]
        everyone: bool,

        /// Charge the full price to each diner
        #[arg(long, conflicts_with = "shared")]
        each: bool,

        /// Split the price among the diners who had it
        #[arg(long)]
        shared: bool,
    },

    /// Remove an item
    Remove {
        /// Name or id
        item: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List saved bills, newest first
    List,

    /// Show a saved bill
    Show { bill_id: String },

    /// Delete a saved bill
    Delete { bill_id: String },
}

#[derive(Subcommand, Debug)]
pub enum NamesCommand {
    /// Suggest known names containing the query
    Suggest { query: String },

    /// Most frequent names not yet at the table
    Top {
        #[arg(long, short = 'n', default_value = "5")]
        limit: usize,
    },
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Print the current settings
    Show,

    /// Change one or more settings
    Set {
        /// Service charge percentage (0-100)
        #[arg(long)]
        service: Option<u32>,

        /// Currency code, e.g. CUP or USD
        #[arg(long)]
        currency: Option<String>,

        #[arg(long, value_enum)]
        theme: Option<ThemeArg>,
    },

    /// Switch between light and dark theme
    ToggleTheme,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ModeArg {
    /// Everyone pays for what they had
    Consumption,
    /// The table total is split evenly
    Equal,
}

impl From<ModeArg> for DivisionMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Consumption => DivisionMode::Consumption,
            ModeArg::Equal => DivisionMode::Equal,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(theme: ThemeArg) -> Self {
        match theme {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}
