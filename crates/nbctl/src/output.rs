use clap::ValueEnum;
use color_eyre::owo_colors::OwoColorize;
use comfy_table::{modifiers, presets, Cell, Color, Table};
use serde::Serialize;

mod friends;
mod libraries;
mod network;
mod projects;
mod users;

pub use friends::FriendList;
pub use libraries::LibraryList;
pub use network::RoomList;
pub use projects::ProjectList;
pub use users::{LoginStatus, Principal};

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Format {
    Json,
    #[default]
    PlainText,
}

#[derive(Debug, Default)]
pub struct Output {
    format: Format,
}

pub trait Report {
    fn report(&self);
}

impl Output {
    pub const fn new(output_type: Format) -> Self {
        Self {
            format: output_type,
        }
    }

    pub fn write<T: Serialize + Report>(&self, value: &T) {
        match self.format {
            Format::Json => match serde_json::to_string(&value) {
                Ok(json) => println!("{json}"),
                Err(err) => eprintln!("Failed to serialize to JSON: {err}"),
            },
            Format::PlainText => value.report(),
        }
    }
}

/// Table with the look shared by every listing.
fn table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    let _ = table.load_preset(presets::UTF8_FULL);
    let _ = table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    let _ = table.set_header(
        headers
            .iter()
            .map(|header| Cell::new(header).fg(Color::Blue))
            .collect::<Vec<_>>(),
    );
    table
}

#[derive(Clone, Debug, Serialize)]
pub struct InfoLine<'a>(pub &'a str);

impl Report for InfoLine<'_> {
    fn report(&self) {
        println!("{} {}", "[INFO]".green(), self.0);
    }
}
