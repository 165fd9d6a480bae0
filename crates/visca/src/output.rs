use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;
use visca_command::{to_hex, CommandFrame, CommandKind};
use visca_frame::{Reply, ResponseMessage};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct CommandOutput<'a> {
    kind: &'a str,
    address: u8,
    length: usize,
    bytes: String,
}

#[derive(Serialize)]
struct MessageOutput {
    length: usize,
    bytes: String,
    reply: String,
    source_address: Option<u8>,
}

pub fn print_command(kind: CommandKind, frame: &CommandFrame, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = CommandOutput {
                kind: kind.name(),
                address: frame.address(),
                length: frame.len(),
                bytes: frame.to_hex(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["COMMAND", "ADDRESS", "LENGTH", "BYTES"])
                .add_row(vec![
                    kind.name().to_string(),
                    frame.address().to_string(),
                    frame.len().to_string(),
                    frame.to_hex(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "{} address={} length={} bytes={}",
                kind,
                frame.address(),
                frame.len(),
                frame.to_hex()
            );
        }
        OutputFormat::Raw => print_raw(frame.as_bytes()),
    }
}

pub fn print_message(message: &ResponseMessage, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = MessageOutput {
                length: message.len(),
                bytes: message.to_hex(),
                reply: describe_reply(message.reply()),
                source_address: message.source_address(),
            };
            print_json(&out);
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FROM", "LENGTH", "REPLY", "BYTES"])
                .add_row(vec![
                    source_label(message.source_address()),
                    message.len().to_string(),
                    describe_reply(message.reply()),
                    message.to_hex(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => {
            println!(
                "from={} length={} reply={} bytes={}",
                source_label(message.source_address()),
                message.len(),
                describe_reply(message.reply()),
                message.to_hex()
            );
        }
        OutputFormat::Raw => print_raw(message.as_bytes()),
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

fn print_json<T: Serialize>(value: &T) {
    println!(
        "{}",
        serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
    );
}

pub fn describe_reply(reply: Reply<'_>) -> String {
    match reply {
        Reply::Ack { socket } => format!("ack socket={socket}"),
        Reply::Completion { socket, payload: [] } => format!("completion socket={socket}"),
        Reply::Completion { socket, payload } => {
            format!("completion socket={socket} payload={}", to_hex(payload))
        }
        Reply::Error { socket, error } => format!("error socket={socket}: {error}"),
        Reply::Other => "other".to_string(),
    }
}

fn source_label(address: Option<u8>) -> String {
    address
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string())
}
