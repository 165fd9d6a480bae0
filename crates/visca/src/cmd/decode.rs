use std::fs::File;
use std::io::{self, Cursor, Read};

use visca_frame::{AssemblerConfig, FrameAssembler, MessageReader};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliError, CliResult, DATA_INVALID, SUCCESS};
use crate::output::{print_message, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let source = open_source(&args)?;
    let input: Box<dyn Read> = if args.hex {
        let mut text = String::new();
        let mut source = source;
        source
            .read_to_string(&mut text)
            .map_err(|err| io_error("failed reading hex input", err))?;
        Box::new(Cursor::new(parse_hex(&text)?))
    } else {
        source
    };

    let assembler = FrameAssembler::with_config(AssemblerConfig {
        capacity: args.capacity,
        ..AssemblerConfig::default()
    });
    let mut reader = MessageReader::with_assembler(input, assembler);
    reader
        .assembler_mut()
        .subscribe(move |message| print_message(message, format));

    let count = reader
        .run()
        .map_err(|err| frame_error("decode failed", err))?;
    tracing::info!(count, "response stream decoded");

    Ok(SUCCESS)
}

fn open_source(args: &DecodeArgs) -> CliResult<Box<dyn Read>> {
    match &args.file {
        Some(path) => {
            let file = File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Parse whitespace- or comma-separated hex bytes. Tokens may carry a `0x`
/// prefix and may run several bytes together (`8109` is `81 09`).
fn parse_hex(text: &str) -> CliResult<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in text
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);
        if digits.is_empty() || digits.len() % 2 != 0 || !digits.is_ascii() {
            return Err(invalid_hex(token));
        }
        for pair in digits.as_bytes().chunks(2) {
            let pair = std::str::from_utf8(pair).map_err(|_| invalid_hex(token))?;
            let byte = u8::from_str_radix(pair, 16).map_err(|_| invalid_hex(token))?;
            bytes.push(byte);
        }
    }
    Ok(bytes)
}

fn invalid_hex(token: &str) -> CliError {
    CliError::new(DATA_INVALID, format!("invalid hex byte: {token}"))
}
