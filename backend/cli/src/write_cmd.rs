//! `daylog write`, `daylog route`, and `daylog path`.

use anyhow::{Context as _, Result};
use daylog_core::{Context, Message};
use daylog_logging::DailyFileLogWriter;
use serde_json::Value;
use tracing::debug;

pub struct WriteRequest<'a> {
    pub channel: Option<&'a str>,
    pub level: &'a str,
    pub context: Option<&'a str>,
    pub json: bool,
    pub message: &'a str,
}

pub fn write(writer: &DailyFileLogWriter, request: &WriteRequest<'_>) -> Result<()> {
    let message = parse_message(request.message, request.json)?;
    let context = parse_context(request.context)?;
    let channel = request
        .channel
        .unwrap_or(writer.config().default_name.as_str());

    writer.write_log_str(request.level, channel, message, context)?;
    debug!(channel, level = request.level, "Wrote log entry");
    Ok(())
}

pub fn route(writer: &DailyFileLogWriter, name: &str, args: Vec<String>) -> Result<()> {
    writer.route(name, args)?;
    Ok(())
}

pub fn print_path(writer: &DailyFileLogWriter, name: Option<&str>) -> Result<()> {
    let name = name.unwrap_or(writer.config().default_name.as_str());
    println!("{}", writer.current_path(name)?.display());
    Ok(())
}

fn parse_message(raw: &str, json: bool) -> Result<Message> {
    if !json {
        return Ok(Message::from(raw));
    }
    let value: Value = serde_json::from_str(raw).context("--json message is not valid JSON")?;
    Ok(Message::from(value))
}

fn parse_context(raw: Option<&str>) -> Result<Context> {
    let Some(raw) = raw else {
        return Ok(Context::new());
    };
    let value: Value = serde_json::from_str(raw).context("--context is not valid JSON")?;
    Ok(Context::from_value(value)?)
}
