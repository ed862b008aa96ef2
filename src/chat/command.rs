//! Classification of inbound chat messages.

use crate::core::rate::{MAX_DAYS, MIN_DAYS, RateRequestSpec};
use anyhow::{Result, anyhow};
use std::num::IntErrorKind;

pub const EXCHANGE_KEYWORD: &str = "exchange";
pub const GREETING_TRIGGER: &str = "Hello server";
pub const GREETING: &str = "Привіт мої карапузи!";
pub const USAGE: &str =
    "Невірний формат команди. Використовуйте 'exchange <кількість днів> [валюти]'.";

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `exchange [<days>] [<currency> ...]`
    Exchange(RateRequestSpec),
    Greeting,
    Chat(String),
}

impl Command {
    /// Fails only for an `exchange` command whose day count is not an integer.
    pub fn parse(message: &str, default_currencies: &[String]) -> Result<Command> {
        let mut tokens = message.split_whitespace();

        match tokens.next() {
            Some(keyword) if keyword.eq_ignore_ascii_case(EXCHANGE_KEYWORD) => {
                let days = match tokens.next() {
                    Some(token) => parse_days(token)?,
                    None => 1,
                };
                let currencies: Vec<&str> = tokens.collect();
                let spec = if currencies.is_empty() {
                    RateRequestSpec::new(days, default_currencies)
                } else {
                    RateRequestSpec::new(days, currencies)
                };
                Ok(Command::Exchange(spec))
            }
            _ if message == GREETING_TRIGGER => Ok(Command::Greeting),
            _ => Ok(Command::Chat(message.to_string())),
        }
    }
}

// Integers too large for i64 still clamp, only non-numbers are rejected.
fn parse_days(token: &str) -> Result<i64> {
    match token.parse::<i64>() {
        Ok(days) => Ok(days),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(MAX_DAYS),
            IntErrorKind::NegOverflow => Ok(MIN_DAYS),
            _ => Err(anyhow!("Invalid day count: {}", token)),
        },
    }
}
