//! # Interactive Builtins
//!
//! `input` and `choose` prompt through the engine's [`Console`]. Both take a
//! single options object, which arrives unevaluated; the fields that hold
//! expressions (`predefined`, `option-text`, `option-process`, option texts)
//! are evaluated by the builtin itself.
//!
//! Running out of input while a prompt is waiting fails with
//! [`ErrorKind::EndOfInput`] instead of prompting forever.

use std::fmt::Write as _;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use tracing::debug;

use crate::atoms::helpers::{single_value, string_field};
use crate::console::Console;
use crate::diagnostics::{ErrorKind, FunResult, FunsonError};
use crate::err_msg;
use crate::runtime::frame::{Frame, LOCALS, MAP_CONTEXT};
use crate::runtime::registry::{FunctionDescriptor, NativeFn, Registry};
use crate::value::{Kind, Map, Output, Value};

// ============================================================================
// INPUT
// ============================================================================

/// What an `input` answer is converted to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum InputType {
    String,
    Float,
    Integer,
    Datetime { input: String, output: String },
}

impl InputType {
    fn from_options(frame: &Frame<'_>, options: &Map) -> FunResult<Self> {
        Ok(match string_field(options, "type", "input")?.unwrap_or("string") {
            "string" => InputType::String,
            "float" => InputType::Float,
            "integer" => InputType::Integer,
            "datetime" => {
                let config = frame.config();
                let input = string_field(options, "datetime-format-input", "input")?
                    .unwrap_or(&config.datetime_input_format);
                let output = string_field(options, "datetime-format-output", "input")?
                    .unwrap_or(&config.datetime_output_format);
                InputType::Datetime {
                    input: input.to_string(),
                    output: output.to_string(),
                }
            }
            other => return Err(err_msg!("input: unknown \"type\": {other}")),
        })
    }

    /// Converts a raw answer.
    fn retype(&self, answer: &str) -> FunResult<Value> {
        match self {
            InputType::String => Ok(Value::from(answer)),
            InputType::Float => answer.parse::<f64>().map(Value::Number).map_err(|_| {
                FunsonError::new(ErrorKind::NotANumber {
                    input: answer.to_string(),
                })
            }),
            InputType::Integer => answer
                .parse::<i64>()
                .map(|n| Value::Number(n as f64))
                .map_err(|_| {
                    FunsonError::new(ErrorKind::NotAnIntegerInput {
                        input: answer.to_string(),
                    })
                }),
            InputType::Datetime { input, output } => {
                let invalid = || {
                    FunsonError::new(ErrorKind::InvalidDate {
                        input: answer.to_string(),
                        format: input.clone(),
                    })
                };
                let mut rendered = String::new();
                // Zone names are skipped when parsing; times without a numeric offset are UTC.
                let written = match DateTime::parse_from_str(answer, input) {
                    Ok(zoned) => write!(rendered, "{}", zoned.format(output)),
                    Err(_) => {
                        let naive = NaiveDateTime::parse_from_str(answer, input)
                            .ok()
                            .or_else(|| {
                                NaiveDate::parse_from_str(answer, input)
                                    .ok()
                                    .and_then(|date| date.and_hms_opt(0, 0, 0))
                            })
                            .ok_or_else(invalid)?;
                        write!(rendered, "{}", naive.and_utc().format(output))
                    }
                };
                written.map_err(|_| {
                    err_msg!("input: \"datetime-format-output\" is not a valid format: {output}")
                })?;
                Ok(Value::String(rendered))
            }
        }
    }
}

/// A fully validated `input` request.
#[derive(Debug)]
struct InputPrompt {
    kind: InputType,
    question: String,
    predefined: String,
    validator: Option<Regex>,
    condition: String,
}

impl InputPrompt {
    fn from_options(frame: &Frame<'_>, options: &Map) -> FunResult<Self> {
        let kind = InputType::from_options(frame, options)?;
        let mut question = string_field(options, "question", "input")?
            .unwrap_or("Enter input")
            .to_string();

        let predefined = match options.get("predefined") {
            None => String::new(),
            Some(raw) => {
                let scope = frame.scope_with(MAP_CONTEXT, Value::Object(options.clone()))?;
                let value = scope
                    .process(raw)
                    .and_then(|out| single_value(out, "input: \"predefined\""))
                    .map_err(|e| e.within("input: processing \"predefined\""))?;
                match value {
                    Value::Number(n) => format!("{n:.6}"),
                    Value::String(s) => s,
                    other => {
                        return Err(err_msg!(
                            "input: want string type for \"predefined\", got {}",
                            other.kind()
                        ))
                    }
                }
            }
        };
        if !predefined.is_empty() {
            question = format!("{question} [{predefined}]");
        }

        let validator = match string_field(options, "validator", "input")? {
            None | Some("") => None,
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                FunsonError::new(ErrorKind::InvalidRegularExpression {
                    message: e.to_string(),
                })
            })?),
        };

        if !predefined.is_empty() {
            if let Some(validator) = &validator {
                if !validator.is_match(&predefined) {
                    return Err(err_msg!("input: \"predefined\" doesn't pass \"validator\""));
                }
            }
            kind.retype(&predefined)
                .map_err(|e| e.within("input: \"predefined\""))?;
        }

        let condition = string_field(options, "condition", "input")?
            .unwrap_or_default()
            .to_string();
        if validator.is_some() && condition.is_empty() {
            return Err(err_msg!(
                "input: you forgot to fill \"validator\" description into \"condition\" field"
            ));
        }

        Ok(Self {
            kind,
            question,
            predefined,
            validator,
            condition,
        })
    }

    /// Prompts until an answer passes validation and conversion.
    fn ask(&self, console: &dyn Console) -> FunResult<Value> {
        loop {
            console.write(&format!("\n{}: ", self.question))?;
            let line = console
                .read_line()?
                .ok_or_else(|| FunsonError::new(ErrorKind::EndOfInput))?;
            let mut answer = line.trim();
            if answer.is_empty() {
                answer = &self.predefined;
            }
            if let Some(validator) = &self.validator {
                if !validator.is_match(answer) {
                    console.write(&format!(
                        "Entered value doesn't pass condition.\n{}\n",
                        self.condition
                    ))?;
                    continue;
                }
            }
            match self.kind.retype(answer) {
                Ok(value) => return Ok(value),
                Err(e) => console.write(&format!("Entered value {}", e.kind()))?,
            }
        }
    }
}

/// Asks the user for a value.
///
/// Usage: ["!input", {options}]
///
/// | field                    | default                   |                                       |
/// |--------------------------|---------------------------|---------------------------------------|
/// | `type`                   | `"string"`                | `string`, `float`, `integer`, `datetime` |
/// | `question`               | `"Enter input"`           | prompt text                           |
/// | `predefined`             | none                      | expression, answer used for empty input |
/// | `validator`              | none                      | regular expression the answer must match |
/// | `condition`              | required with `validator` | shown when validation fails           |
/// | `datetime-format-input`  | engine config             | strftime pattern answers are parsed with |
/// | `datetime-format-output` | engine config             | strftime pattern the result is rendered with |
pub const ATOM_INPUT: NativeFn = |frame, args| {
    let prompt = InputPrompt::from_options(frame, args.get(0)?)?;
    debug!(question = %prompt.question, "input");
    Ok(vec![Output::Value(prompt.ask(frame.console())?)])
};

// ============================================================================
// CHOOSE
// ============================================================================

struct Choice {
    text: String,
    option: Value,
}

fn evaluated_text(frame: &Frame<'_>, expr: &Value, bound: &Value, index: usize) -> FunResult<String> {
    let scope = frame.scope_with(MAP_CONTEXT, bound.clone())?;
    let what = format!("choose: option {index} text");
    let output = scope.process(expr).map_err(|e| e.within(what.clone()))?;
    Ok(single_value(output, &what)?.to_text())
}

fn choices(frame: &Frame<'_>, options: &Map, list: &[Value]) -> FunResult<Vec<Choice>> {
    list.iter()
        .enumerate()
        .map(|(i, option)| match option {
            Value::Array(pair) => match pair.as_slice() {
                [text, value] => Ok(Choice {
                    text: evaluated_text(frame, text, value, i)?,
                    option: value.clone(),
                }),
                _ => Err(err_msg!(
                    "choose: option {i} is an array and has to have exactly two items (text, option): {option}"
                )),
            },
            _ => {
                let text = match options.get("option-text") {
                    Some(expr) => evaluated_text(frame, expr, option, i)?,
                    None => option.to_text(),
                };
                Ok(Choice {
                    text,
                    option: option.clone(),
                })
            }
        })
        .collect()
}

/// Lets the user pick one of several options.
///
/// Usage: ["!choose", {options}]
///
///   - `options`: array; an entry `[text, value]` shows the evaluated `text`
///     (with `:` bound to `value`), any other entry is shown as-is or through
///     `option-text` (with `:` bound to the entry)
///   - `predefined`: expression returned for an empty answer
///   - `question`: prompt text
///   - `option-process`: expression applied to the chosen value, bound as `\`
///
///   The chosen value is evaluated before it is returned.
pub const ATOM_CHOOSE: NativeFn = |frame, args| {
    let options: &Map = args.get(0)?;
    let list = match options.get("options") {
        Some(Value::Array(list)) => list,
        other => {
            return Err(err_msg!(
                "choose: want array type for \"options\", got {}",
                other.map_or(Kind::Null, Value::kind)
            ))
        }
    };
    let predefined = options.get("predefined").filter(|v| !v.is_null());
    if list.is_empty() {
        return Ok(vec![predefined
            .cloned()
            .map_or_else(Output::nothing, Output::Value)]);
    }

    let entries = choices(frame, options, list)?;
    let question = match string_field(options, "question", "choose")? {
        Some(question) => question.to_string(),
        None if predefined.is_some() => "Choose an option or don't".to_string(),
        None => "Choose an option".to_string(),
    };

    let console = frame.console();
    let chosen = loop {
        let mut menu = String::from("\nOptions:\n");
        for (i, entry) in entries.iter().enumerate() {
            menu.push_str(&format!("{}) {}\n", i + 1, entry.text));
        }
        menu.push_str(&format!("{question}: "));
        console.write(&menu)?;

        let line = console
            .read_line()?
            .ok_or_else(|| FunsonError::new(ErrorKind::EndOfInput))?;
        let answer = line.trim();
        if answer.is_empty() {
            if let Some(predefined) = predefined {
                return Ok(vec![frame.process(predefined)?]);
            }
            console.write("You have to choose some option\n")?;
            continue;
        }
        let Ok(number) = answer.parse::<i64>() else {
            console.write("Choose by entering option number\n")?;
            continue;
        };
        match usize::try_from(number).ok().filter(|n| (1..=entries.len()).contains(n)) {
            Some(n) => break &entries[n - 1].option,
            None => console.write("Choose a number from list.\n")?,
        }
    };

    let result = frame
        .process(chosen)
        .map_err(|e| e.within("choose: processing chosen option"))?;
    match options.get("option-process") {
        None => Ok(vec![result]),
        Some(expr) => {
            let scope = frame.scope_with(LOCALS, result)?;
            let processed = scope
                .process(expr)
                .map_err(|e| e.within("choose: processing \"option-process\""))?;
            Ok(vec![processed])
        }
    }
};

pub fn register_interactive_atoms(registry: &mut Registry) {
    registry.define("input", FunctionDescriptor::new(ATOM_INPUT).param(Kind::Object));
    registry.define("choose", FunctionDescriptor::new(ATOM_CHOOSE).param(Kind::Object));
}
