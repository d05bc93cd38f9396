//! Line tokenizer
//!
//! Splits one G-code line into its mnemonic and parameter words. Comments
//! start at `;` or `(` and run to the end of the line.

use regex::Regex;
use std::fmt;
use std::sync::OnceLock;

/// Value of a parameter word
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    /// Anything that is not a finite number, including the empty string
    Text(String),
}

impl ParamValue {
    /// Integer when lossless, else float, else text
    pub fn parse(text: &str) -> Self {
        if let Ok(v) = text.parse::<i64>() {
            return ParamValue::Int(v);
        }
        match text.parse::<f64>() {
            Ok(v) if v.is_finite() => ParamValue::Float(v),
            _ => ParamValue::Text(text.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Parameter words of a line in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(Vec<(String, ParamValue)>);

impl Params {
    /// Value of the first word with this key
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Tokenized line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statement {
    /// Normalised mnemonic (`G01` becomes `G1`); empty for comment-only lines
    pub code: String,
    pub params: Params,
}

impl Statement {
    /// Tokenize one line
    ///
    /// Words are `<Letter><value>` or `<Key>=<Value>`. Letter keys are
    /// upper-cased; `Key=Value` keys are kept as written.
    pub fn parse(line: &str) -> Self {
        let cleaned = strip_comment(line);
        let mut words = cleaned.split_whitespace();
        let Some(first) = words.next() else {
            return Self::default();
        };

        let code = normalize_code(first);
        let params = words
            .filter_map(|word| {
                if let Some((key, value)) = word.split_once('=') {
                    return Some((key.to_string(), ParamValue::parse(value)));
                }
                let mut chars = word.chars();
                let letter = chars.next()?;
                Some((
                    letter.to_ascii_uppercase().to_string(),
                    ParamValue::parse(chars.as_str()),
                ))
            })
            .collect();

        Self {
            code,
            params: Params(params),
        }
    }

    /// Whether the line carried no command
    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

/// Remove a trailing `;` or `(` comment
pub fn strip_comment(line: &str) -> &str {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = COMMENT_REGEX.get_or_init(|| Regex::new(r"[;(].*").expect("invalid regex pattern"));
    match regex.find(line) {
        Some(m) => &line[..m.start()],
        None => line,
    }
}

/// Upper-case a mnemonic and strip leading zeros from its number
fn normalize_code(word: &str) -> String {
    let upper = word.to_ascii_uppercase();
    let mut chars = upper.chars();
    match chars.next() {
        Some(letter) if letter.is_ascii_alphabetic() => {
            let digits = chars.as_str();
            if digits.len() > 1 && digits.starts_with('0') {
                let trimmed = digits.trim_start_matches('0');
                let trimmed = if trimmed.is_empty() || trimmed.starts_with('.') {
                    // keep one zero so `G00` stays `G0`
                    &digits[digits.len() - trimmed.len() - 1..]
                } else {
                    trimmed
                };
                format!("{}{}", letter, trimmed)
            } else {
                upper
            }
        }
        _ => upper,
    }
}
