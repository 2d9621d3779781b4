// Copyright (C) 2026 Michael Wilson <mike@mdwn.dev>
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License as published by the Free Software
// Foundation, version 3.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with
// this program. If not, see <https://www.gnu.org/licenses/>.
//
use pest::iterators::Pair;
use pest::Parser;
use pest_derive::Parser;
use serde::Serialize;

use crate::error::ExtractError;

#[derive(Parser)]
#[grammar = "src/table/grammar.pest"]
pub struct TableParser;

/// A table read back from generated source.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedTable {
    pub name: String,
    pub values: Vec<f32>,
    /// The value of the matching `<name>_len` constant, if one was declared.
    pub declared_len: Option<u32>,
}

impl ParsedTable {
    /// True when the declared length agrees with the number of values.
    pub fn is_consistent(&self) -> bool {
        self.declared_len == Some(self.values.len() as u32)
    }

    /// Largest absolute value in the table.
    pub fn peak(&self) -> f32 {
        self.values.iter().fold(0.0f32, |peak, v| peak.max(v.abs()))
    }
}

/// Parses every float table in `content`, pairing each with its `_len` constant.
/// Tables are returned in the order they are declared.
pub fn parse_tables(content: &str) -> Result<Vec<ParsedTable>, ExtractError> {
    let pairs = match TableParser::parse(Rule::file, content) {
        Ok(pairs) => pairs,
        Err(e) => {
            let (line, col) = match e.line_col {
                pest::error::LineColLocation::Pos((line, col)) => (line, col),
                pest::error::LineColLocation::Span((line, col), _) => (line, col),
            };
            return Err(ExtractError::TableParse(format!(
                "error at line {}, column {}: {}\n\nContent around error:\n{}",
                line,
                col,
                e.variant.message(),
                get_error_context(content, line, col)
            )));
        }
    };

    let mut tables: Vec<ParsedTable> = Vec::new();
    let mut lengths: Vec<(String, u32)> = Vec::new();

    for pair in pairs {
        for inner_pair in pair.into_inner() {
            match inner_pair.as_rule() {
                Rule::array => tables.push(parse_array(inner_pair)?),
                Rule::length => lengths.push(parse_length(inner_pair)?),
                _ => {
                    // Comments, directives and EOI carry nothing.
                }
            }
        }
    }

    for (len_name, len) in lengths {
        let Some(table_name) = len_name.strip_suffix("_len") else {
            continue;
        };
        if let Some(table) = tables.iter_mut().find(|t| t.name == table_name) {
            table.declared_len = Some(len);
        }
    }

    Ok(tables)
}

/// Finds the table called `name` in `content`.
pub fn parse_table(content: &str, name: &str) -> Result<ParsedTable, ExtractError> {
    parse_tables(content)?
        .into_iter()
        .find(|t| t.name == name)
        .ok_or_else(|| ExtractError::TableParse(format!("no table named {}", name)))
}

fn parse_array(pair: Pair<Rule>) -> Result<ParsedTable, ExtractError> {
    let mut name = String::new();
    let mut values = Vec::new();

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = inner.as_str().to_string(),
            Rule::values => {
                for number in inner.into_inner() {
                    if number.as_rule() == Rule::number {
                        values.push(parse_number(number.as_str())?);
                    }
                }
            }
            _ => {}
        }
    }

    Ok(ParsedTable {
        name,
        values,
        declared_len: None,
    })
}

fn parse_length(pair: Pair<Rule>) -> Result<(String, u32), ExtractError> {
    let mut name = String::new();
    let mut len = 0;

    for inner in pair.into_inner() {
        match inner.as_rule() {
            Rule::ident => name = inner.as_str().to_string(),
            Rule::integer => {
                len = inner.as_str().parse::<u32>().map_err(|e| {
                    ExtractError::TableParse(format!("invalid length {}: {}", inner.as_str(), e))
                })?
            }
            _ => {}
        }
    }

    Ok((name, len))
}

fn parse_number(text: &str) -> Result<f32, ExtractError> {
    let trimmed = text.trim_end_matches(['f', 'F']);
    trimmed
        .parse::<f32>()
        .map_err(|e| ExtractError::TableParse(format!("invalid number {}: {}", text, e)))
}

/// Get context around an error location for better error reporting
fn get_error_context(content: &str, line: usize, col: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();

    if line == 0 || line > lines.len() {
        return "Unable to determine error context".to_string();
    }

    let error_line = line - 1;
    let start_line = error_line.saturating_sub(2);
    let end_line = (error_line + 2).min(lines.len() - 1);

    let mut context = String::new();
    for (i, line_content) in lines.iter().enumerate().take(end_line + 1).skip(start_line) {
        context.push_str(&format!("{:4} | {}\n", i + 1, line_content));
        if i == error_line {
            context.push_str(&format!("     | {}^\n", " ".repeat(col.saturating_sub(1))));
        }
    }

    context
}
