//! Minimal mmCIF reader for the Chemical Component Dictionary.
//!
//! The CCD distribution files are flat concatenations of `data_` blocks,
//! one per chemical component, each holding single key/value items and
//! `loop_` tables. This reader collects every category across all blocks
//! into one string-typed [`DataFrame`] per category, prepending a
//! [`BLOCK_COLUMN`] with the owning block's code so curation can verify
//! row provenance.
//!
//! It is not a general CIF implementation: save frames, dictionaries of
//! dictionaries, and typed values are out of scope.

use std::collections::BTreeMap;

use chemref_model::{DataError, Result};
use polars::prelude::{Column, DataFrame, NamedFrom, Series};

/// Name of the synthetic provenance column added to every category table.
pub const BLOCK_COLUMN: &str = "_block";

/// Parsed category tables, keyed by mmCIF category name (without the
/// leading underscore).
pub type CategoryTables = BTreeMap<String, DataFrame>;

const DATASET: &str = "mmcif";

/// One raw field of a data line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Field {
    /// Unquoted token, subject to keyword and null interpretation.
    Plain(String),
    /// Quoted or multiline text, always a literal value.
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Block(String),
    Loop,
    Tag { category: String, item: String },
    Value(Option<String>),
}

/// Parse a full mmCIF dictionary file into per-category tables.
pub fn parse_dictionary(text: &str) -> Result<CategoryTables> {
    let tokens = tokenize(text)?;
    let mut builders: BTreeMap<String, CategoryBuilder> = BTreeMap::new();
    // Single key/value items of the current block, grouped by category and
    // flushed as one row per category when the block ends.
    let mut singles: BTreeMap<String, Vec<(String, Option<String>)>> = BTreeMap::new();
    let mut block: Option<String> = None;

    let mut pos = 0;
    while pos < tokens.len() {
        match &tokens[pos] {
            Token::Block(code) => {
                flush_singles(&mut builders, block.as_deref(), &mut singles)?;
                block = Some(code.clone());
                pos += 1;
            }
            Token::Loop => {
                let block = block.as_deref().ok_or_else(|| {
                    malformed("loop_ before the first data block".to_string())
                })?;
                pos = parse_loop(&tokens, pos + 1, block, &mut builders)?;
            }
            Token::Tag { category, item } => {
                let Some(Token::Value(value)) = tokens.get(pos + 1) else {
                    return Err(malformed(format!(
                        "item _{category}.{item} is not followed by a value"
                    )));
                };
                if block.is_none() {
                    return Err(malformed(format!(
                        "item _{category}.{item} before the first data block"
                    )));
                }
                singles
                    .entry(category.clone())
                    .or_default()
                    .push((item.clone(), value.clone()));
                pos += 2;
            }
            Token::Value(_) => {
                return Err(malformed("bare value outside a loop".to_string()));
            }
        }
    }
    flush_singles(&mut builders, block.as_deref(), &mut singles)?;

    builders
        .into_iter()
        .map(|(category, builder)| Ok((category, builder.into_frame()?)))
        .collect()
}

/// Parse one `loop_` construct starting at the first tag token. Returns
/// the position of the first token after the loop's values.
fn parse_loop(
    tokens: &[Token],
    mut pos: usize,
    block: &str,
    builders: &mut BTreeMap<String, CategoryBuilder>,
) -> Result<usize> {
    let mut category: Option<String> = None;
    let mut items: Vec<String> = Vec::new();
    while let Some(Token::Tag { category: cat, item }) = tokens.get(pos) {
        match &category {
            None => category = Some(cat.clone()),
            Some(current) if current != cat => {
                return Err(malformed(format!(
                    "loop_ mixes categories {current} and {cat}"
                )));
            }
            Some(_) => {}
        }
        if items.contains(item) {
            return Err(malformed(format!(
                "loop_ repeats item _{cat}.{item}"
            )));
        }
        items.push(item.clone());
        pos += 1;
    }
    let category = category.ok_or_else(|| malformed("loop_ without items".to_string()))?;

    let mut values: Vec<Option<String>> = Vec::new();
    while let Some(Token::Value(value)) = tokens.get(pos) {
        values.push(value.clone());
        pos += 1;
    }
    if values.is_empty() {
        return Err(malformed(format!("loop_ over {category} has no rows")));
    }
    if values.len() % items.len() != 0 {
        return Err(malformed(format!(
            "loop_ over {category} has {} values for {} items",
            values.len(),
            items.len()
        )));
    }

    let builder = builders
        .entry(category)
        .or_insert_with(CategoryBuilder::new);
    for row in values.chunks(items.len()) {
        builder.push_row(block, items.iter().map(String::as_str).zip(row.iter().cloned()));
    }
    Ok(pos)
}

fn flush_singles(
    builders: &mut BTreeMap<String, CategoryBuilder>,
    block: Option<&str>,
    singles: &mut BTreeMap<String, Vec<(String, Option<String>)>>,
) -> Result<()> {
    if singles.is_empty() {
        return Ok(());
    }
    let block = block.ok_or_else(|| malformed("items before the first data block".to_string()))?;
    for (category, items) in std::mem::take(singles) {
        let builder = builders
            .entry(category)
            .or_insert_with(CategoryBuilder::new);
        builder.push_row(block, items.iter().map(|(item, value)| (item.as_str(), value.clone())));
    }
    Ok(())
}

/// Column-oriented accumulator for one category across all blocks.
///
/// Columns appear in first-seen order after [`BLOCK_COLUMN`]; rows missing
/// a column and rows predating a column's first appearance are null-padded.
struct CategoryBuilder {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl CategoryBuilder {
    fn new() -> Self {
        Self {
            columns: vec![BLOCK_COLUMN.to_string()],
            rows: Vec::new(),
        }
    }

    fn column_index(&mut self, name: &str) -> usize {
        if let Some(idx) = self.columns.iter().position(|c| c == name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(None);
        }
        self.columns.len() - 1
    }

    fn push_row<'a>(
        &mut self,
        block: &str,
        values: impl Iterator<Item = (&'a str, Option<String>)>,
    ) {
        let mut row = vec![None; self.columns.len()];
        row[0] = Some(block.to_string());
        for (name, value) in values {
            let idx = self.column_index(name);
            if idx >= row.len() {
                row.resize(self.columns.len(), None);
            }
            row[idx] = value;
        }
        row.resize(self.columns.len(), None);
        self.rows.push(row);
    }

    fn into_frame(self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for (idx, name) in self.columns.iter().enumerate() {
            let values: Vec<Option<String>> =
                self.rows.iter().map(|row| row[idx].clone()).collect();
            let series = Series::new(name.as_str().into(), values);
            columns.push(series.into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut lines = text.lines();
    while let Some(line) = lines.next() {
        if let Some(first) = line.strip_prefix(';') {
            // Multiline text field, terminated by a line starting with `;`.
            let mut body = String::from(first);
            let mut closed = false;
            for cont in lines.by_ref() {
                if cont.starts_with(';') {
                    closed = true;
                    break;
                }
                if !body.is_empty() {
                    body.push('\n');
                }
                body.push_str(cont);
            }
            if !closed {
                return Err(malformed("unterminated multiline value".to_string()));
            }
            tokens.push(Token::Value(Some(body.trim().to_string())));
            continue;
        }
        for field in split_line(line)? {
            tokens.push(classify(field)?);
        }
    }
    Ok(tokens)
}

/// Split one line into whitespace-separated fields, honoring single and
/// double quotes and stopping at a comment marker.
fn split_line(line: &str) -> Result<Vec<Field>> {
    let mut fields = Vec::new();
    let mut chars = line.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        if c == '#' {
            break;
        }
        if c == '\'' || c == '"' {
            chars.next();
            let mut value = String::new();
            let mut closed = false;
            while let Some(ch) = chars.next() {
                // A closing quote only counts when followed by whitespace
                // or end of line, so embedded quotes survive.
                if ch == c && chars.peek().is_none_or(|next| next.is_whitespace()) {
                    closed = true;
                    break;
                }
                value.push(ch);
            }
            if !closed {
                return Err(malformed(format!("unterminated quote in line: {line}")));
            }
            fields.push(Field::Text(value));
        } else {
            let mut value = String::new();
            while let Some(&ch) = chars.peek() {
                if ch.is_whitespace() {
                    break;
                }
                value.push(ch);
                chars.next();
            }
            fields.push(Field::Plain(value));
        }
    }
    Ok(fields)
}

fn classify(field: Field) -> Result<Token> {
    let plain = match field {
        Field::Text(value) => return Ok(Token::Value(Some(value))),
        Field::Plain(value) => value,
    };
    if let Some(code) = plain.strip_prefix("data_") {
        return Ok(Token::Block(code.to_string()));
    }
    if plain == "loop_" {
        return Ok(Token::Loop);
    }
    if let Some(tag) = plain.strip_prefix('_') {
        let (category, item) = tag.split_once('.').ok_or_else(|| {
            malformed(format!("item _{tag} has no category qualifier"))
        })?;
        return Ok(Token::Tag {
            category: category.to_string(),
            item: item.to_string(),
        });
    }
    // `.` and `?` are the CIF null and unknown markers.
    if plain == "." || plain == "?" {
        return Ok(Token::Value(None));
    }
    Ok(Token::Value(Some(plain)))
}

fn malformed(detail: String) -> DataError {
    DataError::data_quality(DATASET, detail)
}
