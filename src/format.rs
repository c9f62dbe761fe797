//! # Document Formats
//!
//! Every file the engine touches is parsed into a `serde_json::Value` and
//! rendered back from one. This module owns the mapping between file content
//! and that document model.
//!
//! ## Supported Formats
//!
//! - JSON (`.json`) - pretty-printed with two-space indentation
//! - YAML (`.yml`, `.yaml`) - via `serde_yaml`
//! - TOML (`.toml`) - via `toml`, then normalized with `taplo`'s formatter
//! - INI (`.ini`, `.cfg`) - via `rust-ini`; top-level scalars form the general
//!   section and object members form named sections
//! - XML (`.xml`) - an element tree of `{type, name, attributes, elements}`
//!   nodes, read and written with `quick-xml`
//! - Text (anything else) - a sequence of lines
//!
//! Rendered output always ends with a newline so that re-rendering an
//! unchanged document reproduces the file byte for byte.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Number, Value};

use crate::error::{Error, Result};

/// File format of a target or fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    #[serde(alias = "yml")]
    Yaml,
    Toml,
    Ini,
    Xml,
    #[serde(alias = "txt")]
    Text,
}

impl Format {
    /// Formats probed, in order, when looking for a fragment file by name.
    pub const PROBE_ORDER: [Format; 6] = [
        Format::Json,
        Format::Yaml,
        Format::Toml,
        Format::Ini,
        Format::Xml,
        Format::Text,
    ];

    /// Detect a format from a file extension; unknown extensions are text.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Format {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("json") => Format::Json,
            Some("yml") | Some("yaml") => Format::Yaml,
            Some("toml") => Format::Toml,
            Some("ini") | Some("cfg") => Format::Ini,
            Some("xml") => Format::Xml,
            _ => Format::Text,
        }
    }

    /// File extensions belonging to this format, preferred first.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Json => &["json"],
            Format::Yaml => &["yml", "yaml"],
            Format::Toml => &["toml"],
            Format::Ini => &["ini", "cfg"],
            Format::Xml => &["xml"],
            Format::Text => &["txt", "md"],
        }
    }

    /// Lowercase name, as written in task definitions.
    pub fn name(self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
            Format::Ini => "ini",
            Format::Xml => "xml",
            Format::Text => "text",
        }
    }

    /// Parse file content into a document.
    pub fn parse(self, content: &str) -> Result<Value> {
        match self {
            Format::Json => serde_json::from_str(content).map_err(|e| Error::format("JSON", e)),
            Format::Yaml => {
                if content.trim().is_empty() {
                    return Ok(Value::Null);
                }
                serde_yaml::from_str(content).map_err(|e| Error::format("YAML", e))
            }
            Format::Toml => {
                let table: toml::Table =
                    toml::from_str(content).map_err(|e| Error::format("TOML", e))?;
                Ok(toml_to_json(toml::Value::Table(table)))
            }
            Format::Ini => parse_ini(content),
            Format::Xml => parse_xml(content),
            Format::Text => Ok(Value::Array(
                content
                    .lines()
                    .map(|line| Value::String(line.to_string()))
                    .collect(),
            )),
        }
    }

    /// Render a document as file content.
    pub fn render(self, document: &Value) -> Result<String> {
        let rendered = match self {
            Format::Json => {
                serde_json::to_string_pretty(document).map_err(|e| Error::format("JSON", e))?
            }
            Format::Yaml => {
                serde_yaml::to_string(document).map_err(|e| Error::format("YAML", e))?
            }
            Format::Toml => render_toml(document)?,
            Format::Ini => render_ini(document)?,
            Format::Xml => render_xml(document)?,
            Format::Text => render_text(document)?,
        };
        Ok(ensure_trailing_newline(rendered))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" => Ok(Format::Toml),
            "ini" => Ok(Format::Ini),
            "xml" => Ok(Format::Xml),
            "text" | "txt" => Ok(Format::Text),
            other => Err(Error::format(other, "unknown format")),
        }
    }
}

fn ensure_trailing_newline(mut content: String) -> String {
    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    content
}

/// Text form of a scalar, used where a format only stores strings.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// Text

fn render_text(document: &Value) -> Result<String> {
    match document {
        Value::Array(lines) => Ok(lines.iter().map(scalar_text).collect::<Vec<_>>().join("\n")),
        Value::String(text) => Ok(text.clone()),
        Value::Null => Ok(String::new()),
        other => Err(Error::format(
            "text",
            format!(
                "expected a sequence of lines, found {}",
                crate::merge::deep::type_name(other)
            ),
        )),
    }
}

// TOML

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(text) => Value::String(text),
        toml::Value::Integer(number) => Value::Number(number.into()),
        toml::Value::Float(number) => Number::from_f64(number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(flag) => Value::Bool(flag),
        toml::Value::Datetime(datetime) => Value::String(datetime.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(key, item)| (key, toml_to_json(item)))
                .collect(),
        ),
    }
}

/// Convert a document to TOML; `null` has no TOML spelling and is dropped.
fn json_to_toml(value: &Value) -> Option<toml::Value> {
    match value {
        Value::Null => None,
        Value::Bool(flag) => Some(toml::Value::Boolean(*flag)),
        Value::Number(number) => Some(match number.as_i64() {
            Some(integer) => toml::Value::Integer(integer),
            None => toml::Value::Float(number.as_f64().unwrap_or_default()),
        }),
        Value::String(text) => Some(toml::Value::String(text.clone())),
        Value::Array(items) => Some(toml::Value::Array(
            items.iter().filter_map(json_to_toml).collect(),
        )),
        Value::Object(map) => Some(toml::Value::Table(
            map.iter()
                .filter_map(|(key, item)| json_to_toml(item).map(|item| (key.clone(), item)))
                .collect(),
        )),
    }
}

fn render_toml(document: &Value) -> Result<String> {
    let table = match json_to_toml(document) {
        Some(toml::Value::Table(table)) => table,
        None => toml::Table::new(),
        Some(_) => return Err(Error::format("TOML", "document root must be a table")),
    };
    let serialized = toml::to_string_pretty(&table).map_err(|e| Error::format("TOML", e))?;
    Ok(taplo::formatter::format(
        &serialized,
        taplo::formatter::Options::default(),
    ))
}

// INI

fn parse_ini(content: &str) -> Result<Value> {
    let ini = ini::Ini::load_from_str(content).map_err(|e| Error::format("INI", e))?;
    let mut document = Map::new();
    for (section, properties) in ini.iter() {
        let entries: Map<String, Value> = properties
            .iter()
            .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
            .collect();
        match section {
            None => document.extend(entries),
            Some(name) => {
                document.insert(name.to_string(), Value::Object(entries));
            }
        }
    }
    Ok(Value::Object(document))
}

fn render_ini(document: &Value) -> Result<String> {
    let Value::Object(map) = document else {
        return Err(Error::format("INI", "document root must be a mapping"));
    };

    let mut ini = ini::Ini::new();
    for (key, value) in map.iter().filter(|(_, value)| !value.is_object()) {
        ini.with_general_section()
            .set(key.as_str(), scalar_text(value));
    }
    for (name, value) in map {
        if let Value::Object(section) = value {
            for (key, item) in section {
                ini.with_section(Some(name.as_str()))
                    .set(key.as_str(), scalar_text(item));
            }
        }
    }

    let mut buffer = Vec::new();
    ini.write_to(&mut buffer)?;
    String::from_utf8(buffer).map_err(|e| Error::format("INI", e))
}

// XML

fn xml_error(cause: impl fmt::Display) -> Error {
    Error::format("XML", cause)
}

fn lossy(bytes: &[u8]) -> Value {
    Value::String(String::from_utf8_lossy(bytes).into_owned())
}

fn parse_xml(content: &str) -> Result<Value> {
    let mut reader = Reader::from_str(content);

    let mut document = Map::new();
    let mut top_level: Vec<Value> = Vec::new();
    let mut open: Vec<Map<String, Value>> = Vec::new();

    loop {
        let node = match reader.read_event().map_err(xml_error)? {
            Event::Eof => break,
            Event::Decl(decl) => {
                document.insert("declaration".to_string(), declaration(&decl)?);
                continue;
            }
            Event::Start(start) => {
                open.push(element(&start)?);
                continue;
            }
            Event::End(_) => Value::Object(
                open.pop()
                    .ok_or_else(|| xml_error("closing tag without an opening tag"))?,
            ),
            Event::Empty(start) => Value::Object(element(&start)?),
            Event::Text(text) => {
                let text = text.unescape().map_err(xml_error)?;
                // indentation between elements is not content
                if text.trim().is_empty() {
                    continue;
                }
                json!({"type": "text", "text": text.as_ref()})
            }
            Event::CData(data) => json!({"type": "cdata", "cdata": lossy(&data)}),
            Event::Comment(comment) => json!({"type": "comment", "comment": lossy(&comment)}),
            Event::DocType(doctype) => json!({"type": "doctype", "doctype": lossy(&doctype)}),
            Event::PI(_) => continue,
        };

        match open.last_mut() {
            Some(parent) => {
                let slot = parent
                    .entry("elements")
                    .or_insert_with(|| Value::Array(Vec::new()));
                if let Value::Array(children) = slot {
                    children.push(node);
                }
            }
            None => top_level.push(node),
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(xml_error(format!(
            "unclosed element {}",
            unclosed.get("name").map(scalar_text).unwrap_or_default()
        )));
    }
    if !top_level.is_empty() {
        document.insert("elements".to_string(), Value::Array(top_level));
    }
    Ok(Value::Object(document))
}

fn declaration(decl: &BytesDecl) -> Result<Value> {
    let mut attributes = Map::new();
    let version = decl.version().map_err(xml_error)?;
    attributes.insert("version".to_string(), lossy(&version));
    if let Some(encoding) = decl.encoding() {
        let encoding = encoding.map_err(xml_error)?;
        attributes.insert("encoding".to_string(), lossy(&encoding));
    }
    if let Some(standalone) = decl.standalone() {
        let standalone = standalone.map_err(xml_error)?;
        attributes.insert("standalone".to_string(), lossy(&standalone));
    }
    Ok(json!({ "attributes": attributes }))
}

fn element(start: &BytesStart) -> Result<Map<String, Value>> {
    let mut node = Map::new();
    node.insert("type".to_string(), json!("element"));
    node.insert("name".to_string(), lossy(start.name().as_ref()));

    let mut attributes = Map::new();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(xml_error)?;
        let value = attribute.unescape_value().map_err(xml_error)?;
        attributes.insert(
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            Value::String(value.into_owned()),
        );
    }
    if !attributes.is_empty() {
        node.insert("attributes".to_string(), Value::Object(attributes));
    }
    Ok(node)
}

fn render_xml(document: &Value) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    if let Some(decl) = document.get("declaration") {
        let attribute = |key: &str| {
            decl.get("attributes")
                .and_then(|attributes| attributes.get(key))
                .and_then(Value::as_str)
        };
        let version = attribute("version").unwrap_or("1.0");
        writer
            .write_event(Event::Decl(BytesDecl::new(
                version,
                attribute("encoding"),
                attribute("standalone"),
            )))
            .map_err(xml_error)?;
    }

    if let Some(Value::Array(nodes)) = document.get("elements") {
        for node in nodes {
            write_xml_node(&mut writer, node)?;
        }
    }

    String::from_utf8(writer.into_inner()).map_err(xml_error)
}

fn write_xml_node(writer: &mut Writer<Vec<u8>>, node: &Value) -> Result<()> {
    let field = |key: &str| node.get(key).and_then(Value::as_str).unwrap_or_default();

    let event = match node.get("type").and_then(Value::as_str) {
        Some("element") => {
            let name = node
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| xml_error("element without a name"))?;
            let mut start = BytesStart::new(name);
            if let Some(Value::Object(attributes)) = node.get("attributes") {
                for (key, value) in attributes {
                    let value = scalar_text(value);
                    start.push_attribute((key.as_str(), value.as_str()));
                }
            }
            match node.get("elements") {
                Some(Value::Array(children)) if !children.is_empty() => {
                    writer.write_event(Event::Start(start)).map_err(xml_error)?;
                    for child in children {
                        write_xml_node(writer, child)?;
                    }
                    Event::End(BytesEnd::new(name))
                }
                _ => Event::Empty(start),
            }
        }
        Some("text") => Event::Text(BytesText::new(field("text"))),
        Some("cdata") => Event::CData(BytesCData::new(field("cdata"))),
        Some("comment") => Event::Comment(BytesText::from_escaped(field("comment"))),
        Some("doctype") => Event::DocType(BytesText::from_escaped(field("doctype"))),
        other => {
            return Err(xml_error(format!(
                "unknown node type {}",
                other.unwrap_or("<missing>")
            )))
        }
    };
    writer.write_event(event).map_err(xml_error)
}
