//
//  redmine-api
//  serializer/xml.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! XML structural serializer.
//!
//! ## Decoding
//!
//! Any well-formed document decodes to `{root_name: content}`, where the
//! content of an element is:
//!
//! - a string, for an element without attributes or children (`""` if empty)
//! - otherwise a mapping holding the attributes under `"@attributes"`, one key
//!   per child tag (a tag repeated among siblings becomes a sequence) and any
//!   non-blank text under `"#text"`
//!
//! ## Encoding
//!
//! The value must be a mapping with a single key naming the root element.
//! Children of the root follow Redmine's conventions, checked in this order:
//!
//! | Key / value | Output |
//! |-------------|--------|
//! | `custom_fields` + sequence | `<custom_fields type="array"><custom_field id=".." ..>` |
//! | `uploads` + sequence | `<uploads type="array"><upload>..</upload></uploads>` |
//! | special plural + sequence | `<role_ids type="array"><role_id>..</role_id></role_ids>` |
//! | other sequence | `<key type="array"><key>..</key></key>` |
//! | scalar | `<key>text</key>` |
//! | mapping | nested element |
//!
//! Below the root's children, and directly under a root that carries
//! `"@attributes"`, a sequence repeats its key as sibling elements instead.
//! That is the shape decoding produces, so decoded documents re-encode to
//! equivalent XML.
//!
//! The tree is built first and written with quick-xml only once every
//! diagnostic has been collected.

use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use serde_json::{Map, Value};

use super::SerializerError;

/// Sequence keys whose items use a different tag than the key itself.
const SPECIAL_PLURALS: &[(&str, &str)] = &[
    ("enabled_module_names", "enabled_module_names"),
    ("issue_custom_field_ids", "issue_custom_field"),
    ("role_ids", "role_id"),
    ("tracker_ids", "tracker"),
    ("user_ids", "user_id"),
    ("watcher_user_ids", "watcher_user_id"),
];

const ATTRIBUTES_KEY: &str = "@attributes";
const TEXT_KEY: &str = "#text";

/// An XML document together with its normalized form.
///
/// # Example
///
/// ```rust
/// use redmine_api::serializer::XmlSerializer;
/// use serde_json::json;
///
/// let serializer = XmlSerializer::from_value(json!({
///     "group": {"name": "Group Name", "user_ids": [1, 2, 3]}
/// }))?;
///
/// assert!(serializer.encoded().contains(
///     r#"<user_ids type="array"><user_id>1</user_id><user_id>2</user_id><user_id>3</user_id></user_ids>"#
/// ));
///
/// let decoded = XmlSerializer::from_xml(serializer.encoded())?;
/// assert_eq!(decoded.normalized()["group"]["name"], "Group Name");
/// # Ok::<(), redmine_api::serializer::SerializerError>(())
/// ```
#[derive(Debug, Clone)]
pub struct XmlSerializer {
    encoded: String,
    normalized: Value,
}

impl XmlSerializer {
    /// Decodes an XML document.
    ///
    /// # Errors
    ///
    /// Returns a [`SerializerError`] starting with `String could not be parsed
    /// as XML` for empty documents, malformed markup, mismatched or unclosed
    /// tags, unknown entities and content after the root element.
    pub fn from_xml(data: &str) -> Result<Self, SerializerError> {
        let root = parse_document(data).map_err(|diagnostics| {
            SerializerError::new(format!(
                "String could not be parsed as XML: {}",
                diagnostics.join(", ")
            ))
        })?;

        let mut normalized = Map::new();
        normalized.insert(root.name.clone(), root.to_value());

        Ok(Self {
            encoded: data.to_string(),
            normalized: Value::Object(normalized),
        })
    }

    /// Encodes a normalized value.
    ///
    /// # Errors
    ///
    /// Returns a [`SerializerError`] starting with `Could not create XML from
    /// array` listing every problem found: a root that is not a single-key
    /// mapping, invalid element or attribute names, characters XML 1.0 does
    /// not allow, or malformed custom field and upload entries.
    pub fn from_value(normalized: Value) -> Result<Self, SerializerError> {
        let mut diagnostics = Vec::new();
        let root = build_document(&normalized, &mut diagnostics);

        if let Some(root) = &root {
            root.validate(&mut diagnostics);
        }

        let root = match root {
            Some(root) if diagnostics.is_empty() => root,
            _ => return Err(encode_error(&diagnostics)),
        };

        let encoded = write_document(&root).map_err(|e| encode_error(&[e]))?;

        Ok(Self {
            encoded,
            normalized,
        })
    }

    /// The XML text.
    pub fn encoded(&self) -> &str {
        &self.encoded
    }

    /// The normalized value.
    pub fn normalized(&self) -> &Value {
        &self.normalized
    }

    /// Consumes the serializer and returns the normalized value.
    pub fn into_normalized(self) -> Value {
        self.normalized
    }
}

fn encode_error(diagnostics: &[String]) -> SerializerError {
    let quoted: Vec<String> = diagnostics.iter().map(|d| format!("\"{}\"", d)).collect();
    SerializerError::new(format!(
        "Could not create XML from array: {}",
        quoted.join(", ")
    ))
}

/// A node of the document tree.
#[derive(Debug, Clone, Default, PartialEq)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn with_attribute(mut self, key: &str, value: impl Into<String>) -> Self {
        self.attributes.push((key.to_string(), value.into()));
        self
    }

    fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    fn to_value(&self) -> Value {
        if self.attributes.is_empty() && self.children.is_empty() {
            return Value::String(self.text.clone());
        }

        let mut map = Map::new();
        if !self.attributes.is_empty() {
            let attributes = self
                .attributes
                .iter()
                .map(|(key, value)| (key.clone(), Value::String(value.clone())))
                .collect();
            map.insert(ATTRIBUTES_KEY.to_string(), Value::Object(attributes));
        }

        for child in &self.children {
            let value = child.to_value();
            // Element contents are never sequences, so a sequence here is an
            // earlier group of same-named siblings.
            match map.get_mut(&child.name) {
                Some(Value::Array(items)) => items.push(value),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, value]);
                }
                None => {
                    map.insert(child.name.clone(), value);
                }
            }
        }

        if !self.text.trim().is_empty() {
            map.insert(TEXT_KEY.to_string(), Value::String(self.text.clone()));
        }

        Value::Object(map)
    }

    fn validate(&self, diagnostics: &mut Vec<String>) {
        if !is_valid_name(&self.name) {
            diagnostics.push(format!("StartTag: invalid element name '{}'", self.name));
        }
        for (key, value) in &self.attributes {
            if !is_valid_name(key) {
                diagnostics.push(format!("invalid attribute name '{}' in <{}>", key, self.name));
            }
            if let Some(c) = invalid_char(value) {
                diagnostics.push(format!(
                    "char U+{:04X} out of range in attribute '{}' of <{}>",
                    c as u32, key, self.name
                ));
            }
        }
        if let Some(c) = invalid_char(&self.text) {
            diagnostics.push(format!(
                "char U+{:04X} out of range in <{}>",
                c as u32, self.name
            ));
        }
        for child in &self.children {
            child.validate(diagnostics);
        }
    }
}

/// An element whose end tag has not been read yet.
struct OpenElement {
    element: Element,
    /// Text with entity references still escaped.
    raw_text: String,
}

fn parse_document(data: &str) -> Result<Element, Vec<String>> {
    let mut reader = Reader::from_str(data);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<Element> = None;
    let mut diagnostics = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => {
                diagnostics.push(format!("{} at position {}", e, reader.buffer_position()));
                break;
            }
        };

        match event {
            Event::Start(_) | Event::Empty(_) if root.is_some() && stack.is_empty() => {
                diagnostics.push("Extra content at the end of the document".to_string());
                break;
            }
            Event::Start(start) => match open_element(&start) {
                Ok(element) => stack.push(OpenElement {
                    element,
                    raw_text: String::new(),
                }),
                Err(e) => {
                    diagnostics.push(e);
                    break;
                }
            },
            Event::Empty(start) => match open_element(&start) {
                Ok(element) => attach(element, &mut stack, &mut root),
                Err(e) => {
                    diagnostics.push(e);
                    break;
                }
            },
            Event::End(_) => {
                let Some(open) = stack.pop() else {
                    diagnostics.push("Unexpected end tag".to_string());
                    break;
                };
                match close_element(open) {
                    Ok(element) => attach(element, &mut stack, &mut root),
                    Err(e) => {
                        diagnostics.push(e);
                        break;
                    }
                }
            }
            Event::Text(text) => {
                let text = String::from_utf8_lossy(&text);
                match stack.last_mut() {
                    Some(open) => open.raw_text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None if root.is_some() => {
                        diagnostics.push("Extra content at the end of the document".to_string());
                        break;
                    }
                    None => {
                        diagnostics.push("Start tag expected, '<' not found".to_string());
                        break;
                    }
                }
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata).into_owned();
                match stack.last_mut() {
                    Some(open) => open.raw_text.push_str(&escape(content.as_str())),
                    None => {
                        diagnostics.push("CDATA section outside of the root element".to_string());
                        break;
                    }
                }
            }
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(&reference).into_owned();
                match stack.last_mut() {
                    Some(open) => {
                        open.raw_text.push('&');
                        open.raw_text.push_str(&name);
                        open.raw_text.push(';');
                    }
                    None => {
                        diagnostics.push(format!("Entity '{}' outside of the root element", name));
                        break;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if diagnostics.is_empty() {
        if let Some(open) = stack.last() {
            diagnostics.push(format!(
                "Premature end of data in tag {}",
                open.element.name
            ));
        } else if root.is_none() {
            diagnostics.push("Document is empty".to_string());
        }
    }

    match root {
        Some(root) if diagnostics.is_empty() => Ok(root),
        _ => Err(diagnostics),
    }
}

fn open_element(start: &BytesStart) -> Result<Element, String> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let raw = String::from_utf8_lossy(&attribute.value).into_owned();
        let value = unescape(&raw).map_err(|e| e.to_string())?;
        element.attributes.push((key, value.into_owned()));
    }

    Ok(element)
}

fn close_element(open: OpenElement) -> Result<Element, String> {
    let mut element = open.element;
    element.text = unescape(&open.raw_text)
        .map_err(|e| format!("{} in <{}>", e, element.name))?
        .into_owned();
    Ok(element)
}

fn attach(element: Element, stack: &mut [OpenElement], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(element),
        None => *root = Some(element),
    }
}

fn build_document(value: &Value, diagnostics: &mut Vec<String>) -> Option<Element> {
    let Value::Object(map) = value else {
        diagnostics.push("the root value must be a mapping".to_string());
        return None;
    };

    let mut entries = map.iter();
    let (name, content) = match (entries.next(), entries.next()) {
        (Some(entry), None) => entry,
        _ => {
            diagnostics.push(format!(
                "expected exactly one root element, found {}",
                map.len()
            ));
            return None;
        }
    };

    let mut root = Element::new(name.as_str());
    match content {
        Value::Object(params) => {
            let repeated = params.contains_key(ATTRIBUTES_KEY);
            fill(&mut root, params, repeated, diagnostics)
        }
        Value::Array(_) => diagnostics.push(format!(
            "the content of root element '{}' must be a mapping or a scalar",
            name
        )),
        scalar => root.text = scalar_text(scalar, name, diagnostics),
    }

    Some(root)
}

/// Adds `params` to `element`.
///
/// With `repeated` set, a sequence becomes one sibling `<key>` per item, the
/// way decoding produced it. Otherwise the Redmine sequence rules apply.
fn fill(
    element: &mut Element,
    params: &Map<String, Value>,
    repeated: bool,
    diagnostics: &mut Vec<String>,
) {
    for (key, value) in params {
        match (key.as_str(), value) {
            (ATTRIBUTES_KEY, Value::Object(attributes)) => {
                for (name, value) in attributes {
                    let text = scalar_text(value, name, diagnostics);
                    element.attributes.push((name.clone(), text));
                }
            }
            (TEXT_KEY, text) => element.text = scalar_text(text, &element.name, diagnostics),
            (key, Value::Array(items)) if repeated => repeat(element, key, items, diagnostics),
            ("custom_fields", Value::Array(fields)) => {
                element.children.push(custom_fields(fields, diagnostics));
            }
            ("uploads", Value::Array(uploads)) => {
                element.children.push(upload_list(uploads, diagnostics));
            }
            (key, Value::Array(items)) => {
                let item_name = SPECIAL_PLURALS
                    .iter()
                    .find(|(plural, _)| *plural == key)
                    .map_or(key, |(_, singular)| *singular);
                element.children.push(array(key, item_name, items, diagnostics));
            }
            (key, Value::Object(nested)) => {
                let mut child = Element::new(key);
                fill(&mut child, nested, true, diagnostics);
                element.children.push(child);
            }
            (key, scalar) => {
                let text = scalar_text(scalar, key, diagnostics);
                element.children.push(Element::new(key).with_text(text));
            }
        }
    }
}

fn repeat(element: &mut Element, key: &str, items: &[Value], diagnostics: &mut Vec<String>) {
    for item in items {
        match item {
            Value::Object(nested) => {
                let mut child = Element::new(key);
                fill(&mut child, nested, true, diagnostics);
                element.children.push(child);
            }
            Value::Array(nested) => repeat(element, key, nested, diagnostics),
            scalar => {
                let text = scalar_text(scalar, key, diagnostics);
                element.children.push(Element::new(key).with_text(text));
            }
        }
    }
}

fn array(name: &str, item_name: &str, items: &[Value], diagnostics: &mut Vec<String>) -> Element {
    let mut list = Element::new(name).with_attribute("type", "array");

    for item in items {
        let child = match item {
            Value::Object(nested) => {
                let mut child = Element::new(item_name);
                fill(&mut child, nested, true, diagnostics);
                child
            }
            Value::Array(nested) => array(item_name, item_name, nested, diagnostics),
            scalar => Element::new(item_name).with_text(scalar_text(scalar, item_name, diagnostics)),
        };
        list.children.push(child);
    }

    list
}

fn custom_fields(fields: &[Value], diagnostics: &mut Vec<String>) -> Element {
    let mut list = Element::new("custom_fields").with_attribute("type", "array");

    for field in fields {
        let Value::Object(field) = field else {
            diagnostics.push("custom field entries must be mappings".to_string());
            continue;
        };

        let mut element = Element::new("custom_field");
        for attribute in ["name", "field_format", "id"] {
            if let Some(value) = field.get(attribute).filter(|v| !v.is_null()) {
                let text = scalar_text(value, attribute, diagnostics);
                element = element.with_attribute(attribute, text);
            }
        }

        let value = match field.get("value") {
            Some(Value::Object(upload)) if upload.contains_key("token") => {
                element = element.with_attribute("multiple", "true");
                let mut value = Element::new("value");
                for (key, item) in upload {
                    let text = scalar_text(item, key, diagnostics);
                    value.children.push(Element::new(key.as_str()).with_text(text));
                }
                value
            }
            Some(Value::Object(values)) => {
                element = element.with_attribute("multiple", "true");
                let values: Vec<Value> = values.values().cloned().collect();
                array("value", "value", &values, diagnostics)
            }
            Some(Value::Array(values)) => {
                element = element.with_attribute("multiple", "true");
                array("value", "value", values, diagnostics)
            }
            Some(scalar) => Element::new("value").with_text(scalar_text(scalar, "value", diagnostics)),
            None => Element::new("value"),
        };

        element.children.push(value);
        list.children.push(element);
    }

    list
}

fn upload_list(uploads: &[Value], diagnostics: &mut Vec<String>) -> Element {
    let mut list = Element::new("uploads").with_attribute("type", "array");

    for upload in uploads {
        match upload {
            Value::Object(descriptor) => {
                let mut item = Element::new("upload");
                fill(&mut item, descriptor, true, diagnostics);
                list.children.push(item);
            }
            _ => diagnostics.push("upload entries must be mappings".to_string()),
        }
    }

    list
}

fn scalar_text(value: &Value, context: &str, diagnostics: &mut Vec<String>) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.clone(),
        Value::Array(_) | Value::Object(_) => {
            diagnostics.push(format!("'{}' must be a scalar value", context));
            String::new()
        }
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | ':' | '-' | '.'))
}

fn invalid_char(text: &str) -> Option<char> {
    text.chars().find(|c| {
        matches!(
            *c,
            '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}'
        )
    })
}

fn write_document(root: &Element) -> Result<String, String> {
    let mut writer = Writer::new(Vec::new());

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", None, None)))
        .map_err(|e| e.to_string())?;
    writer
        .write_event(Event::Text(BytesText::new("\n")))
        .map_err(|e| e.to_string())?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|e| e.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.text.is_empty() && element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| e.to_string());
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| e.to_string())?;
    if !element.text.is_empty() {
        writer
            .write_event(Event::Text(BytesText::new(&element.text)))
            .map_err(|e| e.to_string())?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Compares two documents by their decoded structure.
    fn assert_xml_eq(actual: &str, expected: &str) {
        let actual = XmlSerializer::from_xml(actual).unwrap();
        let expected = XmlSerializer::from_xml(expected).unwrap();
        assert_eq!(actual.normalized(), expected.normalized());
    }

    fn encode(value: Value) -> String {
        XmlSerializer::from_value(value).unwrap().encoded().to_string()
    }

    #[test]
    fn test_empty_document_fails() {
        let err = XmlSerializer::from_xml("").unwrap_err();
        assert!(err.to_string().starts_with("String could not be parsed as XML"));
        assert!(err.to_string().contains("Document is empty"));
    }

    #[test]
    fn test_mismatched_tags_fail() {
        let err = XmlSerializer::from_xml("<issue><id>1</subject></issue>").unwrap_err();
        assert!(err.to_string().starts_with("String could not be parsed as XML"));
    }

    #[test]
    fn test_unclosed_document_fails() {
        let err = XmlSerializer::from_xml("<?xml version=\"1.0\"?><issue><id>1</id>").unwrap_err();
        assert!(err.to_string().starts_with("String could not be parsed as XML"));
        assert!(err.to_string().contains("issue"));
    }

    #[test]
    fn test_text_outside_root_fails() {
        let err = XmlSerializer::from_xml("not xml").unwrap_err();
        assert!(err.to_string().contains("Start tag expected"));

        let err = XmlSerializer::from_xml("<a/><b/>").unwrap_err();
        assert!(err.to_string().contains("Extra content"));
    }

    #[test]
    fn test_decode_list_response() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<issues type="array" total_count="2" offset="0" limit="25">
  <issue>
    <id>4326</id>
    <project id="1" name="Redmine"/>
    <description></description>
  </issue>
  <issue>
    <id>4325</id>
    <project id="1" name="Redmine"/>
    <description>Second</description>
  </issue>
</issues>"#;

        let normalized = XmlSerializer::from_xml(xml).unwrap().into_normalized();

        assert_eq!(
            normalized,
            json!({
                "issues": {
                    "@attributes": {"type": "array", "total_count": "2", "offset": "0", "limit": "25"},
                    "issue": [
                        {"id": "4326", "project": {"@attributes": {"id": "1", "name": "Redmine"}}, "description": ""},
                        {"id": "4325", "project": {"@attributes": {"id": "1", "name": "Redmine"}}, "description": "Second"},
                    ]
                }
            })
        );
    }

    #[test]
    fn test_decode_entities_and_cdata() {
        let xml = "<note><text>Tom &amp; Jerry &#60;3</text><raw><![CDATA[a < b & c]]></raw></note>";
        let normalized = XmlSerializer::from_xml(xml).unwrap().into_normalized();

        assert_eq!(normalized["note"]["text"], "Tom & Jerry <3");
        assert_eq!(normalized["note"]["raw"], "a < b & c");
    }

    #[test]
    fn test_decode_text_with_attributes() {
        let xml = r#"<custom_field id="3" name="Build">1.2</custom_field>"#;
        let normalized = XmlSerializer::from_xml(xml).unwrap().into_normalized();

        assert_eq!(normalized["custom_field"]["@attributes"]["id"], "3");
        assert_eq!(normalized["custom_field"]["#text"], "1.2");
    }

    #[test]
    fn test_encode_special_plural() {
        let encoded = encode(json!({"group": {"name": "Group Name", "user_ids": [1, 2, 3]}}));

        assert!(encoded.starts_with("<?xml version=\"1.0\"?>"));
        assert_xml_eq(
            &encoded,
            r#"<?xml version="1.0"?><group><name>Group Name</name><user_ids type="array"><user_id>1</user_id><user_id>2</user_id><user_id>3</user_id></user_ids></group>"#,
        );
    }

    #[test]
    fn test_encode_project_arrays() {
        let encoded = encode(json!({
            "project": {
                "name": "Test",
                "tracker_ids": [1, 2],
                "enabled_module_names": ["wiki", "issue_tracking"],
                "issue_custom_field_ids": [4],
                "homepage_urls": ["a", "b"],
            }
        }));

        assert_xml_eq(
            &encoded,
            r#"<project>
                <name>Test</name>
                <tracker_ids type="array"><tracker>1</tracker><tracker>2</tracker></tracker_ids>
                <enabled_module_names type="array"><enabled_module_names>wiki</enabled_module_names><enabled_module_names>issue_tracking</enabled_module_names></enabled_module_names>
                <issue_custom_field_ids type="array"><issue_custom_field>4</issue_custom_field></issue_custom_field_ids>
                <homepage_urls type="array"><homepage_urls>a</homepage_urls><homepage_urls>b</homepage_urls></homepage_urls>
            </project>"#,
        );
    }

    #[test]
    fn test_encode_custom_fields() {
        let encoded = encode(json!({
            "issue": {
                "custom_fields": [
                    {"id": 123, "name": "cf_name", "field_format": "string", "value": [1, 2, 3]},
                    {"id": 2, "value": "single"},
                ]
            }
        }));

        assert_xml_eq(
            &encoded,
            r#"<issue><custom_fields type="array">
                <custom_field name="cf_name" field_format="string" id="123" multiple="true">
                    <value type="array"><value>1</value><value>2</value><value>3</value></value>
                </custom_field>
                <custom_field id="2"><value>single</value></custom_field>
            </custom_fields></issue>"#,
        );
    }

    #[test]
    fn test_encode_custom_field_upload() {
        let encoded = encode(json!({
            "issue": {
                "custom_fields": [{"id": 5, "value": {"token": "t", "filename": "f"}}]
            }
        }));

        assert_xml_eq(
            &encoded,
            r#"<issue><custom_fields type="array">
                <custom_field id="5" multiple="true"><value><token>t</token><filename>f</filename></value></custom_field>
            </custom_fields></issue>"#,
        );
        assert!(!encoded.contains(r#"<value type="array">"#));
    }

    #[test]
    fn test_encode_uploads() {
        let encoded = encode(json!({
            "issue": {
                "subject": "With file",
                "uploads": [
                    {"token": "1.abc", "filename": "a.png", "content_type": "image/png"},
                    {"token": "2.def", "filename": "b.txt", "description": "notes"},
                ]
            }
        }));

        assert_xml_eq(
            &encoded,
            r#"<issue><subject>With file</subject><uploads type="array">
                <upload><token>1.abc</token><filename>a.png</filename><content_type>image/png</content_type></upload>
                <upload><token>2.def</token><filename>b.txt</filename><description>notes</description></upload>
            </uploads></issue>"#,
        );
    }

    #[test]
    fn test_encode_scalar_root() {
        let encoded = encode(json!({"user_id": 5}));
        assert_xml_eq(&encoded, "<user_id>5</user_id>");
    }

    #[test]
    fn test_encode_escapes_text() {
        let encoded = encode(json!({"issue": {"subject": "a < b & c", "is_private": true, "parent_issue_id": null}}));

        assert!(encoded.contains("<subject>a &lt; b &amp; c</subject>"));
        assert!(encoded.contains("<is_private>true</is_private>"));
        assert!(encoded.contains("<parent_issue_id/>"));
    }

    #[test]
    fn test_encode_invalid_root_name() {
        let err = XmlSerializer::from_value(json!({"0": "value"})).unwrap_err();
        assert!(err.to_string().starts_with("Could not create XML from array"));
        assert!(err.to_string().contains("invalid element name '0'"));
    }

    #[test]
    fn test_encode_collects_all_diagnostics() {
        let err = XmlSerializer::from_value(json!({
            "issue": {"1st": "x", "subject": "bell\u{7}"}
        }))
        .unwrap_err();

        assert!(err.to_string().contains("invalid element name '1st'"));
        assert!(err.to_string().contains("U+0007"));
    }

    #[test]
    fn test_encode_requires_single_root() {
        assert!(XmlSerializer::from_value(json!({"a": 1, "b": 2})).is_err());
        assert!(XmlSerializer::from_value(json!({})).is_err());
        assert!(XmlSerializer::from_value(json!(["a"])).is_err());
        assert!(XmlSerializer::from_value(json!({"a": [1]})).is_err());
    }

    #[test]
    fn test_decoded_document_re_encodes_equivalently() {
        let xml = r#"<?xml version="1.0"?>
<project id="1">
  <name>Foo &amp; Bar</name>
  <parent id="2" name="Root"/>
  <description>Line</description>
  <status>1</status>
</project>"#;

        let decoded = XmlSerializer::from_xml(xml).unwrap();
        let encoded = XmlSerializer::from_value(decoded.normalized().clone()).unwrap();

        assert_xml_eq(encoded.encoded(), xml);
    }

    fn assert_round_trip(xml: &str) {
        let decoded = XmlSerializer::from_xml(xml).unwrap();
        let encoded = XmlSerializer::from_value(decoded.normalized().clone()).unwrap();
        let again = XmlSerializer::from_xml(encoded.encoded()).unwrap();

        assert_eq!(again.normalized(), decoded.normalized());
    }

    #[test]
    fn test_decoded_plural_ids_re_encode_without_extra_wrapper() {
        let xml = r#"<group><name>Dev</name><user_ids type="array"><user_id>1</user_id><user_id>2</user_id></user_ids></group>"#;

        assert_round_trip(xml);

        let decoded = XmlSerializer::from_xml(xml).unwrap();
        let encoded = XmlSerializer::from_value(decoded.into_normalized()).unwrap();
        assert!(encoded
            .encoded()
            .contains(r#"<user_ids type="array"><user_id>1</user_id><user_id>2</user_id></user_ids>"#));
    }

    #[test]
    fn test_decoded_list_response_re_encodes_equivalently() {
        assert_round_trip(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<issues type="array" total_count="2" offset="0" limit="25">
  <issue>
    <id>4326</id>
    <project id="1" name="Redmine"/>
    <watchers type="array"><user id="3" name="Ann"/><user id="4" name="Bob"/></watchers>
  </issue>
  <issue>
    <id>4325</id>
    <project id="1" name="Redmine"/>
  </issue>
</issues>"#,
        );
    }

    #[test]
    fn test_decoded_custom_fields_re_encode_equivalently() {
        let xml = r#"<issue>
  <id>7</id>
  <custom_fields type="array">
    <custom_field id="1" name="Build">1.2</custom_field>
    <custom_field id="2" name="Affected" multiple="true">
      <value type="array"><value>web</value><value>api</value></value>
    </custom_field>
    <custom_field id="3" name="Note"><value>single</value></custom_field>
  </custom_fields>
</issue>"#;

        assert_round_trip(xml);

        let decoded = XmlSerializer::from_xml(xml).unwrap();
        let encoded = XmlSerializer::from_value(decoded.into_normalized()).unwrap();
        assert_eq!(encoded.encoded().matches("<custom_fields").count(), 1);
        assert_eq!(encoded.encoded().matches("<custom_field ").count(), 3);
    }
}
