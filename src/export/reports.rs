//! Renderable command results

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use super::Export;
use crate::domain::abi::{DecodedArgs, IndexedFunction, SelectorIndex};
use crate::domain::tx::{DecodedInput, DecodedOutput, OutputPayload, RevertInfo};
use crate::infrastructure::abi::{selector_hex, SelectorCollision};

const ARG_HEADER: &[&str] = &["index", "name", "type", "value"];
const FUNCTION_HEADER: &[&str] = &["selector", "signature", "name", "source"];

fn write_args(out: &mut dyn Write, args: &DecodedArgs) -> std::io::Result<()> {
    for (idx, arg) in args.iter().enumerate() {
        let name = if arg.name.is_empty() { "_" } else { arg.name.as_str() };
        writeln!(out, "  [{}] {} {} = {}", idx, arg.kind, name, arg.value)?;
    }
    Ok(())
}

fn arg_rows(args: &DecodedArgs) -> Vec<Vec<String>> {
    args.iter()
        .enumerate()
        .map(|(idx, arg)| {
            vec![
                idx.to_string(),
                arg.name.clone(),
                arg.kind.clone(),
                arg.value.to_string(),
            ]
        })
        .collect()
}

impl Export for DecodedInput {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "method:    {}", self.method_name)?;
        writeln!(out, "signature: {}", self.signature)?;
        writeln!(out, "inputs:    {}", self.decoded_input.len())?;
        write_args(out, &self.decoded_input)
    }

    fn csv_header(&self) -> &'static [&'static str] {
        ARG_HEADER
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        arg_rows(&self.decoded_input)
    }
}

impl Export for DecodedOutput {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "method:    {}", self.method_name)?;
        match &self.decoded_output {
            OutputPayload::Values(values) => {
                writeln!(out, "outputs:   {}", values.len())?;
                write_args(out, values)
            }
            OutputPayload::Message(message) => writeln!(out, "message:   {}", message),
            OutputPayload::Empty => writeln!(out, "outputs:   0"),
        }
    }

    fn csv_header(&self) -> &'static [&'static str] {
        ARG_HEADER
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        match &self.decoded_output {
            OutputPayload::Values(values) => arg_rows(values),
            OutputPayload::Message(message) => {
                vec![vec!["0".into(), "message".into(), "string".into(), message.clone()]]
            }
            OutputPayload::Empty => Vec::new(),
        }
    }
}

impl Export for RevertInfo {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "status:  {}", self.tx_status)?;
        if !self.revert_message.is_empty() {
            writeln!(out, "message: {}", self.revert_message)?;
        }
        Ok(())
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["status", "message"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![self.tx_status.clone(), self.revert_message.clone()]]
    }
}

/// Selector of a single signature
#[derive(Debug, Clone, Serialize)]
pub struct SelectorReport {
    pub signature: String,
    pub selector: String,
}

impl Export for SelectorReport {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "{}  {}", self.selector, self.signature)
    }

    fn csv_header(&self) -> &'static [&'static str] {
        &["selector", "signature"]
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        vec![vec![self.selector.clone(), self.signature.clone()]]
    }
}

/// Values decoded against an ad-hoc type list
#[derive(Debug, Clone, Serialize)]
pub struct DecodeReport {
    pub signature: String,
    pub values: DecodedArgs,
}

impl Export for DecodeReport {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(out, "types:  {}", self.signature)?;
        write_args(out, &self.values)
    }

    fn csv_header(&self) -> &'static [&'static str] {
        ARG_HEADER
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        arg_rows(&self.values)
    }
}

/// One function of an interface or a scan
#[derive(Debug, Clone, Serialize)]
pub struct FunctionRow {
    pub selector: String,
    pub signature: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl FunctionRow {
    fn cells(&self) -> Vec<String> {
        vec![
            self.selector.clone(),
            self.signature.clone(),
            self.name.clone(),
            self.source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        ]
    }
}

impl From<&IndexedFunction> for FunctionRow {
    fn from(function: &IndexedFunction) -> Self {
        Self {
            selector: function.selector_hex(),
            signature: function.signature.clone(),
            name: function.name.clone(),
            source: Some(function.source.clone()),
        }
    }
}

/// A selector shared by several signatures
#[derive(Debug, Clone, Serialize)]
pub struct CollisionRow {
    pub selector: String,
    pub signatures: Vec<String>,
}

impl From<&SelectorCollision> for CollisionRow {
    fn from(collision: &SelectorCollision) -> Self {
        Self {
            selector: selector_hex(collision.selector),
            signatures: collision.signatures.clone(),
        }
    }
}

fn write_collisions(out: &mut dyn Write, collisions: &[CollisionRow]) -> std::io::Result<()> {
    if collisions.is_empty() {
        return Ok(());
    }
    writeln!(out, "collisions:")?;
    for collision in collisions {
        writeln!(out, "  {}  {}", collision.selector, collision.signatures.join(" | "))?;
    }
    Ok(())
}

/// Functions of a single interface
#[derive(Debug, Clone, Serialize)]
pub struct FunctionTable {
    pub functions: Vec<FunctionRow>,
    pub collisions: Vec<CollisionRow>,
}

impl Export for FunctionTable {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        for function in &self.functions {
            writeln!(out, "{}  {}", function.selector, function.signature)?;
        }
        write_collisions(out, &self.collisions)
    }

    fn csv_header(&self) -> &'static [&'static str] {
        FUNCTION_HEADER
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.functions.iter().map(FunctionRow::cells).collect()
    }
}

/// Summary of a directory scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub scanned_files: usize,
    pub selectors: usize,
    pub scan_ms: u128,
    pub functions: Vec<FunctionRow>,
    pub collisions: Vec<CollisionRow>,
    pub errors: Vec<String>,
}

impl ScanReport {
    pub fn new(index: &SelectorIndex) -> Self {
        let mut functions: Vec<FunctionRow> = index.functions().map(FunctionRow::from).collect();
        functions.sort_by(|a, b| {
            a.signature
                .cmp(&b.signature)
                .then_with(|| a.source.cmp(&b.source))
        });

        let collisions = index
            .collisions()
            .into_iter()
            .map(|(selector, entries)| {
                let mut signatures: Vec<String> =
                    entries.iter().map(|entry| entry.signature.clone()).collect();
                signatures.dedup();
                CollisionRow {
                    selector: selector_hex(*selector),
                    signatures,
                }
            })
            .collect();

        Self {
            scanned_files: index.scanned_files,
            selectors: index.len(),
            scan_ms: index.scan_ms,
            functions,
            collisions,
            errors: index.errors.clone(),
        }
    }
}

impl Export for ScanReport {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        writeln!(
            out,
            "scanned {} files, {} selectors in {} ms",
            self.scanned_files, self.selectors, self.scan_ms
        )?;
        for function in &self.functions {
            writeln!(out, "  {}  {}", function.selector, function.signature)?;
        }
        write_collisions(out, &self.collisions)?;
        if !self.errors.is_empty() {
            writeln!(out, "errors:")?;
            for error in &self.errors {
                writeln!(out, "  {}", error)?;
            }
        }
        Ok(())
    }

    fn csv_header(&self) -> &'static [&'static str] {
        FUNCTION_HEADER
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.functions.iter().map(FunctionRow::cells).collect()
    }
}

/// Scanned functions matching a selector, last registration first
#[derive(Debug, Clone, Serialize)]
pub struct LookupReport {
    pub selector: String,
    pub matches: Vec<FunctionRow>,
}

impl LookupReport {
    pub fn new(index: &SelectorIndex, selector: [u8; 4]) -> Self {
        Self {
            selector: selector_hex(selector),
            matches: index
                .lookup_all(selector)
                .iter()
                .rev()
                .map(FunctionRow::from)
                .collect(),
        }
    }
}

impl Export for LookupReport {
    fn write_text(&self, out: &mut dyn Write) -> std::io::Result<()> {
        if self.matches.is_empty() {
            return writeln!(out, "{}  no match", self.selector);
        }
        for function in &self.matches {
            let source = function
                .source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            writeln!(out, "{}  {}  {}", function.selector, function.signature, source)?;
        }
        Ok(())
    }

    fn csv_header(&self) -> &'static [&'static str] {
        FUNCTION_HEADER
    }

    fn csv_rows(&self) -> Vec<Vec<String>> {
        self.matches.iter().map(FunctionRow::cells).collect()
    }
}
