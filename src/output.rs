use std::io::{self, Write};

use serde::Serialize;

use crate::app::{
    DatasetListResult, LookupResult, NavigateResult, OpenResult, SearchResult, UrlResult,
};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Interactive,
    NonInteractive,
}

pub struct JsonOutput;

impl JsonOutput {
    pub fn print_lookup(result: &LookupResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_url(result: &UrlResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_navigate(result: &NavigateResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_open(result: &OpenResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_datasets(result: &DatasetListResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl crate::app::ProgressSink for JsonOutput {
    fn event(&self, _event: crate::app::ProgressEvent) {}
}
