use std::io::{self, Write};

use clap::ValueEnum;
use mongodb::bson::Document;
use mongodb_support::ExtendedJsonMode;
use serde::Deserialize;
use sort_examples_common::{demonstrations::ExamplesRun, query::PathComparison};

/// How result documents are written to stdout, one document per line.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// Canonical extended JSON; every value keeps its BSON type
    #[default]
    Canonical,

    /// Relaxed extended JSON; numbers print as plain JSON numbers
    Relaxed,

    /// The driver's display form, e.g. `{ "type": "Masala", "rating": 10 }`
    Debug,
}

impl OutputFormat {
    pub fn render(self, document: Document) -> String {
        match self {
            OutputFormat::Canonical => ExtendedJsonMode::Canonical.render_document(document),
            OutputFormat::Relaxed => ExtendedJsonMode::Relaxed.render_document(document),
            OutputFormat::Debug => document.to_string(),
        }
    }
}

pub fn write_documents(
    out: &mut impl Write,
    format: OutputFormat,
    documents: impl IntoIterator<Item = Document>,
) -> io::Result<()> {
    for document in documents {
        writeln!(out, "{}", format.render(document))?;
    }
    Ok(())
}

pub fn write_examples_run(
    out: &mut impl Write,
    format: OutputFormat,
    run: ExamplesRun,
) -> io::Result<()> {
    if let Some(inserted) = run.inserted {
        writeln!(out, "Number of documents inserted: {inserted}")?;
    }
    for outcome in run.outcomes {
        writeln!(out, "{}:", outcome.demonstration.title)?;
        write_documents(out, format, outcome.documents)?;
    }
    Ok(())
}

pub fn write_path_comparison(
    out: &mut impl Write,
    format: OutputFormat,
    comparison: &PathComparison,
) -> io::Result<()> {
    match comparison.first_difference() {
        None => writeln!(
            out,
            "find and aggregate returned the same {} documents in the same order",
            comparison.find.len()
        ),
        Some(position) => {
            writeln!(out, "find and aggregate results differ at position {position}")?;
            let describe = |documents: &[Document]| match documents.get(position) {
                Some(document) => format.render(document.clone()),
                None => "<no document>".to_owned(),
            };
            writeln!(out, "  find:      {}", describe(&comparison.find))?;
            writeln!(out, "  aggregate: {}", describe(&comparison.aggregate))
        }
    }
}
