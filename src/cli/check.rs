//! Run a query over JSON records

use log::{debug, info};
use serde_json::Value as JsonValue;

use super::CliError;
use crate::{ImplementationProfile, json::records_from_str};

/// Options for the check command
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// The filter query
    pub query: String,
    /// JSON input: an object, an array of objects, or JSON lines
    pub input: Option<String>,
    /// Match attribute names exactly instead of ignoring case
    pub case_sensitive: bool,
    /// Only validate the query, don't read input
    pub syntax_only: bool,
}

/// Result of a check operation
#[derive(Debug)]
pub enum CheckResult {
    /// The query parsed and compiled
    SyntaxValid,
    /// Records accepted by the query, in input order
    Matches(Vec<JsonValue>),
}

/// Execute an objfilter check operation
pub fn execute_check(options: &CheckOptions) -> Result<CheckResult, CliError> {
    let profile = if options.case_sensitive {
        ImplementationProfile::case_sensitive()
    } else {
        ImplementationProfile::default()
    };

    let expr = profile.parse(&options.query).map_err(crate::FilterError::from)?;
    debug!("parsed query as: {}", expr);
    let filter = expr.compile(&profile)?;

    if options.syntax_only {
        return Ok(CheckResult::SyntaxValid);
    }

    let input = options.input.as_ref().ok_or(CliError::NoInput)?;
    let records = records_from_str(input)?;
    let total = records.len();

    let matches: Vec<JsonValue> = records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();
    info!("{} of {} records matched", matches.len(), total);

    Ok(CheckResult::Matches(matches))
}
