//! URL fragment grammar for line references: `#L<n>` and `#L<a>-L<b>`.
//!
//! Input is accepted in either range order; output is always canonical with `a <= b`.

use crate::domain::errors::FragmentError;
use crate::domain::model::{IdScheme, LineNumber, LineRange};

/// A parsed line reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    Line(LineNumber),
    /// Endpoints in the order they appeared.
    Range(LineNumber, LineNumber),
}

/// Split a range fragment into its two raw anchor identifiers.
///
/// Anything other than exactly two `-`-separated parts is rejected, including single-line
/// fragments.
pub fn parse_range(fragment: &str) -> Result<(&str, &str), FragmentError> {
    let body = strip_hash(fragment);
    if body.is_empty() {
        return Err(FragmentError::Empty);
    }
    let parts: Vec<&str> = body.split('-').collect();
    match parts.as_slice() {
        [first, last] => Ok((*first, *last)),
        _ => Err(FragmentError::PartCount(parts.len())),
    }
}

/// Parse either fragment form against an identifier scheme.
pub fn parse(fragment: &str, scheme: &IdScheme) -> Result<Fragment, FragmentError> {
    let body = strip_hash(fragment);
    if body.is_empty() {
        return Err(FragmentError::Empty);
    }

    let resolve = |id: &str| {
        scheme
            .parse_anchor(id)
            .ok_or_else(|| FragmentError::InvalidAnchor(id.to_string()))
    };

    match parse_range(body) {
        Ok((first, last)) => Ok(Fragment::Range(resolve(first)?, resolve(last)?)),
        Err(FragmentError::PartCount(1)) => Ok(Fragment::Line(resolve(body)?)),
        Err(err) => Err(err),
    }
}

pub fn line_fragment(scheme: &IdScheme, line: LineNumber) -> String {
    format!("#{}", scheme.anchor_id(line))
}

pub fn range_fragment(scheme: &IdScheme, range: LineRange) -> String {
    format!(
        "#{}-{}",
        scheme.anchor_id(range.start()),
        scheme.anchor_id(range.end())
    )
}

fn strip_hash(fragment: &str) -> &str {
    fragment.strip_prefix('#').unwrap_or(fragment)
}
